//! 文件处理上下文
//!
//! 封装"我正在处理文件夹中的第几个文件"这一信息

use std::fmt::Display;
use std::path::PathBuf;

/// 文件处理上下文
#[derive(Debug, Clone)]
pub struct FileCtx {
    /// 文件在本次运行中的序号（从1开始，仅用于日志显示）
    pub file_index: usize,

    /// 文件名（含后缀）
    pub filename: String,

    /// 完整路径
    pub path: PathBuf,
}

impl FileCtx {
    /// 创建新的文件上下文
    pub fn new(file_index: usize, filename: String, path: PathBuf) -> Self {
        Self {
            file_index,
            filename,
            path,
        }
    }

    pub fn path_string(&self) -> String {
        self.path.display().to_string()
    }
}

impl Display for FileCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[文件 {}] {}", self.file_index, self.filename)
    }
}
