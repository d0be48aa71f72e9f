//! Marker 数据源 - 基础设施层
//!
//! 只暴露两个能力："列出文件夹条目"和"按路径读取内容"。

use crate::error::FolderAccessError;
use std::io;
use std::path::{Path, PathBuf};

/// 文件夹中的一个条目
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceEntry {
    pub name: String,
    pub path: PathBuf,
    pub is_file: bool,
}

/// Marker 数据源
///
/// 职责：
/// - 列出文件夹条目（保持数据源给出的顺序）
/// - 读取单个文件内容
/// - 不认识 marker 文档，不做任何检查
pub trait MarkerSource: Send + Sync {
    fn list_entries(&self, folder: &Path) -> Result<Vec<SourceEntry>, FolderAccessError>;
    fn read_to_string(&self, path: &Path) -> io::Result<String>;
}

/// 本地文件系统
#[derive(Debug, Clone, Copy, Default)]
pub struct FsMarkerSource;

impl MarkerSource for FsMarkerSource {
    fn list_entries(&self, folder: &Path) -> Result<Vec<SourceEntry>, FolderAccessError> {
        let display = folder.display().to_string();

        let metadata = match std::fs::metadata(folder) {
            Ok(m) => m,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(FolderAccessError::NotFound { path: display })
            }
            Err(e) => {
                return Err(FolderAccessError::ReadFailed {
                    path: display,
                    source: Box::new(e),
                })
            }
        };
        if !metadata.is_dir() {
            return Err(FolderAccessError::NotADirectory { path: display });
        }

        let read_failed = |e: io::Error| FolderAccessError::ReadFailed {
            path: folder.display().to_string(),
            source: Box::new(e),
        };

        let mut entries = Vec::new();
        for entry in std::fs::read_dir(folder).map_err(read_failed)? {
            let entry = entry.map_err(read_failed)?;
            let path = entry.path();
            entries.push(SourceEntry {
                name: entry.file_name().to_string_lossy().to_string(),
                // 跟随符号链接
                is_file: path.is_file(),
                path,
            });
        }
        Ok(entries)
    }

    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }
}

/// 内存数据源，按插入顺序列出
///
/// `None` 内容表示该文件不可读
#[derive(Debug, Clone, Default)]
pub struct MemoryMarkerSource {
    folder: PathBuf,
    files: Vec<(String, Option<String>)>,
}

impl MemoryMarkerSource {
    pub fn new(folder: impl Into<PathBuf>) -> Self {
        Self {
            folder: folder.into(),
            files: Vec::new(),
        }
    }

    pub fn with_file(mut self, name: impl Into<String>, content: impl Into<String>) -> Self {
        self.files.push((name.into(), Some(content.into())));
        self
    }

    pub fn with_unreadable(mut self, name: impl Into<String>) -> Self {
        self.files.push((name.into(), None));
        self
    }
}

impl MarkerSource for MemoryMarkerSource {
    fn list_entries(&self, folder: &Path) -> Result<Vec<SourceEntry>, FolderAccessError> {
        if folder != self.folder {
            return Err(FolderAccessError::NotFound {
                path: folder.display().to_string(),
            });
        }
        Ok(self
            .files
            .iter()
            .map(|(name, _)| SourceEntry {
                name: name.clone(),
                path: self.folder.join(name),
                is_file: true,
            })
            .collect())
    }

    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        let found = self
            .files
            .iter()
            .find(|(name, _)| self.folder.join(name) == path);
        match found {
            Some((_, Some(content))) => Ok(content.clone()),
            Some((_, None)) => Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                "文件不可读",
            )),
            None => Err(io::Error::new(io::ErrorKind::NotFound, "文件不存在")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fs_source_missing_folder() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        let err = FsMarkerSource.list_entries(&missing).unwrap_err();
        assert!(matches!(err, FolderAccessError::NotFound { .. }));
    }

    #[test]
    fn test_fs_source_file_is_not_a_directory() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("A_X.yaml");
        std::fs::write(&file, "id: A_X\n").unwrap();
        let err = FsMarkerSource.list_entries(&file).unwrap_err();
        assert!(matches!(err, FolderAccessError::NotADirectory { .. }));
    }

    #[test]
    fn test_fs_source_lists_files_and_dirs() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("A_X.yaml"), "id: A_X\n").unwrap();
        std::fs::create_dir(dir.path().join("sub.yaml")).unwrap();

        let mut entries = FsMarkerSource.list_entries(dir.path()).unwrap();
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        assert_eq!(entries.len(), 2);
        assert!(entries[0].is_file);
        assert!(!entries[1].is_file);
        assert_eq!(
            FsMarkerSource.read_to_string(&entries[0].path).unwrap(),
            "id: A_X\n"
        );
    }

    #[test]
    fn test_memory_source_keeps_order_and_unreadable() {
        let source = MemoryMarkerSource::new("/m")
            .with_file("b.yaml", "id: b")
            .with_unreadable("a.yaml");
        let entries = source.list_entries(Path::new("/m")).unwrap();
        let names: Vec<_> = entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["b.yaml", "a.yaml"]);
        assert!(source.read_to_string(&entries[1].path).is_err());
        assert!(source.list_entries(Path::new("/other")).is_err());
    }
}
