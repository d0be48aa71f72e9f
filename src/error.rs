use std::fmt;

/// 应用程序错误类型
#[derive(Debug)]
pub enum AppError {
    /// 文件夹访问错误（整批任务失败）
    Folder(FolderAccessError),
    /// 配置错误
    Config(ConfigError),
    /// 任务被取消
    Cancelled,
    /// 其他错误（用于包装第三方库错误）
    Other(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Folder(e) => write!(f, "文件夹错误: {}", e),
            AppError::Config(e) => write!(f, "配置错误: {}", e),
            AppError::Cancelled => write!(f, "处理已取消"),
            AppError::Other(msg) => write!(f, "错误: {}", msg),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Folder(e) => Some(e),
            AppError::Config(e) => Some(e),
            AppError::Cancelled | AppError::Other(_) => None,
        }
    }
}

/// 文件夹访问错误
///
/// 只有文件夹级别的问题才会让整批任务失败，单个文件的问题见 [`DocumentError`]
#[derive(Debug)]
pub enum FolderAccessError {
    /// 文件夹不存在
    NotFound {
        path: String,
    },
    /// 路径不是文件夹
    NotADirectory {
        path: String,
    },
    /// 读取文件夹失败
    ReadFailed {
        path: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl fmt::Display for FolderAccessError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FolderAccessError::NotFound { path } => write!(f, "文件夹不存在: {}", path),
            FolderAccessError::NotADirectory { path } => write!(f, "路径不是文件夹: {}", path),
            FolderAccessError::ReadFailed { path, source } => {
                write!(f, "无法读取文件夹 ({}): {}", path, source)
            }
        }
    }
}

impl std::error::Error for FolderAccessError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FolderAccessError::ReadFailed { source, .. } => {
                Some(source.as_ref() as &(dyn std::error::Error + 'static))
            }
            _ => None,
        }
    }
}

/// 配置错误
#[derive(Debug)]
pub enum ConfigError {
    /// 读取配置文件失败
    FileReadFailed {
        path: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// TOML 解析失败
    TomlParseFailed {
        path: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 环境变量解析失败
    EnvVarParseFailed {
        var_name: String,
        value: String,
        expected_type: String,
    },
    /// 配置值不合法
    InvalidValue {
        field: String,
        reason: String,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::FileReadFailed { path, source } => {
                write!(f, "读取配置文件失败 ({}): {}", path, source)
            }
            ConfigError::TomlParseFailed { path, source } => {
                write!(f, "TOML解析失败 ({}): {}", path, source)
            }
            ConfigError::EnvVarParseFailed {
                var_name,
                value,
                expected_type,
            } => {
                write!(
                    f,
                    "环境变量 {} 解析失败: 值 '{}' 无法转换为 {}",
                    var_name, value, expected_type
                )
            }
            ConfigError::InvalidValue { field, reason } => {
                write!(f, "配置项 {} 不合法: {}", field, reason)
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::FileReadFailed { source, .. }
            | ConfigError::TomlParseFailed { source, .. } => {
                Some(source.as_ref() as &(dyn std::error::Error + 'static))
            }
            _ => None,
        }
    }
}

/// 单个文件的错误：读取失败或无法解析
///
/// 不会中断批处理，由流程层转换为 review 分类
#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    #[error("读取文件失败 ({path}): {source}")]
    Unreadable {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("YAML解析失败: {message}")]
    Unparsable { message: String, line: Option<usize> },
    #[error("文档顶层必须是映射 (key: value)")]
    NotAMapping,
}

impl DocumentError {
    /// 错误对应的行号（从 1 开始），未知时返回 None
    pub fn line(&self) -> Option<usize> {
        match self {
            DocumentError::Unparsable { line, .. } => *line,
            _ => None,
        }
    }
}

impl From<serde_yaml::Error> for DocumentError {
    fn from(err: serde_yaml::Error) -> Self {
        DocumentError::Unparsable {
            line: err.location().map(|loc| loc.line()),
            message: err.to_string(),
        }
    }
}

// ========== 从常见错误类型转换 ==========

impl From<FolderAccessError> for AppError {
    fn from(err: FolderAccessError) -> Self {
        AppError::Folder(err)
    }
}

impl From<ConfigError> for AppError {
    fn from(err: ConfigError) -> Self {
        AppError::Config(err)
    }
}

impl From<regex::Error> for AppError {
    fn from(err: regex::Error) -> Self {
        AppError::Other(format!("正则表达式错误: {}", err))
    }
}

// ========== 便捷方法 ==========

impl AppError {
    /// 是否为文件夹访问错误
    pub fn is_folder_error(&self) -> bool {
        matches!(self, AppError::Folder(_))
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;
