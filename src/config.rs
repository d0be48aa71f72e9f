use crate::error::ConfigError;
use serde::Deserialize;
use std::path::Path;

/// 程序配置
///
/// 加载顺序（后者覆盖前者）：默认值 → TOML 配置文件 → 环境变量 → 命令行参数
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 待检查的 marker 文件夹
    pub marker_folder: String,
    /// 同时处理的文件数量
    pub max_concurrent_files: usize,
    /// 识别为 marker 文档的文件后缀
    pub extensions: Vec<String>,
    /// 是否启用文本级检查（注释掉的 id、缺少冒号等）
    pub lint_source: bool,
    /// 是否显示详细日志
    pub verbose_logging: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            marker_folder: "markers".to_string(),
            max_concurrent_files: 8,
            extensions: vec![".yaml".to_string(), ".yml".to_string()],
            lint_source: false,
            verbose_logging: false,
        }
    }
}

impl Config {
    /// 从 TOML 文件加载配置，缺失的字段使用默认值
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileReadFailed {
            path: path.display().to_string(),
            source: Box::new(e),
        })?;
        Self::from_toml_str(&content).map_err(|e| match e {
            ConfigError::TomlParseFailed { source, .. } => ConfigError::TomlParseFailed {
                path: path.display().to_string(),
                source,
            },
            other => other,
        })
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::TomlParseFailed {
            path: String::new(),
            source: Box::new(e),
        })
    }

    /// 默认值 + 环境变量
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::default().apply_env()
    }

    /// 用环境变量覆盖当前配置
    pub fn apply_env(self) -> Result<Self, ConfigError> {
        self.apply_vars(|name| std::env::var(name).ok())
    }

    fn apply_vars(mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        if let Some(v) = lookup("MARKER_FOLDER") {
            self.marker_folder = v;
        }
        if let Some(v) = lookup("MAX_CONCURRENT_FILES") {
            self.max_concurrent_files = parse_var("MAX_CONCURRENT_FILES", &v, "usize")?;
        }
        if let Some(v) = lookup("MARKER_EXTENSIONS") {
            self.extensions = v
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(normalize_extension)
                .collect();
        }
        if let Some(v) = lookup("LINT_SOURCE") {
            self.lint_source = parse_var("LINT_SOURCE", &v, "bool")?;
        }
        if let Some(v) = lookup("VERBOSE_LOGGING") {
            self.verbose_logging = parse_var("VERBOSE_LOGGING", &v, "bool")?;
        }
        Ok(self)
    }

    /// 检查配置值是否合法
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_concurrent_files == 0 {
            return Err(ConfigError::InvalidValue {
                field: "max_concurrent_files".to_string(),
                reason: "必须大于 0".to_string(),
            });
        }
        if self.extensions.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "extensions".to_string(),
                reason: "至少需要一个文件后缀".to_string(),
            });
        }
        Ok(())
    }
}

fn parse_var<T: std::str::FromStr>(
    var_name: &str,
    value: &str,
    expected_type: &str,
) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::EnvVarParseFailed {
            var_name: var_name.to_string(),
            value: value.to_string(),
            expected_type: expected_type.to_string(),
        })
}

/// `yaml` → `.yaml`
pub fn normalize_extension(ext: &str) -> String {
    if ext.starts_with('.') {
        ext.to_string()
    } else {
        format!(".{}", ext)
    }
}
