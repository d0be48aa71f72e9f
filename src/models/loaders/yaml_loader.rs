use crate::error::DocumentError;
use crate::models::marker::MarkerDocument;
use serde_yaml::Value;

/// 文档解析器：把文件内容转换为通用的 key/value 树
///
/// 由调用方注入，默认实现见 [`YamlDocumentParser`]
pub trait DocumentParser: Send + Sync {
    fn parse(&self, content: &str) -> Result<Value, DocumentError>;
}

/// 基于 serde_yaml 的默认解析器
#[derive(Debug, Clone, Copy, Default)]
pub struct YamlDocumentParser;

impl DocumentParser for YamlDocumentParser {
    fn parse(&self, content: &str) -> Result<Value, DocumentError> {
        Ok(serde_yaml::from_str(content)?)
    }
}

/// 从文件内容加载 marker 文档
///
/// 顶层不是映射（包括空文件）时返回 [`DocumentError::NotAMapping`]
pub fn load_marker(
    parser: &dyn DocumentParser,
    content: &str,
) -> Result<MarkerDocument, DocumentError> {
    let tree = parser.parse(content)?;
    if !tree.is_mapping() {
        return Err(DocumentError::NotAMapping);
    }
    Ok(MarkerDocument::from_value(tree)?)
}

/// 文件名是否以识别的后缀结尾
pub fn is_marker_file(filename: &str, extensions: &[String]) -> bool {
    extensions
        .iter()
        .any(|ext| filename.len() > ext.len() && filename.ends_with(ext.as_str()))
}

/// 去掉后缀后的文件名，即文档 id 应有的值
pub fn expected_id<'a>(filename: &'a str, extensions: &[String]) -> &'a str {
    extensions
        .iter()
        .find_map(|ext| filename.strip_suffix(ext.as_str()))
        .unwrap_or(filename)
}
