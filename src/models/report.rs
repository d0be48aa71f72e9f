use serde::{Deserialize, Serialize};

use crate::models::issue::{FixKind, Issue, IssueKind, Severity};

/// 由文档内容推导出的模式版本
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SchemaVersion {
    #[serde(rename = "v3.0")]
    V30,
    #[serde(rename = "v3.1")]
    V31,
    #[serde(rename = "unknown")]
    Unknown,
}

impl std::fmt::Display for SchemaVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            SchemaVersion::V30 => "v3.0",
            SchemaVersion::V31 => "v3.1",
            SchemaVersion::Unknown => "unknown",
        };
        write!(f, "{}", s)
    }
}

/// 分类桶，五者互斥
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Bucket {
    Clean,
    FixId,
    FixExample,
    FixStructure,
    Review,
}

impl Bucket {
    pub fn as_str(self) -> &'static str {
        match self {
            Bucket::Clean => "clean",
            Bucket::FixId => "fixId",
            Bucket::FixExample => "fixExample",
            Bucket::FixStructure => "fixStructure",
            Bucket::Review => "review",
        }
    }
}

impl std::fmt::Display for Bucket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// 单个文档的检查结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    pub filename: String,
    pub version: SchemaVersion,
    pub issues: Vec<Issue>,
    pub is_compliant: bool,
    pub needs_migration: bool,
}

impl ValidationResult {
    /// 根据问题列表构造结果，`is_compliant` 由问题严重程度推导
    pub fn new(
        filename: impl Into<String>,
        version: SchemaVersion,
        issues: Vec<Issue>,
        needs_migration: bool,
    ) -> Self {
        let is_compliant = !issues.iter().any(Issue::is_high);
        Self {
            filename: filename.into(),
            version,
            issues,
            is_compliant,
            needs_migration,
        }
    }

    /// 追加额外的问题（例如文本检查的结果），并重新计算 `is_compliant`
    pub fn with_extra_issues(mut self, extra: Vec<Issue>) -> Self {
        self.issues.extend(extra);
        self.is_compliant = !self.issues.iter().any(Issue::is_high);
        self
    }
}

/// 文件处理状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileStatus {
    Clean,
    NeedsFix,
    Error,
}

/// 批处理中的一条文件记录
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileReport {
    #[serde(flatten)]
    pub result: ValidationResult,
    pub path: String,
    pub bucket: Bucket,
    pub status: FileStatus,
    pub line_count: usize,
}

impl FileReport {
    /// 读取或解析失败的文件：归入 review
    pub fn failed(
        filename: impl Into<String>,
        path: impl Into<String>,
        kind: IssueKind,
        message: impl Into<String>,
        line: Option<usize>,
    ) -> Self {
        let mut issue = Issue::new(kind, Severity::High, FixKind::Manual, message);
        issue.line = line;
        Self {
            result: ValidationResult::new(filename, SchemaVersion::Unknown, vec![issue], false),
            path: path.into(),
            bucket: Bucket::Review,
            status: FileStatus::Error,
            line_count: 0,
        }
    }

    pub fn filename(&self) -> &str {
        &self.result.filename
    }

    pub fn issues(&self) -> &[Issue] {
        &self.result.issues
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compliance_derived_from_high_severity() {
        let medium = Issue::new(IssueKind::FrameIncomplete, Severity::Medium, FixKind::Template, "x");
        let high = Issue::new(IssueKind::Prefix, Severity::High, FixKind::Manual, "y");

        let result = ValidationResult::new("A_X.yaml", SchemaVersion::V31, vec![medium], false);
        assert!(result.is_compliant);

        let result = result.with_extra_issues(vec![high]);
        assert!(!result.is_compliant);
        assert_eq!(result.issues.len(), 2);
    }

    #[test]
    fn test_file_report_json_shape() {
        let report = FileReport::failed(
            "broken.yaml",
            "/m/broken.yaml",
            IssueKind::Unparsable,
            "YAML解析失败",
            Some(3),
        );
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["filename"], "broken.yaml");
        assert_eq!(json["version"], "unknown");
        assert_eq!(json["isCompliant"], false);
        assert_eq!(json["bucket"], "review");
        assert_eq!(json["status"], "error");
        assert_eq!(json["issues"][0]["type"], "unparsable");
        assert_eq!(json["issues"][0]["line"], 3);
    }
}
