//! 统一的问题分类
//!
//! 规则引擎和文本检查器都产出 [`Issue`]。每种 [`IssueKind`] 属于一个 [`IssueFamily`]，
//! 分类器只看 family，不看具体类型。

use serde::{Deserialize, Serialize};

/// 严重程度
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    High,
    Medium,
    Low,
}

/// 修复方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FixKind {
    /// 可自动修复
    Auto,
    /// 需要人工修复
    Manual,
    /// 按模板补全
    Template,
    /// 需要迁移到 v3.1
    Migration,
}

/// 问题族，决定分类桶
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueFamily {
    Id,
    Example,
    Structure,
    Other,
}

/// 问题类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IssueKind {
    // --- 规则引擎 ---
    IdSync,
    IdMalformed,
    Prefix,
    FrameMissing,
    FrameIncomplete,
    NarrativeInvalid,
    StructureMissing,
    StructureMultiple,
    TodoExample,
    LegacyMigration,
    FieldMissing,
    // --- 文本检查 ---
    IdCommented,
    KeyMissingColon,
    ExamplesFormat,
    // --- 文件级失败 ---
    Unreadable,
    Unparsable,
    ProcessingFailed,
}

impl IssueKind {
    pub fn family(self) -> IssueFamily {
        match self {
            IssueKind::IdSync | IssueKind::IdCommented => IssueFamily::Id,
            IssueKind::TodoExample | IssueKind::ExamplesFormat => IssueFamily::Example,
            IssueKind::StructureMissing
            | IssueKind::StructureMultiple
            | IssueKind::KeyMissingColon => IssueFamily::Structure,
            IssueKind::IdMalformed
            | IssueKind::Prefix
            | IssueKind::FrameMissing
            | IssueKind::FrameIncomplete
            | IssueKind::NarrativeInvalid
            | IssueKind::LegacyMigration
            | IssueKind::FieldMissing
            | IssueKind::Unreadable
            | IssueKind::Unparsable
            | IssueKind::ProcessingFailed => IssueFamily::Other,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            IssueKind::IdSync => "id-sync",
            IssueKind::IdMalformed => "id-malformed",
            IssueKind::Prefix => "prefix",
            IssueKind::FrameMissing => "frame-missing",
            IssueKind::FrameIncomplete => "frame-incomplete",
            IssueKind::NarrativeInvalid => "narrative-invalid",
            IssueKind::StructureMissing => "structure-missing",
            IssueKind::StructureMultiple => "structure-multiple",
            IssueKind::TodoExample => "todo-example",
            IssueKind::LegacyMigration => "legacy-migration",
            IssueKind::FieldMissing => "field-missing",
            IssueKind::IdCommented => "id-commented",
            IssueKind::KeyMissingColon => "key-missing-colon",
            IssueKind::ExamplesFormat => "examples-format",
            IssueKind::Unreadable => "unreadable",
            IssueKind::Unparsable => "unparsable",
            IssueKind::ProcessingFailed => "processing-failed",
        }
    }
}

impl std::fmt::Display for IssueKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// 一条检查问题，创建后不可变
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    #[serde(rename = "type")]
    pub kind: IssueKind,
    pub severity: Severity,
    pub message: String,
    pub fix: FixKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
}

impl Issue {
    pub fn new(kind: IssueKind, severity: Severity, fix: FixKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            severity,
            message: message.into(),
            fix,
            line: None,
        }
    }

    pub fn at_line(mut self, line: usize) -> Self {
        self.line = Some(line);
        self
    }

    pub fn family(&self) -> IssueFamily {
        self.kind.family()
    }

    pub fn is_high(&self) -> bool {
        self.severity == Severity::High
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_serializes_as_kebab_case() {
        let issue = Issue::new(
            IssueKind::StructureMultiple,
            Severity::High,
            FixKind::Manual,
            "两个结构块",
        );
        let json = serde_json::to_value(&issue).unwrap();
        assert_eq!(json["type"], "structure-multiple");
        assert_eq!(json["severity"], "high");
        assert_eq!(json["fix"], "manual");
        assert!(json.get("line").is_none());
        assert_eq!(IssueKind::StructureMultiple.as_str(), "structure-multiple");
    }

    #[test]
    fn test_families() {
        assert_eq!(IssueKind::IdSync.family(), IssueFamily::Id);
        assert_eq!(IssueKind::IdCommented.family(), IssueFamily::Id);
        assert_eq!(IssueKind::TodoExample.family(), IssueFamily::Example);
        assert_eq!(IssueKind::KeyMissingColon.family(), IssueFamily::Structure);
        assert_eq!(IssueKind::Prefix.family(), IssueFamily::Other);
        assert_eq!(IssueKind::Unparsable.family(), IssueFamily::Other);
    }
}
