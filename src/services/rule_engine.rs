//! Lean Deep v3.1 规则引擎 - 业务能力层
//!
//! 只负责"检查一个文档"能力：输入已解析的 [`MarkerDocument`] 和文件名，输出 [`ValidationResult`]。
//!
//! - 纯函数：不修改文档，不持有跨文件的状态
//! - 不会失败：所有模式违规都表示为 [`Issue`]
//! - 每条规则独立执行，互不短路

use serde_yaml::Value;

use crate::models::issue::{FixKind, Issue, IssueKind, Severity};
use crate::models::loaders::expected_id;
use crate::models::marker::MarkerDocument;
use crate::models::report::{SchemaVersion, ValidationResult};
use crate::models::schema::{
    self, MarkerCategory, FRAME_FIELDS, NARRATIVE_TYPES, REQUIRED_FIELDS, TODO_EXAMPLE_TOKEN,
};

/// 单条规则的输入
#[derive(Debug, Clone, Copy)]
pub struct RuleInput<'a> {
    pub doc: &'a MarkerDocument,
    pub filename: &'a str,
    /// 文件名去掉后缀
    pub expected_id: &'a str,
}

pub trait Rule: Send + Sync {
    fn name(&self) -> &'static str;
    fn eval(&self, input: &RuleInput<'_>) -> Vec<Issue>;
}

/// 规则 1：id 必须与文件名一致
pub struct IdSyncRule;

impl Rule for IdSyncRule {
    fn name(&self) -> &'static str {
        "id_sync"
    }

    fn eval(&self, input: &RuleInput<'_>) -> Vec<Issue> {
        match input.doc.id.as_deref() {
            Some(id) if id == input.expected_id => vec![],
            Some(id) => vec![Issue::new(
                IssueKind::IdSync,
                Severity::High,
                FixKind::Auto,
                format!(
                    "ID \"{}\" 必须与文件名 \"{}\" 完全一致 (应为 \"{}\")",
                    id, input.filename, input.expected_id
                ),
            )],
            None => vec![Issue::new(
                IssueKind::IdSync,
                Severity::High,
                FixKind::Auto,
                format!(
                    "ID 缺失，文件 \"{}\" 的 ID 应为 \"{}\"",
                    input.filename, input.expected_id
                ),
            )],
        }
    }
}

/// 规则 2：id 前缀必须在前缀表中
///
/// id 缺失、没有下划线或以下划线开头时无法得到前缀，改为报告 `id-malformed`
pub struct PrefixRule;

impl PrefixRule {
    /// 第一个 `_` 之前（含 `_`）的部分，只允许字母和数字
    pub fn derive_prefix(id: &str) -> Option<&str> {
        match id.find('_') {
            Some(0) | None => None,
            Some(pos) if id[..pos].chars().all(|c| c.is_ascii_alphanumeric()) => Some(&id[..=pos]),
            Some(_) => None,
        }
    }
}

impl Rule for PrefixRule {
    fn name(&self) -> &'static str {
        "prefix"
    }

    fn eval(&self, input: &RuleInput<'_>) -> Vec<Issue> {
        let Some(id) = input.doc.id() else {
            return vec![Issue::new(
                IssueKind::IdMalformed,
                Severity::High,
                FixKind::Manual,
                "ID 为空，无法检查前缀",
            )];
        };

        let Some(prefix) = Self::derive_prefix(id) else {
            return vec![Issue::new(
                IssueKind::IdMalformed,
                Severity::High,
                FixKind::Manual,
                format!("ID \"{}\" 格式不正确，应为 <前缀>_<名称>", id),
            )];
        };

        if MarkerCategory::from_prefix(prefix).is_some() {
            return vec![];
        }

        vec![Issue::new(
            IssueKind::Prefix,
            Severity::High,
            FixKind::Manual,
            format!(
                "无效的前缀 \"{}\"。允许: {}",
                prefix,
                schema::allowed_prefixes().join(", ")
            ),
        )]
    }
}

/// 规则 3：frame 块及其子字段
pub struct FrameRule;

impl Rule for FrameRule {
    fn name(&self) -> &'static str {
        "frame"
    }

    fn eval(&self, input: &RuleInput<'_>) -> Vec<Issue> {
        let Some(frame) = input.doc.frame() else {
            return vec![Issue::new(
                IssueKind::FrameMissing,
                Severity::High,
                FixKind::Template,
                "Frame 块完全缺失",
            )];
        };

        FRAME_FIELDS
            .iter()
            .filter(|field| frame.field(field).is_none())
            .map(|field| {
                Issue::new(
                    IssueKind::FrameIncomplete,
                    Severity::Medium,
                    FixKind::Template,
                    format!("Frame.{} 缺失", field),
                )
            })
            .collect()
    }
}

/// 规则 4：frame.narrative 必须是允许的取值
pub struct NarrativeRule;

impl Rule for NarrativeRule {
    fn name(&self) -> &'static str {
        "narrative"
    }

    fn eval(&self, input: &RuleInput<'_>) -> Vec<Issue> {
        let Some(narrative) = input.doc.frame().and_then(|f| f.field("narrative")) else {
            return vec![];
        };

        if narrative.as_str().is_some_and(schema::is_valid_narrative) {
            return vec![];
        }

        vec![Issue::new(
            IssueKind::NarrativeInvalid,
            Severity::Medium,
            FixKind::Auto,
            format!(
                "Narrative \"{}\" 无效。允许: {}",
                display_value(narrative),
                NARRATIVE_TYPES.join(", ")
            ),
        )]
    }
}

/// 规则 5：pattern / composed_of / detect_class 恰好出现一个
pub struct StructureRule;

impl Rule for StructureRule {
    fn name(&self) -> &'static str {
        "structure"
    }

    fn eval(&self, input: &RuleInput<'_>) -> Vec<Issue> {
        let present = input.doc.structure_blocks();
        match present.len() {
            0 => vec![Issue::new(
                IssueKind::StructureMissing,
                Severity::High,
                FixKind::Template,
                "缺少结构块 (pattern|composed_of|detect_class)",
            )],
            1 => vec![],
            _ => vec![Issue::new(
                IssueKind::StructureMultiple,
                Severity::High,
                FixKind::Manual,
                format!("只允许一个结构块，发现: {}", present.join(", ")),
            )],
        }
    }
}

/// 规则 6：examples 中的 TODO_EXAMPLE 占位符
pub struct TodoExampleRule;

impl Rule for TodoExampleRule {
    fn name(&self) -> &'static str {
        "todo_example"
    }

    fn eval(&self, input: &RuleInput<'_>) -> Vec<Issue> {
        let Some(examples) = input.doc.field("examples") else {
            return vec![];
        };

        if !serialize_value(examples).contains(TODO_EXAMPLE_TOKEN) {
            return vec![];
        }

        vec![Issue::new(
            IssueKind::TodoExample,
            Severity::Low,
            FixKind::Manual,
            "发现 TODO_EXAMPLE 占位符",
        )]
    }
}

/// 规则 7：v3.0 遗留字段
pub struct LegacyRule;

impl Rule for LegacyRule {
    fn name(&self) -> &'static str {
        "legacy"
    }

    fn eval(&self, input: &RuleInput<'_>) -> Vec<Issue> {
        let found = input.doc.legacy_fields();
        if found.is_empty() {
            return vec![];
        }

        vec![Issue::new(
            IssueKind::LegacyMigration,
            Severity::Medium,
            FixKind::Migration,
            format!("发现 v3.0 遗留字段: {}", found.join(", ")),
        )]
    }
}

/// 规则 8：其余必填字段（id 和 frame 由各自的规则负责）
pub struct RequiredFieldsRule;

impl Rule for RequiredFieldsRule {
    fn name(&self) -> &'static str {
        "required_fields"
    }

    fn eval(&self, input: &RuleInput<'_>) -> Vec<Issue> {
        REQUIRED_FIELDS
            .iter()
            .filter(|field| !matches!(**field, "id" | "frame"))
            .filter(|field| !input.doc.has_field(field))
            .map(|field| {
                Issue::new(
                    IssueKind::FieldMissing,
                    Severity::Medium,
                    FixKind::Template,
                    format!("必填字段 \"{}\" 缺失", field),
                )
            })
            .collect()
    }
}

/// Lean Deep v3.1 检查器
pub struct LeanDeepValidator {
    rules: Vec<Box<dyn Rule>>,
    extensions: Vec<String>,
}

impl LeanDeepValidator {
    /// 使用全部规则和默认后缀（`.yaml` / `.yml`）
    pub fn new() -> Self {
        Self::with_extensions(vec![".yaml".to_string(), ".yml".to_string()])
    }

    pub fn with_extensions(extensions: Vec<String>) -> Self {
        Self {
            rules: vec![
                Box::new(IdSyncRule),
                Box::new(PrefixRule),
                Box::new(FrameRule),
                Box::new(NarrativeRule),
                Box::new(StructureRule),
                Box::new(TodoExampleRule),
                Box::new(LegacyRule),
                Box::new(RequiredFieldsRule),
            ],
            extensions,
        }
    }

    pub fn rule_names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|r| r.name()).collect()
    }

    /// 检查一个文档
    ///
    /// # 参数
    /// - `doc`: 已解析的文档
    /// - `filename`: 文件名（含后缀），用于 id 同步检查
    ///
    /// # 返回
    /// 返回检查结果，问题按规则顺序排列
    pub fn evaluate(&self, doc: &MarkerDocument, filename: &str) -> ValidationResult {
        let input = RuleInput {
            doc,
            filename,
            expected_id: expected_id(filename, &self.extensions),
        };

        let issues: Vec<Issue> = self.rules.iter().flat_map(|rule| rule.eval(&input)).collect();

        ValidationResult::new(
            filename,
            detect_version(doc),
            issues,
            !doc.legacy_fields().is_empty(),
        )
    }
}

impl Default for LeanDeepValidator {
    fn default() -> Self {
        Self::new()
    }
}

/// 推导模式版本：有遗留字段 → v3.0；有 frame 且有 id → v3.1；否则 unknown
pub fn detect_version(doc: &MarkerDocument) -> SchemaVersion {
    if !doc.legacy_fields().is_empty() {
        return SchemaVersion::V30;
    }
    if doc.frame().is_some() && doc.id().is_some() {
        return SchemaVersion::V31;
    }
    SchemaVersion::Unknown
}

// JSON 序列化失败（例如映射的键不是字符串）时退回 YAML
fn serialize_value(value: &Value) -> String {
    serde_json::to_string(value)
        .or_else(|_| serde_yaml::to_string(value))
        .unwrap_or_default()
}

fn display_value(value: &Value) -> String {
    match value.as_str() {
        Some(s) => s.to_string(),
        None => serialize_value(value),
    }
}
