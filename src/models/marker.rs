use serde::{Deserialize, Serialize};
use serde_yaml::Value;

use crate::models::schema::{LEGACY_FIELDS, STRUCTURE_BLOCKS};

/// 一个 marker 文档的内存表示
///
/// 所有字段都是可选的：缺失与否由规则引擎判断，而不是在反序列化时报错。
/// 值为 `null` 或空白字符串的字段视为不存在。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MarkerDocument {
    #[serde(default, deserialize_with = "deserialize_id")]
    pub id: Option<String>,
    #[serde(default)]
    pub lang: Option<Value>,
    #[serde(default)]
    pub description: Option<Value>,
    #[serde(default, deserialize_with = "deserialize_frame")]
    pub frame: Option<Frame>,
    #[serde(default)]
    pub examples: Option<Value>,
    #[serde(default)]
    pub activation_logic: Option<Value>,
    #[serde(default)]
    pub scoring: Option<Value>,

    // --- 结构块 ---
    #[serde(default)]
    pub pattern: Option<Value>,
    #[serde(default)]
    pub composed_of: Option<Value>,
    #[serde(default)]
    pub detect_class: Option<Value>,

    // --- v3.0 遗留字段 ---
    #[serde(default)]
    pub level: Option<Value>,
    #[serde(default)]
    pub category: Option<Value>,
    #[serde(default, rename = "marker-alias")]
    pub marker_alias: Option<Value>,
}

/// frame 子记录
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    #[serde(default)]
    pub signal: Option<Value>,
    #[serde(default)]
    pub concept: Option<Value>,
    #[serde(default)]
    pub pragmatics: Option<Value>,
    #[serde(default)]
    pub narrative: Option<Value>,
}

impl Frame {
    /// 按名称取子字段，只返回"存在"的值
    pub fn field(&self, name: &str) -> Option<&Value> {
        let value = match name {
            "signal" => self.signal.as_ref(),
            "concept" => self.concept.as_ref(),
            "pragmatics" => self.pragmatics.as_ref(),
            "narrative" => self.narrative.as_ref(),
            _ => None,
        };
        value.filter(|v| is_present(v))
    }
}

impl MarkerDocument {
    /// 从通用的 YAML 树构建文档
    pub fn from_value(value: Value) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_value(value)
    }

    /// 非空白的 id
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }

    pub fn frame(&self) -> Option<&Frame> {
        self.frame.as_ref()
    }

    /// 按顶层字段名取值，只返回"存在"的值
    pub fn field(&self, name: &str) -> Option<&Value> {
        let value = match name {
            "lang" => self.lang.as_ref(),
            "description" => self.description.as_ref(),
            "examples" => self.examples.as_ref(),
            "activation_logic" => self.activation_logic.as_ref(),
            "scoring" => self.scoring.as_ref(),
            "pattern" => self.pattern.as_ref(),
            "composed_of" => self.composed_of.as_ref(),
            "detect_class" => self.detect_class.as_ref(),
            "level" => self.level.as_ref(),
            "category" => self.category.as_ref(),
            "marker-alias" => self.marker_alias.as_ref(),
            _ => None,
        };
        value.filter(|v| is_present(v))
    }

    /// 字段是否存在（包括 id 和 frame）
    pub fn has_field(&self, name: &str) -> bool {
        match name {
            "id" => self.id().is_some(),
            "frame" => self.frame.is_some(),
            other => self.field(other).is_some(),
        }
    }

    /// 出现的结构块，按固定顺序
    pub fn structure_blocks(&self) -> Vec<&'static str> {
        STRUCTURE_BLOCKS
            .iter()
            .copied()
            .filter(|name| self.has_field(name))
            .collect()
    }

    /// 出现的遗留字段，按固定顺序
    pub fn legacy_fields(&self) -> Vec<&'static str> {
        LEGACY_FIELDS
            .iter()
            .copied()
            .filter(|name| self.has_field(name))
            .collect()
    }
}

/// null 与空白字符串视为不存在
pub fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::String(s) => !s.trim().is_empty(),
        _ => true,
    }
}

// id 可以写成字符串或数字；列表、映射等按 JSON 文本保留，交给规则引擎报告
fn deserialize_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(match raw {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(Value::Bool(b)) => Some(b.to_string()),
        Some(other) => Some(serde_json::to_string(&other).unwrap_or_else(|_| format!("{:?}", other))),
    })
}

// frame 不是映射时视为"存在但子字段全部缺失"
fn deserialize_frame<'de, D>(deserializer: D) -> Result<Option<Frame>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    match raw {
        None | Some(Value::Null) => Ok(None),
        Some(value @ Value::Mapping(_)) => serde_yaml::from_value(value)
            .map(Some)
            .map_err(serde::de::Error::custom),
        Some(_) => Ok(Some(Frame::default())),
    }
}
