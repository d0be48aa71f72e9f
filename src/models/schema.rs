//! Lean Deep v3.1 模式定义
//!
//! 只读的静态配置：必填字段、frame 子字段、narrative 枚举、结构块、旧版字段以及 id 前缀映射

use serde::{Deserialize, Serialize};

/// 顶层必填字段
pub const REQUIRED_FIELDS: [&str; 7] = [
    "id",
    "lang",
    "description",
    "frame",
    "examples",
    "activation_logic",
    "scoring",
];

/// frame 必填子字段
pub const FRAME_FIELDS: [&str; 4] = ["signal", "concept", "pragmatics", "narrative"];

/// frame.narrative 允许的取值
pub const NARRATIVE_TYPES: [&str; 5] = ["linear", "loop", "spike", "drift", "accumulative"];

/// 结构块，文档中必须恰好出现一个
pub const STRUCTURE_BLOCKS: [&str; 3] = ["pattern", "composed_of", "detect_class"];

/// v3.0 遗留字段
pub const LEGACY_FIELDS: [&str; 3] = ["level", "category", "marker-alias"];

/// examples 中的占位符
pub const TODO_EXAMPLE_TOKEN: &str = "TODO_EXAMPLE";

/// id 前缀 → marker 类别
static PREFIX_MAP: phf::Map<&'static str, MarkerCategory> = phf::phf_map! {
    "A_" => MarkerCategory::Atomic,
    "S_" => MarkerCategory::Semantic,
    "C_" => MarkerCategory::Cluster,
    "MM_" => MarkerCategory::Meta,
};

/// Marker 类别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkerCategory {
    Atomic,
    Semantic,
    Cluster,
    Meta,
}

impl MarkerCategory {
    /// 从前缀（含下划线，例如 `MM_`）查找类别
    pub fn from_prefix(prefix: &str) -> Option<Self> {
        PREFIX_MAP.get(prefix).copied()
    }

    pub fn name(self) -> &'static str {
        match self {
            MarkerCategory::Atomic => "atomic",
            MarkerCategory::Semantic => "semantic",
            MarkerCategory::Cluster => "cluster",
            MarkerCategory::Meta => "meta",
        }
    }
}

impl std::fmt::Display for MarkerCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// 允许的前缀列表，按固定顺序输出（用于提示信息）
pub fn allowed_prefixes() -> [&'static str; 4] {
    ["A_", "S_", "C_", "MM_"]
}

pub fn is_valid_narrative(value: &str) -> bool {
    NARRATIVE_TYPES.contains(&value)
}
