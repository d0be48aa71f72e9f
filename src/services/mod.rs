pub mod categorizer;
pub mod rule_engine;
pub mod source_linter;

pub use categorizer::categorize;
pub use rule_engine::{detect_version, LeanDeepValidator, Rule, RuleInput};
pub use source_linter::SourceLinter;
