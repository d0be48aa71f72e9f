//! 文本级检查 - 业务能力层
//!
//! 在解析之前直接看原始文本，发现解析器会"吞掉"的问题：被注释掉的 id、
//! 键后缺少冒号、examples 不是列表。产出的问题都带行号。

use regex::Regex;

use crate::models::issue::{FixKind, Issue, IssueKind, Severity};

/// 向下查看多少行来寻找 examples 的列表项
const EXAMPLES_LOOKAHEAD: usize = 5;

pub struct SourceLinter {
    commented_id: Regex,
    bare_key: Regex,
    list_item: Regex,
    examples_key: Regex,
}

impl SourceLinter {
    pub fn new() -> Result<Self, regex::Error> {
        Ok(Self {
            commented_id: Regex::new(r"^\s*#\s*id\s*:")?,
            bare_key: Regex::new(r"^[A-Za-z][A-Za-z0-9_]*\s*$")?,
            list_item: Regex::new(r"^\s*-(\s|$)")?,
            examples_key: Regex::new(r"^examples\s*:\s*$")?,
        })
    }

    /// 检查原始文本
    pub fn lint(&self, content: &str) -> Vec<Issue> {
        let lines: Vec<&str> = content.lines().collect();
        let mut issues = Vec::new();

        for (idx, line) in lines.iter().enumerate() {
            let line_no = idx + 1;

            if self.commented_id.is_match(line) {
                issues.push(
                    Issue::new(
                        IssueKind::IdCommented,
                        Severity::High,
                        FixKind::Manual,
                        "ID 字段被注释掉了",
                    )
                    .at_line(line_no),
                );
            }

            if self.bare_key.is_match(line) {
                let next_is_item = lines
                    .get(idx + 1)
                    .is_some_and(|next| self.list_item.is_match(next));
                if next_is_item {
                    issues.push(
                        Issue::new(
                            IssueKind::KeyMissingColon,
                            Severity::High,
                            FixKind::Manual,
                            format!("键 \"{}\" 后缺少冒号", line.trim()),
                        )
                        .at_line(line_no),
                    );
                }
            }

            if self.examples_key.is_match(line) {
                let has_items = lines
                    .iter()
                    .skip(idx + 1)
                    .take(EXAMPLES_LOOKAHEAD)
                    .any(|next| self.list_item.is_match(next));
                if !has_items {
                    issues.push(
                        Issue::new(
                            IssueKind::ExamplesFormat,
                            Severity::Medium,
                            FixKind::Manual,
                            "examples 应包含以 \"-\" 开头的列表项",
                        )
                        .at_line(line_no),
                    );
                }
            }
        }

        issues
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn linter() -> SourceLinter {
        SourceLinter::new().unwrap()
    }

    #[test]
    fn test_clean_source() {
        let content = "id: A_X\nexamples:\n  - one\n  - two\npattern:\n  - a\n";
        assert!(linter().lint(content).is_empty());
    }

    #[test]
    fn test_commented_id_with_line() {
        let content = "# header\n# id: A_X\nlang: de\n";
        let issues = linter().lint(content);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].kind, IssueKind::IdCommented);
        assert_eq!(issues[0].line, Some(2));
    }

    #[test]
    fn test_missing_colon_before_list() {
        let content = "id: A_X\nexamples\n  - one\n";
        let issues = linter().lint(content);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].kind, IssueKind::KeyMissingColon);
        assert_eq!(issues[0].line, Some(2));
        assert!(issues[0].message.contains("examples"));
    }

    #[test]
    fn test_examples_without_items() {
        let content = "examples:\n  text: nope\nlang: de\n";
        let issues = linter().lint(content);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].kind, IssueKind::ExamplesFormat);
        assert_eq!(issues[0].line, Some(1));
    }

    #[test]
    fn test_inline_examples_are_not_flagged() {
        let content = "examples: [a, b]\n";
        assert!(linter().lint(content).is_empty());
    }
}
