//! 单文件处理流程 - 流程层
//!
//! 核心职责：定义"一个文件"的完整处理流程
//!
//! 流程顺序：
//! 1. 读取内容 → 解析为文档
//! 2. 规则引擎检查（+ 可选的文本检查）
//! 3. 分类
//!
//! 读取或解析失败不会向上传播，而是生成一条失败记录（默认归入 review）。
//! 启用文本检查时，解析失败的文件仍会做文本检查，并按其结果分类。

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::DocumentError;
use crate::infrastructure::MarkerSource;
use crate::models::issue::IssueKind;
use crate::models::loaders::{load_marker, DocumentParser, YamlDocumentParser};
use crate::models::report::{FileReport, FileStatus, ValidationResult};
use crate::services::{categorize, LeanDeepValidator, SourceLinter};
use crate::utils::logging::truncate_text;
use crate::workflow::file_ctx::FileCtx;

/// 单文件处理流程
///
/// - 编排 读取 → 解析 → 检查 → 分类
/// - 不持有跨文件的可变状态，可以在多个任务间共享
/// - 只依赖业务能力（services）和注入的数据源/解析器
pub struct MarkerFlow {
    validator: LeanDeepValidator,
    linter: Option<SourceLinter>,
    parser: Arc<dyn DocumentParser>,
    verbose_logging: bool,
}

impl MarkerFlow {
    /// 使用默认的 YAML 解析器
    pub fn new(config: &Config) -> Result<Self, regex::Error> {
        Self::with_parser(config, Arc::new(YamlDocumentParser))
    }

    pub fn with_parser(
        config: &Config,
        parser: Arc<dyn DocumentParser>,
    ) -> Result<Self, regex::Error> {
        let linter = if config.lint_source {
            Some(SourceLinter::new()?)
        } else {
            None
        };

        Ok(Self {
            validator: LeanDeepValidator::with_extensions(config.extensions.clone()),
            linter,
            parser,
            verbose_logging: config.verbose_logging,
        })
    }

    /// 处理一个文件，永远返回一条记录
    pub fn run(&self, source: &dyn MarkerSource, ctx: &FileCtx) -> FileReport {
        let content = match source.read_to_string(&ctx.path) {
            Ok(content) => content,
            Err(e) => {
                let err = DocumentError::Unreadable {
                    path: ctx.path_string(),
                    source: e,
                };
                warn!("{} ❌ 读取失败: {}", ctx, err);
                return FileReport::failed(
                    &ctx.filename,
                    ctx.path_string(),
                    IssueKind::Unreadable,
                    err.to_string(),
                    None,
                );
            }
        };

        match self.inspect(&content, &ctx.filename) {
            Ok(result) => {
                let bucket = categorize(&result.issues);
                let status = if result.issues.is_empty() {
                    FileStatus::Clean
                } else {
                    FileStatus::NeedsFix
                };
                info!(
                    "{} 📄 发现 {} 个问题 → {}",
                    ctx,
                    result.issues.len(),
                    bucket
                );
                if self.verbose_logging {
                    for issue in &result.issues {
                        debug!(
                            "{}   - [{:?}] {}: {}",
                            ctx,
                            issue.severity,
                            issue.kind,
                            truncate_text(&issue.message, 80)
                        );
                    }
                }
                FileReport {
                    result,
                    path: ctx.path_string(),
                    bucket,
                    status,
                    line_count: content.lines().count(),
                }
            }
            Err(err) => {
                warn!("{} ❌ 解析失败: {}", ctx, err);
                let mut report = FileReport::failed(
                    &ctx.filename,
                    ctx.path_string(),
                    IssueKind::Unparsable,
                    err.to_string(),
                    err.line(),
                );
                report.line_count = content.lines().count();

                // 解析失败时文本检查仍然有效，例如缺少冒号本身就会导致解析失败
                if let Some(linter) = &self.linter {
                    let lint_issues = linter.lint(&content);
                    if !lint_issues.is_empty() {
                        report.result = report.result.with_extra_issues(lint_issues);
                        report.bucket = categorize(report.issues());
                        info!("{} 📄 文本检查发现问题 → {}", ctx, report.bucket);
                    }
                }
                report
            }
        }
    }

    /// 对已读取的内容做解析和检查
    pub fn inspect(&self, content: &str, filename: &str) -> Result<ValidationResult, DocumentError> {
        let doc = load_marker(self.parser.as_ref(), content)?;
        let result = self.validator.evaluate(&doc, filename);

        Ok(match &self.linter {
            Some(linter) => result.with_extra_issues(linter.lint(content)),
            None => result,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::MemoryMarkerSource;
    use crate::models::report::Bucket;
    use serde_yaml::Value;

    const CLEAN: &str = "id: A_OK\nlang: de\ndescription: d\nframe:\n  signal: s\n  concept: c\n  pragmatics: p\n  narrative: spike\nexamples:\n  - eins\nactivation_logic: any\nscoring: 1\npattern: [x]\n";

    fn ctx(name: &str) -> FileCtx {
        FileCtx::new(1, name.to_string(), std::path::Path::new("/m").join(name))
    }

    #[test]
    fn test_clean_file() {
        let source = MemoryMarkerSource::new("/m").with_file("A_OK.yaml", CLEAN);
        let flow = MarkerFlow::new(&Config::default()).unwrap();
        let report = flow.run(&source, &ctx("A_OK.yaml"));
        assert_eq!(report.bucket, Bucket::Clean);
        assert_eq!(report.status, FileStatus::Clean);
        assert_eq!(report.line_count, 13);
    }

    #[test]
    fn test_unreadable_file_goes_to_review() {
        let source = MemoryMarkerSource::new("/m").with_unreadable("A_OK.yaml");
        let flow = MarkerFlow::new(&Config::default()).unwrap();
        let report = flow.run(&source, &ctx("A_OK.yaml"));
        assert_eq!(report.bucket, Bucket::Review);
        assert_eq!(report.status, FileStatus::Error);
        assert_eq!(report.issues()[0].kind, IssueKind::Unreadable);
    }

    #[test]
    fn test_corrupt_file_goes_to_review() {
        let source = MemoryMarkerSource::new("/m").with_file("A_OK.yaml", "id: [A_OK\nlang: de\n");
        let flow = MarkerFlow::new(&Config::default()).unwrap();
        let report = flow.run(&source, &ctx("A_OK.yaml"));
        assert_eq!(report.bucket, Bucket::Review);
        assert_eq!(report.issues()[0].kind, IssueKind::Unparsable);
        assert!(!report.result.is_compliant);
    }

    #[test]
    fn test_lint_issues_are_appended() {
        let content = format!("# id: A_OLD\n{}", CLEAN);
        let config = Config {
            lint_source: true,
            ..Config::default()
        };
        let flow = MarkerFlow::new(&config).unwrap();
        let result = flow.inspect(&content, "A_OK.yaml").unwrap();
        assert_eq!(result.issues.len(), 1);
        assert_eq!(result.issues[0].kind, IssueKind::IdCommented);
        assert_eq!(result.issues[0].line, Some(1));
        assert_eq!(categorize(&result.issues), Bucket::FixId);

        let plain = MarkerFlow::new(&Config::default()).unwrap();
        assert!(plain.inspect(&content, "A_OK.yaml").unwrap().issues.is_empty());
    }

    #[test]
    fn test_unparsable_file_is_categorized_by_lint() {
        let content = format!("{}examples\n  - one\n", CLEAN.replace("examples:\n  - eins\n", ""));
        let source = MemoryMarkerSource::new("/m").with_file("A_OK.yaml", content);

        let plain = MarkerFlow::new(&Config::default()).unwrap();
        let report = plain.run(&source, &ctx("A_OK.yaml"));
        assert_eq!(report.bucket, Bucket::Review);

        let config = Config {
            lint_source: true,
            ..Config::default()
        };
        let linted = MarkerFlow::new(&config).unwrap();
        let report = linted.run(&source, &ctx("A_OK.yaml"));
        assert_eq!(report.bucket, Bucket::FixStructure);
        assert_eq!(report.status, FileStatus::Error);
        let kinds: Vec<IssueKind> = report.issues().iter().map(|i| i.kind).collect();
        assert_eq!(kinds, vec![IssueKind::Unparsable, IssueKind::KeyMissingColon]);
        assert_eq!(report.issues()[1].line, Some(12));
    }

    #[test]
    fn test_sequence_id_goes_to_fix_id() {
        let content = CLEAN.replace("id: A_OK\n", "id: [A_OTHER]\n");
        let source = MemoryMarkerSource::new("/m").with_file("A_OK.yaml", content);
        let flow = MarkerFlow::new(&Config::default()).unwrap();
        let report = flow.run(&source, &ctx("A_OK.yaml"));
        assert_eq!(report.bucket, Bucket::FixId);
        assert_eq!(report.status, FileStatus::NeedsFix);
        let kinds: Vec<IssueKind> = report.issues().iter().map(|i| i.kind).collect();
        assert_eq!(kinds, vec![IssueKind::IdSync, IssueKind::IdMalformed]);
    }

    struct FixedParser(Value);

    impl DocumentParser for FixedParser {
        fn parse(&self, _content: &str) -> Result<Value, DocumentError> {
            Ok(self.0.clone())
        }
    }

    #[test]
    fn test_injected_parser_is_used() {
        let tree: Value = serde_yaml::from_str(CLEAN).unwrap();
        let flow = MarkerFlow::with_parser(&Config::default(), Arc::new(FixedParser(tree))).unwrap();
        let result = flow.inspect("<<kein yaml>>", "A_OK.yaml").unwrap();
        assert!(result.issues.is_empty());
    }
}
