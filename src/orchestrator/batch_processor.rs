//! 批量文件处理器 - 编排层
//!
//! ## 职责
//!
//! 本模块负责整个文件夹的处理和统计汇总。
//!
//! ## 核心功能
//!
//! 1. **扫描**：通过数据源列出文件夹，只保留识别后缀的文件
//! 2. **并发控制**：使用 Semaphore 限制同时处理的文件数量
//! 3. **分批处理**：将文件分批次处理，每批完成后再开始下一批
//! 4. **失败隔离**：单个文件失败只会记为 review，不影响整批
//! 5. **汇总统计**：由本模块独占 `BatchSummary`，按列表顺序记录
//! 6. **进度通知**：scanning → validating → fixing，最后一个终止事件
//!
//! ## 设计特点
//!
//! - **顶层编排**：不处理单个文件的细节，委托给 `MarkerFlow`
//! - **无共享可变状态**：各任务只返回 `FileReport`，计数只在本模块的循环中累加
//! - **只有文件夹级错误会失败**：文件夹不存在/不可读、被取消

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::Semaphore;
use tracing::{error, info, warn};

use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::infrastructure::{FsMarkerSource, MarkerSource, SourceEntry};
use crate::models::issue::IssueKind;
use crate::models::loaders::is_marker_file;
use crate::models::report::{Bucket, FileReport};
use crate::models::BatchSummary;
use crate::orchestrator::progress::{CancelToken, NoopSink, ProgressEvent, ProgressSink, Stage};
use crate::utils::logging::{
    log_batch_complete, log_batch_start, log_files_found, log_startup, print_final_stats,
};
use crate::workflow::{FileCtx, MarkerFlow};

/// 批量处理器
pub struct BatchProcessor {
    config: Config,
    source: Arc<dyn MarkerSource>,
    flow: Arc<MarkerFlow>,
    cancel: CancelToken,
}

impl BatchProcessor {
    /// 使用本地文件系统
    pub fn new(config: Config) -> AppResult<Self> {
        Self::with_source(config, Arc::new(FsMarkerSource))
    }

    /// 使用注入的数据源
    pub fn with_source(config: Config, source: Arc<dyn MarkerSource>) -> AppResult<Self> {
        config.validate()?;
        let flow = MarkerFlow::new(&config)?;
        Ok(Self {
            config,
            source,
            flow: Arc::new(flow),
            cancel: CancelToken::new(),
        })
    }

    /// 取消标记，可在其它任务中调用 `cancel()`
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// 处理文件夹，不发送进度
    pub async fn process_folder(&self, folder: &str) -> AppResult<BatchSummary> {
        self.process_folder_with_progress(folder, &NoopSink).await
    }

    /// 处理文件夹，并保证恰好发送一个终止事件（`Finish` 或 `Error`）
    pub async fn run(&self, folder: &str, sink: &dyn ProgressSink) -> AppResult<BatchSummary> {
        match self.process_folder_with_progress(folder, sink).await {
            Ok(summary) => {
                sink.emit(ProgressEvent::Finish {
                    summary: summary.clone(),
                });
                Ok(summary)
            }
            Err(e) => {
                error!("❌ 处理文件夹失败: {}", e);
                sink.emit(ProgressEvent::Error {
                    message: e.to_string(),
                });
                Err(e)
            }
        }
    }

    /// 处理文件夹并发送进度（不发送终止事件）
    pub async fn process_folder_with_progress(
        &self,
        folder: &str,
        sink: &dyn ProgressSink,
    ) -> AppResult<BatchSummary> {
        let max_concurrent = self.config.max_concurrent_files;
        log_startup(folder, max_concurrent);
        sink.emit(ProgressEvent::progress(
            Stage::Scanning,
            "正在扫描 marker 文件...",
            0,
        ));

        let files = self.scan(Path::new(folder)).await?;
        let total_files = files.len();
        log_files_found(total_files, max_concurrent);
        sink.emit(ProgressEvent::progress(
            Stage::Scanning,
            format!("找到 {} 个 marker 文件", total_files),
            10,
        ));

        if files.is_empty() {
            warn!("⚠️ 没有找到待检查的 marker 文件");
        }

        let semaphore = Arc::new(Semaphore::new(max_concurrent));
        let mut summary = BatchSummary::new();

        // 分批处理
        for batch_start in (0..total_files).step_by(max_concurrent) {
            let batch_end = (batch_start + max_concurrent).min(total_files);
            let batch_num = (batch_start / max_concurrent) + 1;
            let total_batches = (total_files + max_concurrent - 1) / max_concurrent;

            log_batch_start(
                batch_num,
                total_batches,
                batch_start + 1,
                batch_end,
                total_files,
            );

            let reports = self
                .process_batch(&files[batch_start..batch_end], batch_start, semaphore.clone())
                .await?;

            let batch_clean = reports.iter().filter(|r| r.bucket == Bucket::Clean).count();
            let batch_len = reports.len();

            for report in reports {
                let name = report.filename().to_string();
                summary.record(report);
                sink.emit(ProgressEvent::progress(
                    Stage::Validating,
                    format!("已检查 {}", name),
                    10 + 80 * summary.total / total_files,
                ));
            }

            log_batch_complete(batch_num, batch_clean, batch_len);
        }

        sink.emit(ProgressEvent::progress(
            Stage::Fixing,
            "分类汇总完成",
            100,
        ));
        print_final_stats(&summary, folder);

        Ok(summary)
    }

    /// 列出并过滤文件
    async fn scan(&self, folder: &Path) -> AppResult<Vec<SourceEntry>> {
        info!("📁 正在扫描文件夹: {}", folder.display());

        let source = Arc::clone(&self.source);
        let folder_buf: PathBuf = folder.to_path_buf();
        let entries = tokio::task::spawn_blocking(move || source.list_entries(&folder_buf))
            .await
            .map_err(|e| AppError::Other(format!("扫描任务执行失败: {}", e)))??;

        Ok(entries
            .into_iter()
            .filter(|entry| entry.is_file && is_marker_file(&entry.name, &self.config.extensions))
            .collect())
    }

    /// 处理单个批次，结果按输入顺序返回
    async fn process_batch(
        &self,
        batch_files: &[SourceEntry],
        batch_start: usize,
        semaphore: Arc<Semaphore>,
    ) -> AppResult<Vec<FileReport>> {
        let mut batch_ctxs = Vec::new();
        let mut batch_handles = Vec::new();

        // 为本批创建任务
        for (idx, entry) in batch_files.iter().enumerate() {
            if self.cancel.is_cancelled() {
                warn!("⚠️ 检测到取消请求，停止处理");
                return Err(AppError::Cancelled);
            }

            let ctx = FileCtx::new(batch_start + idx + 1, entry.name.clone(), entry.path.clone());
            let permit = semaphore
                .clone()
                .acquire_owned()
                .await
                .map_err(|e| AppError::Other(format!("获取并发许可失败: {}", e)))?;

            let source = Arc::clone(&self.source);
            let flow = Arc::clone(&self.flow);
            let task_ctx = ctx.clone();

            let handle = tokio::task::spawn_blocking(move || {
                let _permit = permit;
                flow.run(source.as_ref(), &task_ctx)
            });
            batch_ctxs.push(ctx);
            batch_handles.push(handle);
        }

        // 等待本批所有任务完成
        let results = futures::future::join_all(batch_handles).await;

        Ok(batch_ctxs
            .into_iter()
            .zip(results)
            .map(|(ctx, result)| match result {
                Ok(report) => report,
                Err(e) => {
                    error!("{} 任务执行失败: {}", ctx, e);
                    FileReport::failed(
                        &ctx.filename,
                        ctx.path_string(),
                        IssueKind::ProcessingFailed,
                        format!("任务执行失败: {}", e),
                        None,
                    )
                }
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::MemoryMarkerSource;
    use crate::models::report::FileStatus;
    use tokio_test::{assert_err, assert_ok};

    const CLEAN_TEMPLATE: &str = "id: {ID}\nlang: de\ndescription: d\nframe:\n  signal: s\n  concept: c\n  pragmatics: p\n  narrative: drift\nexamples: [eins]\nactivation_logic: any\nscoring: 1\ndetect_class: D\n";

    fn clean(id: &str) -> String {
        CLEAN_TEMPLATE.replace("{ID}", id)
    }

    fn processor(source: MemoryMarkerSource, max_concurrent: usize) -> BatchProcessor {
        let config = Config {
            max_concurrent_files: max_concurrent,
            ..Config::default()
        };
        BatchProcessor::with_source(config, Arc::new(source)).unwrap()
    }

    #[tokio::test]
    async fn test_corrupt_file_is_isolated() {
        let source = MemoryMarkerSource::new("/m")
            .with_file("A_ONE.yaml", clean("A_ONE"))
            .with_file("A_BROKEN.yaml", "id: [A_BROKEN\n  lang: :\n")
            .with_file("S_TWO.yml", clean("S_TWO"));

        let summary = assert_ok!(processor(source, 2).process_folder("/m").await);
        assert_eq!(summary.total, 3);
        assert_eq!(summary.clean, 2);
        assert_eq!(summary.review, 1);
        assert!(summary.is_consistent());
        assert_eq!(summary.files[1].status, FileStatus::Error);
    }

    #[tokio::test]
    async fn test_listing_order_is_preserved_across_batches() {
        let mut source = MemoryMarkerSource::new("/m");
        let names: Vec<String> = (0..7).map(|i| format!("A_M{}", i)).collect();
        for name in &names {
            source = source.with_file(format!("{}.yaml", name), clean(name));
        }

        let summary = assert_ok!(processor(source, 3).process_folder("/m").await);
        let got: Vec<String> = summary
            .files
            .iter()
            .map(|f| f.filename().trim_end_matches(".yaml").to_string())
            .collect();
        assert_eq!(got, names);
        assert_eq!(summary.clean, 7);
    }

    #[tokio::test]
    async fn test_non_marker_files_are_skipped() {
        let source = MemoryMarkerSource::new("/m")
            .with_file("README.md", "# nope")
            .with_file("A_ONE.yaml", clean("A_ONE"));
        let summary = assert_ok!(processor(source, 4).process_folder("/m").await);
        assert_eq!(summary.total, 1);
    }

    #[tokio::test]
    async fn test_missing_folder_fails_with_single_error_event() {
        let source = MemoryMarkerSource::new("/m").with_file("A_ONE.yaml", clean("A_ONE"));
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        let sink = crate::orchestrator::progress::ChannelSink::new(tx);

        let err = assert_err!(processor(source, 2).run("/elsewhere", &sink).await);
        assert!(err.is_folder_error());
        drop(sink);

        let mut terminal = Vec::new();
        while let Some(event) = rx.recv().await {
            if event.is_terminal() {
                terminal.push(event);
            }
        }
        assert_eq!(terminal.len(), 1);
        assert!(matches!(terminal[0], ProgressEvent::Error { .. }));
    }

    #[tokio::test]
    async fn test_progress_events_in_order() {
        let source = MemoryMarkerSource::new("/m")
            .with_file("A_ONE.yaml", clean("A_ONE"))
            .with_file("A_TWO.yaml", clean("A_TWO"));
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        let sink = crate::orchestrator::progress::ChannelSink::new(tx);

        assert_ok!(processor(source, 1).run("/m", &sink).await);
        drop(sink);

        let mut events = Vec::new();
        while let Some(event) = rx.recv().await {
            events.push(event);
        }

        let percents: Vec<(Stage, u8)> = events
            .iter()
            .filter_map(|e| match e {
                ProgressEvent::Progress { stage, percent, .. } => Some((*stage, *percent)),
                _ => None,
            })
            .collect();
        assert_eq!(
            percents,
            vec![
                (Stage::Scanning, 0),
                (Stage::Scanning, 10),
                (Stage::Validating, 50),
                (Stage::Validating, 90),
                (Stage::Fixing, 100),
            ]
        );
        assert!(matches!(events.last(), Some(ProgressEvent::Finish { summary }) if summary.total == 2));
    }

    #[tokio::test]
    async fn test_cancelled_before_start() {
        let source = MemoryMarkerSource::new("/m").with_file("A_ONE.yaml", clean("A_ONE"));
        let processor = processor(source, 2);
        processor.cancel_token().cancel();
        let err = assert_err!(processor.process_folder("/m").await);
        assert!(matches!(err, AppError::Cancelled));
    }

    #[tokio::test]
    async fn test_empty_folder() {
        let summary = assert_ok!(processor(MemoryMarkerSource::new("/m"), 2).process_folder("/m").await);
        assert_eq!(summary, BatchSummary::new());
    }
}
