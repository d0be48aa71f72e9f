//! 进度通知与取消
//!
//! 批处理通过 [`ProgressSink`] 向外部（界面、IPC 等）报告进度。
//! 每次运行恰好发送一个终止事件：`Finish` 或 `Error`。

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{error, info};

use crate::models::BatchSummary;

/// 处理阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Scanning,
    Validating,
    Fixing,
}

impl Stage {
    pub fn as_str(self) -> &'static str {
        match self {
            Stage::Scanning => "scanning",
            Stage::Validating => "validating",
            Stage::Fixing => "fixing",
        }
    }
}

/// 进度事件
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ProgressEvent {
    Progress {
        stage: Stage,
        message: String,
        percent: u8,
    },
    Finish {
        summary: BatchSummary,
    },
    Error {
        message: String,
    },
}

impl ProgressEvent {
    /// 创建进度事件，百分比截断到 [0, 100]
    pub fn progress(stage: Stage, message: impl Into<String>, percent: usize) -> Self {
        ProgressEvent::Progress {
            stage,
            message: message.into(),
            percent: percent.min(100) as u8,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, ProgressEvent::Finish { .. } | ProgressEvent::Error { .. })
    }
}

/// 进度接收方
pub trait ProgressSink: Send + Sync {
    fn emit(&self, event: ProgressEvent);
}

/// 丢弃所有事件
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSink;

impl ProgressSink for NoopSink {
    fn emit(&self, _event: ProgressEvent) {}
}

/// 只写日志
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl ProgressSink for TracingSink {
    fn emit(&self, event: ProgressEvent) {
        match event {
            ProgressEvent::Progress {
                stage,
                message,
                percent,
            } => info!("📊 [{}] {}% - {}", stage.as_str(), percent, message),
            ProgressEvent::Finish { summary } => {
                info!("🏁 完成: 共 {} 个文件", summary.total)
            }
            ProgressEvent::Error { message } => error!("❌ 失败: {}", message),
        }
    }
}

/// 转发到 tokio 通道，接收端已关闭时静默丢弃
#[derive(Debug, Clone)]
pub struct ChannelSink {
    sender: UnboundedSender<ProgressEvent>,
}

impl ChannelSink {
    pub fn new(sender: UnboundedSender<ProgressEvent>) -> Self {
        Self { sender }
    }
}

impl ProgressSink for ChannelSink {
    fn emit(&self, event: ProgressEvent) {
        let _ = self.sender.send(event);
    }
}

/// 协作式取消标记，在文件之间检查
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}
