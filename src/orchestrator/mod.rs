//! 编排层
//!
//! - `batch_processor` - 整个文件夹的并发处理与统计汇总
//! - `progress` - 进度事件、接收方与取消标记

pub mod batch_processor;
pub mod progress;

pub use batch_processor::BatchProcessor;
pub use progress::{
    CancelToken, ChannelSink, NoopSink, ProgressEvent, ProgressSink, Stage, TracingSink,
};
