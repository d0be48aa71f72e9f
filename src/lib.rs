//! # Marker Cleaner
//!
//! Lean Deep v3.1 marker 文档的检查与分类引擎
//!
//! ## 架构设计
//!
//! 本系统采用严格的四层架构：
//!
//! ### ① 基础设施层（Infrastructure）
//! - `infrastructure/` - 持有外部资源（文件系统），只暴露能力
//! - `MarkerSource` - 列出文件夹条目、读取文件内容
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"，只处理单个文档
//! - `LeanDeepValidator` - 规则引擎（id、前缀、frame、结构块、旧版字段……）
//! - `SourceLinter` - 可选的文本级检查
//! - `categorize` - 按问题族分类
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 定义"一个文件"的完整处理流程
//! - `FileCtx` - 上下文封装（文件序号 + 文件名 + 路径）
//! - `MarkerFlow` - 流程编排（读取 → 解析 → 检查 → 分类）
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/batch_processor` - 批量处理器，管理并发和统计
//! - `orchestrator/progress` - 进度通知与取消
//!
//! ## 模块结构

pub mod config;
pub mod error;
pub mod infrastructure;

pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use config::Config;
pub use error::{AppError, AppResult, ConfigError, DocumentError, FolderAccessError};
pub use infrastructure::{FsMarkerSource, MarkerSource, MemoryMarkerSource};
pub use models::{BatchSummary, Bucket, FileReport, Issue, IssueKind, MarkerDocument, ValidationResult};
pub use orchestrator::{BatchProcessor, CancelToken, ProgressEvent, ProgressSink};
pub use services::{categorize, LeanDeepValidator, SourceLinter};
pub use workflow::{FileCtx, MarkerFlow};
