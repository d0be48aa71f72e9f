pub mod file_ctx;
pub mod marker_flow;

pub use file_ctx::FileCtx;
pub use marker_flow::MarkerFlow;
