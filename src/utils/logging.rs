/// 日志工具模块
///
/// 提供日志初始化以及批处理各阶段的格式化输出
use crate::models::BatchSummary;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// 初始化日志
///
/// `RUST_LOG` 优先；否则默认 `info`，`verbose` 时为 `debug`。
/// 日志写到 stderr，保证 stdout 上的 JSON 输出不被污染。
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// 记录程序启动信息
///
/// # 参数
/// - `folder`: 待检查的文件夹
/// - `max_concurrent`: 最大并发数
pub fn log_startup(folder: &str, max_concurrent: usize) {
    info!("{}", "=".repeat(60));
    info!("🚀 Marker 检查启动 - Lean Deep v3.1");
    info!("📁 文件夹: {}", folder);
    info!("📊 最大并发数: {}", max_concurrent);
    info!("{}", "=".repeat(60));
}

/// 记录文件扫描结果
pub fn log_files_found(total: usize, max_concurrent: usize) {
    info!("✓ 找到 {} 个 marker 文件", total);
    info!("📋 将以每批 {} 个的方式处理", max_concurrent);
}

/// 记录批次开始信息
///
/// # 参数
/// - `batch_num`: 批次编号
/// - `total_batches`: 批次总数
/// - `start`: 起始文件编号
/// - `end`: 结束文件编号
/// - `total`: 文件总数
pub fn log_batch_start(
    batch_num: usize,
    total_batches: usize,
    start: usize,
    end: usize,
    total: usize,
) {
    info!("{}", "=".repeat(60));
    info!("📦 开始处理第 {}/{} 批", batch_num, total_batches);
    info!("📄 本批文件: {}-{} / 共 {} 个", start, end, total);
}

/// 记录批次完成信息
///
/// # 参数
/// - `batch_num`: 批次编号
/// - `clean`: 无问题的文件数量
/// - `total`: 本批文件数量
pub fn log_batch_complete(batch_num: usize, clean: usize, total: usize) {
    info!("{}", "─".repeat(60));
    info!("✓ 第 {} 批完成: 无问题 {}/{}", batch_num, clean, total);
}

/// 打印最终统计信息
pub fn print_final_stats(summary: &BatchSummary, folder: &str) {
    info!("{}", "=".repeat(60));
    info!("📊 全部检查完成统计");
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("文件夹: {}", folder);
    info!("{}", "=".repeat(60));
    info!("✅ 无问题: {}/{}", summary.clean, summary.total);
    info!("🆔 需修复 ID: {}", summary.fix_id);
    info!("📝 需修复示例: {}", summary.fix_example);
    info!("🧱 需修复结构: {}", summary.fix_structure);
    info!("🔎 需人工复查: {}", summary.review);
    info!("{}", "=".repeat(60));
}

/// 截断长文本用于日志显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大长度
///
/// # 返回
/// 返回截断后的文本
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_text() {
        assert_eq!(truncate_text("abc", 5), "abc");
        assert_eq!(truncate_text("Frame fehlt komplett", 5), "Frame...");
        assert_eq!(truncate_text("标记文档", 2), "标记...");
    }
}
