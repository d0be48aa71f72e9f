use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use serde_json::{json, Value};

use marker_cleaner::models::BatchSummary;
use marker_cleaner::orchestrator::TracingSink;
use marker_cleaner::utils::logging;
use marker_cleaner::{BatchProcessor, Config};

/// 检查 Lean Deep v3.1 marker 文件夹并按修复类型分类
#[derive(Parser)]
#[command(name = "marker-cleaner", version)]
struct Cli {
    /// 待检查的文件夹（默认取配置中的 marker_folder）
    folder: Option<String>,

    /// 以 JSON 输出结果
    #[arg(long)]
    json: bool,

    /// 启用文本级检查
    #[arg(long)]
    lint: bool,

    /// 同时处理的文件数量
    #[arg(long)]
    concurrency: Option<usize>,

    /// TOML 配置文件
    #[arg(long)]
    config: Option<PathBuf>,

    /// 显示详细日志
    #[arg(long)]
    verbose: bool,
}

impl Cli {
    /// 默认值 → 配置文件 → 环境变量 → 命令行参数
    fn load_config(&self) -> Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::from_toml_file(path)?.apply_env()?,
            None => Config::from_env()?,
        };

        if let Some(folder) = &self.folder {
            config.marker_folder = folder.clone();
        }
        if let Some(n) = self.concurrency {
            config.max_concurrent_files = n;
        }
        config.lint_source |= self.lint;
        config.verbose_logging |= self.verbose;
        config.validate()?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = cli.load_config()?;

    // 初始化日志
    logging::init(config.verbose_logging);

    let folder = config.marker_folder.clone();
    let processor = BatchProcessor::new(config)?;

    match processor.run(&folder, &TracingSink).await {
        Ok(summary) => {
            if cli.json {
                let output = success_output(&summary, &folder);
                println!("{}", serde_json::to_string_pretty(&output)?);
            } else {
                print_summary(&summary, &folder);
            }
            Ok(())
        }
        Err(e) => {
            if cli.json {
                let output = failure_output(&e.to_string(), &folder);
                println!("{}", serde_json::to_string_pretty(&output)?);
            } else {
                eprintln!("❌ {}", e);
            }
            std::process::exit(1);
        }
    }
}

/// `--json` 成功时的输出
fn success_output(summary: &BatchSummary, folder: &str) -> Value {
    json!({
        "success": true,
        "results": summary,
        "folder_path": folder,
    })
}

/// `--json` 失败时的输出
fn failure_output(error: &str, folder: &str) -> Value {
    json!({
        "success": false,
        "error": error,
        "folder_path": folder,
    })
}

fn print_summary(summary: &BatchSummary, folder: &str) {
    println!("📁 {}", folder);
    println!("  总数:         {}", summary.total);
    println!("  ✅ clean:        {}", summary.clean);
    println!("  🆔 fixId:        {}", summary.fix_id);
    println!("  📝 fixExample:   {}", summary.fix_example);
    println!("  🧱 fixStructure: {}", summary.fix_structure);
    println!("  🔍 review:       {}", summary.review);

    for file in summary.files.iter().filter(|f| !f.issues().is_empty()) {
        println!();
        println!("{} → {}", file.filename(), file.bucket);
        for issue in file.issues() {
            match issue.line {
                Some(line) => println!("  - [{}] 第 {} 行: {}", issue.kind, line, issue.message),
                None => println!("  - [{}] {}", issue.kind, issue.message),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_output_keys() {
        let output = success_output(&BatchSummary::new(), "markers");
        assert_eq!(output["success"], true);
        assert_eq!(output["folder_path"], "markers");
        assert_eq!(output["results"]["total"], 0);
        assert!(output.get("folderPath").is_none());

        let output = failure_output("文件夹不存在", "/nope");
        assert_eq!(output["success"], false);
        assert_eq!(output["error"], "文件夹不存在");
        assert_eq!(output["folder_path"], "/nope");
    }
}
