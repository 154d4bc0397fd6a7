//! 友盟推送 CLI
//!
//! 命令行入口点：加载 .env 与配置文件，初始化日志后执行子命令。

use std::path::Path;

use clap::Parser;
use umeng_push_cli::cli::{Cli, CommandRunner, Commands};
use umeng_shared::config::AppConfig;
use umeng_shared::observability;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let env = cli
        .env
        .clone()
        .or_else(|| std::env::var("UMENG_ENV").ok())
        .unwrap_or_else(|| "development".to_string());
    let mut config = AppConfig::load_from(Path::new(&cli.config_dir), &env, "umeng-push-cli")?;

    // 命令行参数优先于配置文件
    if let Some(log_level) = &cli.log_level {
        config.observability.log_level = log_level.clone();
    }
    observability::init(&config.observability)?;

    let runner = CommandRunner::new(config);

    match cli.command {
        Commands::Android(args) => runner.run_android(args).await?,
        Commands::Ios(args) => runner.run_ios(args).await?,
    }

    Ok(())
}
