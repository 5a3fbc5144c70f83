//! Best Buy Tracker CLI
//!
//! 轮询 Best Buy 商品 API，发现目标商品线上有货时通过 SMTP 发送提醒

use anyhow::Result;
use bestbuy_tracker::cli::{
    handle_check, handle_config, handle_run, handle_test_notify, CheckArgs, ConfigArgs, RunArgs,
    TestNotifyArgs,
};
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "bbt")]
#[command(about = "Best Buy Tracker - 监控商品库存并发送提醒")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 持续轮询，发现目标商品时发送提醒（Ctrl+C 退出）
    Run(RunArgs),
    /// 拉取一次商品列表并打印匹配结果
    Check(CheckArgs),
    /// 发送一条测试通知
    TestNotify(TestNotifyArgs),
    /// 显示生效的配置
    Config(ConfigArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    // 通过 RUST_LOG 环境变量控制日志级别，默认为 info
    // 例如: RUST_LOG=debug bbt run
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("bestbuy_tracker=info,bbt=info"));

    fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run(args) => handle_run(args).await?,
        Commands::Check(args) => handle_check(args).await?,
        Commands::TestNotify(args) => handle_test_notify(args).await?,
        Commands::Config(args) => handle_config(args)?,
    }

    Ok(())
}
