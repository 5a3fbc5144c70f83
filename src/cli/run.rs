// src/cli/run.rs
//! Run 命令 - 启动追踪主循环

use crate::catalog::BestBuyClient;
use crate::config::TrackerConfig;
use crate::notification::NotifierBuilder;
use crate::poller::Poller;
use crate::schedule::PeakSchedule;
use crate::tracker::{shutdown_signal, StopReason, Tracker};
use anyhow::Result;
use clap::Args;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

/// Run 命令参数
#[derive(Args)]
pub struct RunArgs {
    /// 配置文件路径（默认 ~/.config/bestbuy-tracker/config.json）
    #[arg(long, short)]
    pub config: Option<PathBuf>,

    /// 只打印通知，不发送邮件
    #[arg(long)]
    pub dry_run: bool,

    /// 运行指定轮数后退出（至少 1）
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    pub cycles: Option<u64>,
}

/// 按配置组装 Tracker
pub fn build_tracker(config: &TrackerConfig, dry_run: bool) -> Result<Tracker> {
    let catalog = BestBuyClient::new(config.api.clone())?;
    let notifier = NotifierBuilder::new(config.smtp.clone())
        .dry_run(dry_run)
        .build()?;
    let poller = Poller::new(Arc::new(catalog), notifier, config.filter.clone());

    Ok(Tracker::new(poller, PeakSchedule::new(&config.schedule)))
}

/// 处理 run 命令
pub async fn handle_run(args: RunArgs) -> Result<()> {
    let config = TrackerConfig::load(args.config.as_deref())?;
    let tracker = build_tracker(&config, args.dry_run)?.with_max_cycles(args.cycles);

    match Arc::new(tracker).run(shutdown_signal()).await? {
        StopReason::Shutdown => info!("Stopped by signal"),
        StopReason::Completed => info!("Finished requested cycles"),
    }

    Ok(())
}
