// src/cli/test_notify.rs
//! Test-notify 命令 - 发送一条测试通知，用来确认 SMTP 配置可用

use crate::catalog::Product;
use crate::config::TrackerConfig;
use crate::notification::{NotifierBuilder, SendResult};
use anyhow::{bail, Result};
use clap::Args;
use std::path::PathBuf;

/// Test-notify 命令参数
#[derive(Args)]
pub struct TestNotifyArgs {
    /// 配置文件路径
    #[arg(long, short)]
    pub config: Option<PathBuf>,

    /// 只打印，不发送
    #[arg(long)]
    pub dry_run: bool,

    /// 发送退出通知而不是到货提醒
    #[arg(long)]
    pub exiting: bool,
}

/// 测试用商品
pub fn sample_product(name_contains: &str) -> Product {
    Product {
        name: format!("[TEST] {}", name_contains),
        online_availability: true,
        in_store_availability: false,
        orderable: true,
        url: "https://www.bestbuy.com".to_string(),
    }
}

/// 处理 test-notify 命令
pub async fn handle_test_notify(args: TestNotifyArgs) -> Result<()> {
    // SMTP 测试不需要 API key
    let config = TrackerConfig::load_unchecked(args.config.as_deref())?;

    let notifier = NotifierBuilder::new(config.smtp.clone())
        .dry_run(args.dry_run)
        .build()?;

    let product = sample_product(&config.filter.name_contains);
    let result = if args.exiting {
        notifier.notify(None).await
    } else {
        notifier.notify(Some(&product)).await
    };

    match result {
        SendResult::Sent => println!("测试通知已发送 ({})", notifier.channel_name()),
        SendResult::Skipped(reason) => println!("测试通知未发送: {}", reason),
        SendResult::Failed(reason) => bail!("测试通知发送失败: {}", reason),
    }

    Ok(())
}
