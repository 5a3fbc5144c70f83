// src/cli/check.rs
//! Check 命令 - 拉取一次商品列表并打印匹配结果，不发送通知

use crate::catalog::{BestBuyClient, Catalog, Product};
use crate::config::{FilterConfig, TrackerConfig};
use crate::poller::filter_matches;
use anyhow::Result;
use clap::Args;
use serde::Serialize;
use std::path::PathBuf;

use super::output::format_output;

/// Check 命令参数
#[derive(Args)]
pub struct CheckArgs {
    /// 配置文件路径
    #[arg(long, short)]
    pub config: Option<PathBuf>,

    /// 输出 JSON 格式
    #[arg(long)]
    pub json: bool,
}

/// Check 命令输出
#[derive(Debug, Serialize)]
pub struct CheckOutput {
    pub name_contains: String,
    pub total: usize,
    pub matches: Vec<Product>,
}

impl CheckOutput {
    pub fn new(products: &[Product], filter: &FilterConfig) -> Self {
        Self {
            name_contains: filter.name_contains.clone(),
            total: products.len(),
            matches: filter_matches(products, filter).into_iter().cloned().collect(),
        }
    }

    pub fn render_text(&self) -> String {
        let mut lines = vec![format!(
            "共 {} 个商品，{} 个匹配 \"{}\" 且线上有货",
            self.total,
            self.matches.len(),
            self.name_contains
        )];
        for product in &self.matches {
            lines.push(format!("  {} | {}", product.name, product.url));
        }
        lines.join("\n")
    }
}

/// 处理 check 命令
pub async fn handle_check(args: CheckArgs) -> Result<()> {
    let config = TrackerConfig::load(args.config.as_deref())?;
    let client = BestBuyClient::new(config.api.clone())?;

    let products = client.fetch_products().await?;
    let output = CheckOutput::new(&products, &config.filter);

    if args.json {
        println!("{}", format_output(&output, true));
    } else {
        println!("{}", output.render_text());
    }

    Ok(())
}
