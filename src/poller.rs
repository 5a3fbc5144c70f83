//! 可用性轮询 - 单轮：拉取商品、过滤、逐个通知

use anyhow::Result;
use chrono::Local;
use std::sync::Arc;
use tracing::info;

use crate::catalog::{Catalog, Product};
use crate::config::FilterConfig;
use crate::notification::Notifier;

/// 单轮结果
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PollOutcome {
    /// 本轮匹配的商品
    pub matches: Vec<Product>,
    /// 通知发送失败次数
    pub failed_notifications: usize,
}

impl PollOutcome {
    pub fn found(&self) -> bool {
        !self.matches.is_empty()
    }
}

/// 按名称片段和线上库存过滤
pub fn filter_matches<'a>(products: &'a [Product], filter: &FilterConfig) -> Vec<&'a Product> {
    products
        .iter()
        .filter(|p| p.matches(&filter.name_contains))
        .collect()
}

pub struct Poller {
    catalog: Arc<dyn Catalog>,
    notifier: Notifier,
    filter: FilterConfig,
}

impl Poller {
    pub fn new(catalog: Arc<dyn Catalog>, notifier: Notifier, filter: FilterConfig) -> Self {
        Self {
            catalog,
            notifier,
            filter,
        }
    }

    pub fn notifier(&self) -> &Notifier {
        &self.notifier
    }

    /// 执行一轮轮询
    ///
    /// 请求失败返回 `Err`，此时没有发出任何通知；通知失败只计数。
    pub async fn poll_once(&self) -> Result<PollOutcome> {
        info!(
            "Tracking executed at {}",
            Local::now().format("%Y-%m-%d %H:%M:%S")
        );

        let products = self.catalog.fetch_products().await?;
        let mut outcome = PollOutcome::default();

        for product in filter_matches(&products, &self.filter) {
            info!(name = %product.name, url = %product.url, "FOUND!!!");
            if self.notifier.notify(Some(product)).await.is_failed() {
                outcome.failed_notifications += 1;
            }
            outcome.matches.push(product.clone());
        }

        Ok(outcome)
    }
}
