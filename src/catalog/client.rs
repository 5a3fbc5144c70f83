//! Best Buy Products API 客户端

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use super::product::{Product, ProductsResponse};
use crate::config::{mask_secret, ApiConfig};

/// 商品目录数据源
#[async_trait]
pub trait Catalog: Send + Sync {
    /// 拉取一次商品列表
    async fn fetch_products(&self) -> Result<Vec<Product>>;
}

/// Best Buy API 客户端
#[derive(Debug)]
pub struct BestBuyClient {
    client: Client,
    config: ApiConfig,
}

impl BestBuyClient {
    pub fn new(config: ApiConfig) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.http_timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().context("Failed to create HTTP client")?;

        Ok(Self { client, config })
    }

    /// 构造查询 URL
    ///
    /// 形如 `{base}(categoryPath.id={id})?apiKey=..&sort=..&show=..&pageSize=..&format=json`，
    /// 括号和逗号按 API 要求原样保留，不做 URL 编码。
    pub fn request_url(&self) -> String {
        build_request_url(&self.config, &self.config.api_key)
    }

    /// 日志用 URL，apiKey 被遮盖
    fn redacted_url(&self) -> String {
        build_request_url(&self.config, &mask_secret(&self.config.api_key))
    }
}

fn build_request_url(config: &ApiConfig, api_key: &str) -> String {
    format!(
        "{}(categoryPath.id={})?apiKey={}&sort={}&show={}&pageSize={}&format=json",
        config.base_url.trim_end_matches('/'),
        config.category_id,
        api_key,
        config.sort,
        config.show,
        config.page_size,
    )
}

#[async_trait]
impl Catalog for BestBuyClient {
    async fn fetch_products(&self) -> Result<Vec<Product>> {
        debug!(url = %self.redacted_url(), "Requesting products");

        let response = self
            .client
            .get(self.request_url())
            .send()
            .await
            .context("API request failed")?
            .error_for_status()
            .context("API returned error status")?;

        let body: ProductsResponse = response
            .json()
            .await
            .context("Failed to parse API response")?;

        debug!(
            count = body.products.len(),
            total = ?body.total,
            page = ?body.current_page,
            total_pages = ?body.total_pages,
            "Received products"
        );

        Ok(body.products)
    }
}
