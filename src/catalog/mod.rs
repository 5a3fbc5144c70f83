//! 商品目录 - Best Buy API 访问和商品记录

pub mod client;
pub mod product;

pub use client::{BestBuyClient, Catalog};
pub use product::{Product, ProductsResponse};
