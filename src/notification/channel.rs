//! 通知渠道 trait 定义

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::catalog::Product;

/// 通知消息
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationMessage {
    pub subject: String,
    pub body: String,
}

impl NotificationMessage {
    pub fn new(subject: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            body: body.into(),
        }
    }

    /// 到货提醒
    pub fn alert(product: &Product) -> Self {
        Self::new("ALERT", format!("\n{}\n{}", product.name, product.url))
    }

    /// 退出通知
    pub fn exiting() -> Self {
        Self::new("TRACKER EXITING", "\n!!! TRACKER IS EXITING !!!")
    }
}

/// 发送结果
#[derive(Debug, Clone, PartialEq)]
pub enum SendResult {
    /// 发送成功
    Sent,
    /// 跳过（dry-run 等）
    Skipped(String),
    /// 发送失败
    Failed(String),
}

impl SendResult {
    pub fn is_failed(&self) -> bool {
        matches!(self, SendResult::Failed(_))
    }
}

/// 通知渠道 trait
#[async_trait]
pub trait NotificationChannel: Send + Sync {
    /// 渠道名称（用于日志）
    fn name(&self) -> &str;

    /// 发送消息
    async fn send(&self, message: &NotificationMessage) -> Result<SendResult>;
}
