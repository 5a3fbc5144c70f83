//! 通知器 - 构造到货/退出消息并交给渠道发送
//!
//! 发送失败只记录日志并以 `SendResult::Failed` 返回，不会向上传播，也不重试。

use std::sync::Arc;
use tracing::{info, warn};

use super::channel::{NotificationChannel, NotificationMessage, SendResult};
use crate::catalog::Product;

#[derive(Clone)]
pub struct Notifier {
    channel: Arc<dyn NotificationChannel>,
}

impl Notifier {
    pub fn new(channel: Arc<dyn NotificationChannel>) -> Self {
        info!(channel = channel.name(), "Using notification channel");
        Self { channel }
    }

    pub fn channel_name(&self) -> &str {
        self.channel.name()
    }

    /// 有商品时发送到货提醒，否则发送退出通知
    pub async fn notify(&self, product: Option<&Product>) -> SendResult {
        let message = match product {
            Some(product) => NotificationMessage::alert(product),
            None => NotificationMessage::exiting(),
        };
        self.send(&message).await
    }

    pub async fn send(&self, message: &NotificationMessage) -> SendResult {
        let result = match self.channel.send(message).await {
            Ok(result) => result,
            Err(e) => SendResult::Failed(format!("{:#}", e)),
        };

        if let SendResult::Failed(reason) = &result {
            warn!(channel = self.channel.name(), error = %reason, "Failed to send notification");
        }
        result
    }
}
