//! 控制台渠道 - dry-run 时把通知打印到 stdout，不发送

use anyhow::Result;
use async_trait::async_trait;

use crate::notification::channel::{NotificationChannel, NotificationMessage, SendResult};

pub struct ConsoleChannel;

impl ConsoleChannel {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ConsoleChannel {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl NotificationChannel for ConsoleChannel {
    fn name(&self) -> &str {
        "console"
    }

    async fn send(&self, message: &NotificationMessage) -> Result<SendResult> {
        println!("[通知] {}{}", message.subject, message.body.replace('\n', "\n  "));
        Ok(SendResult::Skipped("dry-run".to_string()))
    }
}
