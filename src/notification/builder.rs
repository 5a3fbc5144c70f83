//! 通知器构建器 - 根据配置选择渠道

use super::channels::{ConsoleChannel, EmailChannel};
use super::notifier::Notifier;
use crate::config::SmtpConfig;
use anyhow::{Context, Result};
use std::sync::Arc;

pub struct NotifierBuilder {
    smtp: SmtpConfig,
    dry_run: bool,
}

impl NotifierBuilder {
    pub fn new(smtp: SmtpConfig) -> Self {
        Self {
            smtp,
            dry_run: false,
        }
    }

    /// dry-run 模式下只打印，不连接 SMTP
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn build(self) -> Result<Notifier> {
        if self.dry_run {
            return Ok(Notifier::new(Arc::new(ConsoleChannel::new())));
        }

        let channel = EmailChannel::new(self.smtp).context("Invalid SMTP configuration")?;
        Ok(Notifier::new(Arc::new(channel)))
    }
}
