//! 邮件渠道 - 通过 SMTP 中继（隐式 TLS）发送纯文本邮件
//!
//! 收件人通常是运营商的 email-to-SMS 网关，所以正文保持很短。

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use chrono::Local;
use lettre::{
    message::{header::ContentType, Mailbox, Message},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Tokio1Executor,
};
use tracing::{debug, info};

use crate::config::SmtpConfig;
use crate::notification::channel::{NotificationChannel, NotificationMessage, SendResult};

type SmtpTransport = AsyncSmtpTransport<Tokio1Executor>;

/// 邮件渠道
pub struct EmailChannel {
    config: SmtpConfig,
    from: Mailbox,
    to: Mailbox,
}

impl EmailChannel {
    pub fn new(config: SmtpConfig) -> Result<Self> {
        if config.host.is_empty() {
            bail!("smtp.host is required");
        }
        if config.login.is_empty() || config.password.is_empty() {
            bail!("smtp.login and smtp.password are required (config file or BBT_SMTP_LOGIN / BBT_SMTP_PASSWORD)");
        }

        let from: Mailbox = config
            .sender
            .parse()
            .with_context(|| format!("Invalid sender email: {:?}", config.sender))?;
        let to: Mailbox = config
            .receiver
            .parse()
            .with_context(|| format!("Invalid receiver email: {:?}", config.receiver))?;

        Ok(Self { config, from, to })
    }

    fn build_email(&self, message: &NotificationMessage) -> Result<Message> {
        Message::builder()
            .from(self.from.clone())
            .to(self.to.clone())
            .subject(&message.subject)
            .header(ContentType::TEXT_PLAIN)
            .body(message.body.clone())
            .context("Failed to build email")
    }

    /// 每次发送建立新连接，transport 离开作用域时连接关闭
    ///
    /// lettre 未启用 `pool` feature，连接不会被放回连接池延迟关闭。
    fn connect(&self) -> Result<SmtpTransport> {
        let creds = Credentials::new(self.config.login.clone(), self.config.password.clone());
        let mailer = SmtpTransport::relay(&self.config.host)
            .with_context(|| format!("Failed to create SMTP relay for {}", self.config.host))?
            .port(self.config.port)
            .credentials(creds)
            .build();
        Ok(mailer)
    }
}

#[async_trait]
impl NotificationChannel for EmailChannel {
    fn name(&self) -> &str {
        "email"
    }

    async fn send(&self, message: &NotificationMessage) -> Result<SendResult> {
        let email = self.build_email(message)?;
        let mailer = self.connect()?;

        debug!(
            host = %self.config.host,
            port = self.config.port,
            subject = %message.subject,
            "Sending email"
        );

        mailer.send(email).await.context("Failed to send email")?;

        info!(
            "Email sent successfully at {}",
            Local::now().format("%Y-%m-%d %H:%M:%S")
        );
        Ok(SendResult::Sent)
    }
}
