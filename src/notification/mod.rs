//! 通知层 - 消息构造、渠道抽象和具体渠道
//!
//! 所有渠道实现 `NotificationChannel` trait；`Notifier` 负责挑选消息模板，
//! 并把渠道错误转换成 `SendResult`，调用方不需要处理发送异常。

pub mod builder;
pub mod channel;
pub mod channels;
pub mod notifier;

pub use builder::NotifierBuilder;
pub use channel::{NotificationChannel, NotificationMessage, SendResult};
pub use channels::{ConsoleChannel, EmailChannel};
pub use notifier::Notifier;
