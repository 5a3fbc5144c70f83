//! Best Buy Tracker - 轮询 Best Buy 商品 API，目标商品线上有货时发送邮件/短信提醒

pub mod catalog;
pub mod cli;
pub mod config;
pub mod notification;
pub mod poller;
pub mod schedule;
pub mod tracker;

pub use catalog::{BestBuyClient, Catalog, Product, ProductsResponse};
pub use config::{ApiConfig, FilterConfig, ScheduleConfig, SmtpConfig, TrackerConfig};
pub use notification::{
    ConsoleChannel, EmailChannel, NotificationChannel, NotificationMessage, Notifier,
    NotifierBuilder, SendResult,
};
pub use poller::{filter_matches, PollOutcome, Poller};
pub use schedule::{Clock, FixedClock, LocalClock, PeakSchedule, PeakWindow};
pub use tracker::{shutdown_signal, StopReason, Tracker};
