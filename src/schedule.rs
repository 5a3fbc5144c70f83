//! 高峰时段判断
//!
//! Best Buy 通常在固定时段补货，高峰时段内使用短轮询间隔。
//! 时间按 `小时 + 分钟/60` 计算（秒被忽略），窗口为左闭右开 `[start, end)`。

use chrono::{Local, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::ScheduleConfig;

/// 单个高峰窗口，JSON 中表示为 `[start, end]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "(f64, f64)", into = "(f64, f64)")]
pub struct PeakWindow {
    pub start: f64,
    pub end: f64,
}

impl PeakWindow {
    pub fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, hour: f64) -> bool {
        self.start <= hour && hour < self.end
    }

    pub fn validate(&self) -> Result<(), String> {
        if !(0.0..=24.0).contains(&self.start) || !(0.0..=24.0).contains(&self.end) {
            return Err(format!(
                "window ({}, {}) must lie within 0..24",
                self.start, self.end
            ));
        }
        if self.start >= self.end {
            return Err(format!(
                "window ({}, {}) must have start < end",
                self.start, self.end
            ));
        }
        Ok(())
    }
}

impl From<(f64, f64)> for PeakWindow {
    fn from((start, end): (f64, f64)) -> Self {
        Self::new(start, end)
    }
}

impl From<PeakWindow> for (f64, f64) {
    fn from(window: PeakWindow) -> Self {
        (window.start, window.end)
    }
}

/// 当前时间来源，测试中可替换为固定时间
pub trait Clock: Send + Sync {
    fn now(&self) -> NaiveTime;
}

/// 本地挂钟时间
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalClock;

impl Clock for LocalClock {
    fn now(&self) -> NaiveTime {
        Local::now().time()
    }
}

/// 固定时间
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveTime);

impl Clock for FixedClock {
    fn now(&self) -> NaiveTime {
        self.0
    }
}

/// 把时间转换成小数小时，例如 19:30 -> 19.5
pub fn fractional_hour(time: NaiveTime) -> f64 {
    time.hour() as f64 + time.minute() as f64 / 60.0
}

/// 高峰时段集合及对应的轮询节奏
#[derive(Debug, Clone, PartialEq)]
pub struct PeakSchedule {
    windows: Vec<PeakWindow>,
    peak_interval: Duration,
    off_peak_interval: Duration,
    found_pause: Duration,
}

impl PeakSchedule {
    pub fn new(config: &ScheduleConfig) -> Self {
        Self {
            windows: config.peak_windows.clone(),
            peak_interval: Duration::from_secs(config.peak_interval_secs),
            off_peak_interval: Duration::from_secs(config.off_peak_interval_secs),
            found_pause: Duration::from_secs(config.found_pause_secs),
        }
    }

    pub fn windows(&self) -> &[PeakWindow] {
        &self.windows
    }

    /// 是否落在任一窗口内
    pub fn contains(&self, time: NaiveTime) -> bool {
        let hour = fractional_hour(time);
        self.windows.iter().any(|w| w.contains(hour))
    }

    pub fn is_now(&self, clock: &dyn Clock) -> bool {
        self.contains(clock.now())
    }

    /// 两次轮询之间的间隔
    pub fn poll_interval(&self, in_peak: bool) -> Duration {
        if in_peak {
            self.peak_interval
        } else {
            self.off_peak_interval
        }
    }

    /// 本轮结束后的暂停：只有高峰期内发现目标时才暂停
    pub fn pause_after(&self, found: bool, in_peak: bool) -> Option<Duration> {
        (found && in_peak).then_some(self.found_pause)
    }
}

impl Default for PeakSchedule {
    fn default() -> Self {
        Self::new(&ScheduleConfig::default())
    }
}
