//! 追踪主循环
//!
//! 每轮结束后：高峰期内有发现则先暂停，再按当前是否高峰选择轮询间隔。
//! 循环运行在独立任务中，不论因退出信号、达到轮数上限还是 panic 结束，
//! `run` 都会且只会发送一次退出通知。

use anyhow::{anyhow, Result};
use std::future::Future;
use std::sync::Arc;
use tokio::time::sleep;
use tracing::{info, warn};

use crate::poller::Poller;
use crate::schedule::{Clock, LocalClock, PeakSchedule};

/// 循环结束原因
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StopReason {
    /// 收到退出信号
    Shutdown,
    /// 达到 `max_cycles`
    Completed,
}

pub struct Tracker {
    poller: Poller,
    schedule: PeakSchedule,
    clock: Arc<dyn Clock>,
    max_cycles: Option<u64>,
}

impl Tracker {
    pub fn new(poller: Poller, schedule: PeakSchedule) -> Self {
        Self {
            poller,
            schedule,
            clock: Arc::new(LocalClock),
            max_cycles: None,
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// 限制轮数，`None` 表示一直运行
    pub fn with_max_cycles(mut self, max_cycles: Option<u64>) -> Self {
        self.max_cycles = max_cycles;
        self
    }

    fn in_peak(&self) -> bool {
        self.schedule.is_now(self.clock.as_ref())
    }

    /// 执行一轮，返回是否有发现；请求失败视为没有发现
    pub async fn run_cycle(&self) -> bool {
        match self.poller.poll_once().await {
            Ok(outcome) => {
                if outcome.failed_notifications > 0 {
                    warn!(
                        failed = outcome.failed_notifications,
                        matches = outcome.matches.len(),
                        "Some alerts could not be delivered"
                    );
                }
                outcome.found()
            }
            Err(e) => {
                warn!(error = %format!("{:#}", e), "API request failed");
                false
            }
        }
    }

    /// 限制在轮询之前检查，`Some(0)` 一轮也不跑
    fn limit_reached(&self, cycles: u64) -> bool {
        let reached = self.max_cycles.is_some_and(|max| cycles >= max);
        if reached {
            info!(cycles, "Reached cycle limit");
        }
        reached
    }

    async fn run_loop(&self) {
        let mut cycles: u64 = 0;

        if self.limit_reached(cycles) {
            return;
        }

        loop {
            let found = self.run_cycle().await;
            cycles += 1;

            if self.limit_reached(cycles) {
                return;
            }

            if let Some(pause) = self.schedule.pause_after(found, self.in_peak()) {
                info!(secs = pause.as_secs(), "Tracking pause...");
                sleep(pause).await;
            }

            info!("Tracking restarting...");
            sleep(self.schedule.poll_interval(self.in_peak())).await;
        }
    }

    /// 运行直到 `shutdown` 完成或循环结束，然后发送退出通知
    pub async fn run<F>(self: Arc<Self>, shutdown: F) -> Result<StopReason>
    where
        F: Future<Output = ()>,
    {
        info!(
            channel = self.poller.notifier().channel_name(),
            windows = ?self.schedule.windows(),
            "Tracking started..."
        );

        let tracker = Arc::clone(&self);
        let mut handle = tokio::spawn(async move { tracker.run_loop().await });

        let joined = tokio::select! {
            joined = &mut handle => Some(joined),
            _ = shutdown => None,
        };

        let result = match joined {
            Some(Ok(())) => Ok(StopReason::Completed),
            Some(Err(e)) => Err(anyhow!("Tracking loop aborted: {}", e)),
            None => {
                handle.abort();
                let _ = handle.await;
                Ok(StopReason::Shutdown)
            }
        };

        info!("Goodbye! Tracker is exiting...");
        self.poller.notifier().notify(None).await;

        result
    }
}

/// 等待 Ctrl+C 或 SIGTERM
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C"),
        _ = terminate => info!("Received SIGTERM"),
    }
}
