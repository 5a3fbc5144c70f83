// src/cli/show_config.rs
//! Config 命令 - 打印生效的配置（密钥已遮盖）和当前是否处于高峰时段

use crate::config::TrackerConfig;
use crate::schedule::{LocalClock, PeakSchedule};
use anyhow::Result;
use clap::Args;
use serde::Serialize;
use std::path::PathBuf;

use super::output::format_output;

/// Config 命令参数
#[derive(Args)]
pub struct ConfigArgs {
    /// 配置文件路径
    #[arg(long, short)]
    pub config: Option<PathBuf>,

    /// 输出 JSON 格式
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Serialize)]
struct ConfigOutput {
    config_path: Option<String>,
    in_peak_now: bool,
    config: TrackerConfig,
}

/// 处理 config 命令
pub fn handle_config(args: ConfigArgs) -> Result<()> {
    let config = TrackerConfig::load(args.config.as_deref())?;
    let schedule = PeakSchedule::new(&config.schedule);

    let path = args
        .config
        .or_else(|| TrackerConfig::default_path().filter(|p| p.exists()));

    let output = ConfigOutput {
        config_path: path.map(|p| p.display().to_string()),
        in_peak_now: schedule.is_now(&LocalClock),
        config: config.masked(),
    };

    if args.json {
        println!("{}", format_output(&output, true));
    } else {
        println!("配置文件: {}", output.config_path.as_deref().unwrap_or("(默认值)"));
        println!("API: {}", output.config.api.base_url);
        println!("  分类: {}", output.config.api.category_id);
        println!("  apiKey: {}", output.config.api.api_key);
        println!("匹配: \"{}\" 且线上有货", output.config.filter.name_contains);
        println!(
            "SMTP: {}:{} ({} -> {})",
            output.config.smtp.host,
            output.config.smtp.port,
            output.config.smtp.sender,
            output.config.smtp.receiver
        );
        let windows: Vec<String> = output
            .config
            .schedule
            .peak_windows
            .iter()
            .map(|w| format!("[{}, {})", w.start, w.end))
            .collect();
        println!("高峰时段: {}", windows.join(", "));
        println!(
            "轮询间隔: 高峰 {}s / 非高峰 {}s，高峰发现后暂停 {}s",
            output.config.schedule.peak_interval_secs,
            output.config.schedule.off_peak_interval_secs,
            output.config.schedule.found_pause_secs
        );
        println!("当前是否高峰: {}", if output.in_peak_now { "是" } else { "否" });
    }

    Ok(())
}
