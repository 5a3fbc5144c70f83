//! 配置模块 - 启动时加载一次，之后只读
//!
//! 配置读取优先级（后者覆盖前者）：
//! 1. 内置默认值
//! 2. JSON 配置文件（默认 `~/.config/bestbuy-tracker/config.json`，可用 `--config` 指定）
//! 3. 环境变量 `BESTBUY_API_KEY`、`BBT_SMTP_LOGIN`、`BBT_SMTP_PASSWORD`、
//!    `BBT_SENDER_EMAIL`、`BBT_RECEIVER_EMAIL`

use anyhow::{anyhow, bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

use crate::schedule::PeakWindow;

/// Best Buy 商品 API 基础 URL
pub const DEFAULT_BASE_URL: &str = "https://api.bestbuy.com/v1/products";

/// 显卡分类 ID
pub const DEFAULT_CATEGORY_ID: &str = "abcat0507002";

/// 按名称倒序
pub const DEFAULT_SORT_ORDER: &str = "name.dsc";

/// 请求返回的字段
pub const DEFAULT_SHOW_FIELDS: &str = "name,onlineAvailability,inStoreAvailability,orderable,url";

/// 每页数量
pub const DEFAULT_PAGE_SIZE: u32 = 100;

/// 默认匹配的商品名称片段
pub const DEFAULT_NAME_CONTAINS: &str = "RTX 3080";

/// iCloud SMTP 中继
pub const DEFAULT_SMTP_HOST: &str = "smtp.mail.me.com";

/// SMTPS（隐式 TLS）端口
pub const DEFAULT_SMTP_PORT: u16 = 465;

/// 默认 HTTP 超时（秒）
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

/// 配置文件相对 home 目录的路径
const CONFIG_RELATIVE_PATH: &str = ".config/bestbuy-tracker/config.json";

/// 商品 API 配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    pub api_key: String,
    pub category_id: String,
    pub sort: String,
    pub show: String,
    pub page_size: u32,
    /// 请求超时（秒），0 表示不设置超时
    pub http_timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: String::new(),
            category_id: DEFAULT_CATEGORY_ID.to_string(),
            sort: DEFAULT_SORT_ORDER.to_string(),
            show: DEFAULT_SHOW_FIELDS.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            http_timeout_secs: DEFAULT_HTTP_TIMEOUT_SECS,
        }
    }
}

impl ApiConfig {
    pub fn http_timeout(&self) -> Option<Duration> {
        (self.http_timeout_secs > 0).then(|| Duration::from_secs(self.http_timeout_secs))
    }
}

/// 商品过滤条件
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    /// 名称需包含的片段（区分大小写）
    pub name_contains: String,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            name_contains: DEFAULT_NAME_CONTAINS.to_string(),
        }
    }
}

/// SMTP 中继配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    /// 登录账号（iCloud 邮箱）
    pub login: String,
    /// 应用专用密码
    pub password: String,
    pub sender: String,
    /// 收件人，通常是运营商的短信网关地址
    pub receiver: String,
}

impl Default for SmtpConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_SMTP_HOST.to_string(),
            port: DEFAULT_SMTP_PORT,
            login: String::new(),
            password: String::new(),
            sender: String::new(),
            receiver: String::new(),
        }
    }
}

/// 轮询节奏配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScheduleConfig {
    /// 高峰时段，小时可带小数（3.5 = 03:30）
    pub peak_windows: Vec<PeakWindow>,
    pub peak_interval_secs: u64,
    pub off_peak_interval_secs: u64,
    /// 高峰期发现目标后的暂停时长
    pub found_pause_secs: u64,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            peak_windows: vec![PeakWindow::new(3.0, 5.5)],
            peak_interval_secs: 5,
            off_peak_interval_secs: 5 * 60,
            found_pause_secs: 5 * 60,
        }
    }
}

/// 完整配置
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    pub api: ApiConfig,
    pub filter: FilterConfig,
    pub smtp: SmtpConfig,
    pub schedule: ScheduleConfig,
}

impl TrackerConfig {
    /// 默认配置文件路径
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(CONFIG_RELATIVE_PATH))
    }

    /// 加载配置：文件 + 环境变量覆盖 + 校验
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config = Self::load_unchecked(path)?;
        config.validate()?;
        Ok(config)
    }

    /// 加载配置但不校验，用于只需要部分字段的命令（如 SMTP 测试）
    ///
    /// 显式指定的文件必须存在；默认路径不存在时使用内置默认值。
    pub fn load_unchecked(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => match Self::default_path().filter(|p| p.exists()) {
                Some(default_path) => Self::from_file(&default_path)?,
                None => {
                    debug!("No config file found, using defaults");
                    Self::default()
                }
            },
        };

        config.apply_env_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// 从 JSON 文件读取（不含环境变量覆盖和校验）
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        debug!(path = %path.display(), "Loaded config file");
        Ok(config)
    }

    /// 用环境变量覆盖敏感字段，空值忽略
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let overrides: [(&str, &mut String); 5] = [
            ("BESTBUY_API_KEY", &mut self.api.api_key),
            ("BBT_SMTP_LOGIN", &mut self.smtp.login),
            ("BBT_SMTP_PASSWORD", &mut self.smtp.password),
            ("BBT_SENDER_EMAIL", &mut self.smtp.sender),
            ("BBT_RECEIVER_EMAIL", &mut self.smtp.receiver),
        ];

        for (key, field) in overrides {
            if let Some(value) = lookup(key).filter(|v| !v.is_empty()) {
                debug!("Using {} from environment", key);
                *field = value;
            }
        }
    }

    /// 校验轮询所需的配置
    ///
    /// SMTP 字段不在这里检查：dry-run 和 `check` 不需要发信，
    /// 缺失时由邮件渠道在创建时报错。
    pub fn validate(&self) -> Result<()> {
        if self.api.base_url.is_empty() {
            bail!("api.base_url is required");
        }
        if self.api.api_key.is_empty() {
            bail!("api.api_key is required (config file or BESTBUY_API_KEY)");
        }
        if self.api.category_id.is_empty() {
            bail!("api.category_id is required");
        }
        if self.api.page_size == 0 {
            bail!("api.page_size must be greater than 0");
        }
        if self.filter.name_contains.is_empty() {
            bail!("filter.name_contains must not be empty");
        }
        for window in &self.schedule.peak_windows {
            window
                .validate()
                .map_err(|e| anyhow!("schedule.peak_windows: {}", e))?;
        }
        if self.schedule.peak_interval_secs == 0 || self.schedule.off_peak_interval_secs == 0 {
            bail!("schedule intervals must be greater than 0");
        }
        Ok(())
    }

    /// 用于展示的副本，密钥被遮盖
    pub fn masked(&self) -> Self {
        let mut copy = self.clone();
        copy.api.api_key = mask_secret(&copy.api.api_key);
        copy.smtp.password = mask_secret(&copy.smtp.password);
        copy
    }
}

/// 遮盖密钥，只保留前 4 个字符
pub fn mask_secret(secret: &str) -> String {
    if secret.is_empty() {
        return String::new();
    }
    let prefix: String = secret.chars().take(4).collect();
    if secret.chars().count() <= 4 {
        "****".to_string()
    } else {
        format!("{}****", prefix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn valid_config() -> TrackerConfig {
        let mut config = TrackerConfig::default();
        config.api.api_key = "test-key".to_string();
        config
    }

    #[test]
    fn test_defaults() {
        let config = TrackerConfig::default();
        assert_eq!(config.api.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.api.category_id, "abcat0507002");
        assert_eq!(config.api.page_size, 100);
        assert_eq!(config.filter.name_contains, "RTX 3080");
        assert_eq!(config.smtp.host, "smtp.mail.me.com");
        assert_eq!(config.smtp.port, 465);
        assert_eq!(config.schedule.peak_windows, vec![PeakWindow::new(3.0, 5.5)]);
        assert_eq!(config.schedule.peak_interval_secs, 5);
        assert_eq!(config.schedule.off_peak_interval_secs, 300);
        assert_eq!(config.schedule.found_pause_secs, 300);
    }

    #[test]
    fn test_validate_requires_api_key() {
        let config = TrackerConfig::default();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("api_key"));

        assert!(valid_config().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_window() {
        let mut config = valid_config();
        config.schedule.peak_windows = vec![PeakWindow::new(6.0, 5.0)];
        assert!(config.validate().is_err());

        config.schedule.peak_windows = vec![PeakWindow::new(22.0, 25.0)];
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_env_overrides_ignore_empty_values() {
        let env: HashMap<&str, &str> = [
            ("BESTBUY_API_KEY", "env-key"),
            ("BBT_SMTP_PASSWORD", ""),
            ("BBT_RECEIVER_EMAIL", "5551234567@txt.example.com"),
        ]
        .into_iter()
        .collect();

        let mut config = TrackerConfig::default();
        config.smtp.password = "from-file".to_string();
        config.apply_env_overrides(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.api.api_key, "env-key");
        assert_eq!(config.smtp.password, "from-file");
        assert_eq!(config.smtp.receiver, "5551234567@txt.example.com");
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let json = r#"{"api": {"api_key": "abc"}, "schedule": {"peak_windows": [[19.0, 19.5]]}}"#;
        let config: TrackerConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.api.api_key, "abc");
        assert_eq!(config.api.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.schedule.peak_windows, vec![PeakWindow::new(19.0, 19.5)]);
        assert_eq!(config.schedule.peak_interval_secs, 5);
    }

    #[test]
    fn test_http_timeout_zero_disables() {
        let mut api = ApiConfig::default();
        assert_eq!(api.http_timeout(), Some(Duration::from_secs(30)));
        api.http_timeout_secs = 0;
        assert_eq!(api.http_timeout(), None);
    }

    #[test]
    fn test_mask_secret() {
        assert_eq!(mask_secret(""), "");
        assert_eq!(mask_secret("abc"), "****");
        assert_eq!(mask_secret("abcdefgh"), "abcd****");

        let mut config = valid_config();
        config.smtp.password = "app-password".to_string();
        let masked = config.masked();
        assert_eq!(masked.api.api_key, "test****");
        assert_eq!(masked.smtp.password, "app-****");
    }
}
