use serde::{Deserialize, Serialize};

pub mod defaults;
pub mod parser;
pub mod substitution;
pub mod validator;

pub use defaults::*;
pub use parser::*;
pub use substitution::*;
pub use validator::*;

/// Root of `dynprice.yaml`
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DynPriceConfig {
    #[serde(default)]
    pub series: SeriesSection,
    pub feed: FeedSection,
    #[serde(default)]
    pub schedule: ScheduleSection,
    #[serde(default)]
    pub logging: LoggingSection,
    #[serde(default)]
    pub metrics: MetricsSection,
}

/// How quotes are matched and summarized
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SeriesSection {
    /// Minutes covered by one quote: 60 or 15
    #[serde(default = "default_bucket_minutes")]
    pub bucket_minutes: u32,
    /// IANA zone in which "today" and the current hour are evaluated
    #[serde(default = "default_timezone")]
    pub timezone: String,
    /// `crossings` or `threshold`
    #[serde(default = "default_region_policy")]
    pub region_policy: String,
    #[serde(default = "default_unit")]
    pub unit: String,
}

impl Default for SeriesSection {
    fn default() -> Self {
        Self {
            bucket_minutes: default_bucket_minutes(),
            timezone: default_timezone(),
            region_policy: default_region_policy(),
            unit: default_unit(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FeedSection {
    /// Prices for a day are fetched from `{base_url}/{YYYY-MM-DD}`
    pub base_url: String,
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
    #[serde(default = "default_min_price")]
    pub min_price: f64,
    #[serde(default = "default_max_price")]
    pub max_price: f64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ScheduleSection {
    #[serde(default = "default_download_interval_seconds")]
    pub download_interval_seconds: u64,
    #[serde(default = "default_refresh_interval_seconds")]
    pub refresh_interval_seconds: u64,
}

impl Default for ScheduleSection {
    fn default() -> Self {
        Self {
            download_interval_seconds: default_download_interval_seconds(),
            refresh_interval_seconds: default_refresh_interval_seconds(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingSection {
    /// `pretty`, `json` or `compact`
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            format: default_log_format(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MetricsSection {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_metrics_port")]
    pub port: u16,
}

impl Default for MetricsSection {
    fn default() -> Self {
        Self {
            enabled: false,
            port: default_metrics_port(),
        }
    }
}
