pub fn default_bucket_minutes() -> u32 {
    60
}

pub fn default_timezone() -> String {
    "UTC".to_string()
}

pub fn default_region_policy() -> String {
    "crossings".to_string()
}

pub fn default_unit() -> String {
    "€/MWh".to_string()
}

pub fn default_timeout_seconds() -> u64 {
    10
}

pub fn default_min_price() -> f64 {
    -999.0
}

pub fn default_max_price() -> f64 {
    999.0
}

pub fn default_download_interval_seconds() -> u64 {
    4 * 3600
}

pub fn default_refresh_interval_seconds() -> u64 {
    10
}

pub fn default_log_format() -> String {
    "pretty".to_string()
}

pub fn default_metrics_port() -> u16 {
    9090
}

pub fn default_feed_url() -> String {
    "https://prices.example.com/api/prices".to_string()
}
