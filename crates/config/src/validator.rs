use crate::*;
use chrono_tz::Tz;
use std::cmp::Ordering;
use thiserror::Error;
use url::Url;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("series.bucket_minutes must be 60 or 15, got: {0}")]
    InvalidBucketMinutes(u32),

    #[error("Unknown timezone '{0}'. Use an IANA name such as Europe/Amsterdam")]
    UnknownTimezone(String),

    #[error("Invalid region policy: {0}. Must be one of: crossings, threshold")]
    InvalidRegionPolicy(String),

    #[error("feed.base_url is required")]
    MissingFeedUrl,

    #[error("Invalid feed URL '{url}': {message}")]
    InvalidFeedUrl { url: String, message: String },

    #[error("feed.min_price ({min}) must be lower than feed.max_price ({max})")]
    InvalidPriceBounds { min: f64, max: f64 },

    #[error("{field} must be a positive integer")]
    InvalidPositiveInteger { field: String },

    #[error("Invalid log format: {0}. Must be one of: pretty, json, compact")]
    InvalidLogFormat(String),

    #[error("metrics.port must be non-zero when metrics are enabled")]
    InvalidMetricsPort,

    #[error("Environment variable '{var}' is missing or invalid: {message}")]
    InvalidEnvVar { var: String, message: String },
}

#[derive(Debug, Clone)]
pub struct ValidationWarning {
    pub field: String,
    pub message: String,
}

#[derive(Debug, Clone)]
pub struct ValidationReport {
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationWarning>,
}

impl ValidationReport {
    pub fn new() -> Self {
        Self {
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub fn add_warning(&mut self, field: &str, message: &str) {
        self.warnings.push(ValidationWarning {
            field: field.to_string(),
            message: message.to_string(),
        });
    }
}

impl Default for ValidationReport {
    fn default() -> Self {
        Self::new()
    }
}

pub fn validate_config(config: &DynPriceConfig) -> ValidationReport {
    let mut report = ValidationReport::new();

    validate_series(&config.series, &mut report);
    validate_feed(&config.feed, &mut report);
    validate_schedule(&config.schedule, config.series.bucket_minutes, &mut report);
    validate_logging(&config.logging, &mut report);
    validate_metrics(&config.metrics, &mut report);

    report
}

fn validate_series(series: &SeriesSection, report: &mut ValidationReport) {
    if !matches!(series.bucket_minutes, 60 | 15) {
        report.add_error(ValidationError::InvalidBucketMinutes(series.bucket_minutes));
    }

    if series.timezone.parse::<Tz>().is_err() {
        report.add_error(ValidationError::UnknownTimezone(series.timezone.clone()));
    }

    let valid_policies = ["crossings", "threshold"];
    if !valid_policies.contains(&series.region_policy.to_lowercase().as_str()) {
        report.add_error(ValidationError::InvalidRegionPolicy(
            series.region_policy.clone(),
        ));
    }

    if series.region_policy.eq_ignore_ascii_case("crossings") && series.bucket_minutes == 15 {
        report.add_warning(
            "series.region_policy",
            "Crossing positions are compared against the hour of day; with 15 minute buckets \
             each position covers a quarter-hour, consider region_policy: threshold",
        );
    }
}

fn validate_feed(feed: &FeedSection, report: &mut ValidationReport) {
    if feed.base_url.trim().is_empty() {
        report.add_error(ValidationError::MissingFeedUrl);
    } else {
        for var in unresolved_env_vars(&feed.base_url) {
            report.add_error(ValidationError::InvalidEnvVar {
                var,
                message: "referenced by feed.base_url but not set".to_string(),
            });
        }

        match Url::parse(&feed.base_url) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => {}
            Ok(url) => report.add_error(ValidationError::InvalidFeedUrl {
                url: feed.base_url.clone(),
                message: format!("unsupported scheme '{}'", url.scheme()),
            }),
            Err(e) => report.add_error(ValidationError::InvalidFeedUrl {
                url: feed.base_url.clone(),
                message: e.to_string(),
            }),
        }
    }

    if feed.timeout_seconds == 0 {
        report.add_error(ValidationError::InvalidPositiveInteger {
            field: "feed.timeout_seconds".to_string(),
        });
    }

    // NaN bounds compare as unordered
    match feed.min_price.partial_cmp(&feed.max_price) {
        Some(Ordering::Less) => {}
        _ => report.add_error(ValidationError::InvalidPriceBounds {
            min: feed.min_price,
            max: feed.max_price,
        }),
    }
}

fn validate_schedule(schedule: &ScheduleSection, bucket_minutes: u32, report: &mut ValidationReport) {
    if schedule.download_interval_seconds == 0 {
        report.add_error(ValidationError::InvalidPositiveInteger {
            field: "schedule.download_interval_seconds".to_string(),
        });
    }

    if schedule.refresh_interval_seconds == 0 {
        report.add_error(ValidationError::InvalidPositiveInteger {
            field: "schedule.refresh_interval_seconds".to_string(),
        });
    }

    if schedule.download_interval_seconds > 24 * 3600 {
        report.add_warning(
            "schedule.download_interval_seconds",
            "Downloads less than once a day will miss tomorrow's prices",
        );
    }

    if schedule.refresh_interval_seconds > u64::from(bucket_minutes) * 60 {
        report.add_warning(
            "schedule.refresh_interval_seconds",
            "Refresh interval is longer than one bucket; the current price will lag",
        );
    }
}

fn validate_logging(logging: &LoggingSection, report: &mut ValidationReport) {
    let valid_formats = ["pretty", "json", "compact"];
    if !valid_formats.contains(&logging.format.to_lowercase().as_str()) {
        report.add_error(ValidationError::InvalidLogFormat(logging.format.clone()));
    }
}

fn validate_metrics(metrics: &MetricsSection, report: &mut ValidationReport) {
    if metrics.enabled && metrics.port == 0 {
        report.add_error(ValidationError::InvalidMetricsPort);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let report = validate_config(&generate_default_config());
        assert!(report.is_valid(), "{:?}", report.errors);
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn test_invalid_series() {
        let mut config = generate_default_config();
        config.series.bucket_minutes = 30;
        config.series.timezone = "Europe/Atlantis".to_string();
        config.series.region_policy = "average".to_string();

        let report = validate_config(&config);

        assert!(report.errors.contains(&ValidationError::InvalidBucketMinutes(30)));
        assert!(report
            .errors
            .contains(&ValidationError::UnknownTimezone("Europe/Atlantis".to_string())));
        assert!(report
            .errors
            .contains(&ValidationError::InvalidRegionPolicy("average".to_string())));
    }

    #[test]
    fn test_invalid_feed() {
        let mut config = generate_default_config();
        config.feed.base_url = "ftp://prices.example.com".to_string();
        config.feed.min_price = 10.0;
        config.feed.max_price = 10.0;
        config.feed.timeout_seconds = 0;

        let report = validate_config(&config);

        assert_eq!(report.errors.len(), 3);
        assert!(matches!(
            report.errors[0],
            ValidationError::InvalidFeedUrl { .. }
        ));
    }

    #[test]
    fn test_price_bounds() {
        let mut config = generate_default_config();
        config.feed.min_price = 100.0;
        config.feed.max_price = 50.0;
        assert_eq!(validate_config(&config).errors.len(), 1);

        config.feed.min_price = f64::NAN;
        config.feed.max_price = 50.0;
        let report = validate_config(&config);
        assert!(matches!(
            report.errors.as_slice(),
            [ValidationError::InvalidPriceBounds { .. }]
        ));

        config.feed.min_price = -50.0;
        assert!(validate_config(&config).is_valid());
    }

    #[test]
    fn test_missing_feed_url() {
        let mut config = generate_default_config();
        config.feed.base_url = "  ".to_string();

        let report = validate_config(&config);
        assert_eq!(report.errors, vec![ValidationError::MissingFeedUrl]);
    }

    #[test]
    fn test_unresolved_placeholder_in_feed_url() {
        let mut config = generate_default_config();
        config.feed.base_url = "https://${DYNPRICE_UNSET_HOST}/prices".to_string();

        let report = validate_config(&config);

        assert!(report.errors.iter().any(|e| matches!(
            e,
            ValidationError::InvalidEnvVar { var, .. } if var == "DYNPRICE_UNSET_HOST"
        )));
    }

    #[test]
    fn test_schedule_warnings() {
        let mut config = generate_default_config();
        config.series.bucket_minutes = 15;
        config.series.region_policy = "threshold".to_string();
        config.schedule.refresh_interval_seconds = 1800;
        config.schedule.download_interval_seconds = 2 * 24 * 3600;

        let report = validate_config(&config);

        assert!(report.is_valid());
        assert_eq!(report.warnings.len(), 2);
    }

    #[test]
    fn test_quarter_hour_crossings_warns() {
        let mut config = generate_default_config();
        config.series.bucket_minutes = 15;

        let report = validate_config(&config);

        assert!(report.is_valid());
        assert_eq!(report.warnings.len(), 1);
        assert_eq!(report.warnings[0].field, "series.region_policy");
    }

    #[test]
    fn test_logging_and_metrics() {
        let mut config = generate_default_config();
        config.logging.format = "xml".to_string();
        config.metrics.enabled = true;
        config.metrics.port = 0;

        let report = validate_config(&config);

        assert_eq!(
            report.errors,
            vec![
                ValidationError::InvalidLogFormat("xml".to_string()),
                ValidationError::InvalidMetricsPort,
            ]
        );
    }
}
