use crate::*;
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use tracing::{debug, info, instrument};

#[instrument(skip(path))]
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<DynPriceConfig> {
    let path = path.as_ref();
    info!("Loading configuration from: {:?}", path);

    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    debug!("Config file content length: {} bytes", content.len());

    parse_config(&content)
}

/// Parse YAML content after environment variable substitution
pub fn parse_config(content: &str) -> Result<DynPriceConfig> {
    let substituted = substitution::substitute_env_vars(content);
    if !substituted.missing.is_empty() {
        debug!(
            missing = ?substituted.missing,
            "Placeholders left unresolved, validation will report them"
        );
    }

    let config: DynPriceConfig = serde_yaml::from_str(&substituted.content)
        .with_context(|| "Failed to parse YAML configuration")?;

    info!("Configuration loaded successfully");
    Ok(config)
}

#[instrument]
pub fn generate_default_config() -> DynPriceConfig {
    DynPriceConfig {
        series: SeriesSection::default(),
        feed: FeedSection {
            base_url: default_feed_url(),
            timeout_seconds: default_timeout_seconds(),
            min_price: default_min_price(),
            max_price: default_max_price(),
        },
        schedule: ScheduleSection::default(),
        logging: LoggingSection::default(),
        metrics: MetricsSection::default(),
    }
}

#[instrument(skip(config))]
pub fn save_config<P: AsRef<Path> + std::fmt::Debug>(config: &DynPriceConfig, path: P) -> Result<()> {
    let path = path.as_ref();
    info!("Saving configuration to: {:?}", path);

    let yaml = serde_yaml::to_string(config)
        .with_context(|| "Failed to serialize configuration to YAML")?;

    fs::write(path, yaml)
        .with_context(|| format!("Failed to write config file: {:?}", path))?;

    info!("Configuration saved successfully");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_save_then_load_default_config() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("dynprice.yaml");

        save_config(&generate_default_config(), &path).unwrap();
        let loaded = load_config(&path).unwrap();

        assert_eq!(loaded.feed.base_url, default_feed_url());
        assert_eq!(loaded.series.bucket_minutes, 60);
        assert!(validate_config(&loaded).is_valid());
    }

    #[test]
    fn test_load_missing_file() {
        let err = load_config("/nonexistent/dynprice.yaml").unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }

    #[test]
    fn test_parse_substitutes_env_vars() {
        std::env::set_var("DYNPRICE_TEST_FEED_HOST", "feed.internal");
        let yaml = "feed:\n  base_url: \"https://${DYNPRICE_TEST_FEED_HOST}/prices\"\n";

        let config = parse_config(yaml).unwrap();

        assert_eq!(config.feed.base_url, "https://feed.internal/prices");
    }

    #[test]
    fn test_shipped_deploy_config() {
        let yaml = include_str!("../../../deploy/dynprice.yaml");
        std::env::set_var("DYNPRICE_FEED_URL", "https://prices.example.com/api/prices");

        let config = parse_config(yaml).unwrap();

        assert_eq!(config.series.timezone, "Europe/Amsterdam");
        assert_eq!(config.feed.base_url, "https://prices.example.com/api/prices");
        assert!(validate_config(&config).is_valid());
    }
}
