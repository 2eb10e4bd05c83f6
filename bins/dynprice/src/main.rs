//! dynprice CLI and service binary
//!
//! Tracks day-ahead energy prices: downloads the published window,
//! keeps the current price and today's summary fresh, and exposes
//! them through logs, metrics and one-shot JSON snapshots.

mod scheduler;
mod shutdown;

use anyhow::{Context, Result};
use chrono::Utc;
use cli::{Cli, Commands};
use common::{Clock, FixedClock, SystemClock};
use config::{
    generate_default_config, load_config, save_config, validate_config, DynPriceConfig,
    FeedSection, ValidationReport,
};
use feed::{FeedSettings, HttpQuoteSource, PriceBounds, StaticQuoteSource};
use observability::{init_logging, init_metrics, LogFormat, SeriesMetrics};
use pricing::{SeriesConfig, SeriesCoordinator, SeriesSnapshot};
use scheduler::Scheduler;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};
use url::Url;

const SERVICE_NAME: &str = "dynprice";

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse_args();

    match cli.command {
        Commands::Run { config } => run_command(config).await,
        Commands::Snapshot { config, quotes, at } => snapshot_command(config, quotes, at).await,
        Commands::Validate { config } => {
            init_logging(SERVICE_NAME, LogFormat::Pretty)?;
            validate_command(config)
        }
        Commands::Init { output } => {
            init_logging(SERVICE_NAME, LogFormat::Pretty)?;
            init_command(output)
        }
    }
}

/// Load the config, install logging in its format, and refuse to go on
/// when validation reports errors.
///
/// Loading runs before any subscriber exists, so the load is reported
/// once logging is up.
fn prepare(config_path: &Path) -> Result<DynPriceConfig> {
    let config = load_config(config_path)?;

    let format = log_format(&config);
    init_logging(SERVICE_NAME, format)?;
    info!(
        path = ?config_path,
        format = format.as_str(),
        feed = %config.feed.base_url,
        "Configuration loaded"
    );

    let report = validate_config(&config);
    log_report(&report);
    if !report.is_valid() {
        anyhow::bail!("Cannot start due to configuration errors");
    }

    Ok(config)
}

/// Unknown formats fall back to pretty; validation reports them
fn log_format(config: &DynPriceConfig) -> LogFormat {
    LogFormat::parse(&config.logging.format).unwrap_or_default()
}

fn log_report(report: &ValidationReport) {
    for warning in &report.warnings {
        warn!(field = %warning.field, message = %warning.message, "Configuration warning");
    }

    if !report.is_valid() {
        error!(
            error_count = report.errors.len(),
            "Configuration validation failed"
        );
        for err in &report.errors {
            error!("{}", err);
        }
    }
}

fn series_config(config: &DynPriceConfig) -> Result<SeriesConfig> {
    let series = &config.series;
    SeriesConfig::from_parts(
        series.bucket_minutes,
        &series.timezone,
        &series.region_policy,
    )
    .context("Invalid series configuration")
}

fn price_bounds(feed: &FeedSection) -> PriceBounds {
    PriceBounds {
        min: feed.min_price,
        max: feed.max_price,
    }
}

fn feed_settings(feed: &FeedSection) -> Result<FeedSettings> {
    let base_url = Url::parse(&feed.base_url)
        .with_context(|| format!("Invalid feed URL: {}", feed.base_url))?;

    Ok(FeedSettings {
        base_url,
        timeout: Duration::from_secs(feed.timeout_seconds),
        bounds: price_bounds(feed),
    })
}

async fn run_command(config_path: PathBuf) -> Result<()> {
    let config = prepare(&config_path)?;
    let series_config = series_config(&config)?;
    let timezone = series_config.timezone;

    if config.metrics.enabled {
        init_metrics(config.metrics.port)?;
    }
    let metrics = SeriesMetrics::new(&config.series.unit);

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let source = HttpQuoteSource::new(feed_settings(&config.feed)?, clock.clone())
        .context("Failed to build HTTP client")?;

    info!(
        feed = %config.feed.base_url,
        timezone = %timezone,
        bucket_minutes = config.series.bucket_minutes,
        "Starting price tracking"
    );

    let scheduler = Scheduler::new(
        Arc::new(source),
        SeriesCoordinator::new(series_config),
        clock,
        metrics,
        timezone,
    )
    .with_intervals(
        Duration::from_secs(config.schedule.download_interval_seconds),
        Duration::from_secs(config.schedule.refresh_interval_seconds),
    );

    scheduler.run(shutdown::shutdown_signal()).await;

    let snapshot = scheduler.coordinator().snapshot(Utc::now()).await;
    info!(
        price = ?snapshot.current_price,
        avg = snapshot.avg,
        region = %snapshot.current_region,
        "Final state"
    );

    Ok(())
}

async fn snapshot_command(
    config_path: PathBuf,
    quotes_path: PathBuf,
    at: Option<String>,
) -> Result<()> {
    let config = prepare(&config_path)?;
    let series_config = series_config(&config)?;

    let source = StaticQuoteSource::from_file(&quotes_path, price_bounds(&config.feed))
        .with_context(|| format!("Failed to load quotes from {:?}", quotes_path))?;

    let clock = match at {
        Some(at) => FixedClock::parse(&at).context("--at must be an RFC 3339 timestamp")?,
        None => FixedClock::new(Utc::now()),
    };
    let now = clock.now();

    let coordinator = SeriesCoordinator::new(series_config);
    if let Err(e) = coordinator.ingest(source.quotes().to_vec(), now).await {
        warn!(error = %e, "No crossings for the requested day");
    }

    let snapshot = LabelledSnapshot {
        snapshot: coordinator.snapshot(now).await,
        unit: &config.series.unit,
    };
    println!("{}", serde_json::to_string_pretty(&snapshot)?);

    Ok(())
}

/// Snapshot as printed, with the configured price unit
#[derive(Serialize)]
struct LabelledSnapshot<'a> {
    #[serde(flatten)]
    snapshot: SeriesSnapshot,
    unit: &'a str,
}

fn validate_command<P: AsRef<Path>>(config_path: P) -> Result<()> {
    info!(path = ?config_path.as_ref(), "Validating configuration");

    let config = match load_config(&config_path) {
        Ok(c) => c,
        Err(e) => {
            error!(%e, "Failed to load configuration");
            anyhow::bail!(e);
        }
    };

    let report = validate_config(&config);

    println!("\n=== Configuration Validation Report ===\n");

    if !report.warnings.is_empty() {
        println!("Warnings ({}):", report.warnings.len());
        for warning in &report.warnings {
            println!("  [warn] [{}] {}", warning.field, warning.message);
        }
        println!();
    }

    if !report.errors.is_empty() {
        println!("Errors ({}):", report.errors.len());
        for err in &report.errors {
            println!("  [error] {}", err);
        }
        println!();
        anyhow::bail!("Configuration validation failed");
    }

    println!("[ok] Configuration is valid!");
    println!();
    println!("Feed: {}", config.feed.base_url);
    println!(
        "Buckets: {} minutes in {}",
        config.series.bucket_minutes, config.series.timezone
    );
    println!("Region policy: {}", config.series.region_policy);
    println!(
        "Schedule: download every {}s, refresh every {}s",
        config.schedule.download_interval_seconds, config.schedule.refresh_interval_seconds
    );

    Ok(())
}

fn init_command<P: AsRef<Path>>(output_path: P) -> Result<()> {
    let output_path = output_path.as_ref();
    info!(?output_path, "Initializing new configuration file");

    let config = generate_default_config();

    if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {:?}", parent))?;
    }

    save_config(&config, output_path)?;

    println!("[ok] Configuration file created successfully!");
    println!();
    println!("Location: {:?}", output_path);
    println!();
    println!("Next steps:");
    println!("  1. Point feed.base_url at your price publisher");
    println!("  2. Set series.timezone to the market's zone (e.g. Europe/Amsterdam)");
    println!(
        "  3. Run 'dynprice validate --config {:?}' to check configuration",
        output_path
    );
    println!(
        "  4. Run 'dynprice run --config {:?}' to start tracking",
        output_path
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pricing::PriceSeries;

    #[test]
    fn test_series_config_from_defaults() {
        let config = generate_default_config();
        let series = series_config(&config).unwrap();

        assert_eq!(series.timezone, chrono_tz::Tz::UTC);
    }

    #[test]
    fn test_series_config_rejects_unknown_zone() {
        let mut config = generate_default_config();
        config.series.timezone = "Mars/Olympus".to_string();

        assert!(series_config(&config).is_err());
    }

    #[test]
    fn test_log_format_from_config() {
        let mut config = generate_default_config();
        config.logging.format = "JSON".to_string();
        assert_eq!(log_format(&config), LogFormat::Json);

        config.logging.format = "xml".to_string();
        assert_eq!(log_format(&config), LogFormat::Pretty);
    }

    #[test]
    fn test_printed_snapshot_carries_unit() {
        let snapshot = LabelledSnapshot {
            snapshot: PriceSeries::default().snapshot(Utc::now()),
            unit: "ct/kWh",
        };

        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json["unit"], "ct/kWh");
        assert_eq!(json["current_region"], "unknown");
        assert_eq!(json["avg"], 0.0);
    }

    #[test]
    fn test_feed_settings() {
        let mut config = generate_default_config();
        config.feed.timeout_seconds = 3;
        config.feed.min_price = -50.0;

        let settings = feed_settings(&config.feed).unwrap();
        assert_eq!(settings.timeout, Duration::from_secs(3));
        assert_eq!(settings.bounds.min, -50.0);

        config.feed.base_url = "not a url".to_string();
        assert!(feed_settings(&config.feed).is_err());
    }

    #[test]
    fn test_init_writes_loadable_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("dynprice.yaml");

        init_command(&path).unwrap();

        let loaded = load_config(&path).unwrap();
        assert!(validate_config(&loaded).is_valid());
    }
}
