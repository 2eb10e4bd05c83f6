//! Prometheus metrics for the price series

use metrics::{counter, gauge, Counter, Gauge};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;

/// Start the exporter; metrics are served at `/metrics` on `port`
pub fn init_metrics(port: u16) -> anyhow::Result<()> {
    let addr: SocketAddr = format!("0.0.0.0:{}", port).parse()?;

    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()?;

    tracing::info!(%addr, "Metrics server listening");
    Ok(())
}

/// Metric handles of one price series.
///
/// # Metrics
///
/// * `price_refresh_total` - refresh ticks
/// * `price_download_total` - window downloads attempted
/// * `price_download_failures_total` - downloads that left the window unchanged
/// * `price_current` - price of the bucket containing now
/// * `price_daily_min`, `price_daily_max`, `price_daily_avg` - today's summary
///
/// Every metric carries a `unit` label.
#[derive(Clone)]
pub struct SeriesMetrics {
    refresh_total: Counter,
    download_total: Counter,
    download_failures: Counter,
    current_price: Gauge,
    daily_min: Gauge,
    daily_max: Gauge,
    daily_avg: Gauge,
    unit: String,
}

impl SeriesMetrics {
    pub fn new(unit: &str) -> Self {
        let unit = unit.to_string();

        Self {
            refresh_total: counter!("price_refresh_total", "unit" => unit.clone()),
            download_total: counter!("price_download_total", "unit" => unit.clone()),
            download_failures: counter!("price_download_failures_total", "unit" => unit.clone()),
            current_price: gauge!("price_current", "unit" => unit.clone()),
            daily_min: gauge!("price_daily_min", "unit" => unit.clone()),
            daily_max: gauge!("price_daily_max", "unit" => unit.clone()),
            daily_avg: gauge!("price_daily_avg", "unit" => unit.clone()),
            unit,
        }
    }

    /// Count a refresh tick
    pub fn record_refresh(&self) {
        self.refresh_total.increment(1);
    }

    /// Left alone when no quote covers now
    pub fn record_current(&self, price: Option<f64>) {
        if let Some(price) = price {
            self.current_price.set(price);
        }
    }

    pub fn record_download(&self, succeeded: bool) {
        self.download_total.increment(1);
        if !succeeded {
            self.download_failures.increment(1);
        }
    }

    pub fn record_daily(&self, min: f64, max: f64, avg: f64) {
        self.daily_min.set(min);
        self.daily_max.set(max);
        self.daily_avg.set(avg);
    }

    pub fn unit(&self) -> &str {
        &self.unit
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_series_metrics_without_recorder() {
        // no recorder installed: handles are no-ops
        let metrics = SeriesMetrics::new("€/MWh");
        metrics.record_refresh();
        metrics.record_current(None);
        metrics.record_download(false);
        metrics.record_daily(1.0, 3.0, 2.0);
        assert_eq!(metrics.unit(), "€/MWh");
    }

    #[test]
    fn test_series_metrics_rendered() {
        let recorder = PrometheusBuilder::new().build_recorder();
        let handle = recorder.handle();
        let metrics = ::metrics::with_local_recorder(&recorder, || SeriesMetrics::new("eur_mwh"));

        metrics.record_refresh();
        metrics.record_refresh();
        metrics.record_current(Some(42.5));
        metrics.record_current(None);
        metrics.record_download(true);
        metrics.record_download(false);

        let rendered = handle.render();
        assert!(rendered.contains("price_refresh_total{unit=\"eur_mwh\"} 2"));
        assert!(rendered.contains("price_download_total{unit=\"eur_mwh\"} 2"));
        assert!(rendered.contains("price_download_failures_total{unit=\"eur_mwh\"} 1"));
        assert!(rendered.contains("price_current{unit=\"eur_mwh\"} 42.5"));
    }
}
