//! Download and refresh loop
//!
//! Two independent tickers drive a [`SeriesCoordinator`]: the download
//! ticker replaces the quote window, the refresh ticker re-matches the
//! current bucket. A failed download leaves the series untouched.

use chrono_tz::Tz;
use common::Clock;
use feed::{download_window, QuoteSource};
use observability::SeriesMetrics;
use pricing::{SeriesCoordinator, SeriesSnapshot};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

pub struct Scheduler {
    source: Arc<dyn QuoteSource>,
    coordinator: SeriesCoordinator,
    clock: Arc<dyn Clock>,
    metrics: SeriesMetrics,
    timezone: Tz,
    download_every: Duration,
    refresh_every: Duration,
}

impl Scheduler {
    pub fn new(
        source: Arc<dyn QuoteSource>,
        coordinator: SeriesCoordinator,
        clock: Arc<dyn Clock>,
        metrics: SeriesMetrics,
        timezone: Tz,
    ) -> Self {
        Self {
            source,
            coordinator,
            clock,
            metrics,
            timezone,
            download_every: Duration::from_secs(4 * 3600),
            refresh_every: Duration::from_secs(10),
        }
    }

    pub fn with_intervals(mut self, download_every: Duration, refresh_every: Duration) -> Self {
        self.download_every = download_every;
        self.refresh_every = refresh_every;
        self
    }

    pub fn coordinator(&self) -> &SeriesCoordinator {
        &self.coordinator
    }

    /// Fetch the window around today and ingest it. Returns whether the
    /// quote window was replaced.
    #[instrument(skip(self))]
    pub async fn download_once(&self) -> bool {
        let now = self.clock.now();
        let today = now.with_timezone(&self.timezone).date_naive();

        let quotes = match download_window(self.source.as_ref(), today).await {
            Ok(quotes) => quotes,
            Err(e) => {
                self.metrics.record_download(false);
                warn!(%today, error = %e, "Download failed, keeping previous quotes");
                return false;
            }
        };

        self.metrics.record_download(true);
        match self.coordinator.ingest(quotes, now).await {
            Ok(crossings) => debug!(crossings, "Crossings recomputed"),
            Err(e) => warn!(error = %e, "Crossings kept from previous window"),
        }
        self.publish(now).await;
        true
    }

    /// Re-match the current bucket against the held window
    pub async fn refresh_once(&self) -> SeriesSnapshot {
        let now = self.coordinator.refresh_with(self.clock.as_ref()).await;
        self.metrics.record_refresh();
        self.publish(now).await
    }

    async fn publish(&self, now: chrono::DateTime<chrono::Utc>) -> SeriesSnapshot {
        let snapshot = self.coordinator.snapshot(now).await;

        self.metrics.record_current(snapshot.current_price);
        if snapshot.sample_date.is_some() {
            self.metrics
                .record_daily(snapshot.min, snapshot.max, snapshot.avg);
        }

        debug!(
            price = ?snapshot.current_price,
            region = %snapshot.current_region,
            avg = snapshot.avg,
            "Series refreshed"
        );
        snapshot
    }

    /// Tick until `shutdown` is cancelled. The first download and refresh
    /// happen immediately.
    pub async fn run(&self, shutdown: CancellationToken) {
        let mut download_tick = interval(self.download_every);
        let mut refresh_tick = interval(self.refresh_every);
        download_tick.set_missed_tick_behavior(MissedTickBehavior::Delay);
        refresh_tick.set_missed_tick_behavior(MissedTickBehavior::Skip);

        info!(
            download_every = ?self.download_every,
            refresh_every = ?self.refresh_every,
            "Scheduler started"
        );

        loop {
            tokio::select! {
                biased;
                _ = shutdown.cancelled() => break,
                _ = download_tick.tick() => {
                    self.download_once().await;
                }
                _ = refresh_tick.tick() => {
                    self.refresh_once().await;
                }
            }
        }

        info!("Scheduler stopped");
    }
}
