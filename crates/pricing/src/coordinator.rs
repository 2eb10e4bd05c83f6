use crate::series::{PriceSeries, SeriesConfig};
use crate::types::{CurrentRegion, DailyAggregate, SeriesSnapshot};
use crate::Result;
use chrono::{DateTime, Utc};
use common::{Clock, Quote};
use std::sync::Arc;
use tokio::sync::{RwLock, RwLockReadGuard};
use tracing::info;

/// Shared handle to a [`PriceSeries`].
///
/// Writers hold the lock across the whole assign/refresh/recompute
/// sequence so readers never observe crossings from one quote window
/// next to an aggregate from another.
#[derive(Debug, Clone)]
pub struct SeriesCoordinator {
    series: Arc<RwLock<PriceSeries>>,
}

impl SeriesCoordinator {
    pub fn new(config: SeriesConfig) -> Self {
        Self::from_series(PriceSeries::new(config))
    }

    pub fn from_series(series: PriceSeries) -> Self {
        Self {
            series: Arc::new(RwLock::new(series)),
        }
    }

    /// Replace the quote window and recompute everything derived from it.
    ///
    /// Returns the number of crossings. When the new window has no quotes
    /// for today the crossing step fails and the previous crossings stay
    /// in place; the quotes and the refresh are kept either way.
    pub async fn ingest(&self, quotes: Vec<Quote>, now: DateTime<Utc>) -> Result<usize> {
        let mut series = self.series.write().await;
        let count = quotes.len();

        series.assign_quotes(quotes);
        series.refresh(now);
        series.set_last_download(now);
        let crossings = series.recompute_crossings(now)?;

        info!(quotes = count, crossings, "Quote window ingested");
        Ok(crossings)
    }

    pub async fn refresh(&self, now: DateTime<Utc>) {
        self.series.write().await.refresh(now);
    }

    pub async fn refresh_with(&self, clock: &dyn Clock) -> DateTime<Utc> {
        let now = clock.now();
        self.refresh(now).await;
        now
    }

    pub async fn current_region(&self, now: DateTime<Utc>) -> CurrentRegion {
        self.series.read().await.current_region(now)
    }

    pub async fn current_price(&self) -> Option<f64> {
        self.series.read().await.current_quote().map(|q| q.price)
    }

    pub async fn aggregate(&self) -> Option<DailyAggregate> {
        self.series.read().await.aggregate().copied()
    }

    pub async fn last_refresh(&self) -> Option<DateTime<Utc>> {
        self.series.read().await.last_refresh()
    }

    pub async fn snapshot(&self, now: DateTime<Utc>) -> SeriesSnapshot {
        self.series.read().await.snapshot(now)
    }

    /// Direct read access for presenters needing more than one value
    pub async fn read(&self) -> RwLockReadGuard<'_, PriceSeries> {
        self.series.read().await
    }
}

impl Default for SeriesCoordinator {
    fn default() -> Self {
        Self::new(SeriesConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PricingError;
    use assert_matches::assert_matches;
    use chrono::TimeZone;
    use common::FixedClock;

    fn day(date: &str, prices: &[f64]) -> Vec<Quote> {
        prices
            .iter()
            .enumerate()
            .map(|(h, p)| Quote::parse(&format!("{date}T{h:02}:00:00Z"), *p).unwrap())
            .collect()
    }

    fn at(h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 15, h, 0, 0).unwrap()
    }

    #[tokio::test]
    async fn test_ingest_recomputes_everything() {
        let coordinator = SeriesCoordinator::default();

        let crossings = coordinator
            .ingest(day("2024-03-15", &[10.0, 20.0, 30.0, 10.0]), at(2))
            .await
            .unwrap();

        assert_eq!(crossings, 2);
        assert_eq!(coordinator.current_price().await, Some(30.0));
        assert!((coordinator.aggregate().await.unwrap().avg - 17.5).abs() < 1e-9);
        assert_eq!(coordinator.current_region(at(2)).await, CurrentRegion::Above);

        let snapshot = coordinator.snapshot(at(2)).await;
        assert_eq!(snapshot.last_download, Some(at(2)));
        assert_eq!(snapshot.last_refresh, Some(at(2)));
    }

    #[tokio::test]
    async fn test_ingest_without_today_keeps_crossings() {
        let coordinator = SeriesCoordinator::default();
        coordinator
            .ingest(day("2024-03-15", &[10.0, 20.0, 30.0, 10.0]), at(2))
            .await
            .unwrap();

        let result = coordinator.ingest(day("2024-03-18", &[1.0, 2.0]), at(3)).await;

        assert_matches!(result, Err(PricingError::StaleAggregate { .. }));
        let series = coordinator.read().await;
        assert_eq!(series.crossings().len(), 2);
        assert!(!series.crossings_are_current());
        assert_eq!(series.quotes().len(), 2);
    }

    #[tokio::test]
    async fn test_refresh_with_clock() {
        let coordinator = SeriesCoordinator::default();
        coordinator
            .ingest(day("2024-03-15", &[1.0, 2.0, 3.0]), at(0))
            .await
            .unwrap();

        let clock = FixedClock::new(at(1));
        let now = coordinator.refresh_with(&clock).await;
        assert_eq!(now, at(1));
        assert_eq!(coordinator.current_price().await, Some(2.0));

        clock.set(at(2));
        coordinator.refresh_with(&clock).await;
        assert_eq!(coordinator.current_price().await, Some(3.0));
        assert_eq!(coordinator.last_refresh().await, Some(at(2)));
    }

    #[tokio::test]
    async fn test_concurrent_readers() {
        let coordinator = SeriesCoordinator::default();
        coordinator
            .ingest(day("2024-03-15", &[5.0, 15.0]), at(1))
            .await
            .unwrap();

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let c = coordinator.clone();
                tokio::spawn(async move { c.current_price().await })
            })
            .collect();

        for handle in handles {
            assert_eq!(handle.await.unwrap(), Some(15.0));
        }
    }
}
