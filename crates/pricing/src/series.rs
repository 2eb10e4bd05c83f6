//! Stateful price series
//!
//! [`PriceSeries`] owns the quote window handed over by the feed together
//! with everything derived from it. It never fetches or schedules anything
//! itself: the owner assigns quotes, then calls [`PriceSeries::refresh`]
//! and, after a fresh download, [`PriceSeries::recompute_crossings`].

use crate::bucket::match_quote;
use crate::daily::aggregate;
use crate::error::PricingError;
use crate::intersection::find_crossings;
use crate::types::{
    BucketWidth, CrossingPoint, CurrentRegion, DailyAggregate, RegionPolicy, SeriesSnapshot,
};
use crate::Result;
use chrono::{DateTime, Timelike, Utc};
use chrono_tz::Tz;
use common::Quote;
use tracing::{debug, instrument, warn};

/// Deployment-level settings of a series
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesConfig {
    pub bucket_width: BucketWidth,
    /// Zone in which dates and hours are evaluated
    pub timezone: Tz,
    pub region_policy: RegionPolicy,
}

impl SeriesConfig {
    /// Build from raw configuration values
    pub fn from_parts(
        bucket_minutes: u32,
        timezone: &str,
        region_policy: &str,
    ) -> Result<Self> {
        let timezone: Tz = timezone
            .parse()
            .map_err(|_| PricingError::UnknownTimezone(timezone.to_string()))?;

        Ok(Self {
            bucket_width: BucketWidth::try_from(bucket_minutes)?,
            timezone,
            region_policy: region_policy.parse()?,
        })
    }
}

impl Default for SeriesConfig {
    fn default() -> Self {
        Self {
            bucket_width: BucketWidth::Hourly,
            timezone: Tz::UTC,
            region_policy: RegionPolicy::Crossings,
        }
    }
}

#[derive(Debug, Clone)]
pub struct PriceSeries {
    config: SeriesConfig,
    quotes: Vec<Quote>,
    /// Bumped on every quote assignment
    quotes_generation: u64,
    current_quote: Option<Quote>,
    aggregate: Option<DailyAggregate>,
    aggregate_generation: u64,
    crossings: Vec<CrossingPoint>,
    crossings_generation: u64,
    last_refresh: Option<DateTime<Utc>>,
    last_download: Option<DateTime<Utc>>,
}

impl PriceSeries {
    pub fn new(config: SeriesConfig) -> Self {
        Self {
            config,
            quotes: Vec::new(),
            quotes_generation: 0,
            current_quote: None,
            aggregate: None,
            aggregate_generation: 0,
            crossings: Vec::new(),
            crossings_generation: 0,
            last_refresh: None,
            last_download: None,
        }
    }

    /// Replace the held quotes wholesale. Nothing is recomputed.
    pub fn assign_quotes(&mut self, quotes: Vec<Quote>) {
        self.quotes = quotes;
        self.quotes_generation += 1;
        debug!(
            count = self.quotes.len(),
            generation = self.quotes_generation,
            "Quotes assigned"
        );
    }

    /// Recompute the current quote and today's aggregate for `now`.
    ///
    /// The current quote is cleared when no single quote matches. An empty
    /// day leaves the previous aggregate in place.
    #[instrument(skip(self), fields(generation = self.quotes_generation))]
    pub fn refresh(&mut self, now: DateTime<Utc>) {
        let local_now = now.with_timezone(&self.config.timezone);

        self.current_quote = match_quote(&self.quotes, &local_now, self.config.bucket_width).copied();

        match aggregate(&self.quotes, local_now.date_naive(), &self.config.timezone) {
            Some(agg) => {
                self.aggregate = Some(agg);
                self.aggregate_generation = self.quotes_generation;
            }
            None => {
                debug!(date = %local_now.date_naive(), "No quotes for today, keeping previous aggregate");
            }
        }

        self.last_refresh = Some(now);

        debug!(
            current_price = ?self.current_quote.map(|q| q.price),
            avg = ?self.aggregate.map(|a| a.avg),
            "Series refreshed"
        );
    }

    /// Recompute crossings of the held curve against today's average.
    ///
    /// Fails without touching the stored crossings when there is no
    /// aggregate, or when the aggregate was computed from an earlier quote
    /// sequence (call [`PriceSeries::refresh`] after assigning quotes).
    #[instrument(skip(self), fields(generation = self.quotes_generation))]
    pub fn recompute_crossings(&mut self, now: DateTime<Utc>) -> Result<usize> {
        let agg = self.aggregate.ok_or(PricingError::NoAggregate)?;

        if self.aggregate_generation != self.quotes_generation {
            warn!(
                aggregate_generation = self.aggregate_generation,
                "Refusing to compute crossings against a stale aggregate"
            );
            return Err(PricingError::StaleAggregate {
                quotes_generation: self.quotes_generation,
                aggregate_generation: self.aggregate_generation,
            });
        }

        self.crossings = find_crossings(&self.prices(), agg.avg);
        self.crossings_generation = self.quotes_generation;

        debug!(
            threshold = agg.avg,
            crossings = self.crossings.len(),
            "Crossings recomputed"
        );
        Ok(self.crossings.len())
    }

    /// Region of the curve at `now` according to the configured policy.
    pub fn current_region(&self, now: DateTime<Utc>) -> CurrentRegion {
        match self.config.region_policy {
            RegionPolicy::Crossings => {
                let hour = now.with_timezone(&self.config.timezone).hour();
                region_at_hour(&self.crossings, hour)
            }
            RegionPolicy::Threshold => match (self.current_quote, self.aggregate) {
                (Some(quote), Some(agg)) if quote.price < agg.avg => CurrentRegion::Below,
                (Some(_), Some(_)) => CurrentRegion::Above,
                _ => CurrentRegion::Unknown,
            },
        }
    }

    pub fn snapshot(&self, now: DateTime<Utc>) -> SeriesSnapshot {
        let (min, max, avg) = self
            .aggregate
            .map(|a| (a.min, a.max, a.avg))
            .unwrap_or((0.0, 0.0, 0.0));

        SeriesSnapshot {
            current_price: self.current_quote.map(|q| q.price),
            min,
            max,
            avg,
            sample_date: self.aggregate.map(|a| a.sample_date),
            current_region: self.current_region(now),
            crossings: self.crossings.len(),
            last_refresh: self.last_refresh,
            last_download: self.last_download,
        }
    }

    /// The held price curve, in held order
    pub fn prices(&self) -> Vec<f64> {
        common::types::prices(&self.quotes)
    }

    pub fn quotes(&self) -> &[Quote] {
        &self.quotes
    }

    pub fn current_quote(&self) -> Option<&Quote> {
        self.current_quote.as_ref()
    }

    pub fn aggregate(&self) -> Option<&DailyAggregate> {
        self.aggregate.as_ref()
    }

    pub fn crossings(&self) -> &[CrossingPoint] {
        &self.crossings
    }

    /// Whether the stored crossings were computed from the held quotes
    pub fn crossings_are_current(&self) -> bool {
        self.crossings_generation == self.quotes_generation
    }

    pub fn quotes_generation(&self) -> u64 {
        self.quotes_generation
    }

    pub fn last_refresh(&self) -> Option<DateTime<Utc>> {
        self.last_refresh
    }

    pub fn last_download(&self) -> Option<DateTime<Utc>> {
        self.last_download
    }

    pub fn set_last_download(&mut self, at: DateTime<Utc>) {
        self.last_download = Some(at);
    }

    pub fn config(&self) -> &SeriesConfig {
        &self.config
    }
}

impl Default for PriceSeries {
    fn default() -> Self {
        Self::new(SeriesConfig::default())
    }
}

/// Region of the most recent crossing whose segment index is at most `hour`.
///
/// Among equal positions the one listed last wins.
pub fn region_at_hour(crossings: &[CrossingPoint], hour: u32) -> CurrentRegion {
    let mut latest: Option<&CrossingPoint> = None;

    for crossing in crossings.iter().filter(|c| c.segment() <= hour as usize) {
        match latest {
            Some(best) if crossing.position < best.position => {}
            _ => latest = Some(crossing),
        }
    }

    latest
        .map(|c| CurrentRegion::from(c.region))
        .unwrap_or(CurrentRegion::Unknown)
}
