//! Price window core for dynprice
//!
//! This crate turns a rolling window of quotes (yesterday, today, tomorrow)
//! into the values a consumer displays: the quote that applies right now,
//! today's min/max/average, and the spans where the price curve sits above
//! or below the daily average.
//!
//! # Core Components
//!
//! - [`intersection`] - Crossings between a price curve and a threshold line
//! - [`bucket`] - Hourly / quarter-hourly matching of "now" to a quote
//! - [`daily`] - Min/max/average over one calendar day
//! - [`series`] - Stateful orchestrator holding the derived values
//! - [`coordinator`] - Shared, lock-guarded access to a series
//!
//! # Key Invariants
//!
//! - Nothing here performs I/O or reads the system clock
//! - Ambiguous bucket matches yield no quote rather than a guess
//! - An empty day never overwrites a previously valid aggregate
//! - Crossings are only recomputed against an aggregate derived from the
//!   same quote sequence

pub mod bucket;
pub mod coordinator;
pub mod daily;
pub mod error;
pub mod intersection;
pub mod series;
pub mod types;

pub use bucket::match_quote;
pub use coordinator::SeriesCoordinator;
pub use daily::aggregate;
pub use error::PricingError;
pub use intersection::find_crossings;
pub use series::{PriceSeries, SeriesConfig};
pub use types::{
    BucketWidth, CrossingPoint, CurrentRegion, DailyAggregate, Region, RegionPolicy,
    SeriesSnapshot,
};

pub use common::Quote;

pub type Result<T> = std::result::Result<T, PricingError>;
