//! Price core error types

use thiserror::Error;

/// Errors raised by the price core.
///
/// Absent data (no current quote, empty day, degenerate curve) is not an
/// error and is reported through `Option` or empty collections instead.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PricingError {
    /// Crossings requested before any daily aggregate exists
    #[error("No daily aggregate available to use as threshold")]
    NoAggregate,

    /// The aggregate was derived from a different quote sequence
    #[error(
        "Daily aggregate is from quote generation {aggregate_generation}, \
         current quotes are generation {quotes_generation}"
    )]
    StaleAggregate {
        quotes_generation: u64,
        aggregate_generation: u64,
    },

    /// Unsupported bucket width
    #[error("Invalid bucket width: {0} minutes (expected 60 or 15)")]
    InvalidBucketWidth(u32),

    /// Unknown IANA timezone name
    #[error("Unknown timezone: {0}")]
    UnknownTimezone(String),

    /// Unknown region policy name
    #[error("Unknown region policy: {0} (expected crossings or threshold)")]
    UnknownRegionPolicy(String),
}
