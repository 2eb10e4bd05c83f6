//! Common types used across dynprice
//!
//! A [`Quote`] is the unit of data exchanged between the feed and the
//! price core.

use crate::error::{Error, Result};
use chrono::{DateTime, FixedOffset, NaiveDate, TimeZone};
use serde::{Deserialize, Serialize};

/// A single timestamped price observation.
///
/// The timestamp keeps the offset it was published with. Comparisons
/// against a reference instant must first normalize it into the
/// reference timezone, see [`Quote::local_time`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    pub timestamp: DateTime<FixedOffset>,
    pub price: f64,
}

impl Quote {
    pub fn new(timestamp: DateTime<FixedOffset>, price: f64) -> Self {
        Self { timestamp, price }
    }

    /// Build a quote from an RFC 3339 timestamp such as
    /// `2024-03-15T13:00:00+01:00`.
    pub fn parse(timestamp: &str, price: f64) -> Result<Self> {
        let parsed = DateTime::parse_from_rfc3339(timestamp).map_err(|source| {
            Error::InvalidTimestamp {
                value: timestamp.to_string(),
                source,
            }
        })?;
        Ok(Self::new(parsed, price))
    }

    /// The quote timestamp expressed in `tz`.
    pub fn local_time<Tz: TimeZone>(&self, tz: &Tz) -> DateTime<Tz> {
        self.timestamp.with_timezone(tz)
    }

    /// Calendar date of the quote in `tz`.
    pub fn local_date<Tz: TimeZone>(&self, tz: &Tz) -> NaiveDate {
        self.local_time(tz).date_naive()
    }
}

/// Extract the price curve from a quote sequence, preserving order.
pub fn prices(quotes: &[Quote]) -> Vec<f64> {
    quotes.iter().map(|q| q.price).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Timelike, Utc};

    #[test]
    fn test_parse_keeps_offset() {
        let quote = Quote::parse("2024-03-15T00:30:00+01:00", 42.5).unwrap();
        assert_eq!(quote.timestamp.offset().local_minus_utc(), 3600);
        assert_eq!(quote.price, 42.5);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        let err = Quote::parse("yesterday", 1.0).unwrap_err();
        assert!(matches!(err, Error::InvalidTimestamp { .. }));
    }

    #[test]
    fn test_local_date_crosses_midnight() {
        // 00:30 in +01:00 is still the previous day in UTC
        let quote = Quote::parse("2024-03-15T00:30:00+01:00", 1.0).unwrap();
        assert_eq!(
            quote.local_date(&Utc),
            NaiveDate::from_ymd_opt(2024, 3, 14).unwrap()
        );
        assert_eq!(quote.local_time(&Utc).hour(), 23);
    }

    #[test]
    fn test_prices_preserve_order() {
        let quotes = vec![
            Quote::parse("2024-03-15T01:00:00Z", 3.0).unwrap(),
            Quote::parse("2024-03-15T00:00:00Z", 1.0).unwrap(),
        ];
        assert_eq!(prices(&quotes), vec![3.0, 1.0]);
    }

    #[test]
    fn test_quote_serde() {
        let quote = Quote::parse("2024-03-15T10:00:00+01:00", 12.0).unwrap();
        let json = serde_json::to_string(&quote).unwrap();
        let back: Quote = serde_json::from_str(&json).unwrap();
        assert_eq!(back, quote);
    }
}
