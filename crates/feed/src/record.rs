//! Wire format of published prices
//!
//! The feed publishes one JSON array per day:
//!
//! ```json
//! [{ "dateTime": "2024-03-15T00:00:00+01:00", "price": 87.31 }, ...]
//! ```

use crate::Result;
use common::Quote;
use serde::{Deserialize, Serialize};
use tracing::warn;

pub const DEFAULT_MIN_PRICE: f64 = -999.0;
pub const DEFAULT_MAX_PRICE: f64 = 999.0;

/// One published price as it appears on the wire
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteRecord {
    #[serde(rename = "dateTime")]
    pub date_time: String,
    pub price: f64,
}

/// Accepted price range, inclusive
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceBounds {
    pub min: f64,
    pub max: f64,
}

impl PriceBounds {
    pub fn contains(&self, price: f64) -> bool {
        price.is_finite() && price >= self.min && price <= self.max
    }
}

impl Default for PriceBounds {
    fn default() -> Self {
        Self {
            min: DEFAULT_MIN_PRICE,
            max: DEFAULT_MAX_PRICE,
        }
    }
}

/// Convert wire records into quotes.
///
/// A malformed timestamp fails the whole batch. Prices outside `bounds`
/// are dropped with a warning.
pub fn into_quotes(records: Vec<QuoteRecord>, bounds: PriceBounds) -> Result<Vec<Quote>> {
    let mut quotes = Vec::with_capacity(records.len());

    for record in records {
        let quote = Quote::parse(&record.date_time, record.price)?;
        if !bounds.contains(quote.price) {
            warn!(
                date_time = %record.date_time,
                price = record.price,
                min = bounds.min,
                max = bounds.max,
                "Dropping out-of-range price"
            );
            continue;
        }
        quotes.push(quote);
    }

    Ok(quotes)
}

/// Decode a JSON array of records
pub fn parse_records(body: &str, bounds: PriceBounds) -> Result<Vec<Quote>> {
    let records: Vec<QuoteRecord> = serde_json::from_str(body)?;
    into_quotes(records, bounds)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FeedError;
    use assert_matches::assert_matches;

    #[test]
    fn test_parse_records() {
        let body = r#"[
            {"dateTime": "2024-03-15T00:00:00+01:00", "price": 87.31},
            {"dateTime": "2024-03-15T01:00:00+01:00", "price": -4.5}
        ]"#;

        let quotes = parse_records(body, PriceBounds::default()).unwrap();

        assert_eq!(quotes.len(), 2);
        assert_eq!(quotes[0].price, 87.31);
        assert_eq!(quotes[1].timestamp.to_rfc3339(), "2024-03-15T01:00:00+01:00");
    }

    #[test]
    fn test_out_of_range_prices_are_dropped() {
        let records = vec![
            QuoteRecord {
                date_time: "2024-03-15T00:00:00Z".to_string(),
                price: 1500.0,
            },
            QuoteRecord {
                date_time: "2024-03-15T01:00:00Z".to_string(),
                price: 12.0,
            },
        ];

        let quotes = into_quotes(records, PriceBounds::default()).unwrap();
        assert_eq!(quotes.len(), 1);
        assert_eq!(quotes[0].price, 12.0);
    }

    #[test]
    fn test_bad_timestamp_fails_batch() {
        let body = r#"[{"dateTime": "15-03-2024 00:00", "price": 1.0}]"#;
        assert_matches!(
            parse_records(body, PriceBounds::default()),
            Err(FeedError::InvalidQuote(_))
        );
    }

    #[test]
    fn test_malformed_json() {
        assert_matches!(
            parse_records("{\"price\": 1}", PriceBounds::default()),
            Err(FeedError::Decode(_))
        );
    }

    #[test]
    fn test_bounds() {
        let bounds = PriceBounds { min: 0.0, max: 10.0 };
        assert!(bounds.contains(0.0));
        assert!(bounds.contains(10.0));
        assert!(!bounds.contains(-0.1));
        assert!(!bounds.contains(f64::NAN));
    }
}
