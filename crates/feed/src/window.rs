//! Three-day quote window

use crate::error::FeedError;
use crate::source::QuoteSource;
use crate::Result;
use chrono::{Days, NaiveDate};
use common::Quote;
use tracing::{info, warn};

/// Fetch yesterday, today and tomorrow and concatenate them in that order.
///
/// A day that fails to download or comes back empty counts as missing.
/// Tomorrow's prices are published during the day, so a window without
/// tomorrow is still accepted as long as yesterday and today arrived. Any
/// other gap fails with [`FeedError::IncompleteWindow`] and the caller
/// keeps its previous window.
pub async fn download_window(source: &dyn QuoteSource, today: NaiveDate) -> Result<Vec<Quote>> {
    let yesterday = today - Days::new(1);
    let tomorrow = today + Days::new(1);

    let (prev, curr, next) = tokio::join!(
        source.fetch_day(yesterday),
        source.fetch_day(today),
        source.fetch_day(tomorrow),
    );

    let prev = published(yesterday, prev);
    let curr = published(today, curr);
    let next = published(tomorrow, next);

    match (prev, curr, next) {
        (Some(mut prev), Some(curr), Some(next)) => {
            prev.extend(curr);
            prev.extend(next);
            info!(%today, quotes = prev.len(), "Downloaded full window");
            Ok(prev)
        }
        (Some(mut prev), Some(curr), None) => {
            prev.extend(curr);
            info!(%today, quotes = prev.len(), "Downloaded window without tomorrow");
            Ok(prev)
        }
        (prev, curr, next) => Err(FeedError::IncompleteWindow {
            yesterday: prev.is_some(),
            today: curr.is_some(),
            tomorrow: next.is_some(),
        }),
    }
}

fn published(day: NaiveDate, result: Result<Vec<Quote>>) -> Option<Vec<Quote>> {
    match result {
        Ok(quotes) if quotes.is_empty() => {
            warn!(%day, "No prices published");
            None
        }
        Ok(quotes) => Some(quotes),
        Err(e) => {
            warn!(%day, error = %e, "Price download failed");
            None
        }
    }
}
