//! Daily min/max/average over the quotes of one calendar day

use crate::types::DailyAggregate;
use chrono::{NaiveDate, TimeZone};
use common::Quote;

/// Aggregate the quotes whose date in `tz` is `today`.
///
/// Returns `None` when the day has no quotes; callers keep their previous
/// aggregate in that case. The average is the plain mean of the prices,
/// not weighted by time.
pub fn aggregate<Tz: TimeZone>(quotes: &[Quote], today: NaiveDate, tz: &Tz) -> Option<DailyAggregate> {
    let prices: Vec<f64> = quotes
        .iter()
        .filter(|q| q.local_date(tz) == today)
        .map(|q| q.price)
        .collect();

    if prices.is_empty() {
        return None;
    }

    let min = prices.iter().copied().fold(f64::INFINITY, f64::min);
    let max = prices.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let avg = prices.iter().sum::<f64>() / prices.len() as f64;

    Some(DailyAggregate {
        min,
        max,
        avg,
        sample_date: today,
        samples: prices.len(),
    })
}
