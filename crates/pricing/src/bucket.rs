//! Matching "now" to the quote whose time bucket contains it
//!
//! Quotes are published one per hour or one per quarter-hour. The quote
//! that applies at an instant is the one sharing its calendar date, hour
//! and (for quarter-hour buckets) quarter. Every quote is converted into
//! the timezone of the reference instant before comparing, so offsets in
//! the source data cannot shift a quote into a neighbouring hour. The
//! local offset is part of the key: the hour repeated when daylight
//! saving ends is two buckets, not one.

use crate::types::BucketWidth;
use chrono::{DateTime, NaiveDate, Offset, TimeZone, Timelike};
use common::Quote;
use tracing::warn;

/// Calendar position of an instant at a given bucket width
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BucketKey {
    pub date: NaiveDate,
    pub hour: u32,
    /// Quarter of the hour (0-3); always 0 for hourly buckets
    pub quarter: u32,
    /// Seconds east of UTC at `instant`
    pub offset: i32,
}

impl BucketKey {
    pub fn of<Tz: TimeZone>(instant: &DateTime<Tz>, width: BucketWidth) -> Self {
        let quarter = match width {
            BucketWidth::Hourly => 0,
            BucketWidth::QuarterHourly => instant.minute() / 15,
        };
        Self {
            date: instant.date_naive(),
            hour: instant.hour(),
            quarter,
            offset: instant.offset().fix().local_minus_utc(),
        }
    }
}

/// Return the single quote whose bucket contains `now`.
///
/// `None` when no quote matches, and also when several do: duplicate or
/// overlapping source data is surfaced as "no current quote" instead of
/// picking one arbitrarily. Input order does not matter.
pub fn match_quote<'a, Tz: TimeZone>(
    quotes: &'a [Quote],
    now: &DateTime<Tz>,
    width: BucketWidth,
) -> Option<&'a Quote> {
    let tz = now.timezone();
    let target = BucketKey::of(now, width);

    let mut matches = quotes
        .iter()
        .filter(|q| BucketKey::of(&q.local_time(&tz), width) == target);

    let first = matches.next()?;
    let extra = matches.count();
    if extra > 0 {
        warn!(
            date = %target.date,
            hour = target.hour,
            quarter = target.quarter,
            matches = extra + 1,
            "Ambiguous quotes for current bucket"
        );
        return None;
    }

    Some(first)
}
