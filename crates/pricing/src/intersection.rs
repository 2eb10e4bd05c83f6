//! Crossings between a price curve and a horizontal threshold line
//!
//! The curve is treated as piecewise linear between consecutive points.
//! A segment crosses the threshold when its endpoints lie on opposite
//! sides or when either endpoint touches it.

use crate::types::{CrossingPoint, Region};

/// Find every point where `curve` meets `threshold`.
///
/// One entry is produced per qualifying segment, in ascending position
/// order. Touches at a shared endpoint are reported by both adjacent
/// segments, so equal positions may appear twice with different regions.
///
/// A flat segment lying exactly on the threshold has no unique crossing;
/// it is reported at its start (fraction `0.0`).
pub fn find_crossings(curve: &[f64], threshold: f64) -> Vec<CrossingPoint> {
    curve
        .windows(2)
        .enumerate()
        .filter_map(|(i, pair)| segment_crossing(i, pair[0], pair[1], threshold))
        .collect()
}

fn segment_crossing(index: usize, start: f64, end: f64, threshold: f64) -> Option<CrossingPoint> {
    if (start - threshold) * (end - threshold) > 0.0 {
        return None;
    }
    // NaN endpoints slip past the sign test
    if start.is_nan() || end.is_nan() {
        return None;
    }

    let fraction = if end == start {
        0.0
    } else {
        (threshold - start) / (end - start)
    };

    let region = if start < threshold {
        Region::Below
    } else {
        Region::Above
    };

    Some(CrossingPoint::new(index as f64 + fraction, region))
}
