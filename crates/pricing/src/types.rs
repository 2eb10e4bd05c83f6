//! Shared types for the price core

use crate::error::PricingError;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Width of the time bucket a quote covers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum BucketWidth {
    #[default]
    Hourly,
    QuarterHourly,
}

impl BucketWidth {
    pub fn as_minutes(&self) -> u32 {
        match self {
            BucketWidth::Hourly => 60,
            BucketWidth::QuarterHourly => 15,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BucketWidth::Hourly => "1h",
            BucketWidth::QuarterHourly => "15m",
        }
    }
}

impl TryFrom<u32> for BucketWidth {
    type Error = PricingError;

    fn try_from(minutes: u32) -> Result<Self, Self::Error> {
        match minutes {
            60 => Ok(BucketWidth::Hourly),
            15 => Ok(BucketWidth::QuarterHourly),
            other => Err(PricingError::InvalidBucketWidth(other)),
        }
    }
}

/// Side of the threshold a curve segment starts on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Region {
    Above,
    Below,
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Region::Above => write!(f, "above"),
            Region::Below => write!(f, "below"),
        }
    }
}

/// Region reported for "now"; `Unknown` when no crossing qualifies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CurrentRegion {
    Above,
    Below,
    #[default]
    Unknown,
}

impl From<Region> for CurrentRegion {
    fn from(region: Region) -> Self {
        match region {
            Region::Above => CurrentRegion::Above,
            Region::Below => CurrentRegion::Below,
        }
    }
}

impl fmt::Display for CurrentRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CurrentRegion::Above => write!(f, "above"),
            CurrentRegion::Below => write!(f, "below"),
            CurrentRegion::Unknown => write!(f, "unknown"),
        }
    }
}

/// How the current region is derived
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RegionPolicy {
    /// Last crossing at or before the current hour
    #[default]
    Crossings,
    /// Current quote price compared directly against the daily average
    Threshold,
}

impl FromStr for RegionPolicy {
    type Err = PricingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "crossings" => Ok(RegionPolicy::Crossings),
            "threshold" => Ok(RegionPolicy::Threshold),
            _ => Err(PricingError::UnknownRegionPolicy(s.to_string())),
        }
    }
}

/// A point where the curve meets the threshold.
///
/// `position` is a fractional index: the integer part is the segment,
/// the fractional part the interpolated offset inside it. `region` is the
/// side the curve was on at the start of the segment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CrossingPoint {
    pub position: f64,
    pub region: Region,
}

impl CrossingPoint {
    pub fn new(position: f64, region: Region) -> Self {
        Self { position, region }
    }

    /// Index of the segment the crossing lies on
    pub fn segment(&self) -> usize {
        self.position.floor() as usize
    }

    /// Interpolated offset inside the segment, in `[0, 1]`
    pub fn fraction(&self) -> f64 {
        self.position - self.position.floor()
    }
}

/// Daily summary statistics
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DailyAggregate {
    pub min: f64,
    pub max: f64,
    /// Unweighted arithmetic mean
    pub avg: f64,
    pub sample_date: NaiveDate,
    pub samples: usize,
}

/// Read-only view of a series for presentation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesSnapshot {
    pub current_price: Option<f64>,
    pub min: f64,
    pub max: f64,
    pub avg: f64,
    pub sample_date: Option<NaiveDate>,
    pub current_region: CurrentRegion,
    pub crossings: usize,
    pub last_refresh: Option<DateTime<Utc>>,
    pub last_download: Option<DateTime<Utc>>,
}
