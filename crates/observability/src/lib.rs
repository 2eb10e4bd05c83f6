//! Logging and metrics for dynprice
//!
//! ```ignore
//! use observability::{init_logging, LogFormat, SeriesMetrics};
//!
//! init_logging("dynprice", LogFormat::Json)?;
//! observability::init_metrics(9100)?;
//!
//! let metrics = SeriesMetrics::new("€/MWh");
//! metrics.record_refresh();
//! metrics.record_current(Some(87.3));
//! ```

pub mod logging;
pub mod metrics;

pub use logging::{init_logging, LogFormat};
pub use metrics::{init_metrics, SeriesMetrics};
