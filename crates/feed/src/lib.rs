//! Price feed for dynprice
//!
//! Fetches the published day-ahead prices for yesterday, today and
//! tomorrow and turns them into [`common::Quote`]s for the price core.
//!
//! - [`record`] - Wire format and validation of published prices
//! - [`source`] - [`QuoteSource`] trait with HTTP and file-backed sources
//! - [`window`] - Assembling the three-day quote window

pub mod error;
pub mod record;
pub mod source;
pub mod window;

pub use error::FeedError;
pub use record::{PriceBounds, QuoteRecord};
pub use source::{FeedSettings, HttpQuoteSource, QuoteSource, StaticQuoteSource};
pub use window::download_window;

pub type Result<T> = std::result::Result<T, FeedError>;
