//! Feed error types

use chrono::NaiveDate;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FeedError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Feed returned status {status} for {day}")]
    Status { day: NaiveDate, status: u16 },

    #[error("Failed to decode price data: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Invalid quote: {0}")]
    InvalidQuote(#[from] common::Error),

    #[error("Invalid feed URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(
        "Incomplete quote window (yesterday: {yesterday}, today: {today}, tomorrow: {tomorrow})"
    )]
    IncompleteWindow {
        yesterday: bool,
        today: bool,
        tomorrow: bool,
    },
}
