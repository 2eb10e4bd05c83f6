//! Common error types for dynprice

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// A timestamp could not be parsed as RFC 3339
    #[error("Invalid timestamp '{value}': {source}")]
    InvalidTimestamp {
        value: String,
        #[source]
        source: chrono::ParseError,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
