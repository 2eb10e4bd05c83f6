//! Quote sources

use crate::error::FeedError;
use crate::record::{parse_records, PriceBounds};
use crate::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use common::{Clock, Quote};
use reqwest::Client;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, instrument};
use url::Url;

/// Source of the published prices of one calendar day
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait QuoteSource: Send + Sync {
    async fn fetch_day(&self, day: NaiveDate) -> Result<Vec<Quote>>;
}

/// Settings of the HTTP feed
#[derive(Debug, Clone)]
pub struct FeedSettings {
    pub base_url: Url,
    pub timeout: Duration,
    pub bounds: PriceBounds,
}

/// Fetches `{base_url}/{YYYY-MM-DD}?crt={unix_ts}`.
///
/// The `crt` parameter carries the current timestamp so intermediate
/// caches never serve yesterday's answer for a day that has since been
/// published.
pub struct HttpQuoteSource {
    client: Client,
    settings: FeedSettings,
    clock: Arc<dyn Clock>,
}

impl HttpQuoteSource {
    pub fn new(settings: FeedSettings, clock: Arc<dyn Clock>) -> Result<Self> {
        let client = Client::builder().timeout(settings.timeout).build()?;
        Ok(Self {
            client,
            settings,
            clock,
        })
    }

    pub fn day_url(&self, day: NaiveDate) -> Result<Url> {
        day_url(&self.settings.base_url, day, self.clock.now().timestamp())
    }
}

/// Build the request URL for `day`
pub fn day_url(base: &Url, day: NaiveDate, crt: i64) -> Result<Url> {
    let base = base.as_str().trim_end_matches('/');
    let mut url = Url::parse(&format!("{}/{}", base, day.format("%Y-%m-%d")))?;
    url.query_pairs_mut().append_pair("crt", &crt.to_string());
    Ok(url)
}

#[async_trait]
impl QuoteSource for HttpQuoteSource {
    #[instrument(skip(self))]
    async fn fetch_day(&self, day: NaiveDate) -> Result<Vec<Quote>> {
        let url = self.day_url(day)?;
        debug!(%url, "Fetching prices");

        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FeedError::Status {
                day,
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        let quotes = parse_records(&body, self.settings.bounds)?;
        debug!(count = quotes.len(), "Prices fetched");
        Ok(quotes)
    }
}

/// Serves quotes loaded up front, e.g. from a JSON file
#[derive(Debug, Clone, Default)]
pub struct StaticQuoteSource {
    quotes: Vec<Quote>,
}

impl StaticQuoteSource {
    pub fn new(quotes: Vec<Quote>) -> Self {
        Self { quotes }
    }

    /// Load a JSON array of records from `path`
    pub fn from_file<P: AsRef<Path>>(path: P, bounds: PriceBounds) -> Result<Self> {
        let path = path.as_ref();
        let body = std::fs::read_to_string(path).map_err(|source| FeedError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::new(parse_records(&body, bounds)?))
    }

    pub fn quotes(&self) -> &[Quote] {
        &self.quotes
    }
}

#[async_trait]
impl QuoteSource for StaticQuoteSource {
    async fn fetch_day(&self, day: NaiveDate) -> Result<Vec<Quote>> {
        // the publisher's own offset decides which day a quote belongs to
        Ok(self
            .quotes
            .iter()
            .filter(|q| q.timestamp.date_naive() == day)
            .copied()
            .collect())
    }
}
