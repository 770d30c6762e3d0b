//! Remote quote source.
//!
//! The remote is a placeholder REST API of posts with no notion of quote
//! categories: each post's `title` (or `body`) becomes the quote text and the
//! configured constant category is stamped on every item.

use log::{debug, info};
use reqwest::blocking::Client;
use serde::Deserialize;
use serde_json::json;

use crate::Result;
use crate::config::SyncConfig;
use crate::error::QuoteError;
use crate::model::quote::{Quote, normalize};

/// Text used when a remote item carries neither a title nor a body.
pub const FALLBACK_TEXT: &str = "Server quote";

/// Source of the remote quote collection.
pub trait RemoteSource: Send + Sync {
    /// Fetches the remote collection, already normalized and filtered.
    ///
    /// Any failure is reported as `QuoteError::FetchFailed`, never as an
    /// empty collection.
    fn fetch_remote_quotes(&self) -> Result<Vec<Quote>>;

    /// Mirrors a locally added quote to the remote. Best effort.
    fn post_quote(&self, quote: &Quote) -> Result<()>;
}

/// One element of the remote payload.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RemotePost {
    /// Post title, preferred as quote text.
    #[serde(default)]
    pub title: Option<String>,
    /// Post body, used when the title is missing or empty.
    #[serde(default)]
    pub body: Option<String>,
}

impl RemotePost {
    /// Maps the post onto a quote of `category`. The result may be invalid.
    pub fn into_quote(self, category: &str) -> Quote {
        let text = [self.title, self.body]
            .into_iter()
            .flatten()
            .find(|s| !s.is_empty())
            .unwrap_or_else(|| FALLBACK_TEXT.to_string());
        normalize(&json!({ "text": text, "category": category }))
    }
}

/// Maps a decoded payload onto valid quotes, preserving order.
pub fn posts_to_quotes(posts: Vec<RemotePost>, category: &str) -> Vec<Quote> {
    posts
        .into_iter()
        .map(|post| post.into_quote(category))
        .filter(Quote::is_valid)
        .collect()
}

/// HTTP implementation of [`RemoteSource`] backed by a blocking `reqwest` client.
pub struct HttpRemoteSource {
    client: Client,
    config: SyncConfig,
}

impl HttpRemoteSource {
    /// Builds the HTTP client with the configured timeout.
    pub fn new(config: SyncConfig) -> Result<Self> {
        let client = Client::builder().timeout(config.timeout).build()?;
        info!(
            "Remote source configured: endpoint={}, limit={}, category={}",
            config.endpoint, config.fetch_limit, config.remote_category
        );
        Ok(Self { client, config })
    }
}

impl RemoteSource for HttpRemoteSource {
    fn fetch_remote_quotes(&self) -> Result<Vec<Quote>> {
        let fetch_failed = |e: reqwest::Error| QuoteError::FetchFailed(e.to_string());

        let posts: Vec<RemotePost> = self
            .client
            .get(&self.config.endpoint)
            .query(&[("_limit", self.config.fetch_limit)])
            .send()
            .and_then(|response| response.error_for_status())
            .map_err(fetch_failed)?
            .json()
            .map_err(fetch_failed)?;

        let quotes = posts_to_quotes(posts, &self.config.remote_category);
        debug!("Fetched {} remote quotes", quotes.len());
        Ok(quotes)
    }

    /// Only transport errors fail the mirror. The reply status is logged and
    /// otherwise ignored.
    fn post_quote(&self, quote: &Quote) -> Result<()> {
        let response = self.client.post(&self.config.endpoint).json(quote).send()?;
        debug!(
            "Mirrored quote to {} ({})",
            self.config.endpoint,
            response.status()
        );
        Ok(())
    }
}
