//! Error types shared by the store library and its hosts.
//!
//! `QuoteError` unifies the failure cases for storage I/O, JSON handling, the
//! remote endpoint, and the store's own validation rules, so every crate in
//! the workspace can propagate a single error type.
use std::io;
use std::sync::PoisonError;

use thiserror::Error;

/// Unified error type shared by the library, the CLI, and the sync daemon.
#[derive(Error, Debug)]
pub enum QuoteError {
    /// I/O error from the file-backed storage or from import/export files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Failure while encoding/decoding JSON via serde_json.
    #[error("JSON serialization/deserialization error: {0}")]
    SerdeJson(#[from] serde_json::Error),

    /// HTTP client error outside of a fetch (client setup, mirror POST).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// A quote was rejected because its text or category is empty after trimming.
    #[error("Invalid quote: {0}")]
    InvalidQuote(String),

    /// An import document was not a JSON array of quotes.
    #[error("Invalid import: {0}")]
    InvalidImport(String),

    /// An import document parsed but contained no valid quote.
    #[error("No valid quotes found in the import")]
    NoValidQuotes,

    /// The remote collection could not be fetched or decoded.
    #[error("Fetch failed: {0}")]
    FetchFailed(String),

    /// `keep-local` was requested but no backup slot is stored.
    #[error("No local backup available")]
    NoBackup,

    /// Error indicating a poisoned mutex/lock was encountered.
    #[error("Mutex Lock Poisoned: {0}")]
    MutexLock(String),

    /// Channel send failed (e.g., the scheduler worker is gone).
    #[error("Channel send failed: {0}")]
    ChannelSend(String),
}

impl<T> From<PoisonError<T>> for QuoteError {
    fn from(err: PoisonError<T>) -> Self {
        QuoteError::MutexLock(err.to_string())
    }
}
