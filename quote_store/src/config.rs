//! Shared configuration: defaults, CLI flags, and the sync settings built
//! from them.
//!
//! Both binaries flatten [`StoreArgs`] into their own `clap` parser, so the
//! data directory and remote settings are spelled the same everywhere.

use std::path::PathBuf;
use std::time::Duration;

use clap::Args;

/// Default remote endpoint (a placeholder REST API of posts).
pub const DEFAULT_ENDPOINT: &str = "https://jsonplaceholder.typicode.com/posts";
/// Default number of remote items requested per fetch.
pub const DEFAULT_FETCH_LIMIT: u32 = 5;
/// Category assigned to every fetched remote quote.
pub const DEFAULT_REMOTE_CATEGORY: &str = "Server";
/// Default HTTP request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
/// Default period between scheduled sync passes in seconds.
pub const DEFAULT_SYNC_INTERVAL_SECS: u64 = 30;
/// Default data directory for the file store.
pub const DEFAULT_DATA_DIR: &str = "quote_data";

/// Command-line flags shared by the CLI and the sync daemon.
#[derive(Debug, Clone, Args)]
pub struct StoreArgs {
    /// Directory holding the persisted quotes and sync metadata.
    #[arg(long, default_value = DEFAULT_DATA_DIR)]
    pub data_dir: PathBuf,

    /// Remote endpoint used for fetching and mirroring quotes.
    #[arg(long, default_value = DEFAULT_ENDPOINT)]
    pub endpoint: String,

    /// Number of remote items requested per fetch (`_limit` query parameter).
    #[arg(long, default_value_t = DEFAULT_FETCH_LIMIT)]
    pub fetch_limit: u32,

    /// Category assigned to every fetched remote quote.
    #[arg(long, default_value = DEFAULT_REMOTE_CATEGORY)]
    pub remote_category: String,

    /// HTTP request timeout in seconds.
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout_secs: u64,

    /// Seconds between scheduled sync passes.
    #[arg(long, default_value_t = DEFAULT_SYNC_INTERVAL_SECS)]
    pub sync_interval_secs: u64,
}

/// Remote and scheduling settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncConfig {
    /// Remote endpoint URL.
    pub endpoint: String,
    /// `_limit` query parameter of the fetch.
    pub fetch_limit: u32,
    /// Category stamped on fetched quotes.
    pub remote_category: String,
    /// HTTP request timeout.
    pub timeout: Duration,
    /// Period between scheduled sync passes.
    pub interval: Duration,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            fetch_limit: DEFAULT_FETCH_LIMIT,
            remote_category: DEFAULT_REMOTE_CATEGORY.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            interval: Duration::from_secs(DEFAULT_SYNC_INTERVAL_SECS),
        }
    }
}

impl From<&StoreArgs> for SyncConfig {
    fn from(args: &StoreArgs) -> Self {
        Self {
            endpoint: args.endpoint.trim().to_string(),
            fetch_limit: args.fetch_limit,
            remote_category: args.remote_category.trim().to_string(),
            timeout: Duration::from_secs(args.timeout_secs),
            // A zero period would make the ticker spin.
            interval: Duration::from_secs(args.sync_interval_secs.max(1)),
        }
    }
}
