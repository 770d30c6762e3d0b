//! Durable key/value storage and the quote persistence layer on top of it.
//!
//! - `memory` — in-process `MemoryStore`, for tests and throwaway hosts.
//! - `file` — `FileStore`, one JSON file per key inside a data directory.
//! - `persistence` — `QuotePersistence`, the typed view the store uses.

pub mod file;
pub mod memory;
pub mod persistence;

use crate::Result;

/// Storage key of the serialized quote collection.
pub const QUOTES_KEY: &str = "quotes";
/// Storage key of the last quote shown to the user.
pub const LAST_VIEWED_KEY: &str = "last_viewed_quote";
/// Storage key of the last selected category filter.
pub const LAST_FILTER_KEY: &str = "last_selected_category";
/// Storage key of the last successful sync time.
pub const LAST_SYNC_KEY: &str = "last_sync_timestamp";
/// Storage key of the single-slot backup taken before a remote overwrite.
pub const BACKUP_KEY: &str = "local_quotes_backup";

/// String key/value storage backing the persistence layer.
///
/// Implementations only move strings around; encoding and tolerance of
/// malformed content are handled by `QuotePersistence`.
pub trait KeyValueStore {
    /// Returns the value stored under `key`, or `None` when absent.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Stores `value` under `key`, replacing any previous value.
    fn set(&mut self, key: &str, value: &str) -> Result<()>;

    /// Removes `key`. Removing an absent key is not an error.
    fn remove(&mut self, key: &str) -> Result<()>;
}
