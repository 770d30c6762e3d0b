//!
//! Quote store library shared by the CLI and the sync daemon.
//!
//! This crate aggregates:
//! - `error` — unified error type `QuoteError` used across the workspace.
//! - `result` — handy `Result<T, QuoteError>` alias.
//! - `model` — the `Quote` record, its normalizer, and the default seed.
//! - `category` — category listing, filtering, and random selection.
//! - `storage` — key/value backends and the typed quote persistence.
//! - `remote` — the remote quote source and its HTTP implementation.
//! - `sync` — whole-collection reconciliation and the background scheduler.
//! - `store` — `QuoteStore`, the owner of the collection.
//! - `config` — shared CLI flags and sync settings.
#![warn(missing_docs)]
pub mod category;
pub mod config;
pub mod error;
pub mod model;
pub mod remote;
pub mod result;
pub mod storage;
pub mod store;
pub mod sync;

pub use category::CategoryFilter;
pub use config::{StoreArgs, SyncConfig};
pub use error::QuoteError;
pub use model::quote::Quote;
pub use remote::{HttpRemoteSource, RemoteSource};
pub use result::Result;
pub use storage::KeyValueStore;
pub use storage::file::FileStore;
pub use storage::memory::MemoryStore;
pub use store::{QuoteStore, SharedStore, Status};
pub use sync::reconcile::{SyncOutcome, SyncState};
pub use sync::scheduler::{SyncEvent, SyncScheduler};
