//! The quote store: the single owner of the collection for a process.
//!
//! `QuoteStore` ties the persistence layer, the remote source, and the
//! reconciler together and exposes every user-facing operation as an
//! explicit method. Hosts own one store per process, or share it as a
//! [`SharedStore`] when a background [`SyncScheduler`] is running.
//!
//! # Invariants
//! - Every quote in the collection is valid.
//! - A mutation is written to storage before it becomes visible in memory,
//!   so a failed write leaves both sides on the previous collection.
//!
//! [`SyncScheduler`]: crate::sync::scheduler::SyncScheduler

use std::fmt;
use std::fs;
use std::path::Path;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Local, Utc};
use log::{info, warn};
use rand::Rng;
use serde_json::Value;

use crate::Result;
use crate::category::{self, CategoryFilter};
use crate::error::QuoteError;
use crate::model::quote::{Quote, normalize_all};
use crate::remote::RemoteSource;
use crate::storage::KeyValueStore;
use crate::storage::persistence::QuotePersistence;
use crate::sync::reconcile::{Decision, Reconciler, SyncOutcome, SyncState};

/// Store shared between a host and the sync worker.
pub type SharedStore<S> = Arc<Mutex<QuoteStore<S>>>;

/// Status shown while a sync pass runs.
pub const STATUS_SYNCING: &str = "Syncing with server...";
/// Status after a manual pass found nothing to change.
pub const STATUS_ALREADY_UP_TO_DATE: &str = "Already up to date.";
/// Status after a scheduled pass found nothing to change.
pub const STATUS_SYNCED: &str = "Synced.";
/// Status after remote data replaced the local collection.
pub const STATUS_CONFLICT_APPLIED: &str = "Server data applied. Conflicts resolved.";
/// Status after a failed fetch.
pub const STATUS_SYNC_FAILED: &str = "Sync failed. Check your connection.";
/// Status after a failed mirror POST.
pub const STATUS_OFFLINE: &str = "Offline: will sync when available.";
/// Status when keep-local finds no backup.
pub const STATUS_NO_BACKUP: &str = "No local backup available.";
/// Status after keep-local restored the backup.
pub const STATUS_RESTORED_LOCAL: &str = "Restored local data.";
/// Status after use-server confirmed the remote data.
pub const STATUS_SERVER_KEPT: &str = "Server data kept.";

/// Last user-visible status message.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Status {
    /// Message text.
    pub message: String,
    /// True for warnings (failed syncs, conflicts, offline mirrors).
    pub is_warning: bool,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Owner of the quote collection.
pub struct QuoteStore<S> {
    quotes: Vec<Quote>,
    persistence: QuotePersistence<S>,
    remote: Arc<dyn RemoteSource>,
    reconciler: Reconciler,
    filter: CategoryFilter,
    status: Status,
}

impl<S: KeyValueStore> QuoteStore<S> {
    /// Opens the store, loading the persisted collection or the defaults.
    pub fn open(storage: S, remote: Arc<dyn RemoteSource>) -> Self {
        let persistence = QuotePersistence::new(storage);
        let quotes = persistence.load();
        let filter = persistence.last_filter().unwrap_or_default();
        let status = match persistence.last_sync() {
            Some(at) => Status {
                message: format!(
                    "Last sync: {}",
                    at.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S")
                ),
                is_warning: false,
            },
            None => Status::default(),
        };
        info!("Quote store opened with {} quotes", quotes.len());

        Self {
            quotes,
            persistence,
            remote,
            reconciler: Reconciler::new(),
            filter,
            status,
        }
    }

    /// Wraps the store for sharing with a sync worker.
    pub fn into_shared(self) -> SharedStore<S> {
        Arc::new(Mutex::new(self))
    }

    /// Active collection, in insertion order.
    pub fn quotes(&self) -> &[Quote] {
        &self.quotes
    }

    /// Number of quotes.
    pub fn len(&self) -> usize {
        self.quotes.len()
    }

    /// True when the collection is empty.
    pub fn is_empty(&self) -> bool {
        self.quotes.is_empty()
    }

    /// Persistence layer, for hosts that need the side keys.
    pub fn persistence(&self) -> &QuotePersistence<S> {
        &self.persistence
    }

    /// Remote source handle.
    pub fn remote(&self) -> Arc<dyn RemoteSource> {
        Arc::clone(&self.remote)
    }

    /// Sorted distinct categories.
    pub fn categories(&self) -> Vec<String> {
        category::categories(&self.quotes)
    }

    /// `"all"` followed by the sorted categories.
    pub fn category_options(&self) -> Vec<String> {
        category::category_options(&self.quotes)
    }

    /// Current category filter.
    pub fn filter(&self) -> &CategoryFilter {
        &self.filter
    }

    /// Selects and persists a category filter.
    pub fn set_filter(&mut self, filter: CategoryFilter) -> Result<()> {
        self.persistence.set_last_filter(&filter)?;
        self.filter = filter;
        Ok(())
    }

    /// Quotes passing the current filter.
    pub fn filtered(&self) -> Vec<&Quote> {
        category::filter_quotes(&self.quotes, &self.filter)
    }

    /// Picks a random quote within the current filter and remembers it as
    /// the last viewed one.
    pub fn random_quote<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<Quote> {
        let quote = category::pick_random(&self.quotes, &self.filter, rng)?.clone();
        if let Err(e) = self.persistence.set_last_viewed(&quote) {
            warn!("Failed to remember last viewed quote: {}", e);
        }
        Some(quote)
    }

    /// Last quote shown, if any.
    pub fn last_viewed(&self) -> Option<Quote> {
        self.persistence.last_viewed()
    }

    /// Appends a quote typed by the user and mirrors it to the remote.
    ///
    /// The mirror is best effort: its failure only sets the offline status.
    pub fn add_quote(&mut self, text: &str, category: &str) -> Result<Quote> {
        let quote = Quote::new(text, category)?;
        let mut next = self.quotes.clone();
        next.push(quote.clone());
        self.commit(next)?;
        info!("Added quote in category `{}`", quote.category);

        if let Err(e) = self.remote.post_quote(&quote) {
            warn!("Failed to mirror quote to remote: {}", e);
            self.set_status(STATUS_OFFLINE, true);
        }
        Ok(quote)
    }

    /// Appends every valid quote of a JSON array and returns how many were added.
    ///
    /// Duplicates are kept. The filter is reset to all categories so the
    /// imported quotes are visible.
    pub fn import_json(&mut self, raw: &str) -> Result<usize> {
        let value: Value = serde_json::from_str(raw)
            .map_err(|e| QuoteError::InvalidImport(format!("unable to parse JSON: {e}")))?;
        let Value::Array(values) = value else {
            return Err(QuoteError::InvalidImport(
                "expected a JSON array of quotes".to_string(),
            ));
        };

        let imported = normalize_all(&values);
        if imported.is_empty() {
            return Err(QuoteError::NoValidQuotes);
        }

        let count = imported.len();
        let mut next = self.quotes.clone();
        next.extend(imported);
        self.commit(next)?;
        if let Err(e) = self.set_filter(CategoryFilter::All) {
            warn!("Failed to reset category filter after import: {}", e);
        }

        info!("Imported {} of {} entries", count, values.len());
        self.set_status(&format!("Imported {count} quotes."), false);
        Ok(count)
    }

    /// Reads `path` and imports it with [`Self::import_json`].
    pub fn import_file(&mut self, path: impl AsRef<Path>) -> Result<usize> {
        let raw = fs::read_to_string(path)?;
        self.import_json(&raw)
    }

    /// Serializes the full collection as a pretty-printed JSON array.
    pub fn export_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.quotes)?)
    }

    /// Writes [`Self::export_json`] to `path`.
    pub fn export_file(&self, path: impl AsRef<Path>) -> Result<()> {
        fs::write(path, self.export_json()?)?;
        Ok(())
    }

    /// Last status message.
    pub fn status(&self) -> &Status {
        &self.status
    }

    /// Current sync phase.
    pub fn sync_state(&self) -> SyncState {
        self.reconciler.state()
    }

    /// True while keep-local/use-server is still undecided.
    pub fn has_pending_conflict(&self) -> bool {
        self.reconciler.has_pending_conflict()
    }

    /// Time of the last successful sync pass.
    pub fn last_sync(&self) -> Option<DateTime<Utc>> {
        self.persistence.last_sync()
    }

    /// Runs one full sync pass: fetch, compare, and apply on conflict.
    ///
    /// `manual` only changes the wording of the up-to-date status.
    pub fn sync(&mut self, manual: bool) -> Result<SyncOutcome> {
        self.begin_sync();
        let fetched = self.remote.fetch_remote_quotes();
        self.complete_sync(fetched, manual)
    }

    /// First half of a pass, before the fetch. Must be followed by exactly
    /// one [`Self::complete_sync`].
    pub fn begin_sync(&mut self) {
        self.reconciler.begin();
        self.set_status(STATUS_SYNCING, false);
    }

    /// Second half of a pass, applying a fetch result.
    ///
    /// On failure the collection is untouched and the error is returned after
    /// setting the failure status.
    pub fn complete_sync(
        &mut self,
        fetched: Result<Vec<Quote>>,
        manual: bool,
    ) -> Result<SyncOutcome> {
        match fetched {
            Ok(remote) => self.apply_remote(remote, manual),
            Err(e) => {
                self.reconciler.finish_failed();
                warn!("Sync failed: {}", e);
                self.set_status(STATUS_SYNC_FAILED, true);
                Err(e)
            }
        }
    }

    fn apply_remote(&mut self, remote: Vec<Quote>, manual: bool) -> Result<SyncOutcome> {
        let outcome = match self.reconciler.finish_fetched(&self.quotes, remote) {
            Decision::UpToDate => {
                let message = if manual {
                    STATUS_ALREADY_UP_TO_DATE
                } else {
                    STATUS_SYNCED
                };
                self.set_status(message, false);
                SyncOutcome::UpToDate
            }
            Decision::Overwrite(remote) => {
                let outcome = SyncOutcome::ConflictApplied {
                    replaced: self.quotes.len(),
                    applied: remote.len(),
                };
                if let Err(e) = self.overwrite_with_backup(remote) {
                    self.reconciler.resolve();
                    self.set_status(STATUS_SYNC_FAILED, true);
                    return Err(e);
                }
                info!("Remote data applied: {:?}", outcome);
                self.set_status(STATUS_CONFLICT_APPLIED, true);
                outcome
            }
        };

        if let Err(e) = self.persistence.set_last_sync(Utc::now()) {
            warn!("Failed to record sync time: {}", e);
        }
        Ok(outcome)
    }

    /// Reverts the last remote overwrite by restoring the backup slot.
    ///
    /// Without a backup nothing changes and `QuoteError::NoBackup` is returned.
    pub fn keep_local_data(&mut self) -> Result<()> {
        let Some(backup) = self.persistence.restore_backup() else {
            self.set_status(STATUS_NO_BACKUP, true);
            return Err(QuoteError::NoBackup);
        };
        self.commit(backup)?;
        self.reconciler.resolve();
        info!("Restored {} local quotes from backup", self.quotes.len());
        self.set_status(STATUS_RESTORED_LOCAL, false);
        Ok(())
    }

    /// Confirms the remote data.
    ///
    /// The snapshot was already applied by the conflicting pass, so this only
    /// changes data if something was modified since.
    pub fn use_server_data(&mut self) -> Result<()> {
        if let Some(snapshot) = self.reconciler.snapshot().filter(|s| !s.is_empty()) {
            let snapshot = snapshot.to_vec();
            self.commit(snapshot)?;
        }
        self.reconciler.resolve();
        self.set_status(STATUS_SERVER_KEPT, false);
        Ok(())
    }

    fn overwrite_with_backup(&mut self, remote: Vec<Quote>) -> Result<()> {
        self.persistence.backup(&self.quotes)?;
        self.commit(remote)
    }

    fn commit(&mut self, next: Vec<Quote>) -> Result<()> {
        self.persistence.save(&next)?;
        self.quotes = next;
        Ok(())
    }

    fn set_status(&mut self, message: &str, is_warning: bool) {
        self.status = Status {
            message: message.to_string(),
            is_warning,
        };
    }
}

#[cfg(test)]
mod tests {
    use super::{QuoteStore, STATUS_OFFLINE, STATUS_SYNC_FAILED};
    use crate::error::QuoteError;
    use crate::model::defaults::default_quotes;
    use crate::model::quote::Quote;
    use crate::remote::RemoteSource;
    use crate::storage::memory::MemoryStore;
    use crate::storage::{BACKUP_KEY, KeyValueStore};
    use crate::sync::reconcile::SyncState;
    use std::sync::Arc;

    /// Memory store whose writes fail, either for one key or for all of them.
    struct FailingStore {
        inner: MemoryStore,
        only_key: Option<&'static str>,
    }

    impl FailingStore {
        fn all_writes() -> Self {
            Self {
                inner: MemoryStore::new(),
                only_key: None,
            }
        }

        fn writes_to(key: &'static str) -> Self {
            Self {
                inner: MemoryStore::new(),
                only_key: Some(key),
            }
        }

        fn rejects(&self, key: &str) -> bool {
            self.only_key.is_none_or(|only| only == key)
        }
    }

    impl KeyValueStore for FailingStore {
        fn get(&self, key: &str) -> crate::Result<Option<String>> {
            self.inner.get(key)
        }

        fn set(&mut self, key: &str, value: &str) -> crate::Result<()> {
            if self.rejects(key) {
                return Err(QuoteError::Io(std::io::Error::other("disk full")));
            }
            self.inner.set(key, value)
        }

        fn remove(&mut self, key: &str) -> crate::Result<()> {
            self.inner.remove(key)
        }
    }

    struct FixedRemote(Vec<Quote>);

    impl RemoteSource for FixedRemote {
        fn fetch_remote_quotes(&self) -> crate::Result<Vec<Quote>> {
            Ok(self.0.clone())
        }

        fn post_quote(&self, _quote: &Quote) -> crate::Result<()> {
            Ok(())
        }
    }

    struct OfflineRemote;

    impl RemoteSource for OfflineRemote {
        fn fetch_remote_quotes(&self) -> crate::Result<Vec<Quote>> {
            Err(QuoteError::FetchFailed("offline".to_string()))
        }

        fn post_quote(&self, _quote: &Quote) -> crate::Result<()> {
            Err(QuoteError::FetchFailed("offline".to_string()))
        }
    }

    #[test]
    fn add_quote_survives_mirror_failure() {
        let mut store = QuoteStore::open(MemoryStore::new(), Arc::new(OfflineRemote));
        store.add_quote("X", "Y").expect("add should succeed offline");
        assert_eq!(store.len(), 6);
        assert_eq!(store.status().message, STATUS_OFFLINE);
        assert!(store.status().is_warning);
    }

    #[test]
    fn add_quote_rejects_blank_input_without_side_effects() {
        let mut store = QuoteStore::open(MemoryStore::new(), Arc::new(OfflineRemote));
        let err = store.add_quote("  ", "Y").expect_err("blank text rejected");
        assert!(matches!(err, QuoteError::InvalidQuote(_)));
        assert_eq!(store.len(), 5);
        assert!(store.status().message.is_empty());
    }

    #[test]
    fn import_rejects_non_arrays() {
        let mut store = QuoteStore::open(MemoryStore::new(), Arc::new(OfflineRemote));
        for raw in ["{\"text\":\"A\",\"category\":\"B\"}", "not json"] {
            let err = store.import_json(raw).expect_err("must be rejected");
            assert!(matches!(err, QuoteError::InvalidImport(_)), "raw: {raw}");
        }
        let err = store
            .import_json("[{\"text\":\"\"}]")
            .expect_err("no valid quotes");
        assert!(matches!(err, QuoteError::NoValidQuotes));
        assert_eq!(store.len(), 5);
    }

    #[test]
    fn failed_write_leaves_collection_unchanged() {
        let mut store = QuoteStore::open(FailingStore::all_writes(), Arc::new(OfflineRemote));
        let err = store.add_quote("X", "Y").expect_err("write must fail");
        assert!(matches!(err, QuoteError::Io(_)));
        assert_eq!(store.len(), 5);
        assert_eq!(store.quotes(), default_quotes().as_slice());
    }

    #[test]
    fn failed_backup_aborts_the_overwrite() {
        let remote = vec![Quote::new("From server", "Server").expect("valid")];
        let mut store = QuoteStore::open(
            FailingStore::writes_to(BACKUP_KEY),
            Arc::new(FixedRemote(remote)),
        );

        let err = store.sync(true).expect_err("backup write must fail");
        assert!(matches!(err, QuoteError::Io(_)));
        assert_eq!(store.quotes(), default_quotes().as_slice());
        assert_eq!(store.sync_state(), SyncState::Idle);
        assert!(!store.has_pending_conflict());
        assert_eq!(store.status().message, STATUS_SYNC_FAILED);
        assert!(store.status().is_warning);
    }
}
