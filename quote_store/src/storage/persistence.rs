//! Typed persistence of the quote collection and its side keys.
//!
//! # Invariants
//! - Readers never fail: absent keys, storage errors, and malformed JSON all
//!   degrade to a fallback (the default seed for the collection, `None` for
//!   everything else).
//! - The backup is a single slot, overwritten by every `backup` call.

use chrono::{DateTime, Utc};
use log::{debug, warn};
use serde_json::Value;

use crate::Result;
use crate::category::CategoryFilter;
use crate::model::defaults::default_quotes;
use crate::model::quote::{Quote, normalize, normalize_all};
use crate::storage::{
    BACKUP_KEY, KeyValueStore, LAST_FILTER_KEY, LAST_SYNC_KEY, LAST_VIEWED_KEY, QUOTES_KEY,
};

/// Quote-aware wrapper around a [`KeyValueStore`].
#[derive(Debug)]
pub struct QuotePersistence<S> {
    storage: S,
}

impl<S: KeyValueStore> QuotePersistence<S> {
    /// Wraps `storage`.
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    /// Underlying storage.
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Writes the full collection.
    pub fn save(&mut self, quotes: &[Quote]) -> Result<()> {
        let json = serde_json::to_string(quotes)?;
        self.storage.set(QUOTES_KEY, &json)
    }

    /// Reads the collection, falling back to the default seed.
    ///
    /// A stored JSON array is normalized element-wise and invalid entries are
    /// dropped; anything else yields the five built-in quotes.
    pub fn load(&self) -> Vec<Quote> {
        match self.read_array(QUOTES_KEY) {
            Some(values) => normalize_all(&values),
            None => {
                debug!("No usable stored quotes, seeding defaults");
                default_quotes()
            }
        }
    }

    /// Overwrites the single backup slot with `quotes`.
    pub fn backup(&mut self, quotes: &[Quote]) -> Result<()> {
        let json = serde_json::to_string(quotes)?;
        self.storage.set(BACKUP_KEY, &json)
    }

    /// Reads the backup slot; `None` when absent or malformed.
    pub fn restore_backup(&self) -> Option<Vec<Quote>> {
        self.read_array(BACKUP_KEY)
            .map(|values| normalize_all(&values))
    }

    /// Last quote shown, if one is stored and valid.
    pub fn last_viewed(&self) -> Option<Quote> {
        let raw = self.read_raw(LAST_VIEWED_KEY)?;
        let value: Value = serde_json::from_str(&raw).ok()?;
        let quote = normalize(&value);
        quote.is_valid().then_some(quote)
    }

    /// Records the last quote shown.
    pub fn set_last_viewed(&mut self, quote: &Quote) -> Result<()> {
        let json = serde_json::to_string(quote)?;
        self.storage.set(LAST_VIEWED_KEY, &json)
    }

    /// Last selected category filter, if any.
    ///
    /// Accepts a JSON string or, for hand-edited files, the bare label.
    pub fn last_filter(&self) -> Option<CategoryFilter> {
        let raw = self.read_raw(LAST_FILTER_KEY)?;
        let label = serde_json::from_str::<String>(&raw).unwrap_or(raw);
        label.parse().ok()
    }

    /// Records the selected category filter.
    pub fn set_last_filter(&mut self, filter: &CategoryFilter) -> Result<()> {
        let json = serde_json::to_string(&filter.to_string())?;
        self.storage.set(LAST_FILTER_KEY, &json)
    }

    /// Time of the last successful sync pass.
    pub fn last_sync(&self) -> Option<DateTime<Utc>> {
        let raw = self.read_raw(LAST_SYNC_KEY)?;
        serde_json::from_str(&raw).ok()
    }

    /// Records the time of a successful sync pass.
    pub fn set_last_sync(&mut self, at: DateTime<Utc>) -> Result<()> {
        let json = serde_json::to_string(&at)?;
        self.storage.set(LAST_SYNC_KEY, &json)
    }

    fn read_raw(&self, key: &str) -> Option<String> {
        match self.storage.get(key) {
            Ok(value) => value,
            Err(e) => {
                warn!("Failed to read `{}` from storage: {}", key, e);
                None
            }
        }
    }

    fn read_array(&self, key: &str) -> Option<Vec<Value>> {
        let raw = self.read_raw(key)?;
        match serde_json::from_str::<Value>(&raw) {
            Ok(Value::Array(values)) => Some(values),
            Ok(_) => {
                warn!("Stored `{}` is not a JSON array, ignoring it", key);
                None
            }
            Err(e) => {
                warn!("Stored `{}` is malformed JSON: {}", key, e);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::QuotePersistence;
    use crate::category::CategoryFilter;
    use crate::error::QuoteError;
    use crate::model::defaults::default_quotes;
    use crate::model::quote::Quote;
    use crate::storage::memory::MemoryStore;
    use crate::storage::{BACKUP_KEY, KeyValueStore, LAST_FILTER_KEY, QUOTES_KEY};
    use chrono::{TimeZone, Utc};

    fn persistence_with(key: &str, raw: &str) -> QuotePersistence<MemoryStore> {
        let mut storage = MemoryStore::new();
        storage.set(key, raw).expect("set");
        QuotePersistence::new(storage)
    }

    struct BrokenStore;

    impl KeyValueStore for BrokenStore {
        fn get(&self, _key: &str) -> crate::Result<Option<String>> {
            Err(QuoteError::Io(std::io::Error::other("disk unplugged")))
        }

        fn set(&mut self, _key: &str, _value: &str) -> crate::Result<()> {
            Err(QuoteError::Io(std::io::Error::other("disk unplugged")))
        }

        fn remove(&mut self, _key: &str) -> crate::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn save_then_load_round_trips() {
        let mut persistence = QuotePersistence::new(MemoryStore::new());
        let quotes = vec![
            Quote::new("B first", "Z").expect("valid"),
            Quote::new("A second", "Y").expect("valid"),
        ];
        persistence.save(&quotes).expect("save");
        assert_eq!(persistence.load(), quotes);
    }

    #[test]
    fn load_falls_back_to_defaults() {
        assert_eq!(
            QuotePersistence::new(MemoryStore::new()).load(),
            default_quotes()
        );
        for raw in ["{not json", "{\"text\":\"A\"}", "42", "\"quotes\""] {
            assert_eq!(
                persistence_with(QUOTES_KEY, raw).load(),
                default_quotes(),
                "raw: {raw}"
            );
        }
        assert_eq!(QuotePersistence::new(BrokenStore).load(), default_quotes());
    }

    #[test]
    fn load_drops_invalid_entries_from_an_array() {
        let persistence = persistence_with(
            QUOTES_KEY,
            r#"[{"text":" A ","category":"B"},{"text":"","category":"C"},{"foo":1}]"#,
        );
        assert_eq!(persistence.load(), vec![Quote::new("A", "B").expect("valid")]);
    }

    #[test]
    fn backup_slot_is_overwritten() {
        let mut persistence = QuotePersistence::new(MemoryStore::new());
        assert!(persistence.restore_backup().is_none());

        let first = vec![Quote::new("one", "c").expect("valid")];
        let second = vec![Quote::new("two", "c").expect("valid")];
        persistence.backup(&first).expect("backup");
        persistence.backup(&second).expect("backup");
        assert_eq!(persistence.restore_backup(), Some(second));
    }

    #[test]
    fn malformed_backup_is_none() {
        assert!(persistence_with(BACKUP_KEY, "oops").restore_backup().is_none());
        assert!(persistence_with(BACKUP_KEY, "{}").restore_backup().is_none());
    }

    #[test]
    fn side_keys_round_trip() {
        let mut persistence = QuotePersistence::new(MemoryStore::new());
        assert!(persistence.last_viewed().is_none());
        assert!(persistence.last_filter().is_none());
        assert!(persistence.last_sync().is_none());

        let quote = Quote::new("Seen", "Cat").expect("valid");
        persistence.set_last_viewed(&quote).expect("set");
        assert_eq!(persistence.last_viewed(), Some(quote));

        let filter = CategoryFilter::Named("Cat".to_string());
        persistence.set_last_filter(&filter).expect("set");
        assert_eq!(persistence.last_filter(), Some(filter));

        let at = Utc.with_ymd_and_hms(2026, 3, 1, 12, 30, 0).unwrap();
        persistence.set_last_sync(at).expect("set");
        assert_eq!(persistence.last_sync(), Some(at));
    }

    #[test]
    fn bare_filter_label_is_accepted() {
        let persistence = persistence_with(LAST_FILTER_KEY, "Motivation");
        assert_eq!(
            persistence.last_filter(),
            Some(CategoryFilter::Named("Motivation".to_string()))
        );
    }
}
