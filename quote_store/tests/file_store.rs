mod common;

use std::fs;
use std::sync::Arc;

use common::{MockRemote, quote};
use quote_store::model::defaults::default_quotes;
use quote_store::storage::QUOTES_KEY;
use quote_store::{FileStore, QuoteError, QuoteStore};

#[test]
fn collection_and_sync_time_survive_a_restart() {
    let dir = tempfile::tempdir().expect("temp dir");
    let remote = Arc::new(MockRemote::returning(vec![quote("Remote", "Server")]));

    {
        let storage = FileStore::open(dir.path()).expect("open");
        let mut store = QuoteStore::open(storage, remote.clone());
        store.add_quote("Persisted", "Disk").expect("add");
        store.sync(false).expect("sync");
    }

    let storage = FileStore::open(dir.path()).expect("reopen");
    let store = QuoteStore::open(storage, remote);
    assert_eq!(store.quotes(), &[quote("Remote", "Server")]);
    assert!(store.status().message.starts_with("Last sync: "));
    assert_eq!(
        store.persistence().restore_backup().map(|backup| backup.len()),
        Some(6)
    );
}

#[test]
fn corrupted_file_falls_back_to_defaults() {
    let dir = tempfile::tempdir().expect("temp dir");
    fs::write(dir.path().join(format!("{QUOTES_KEY}.json")), "[{\"text\": ").expect("write");

    let storage = FileStore::open(dir.path()).expect("open");
    let store = QuoteStore::open(storage, Arc::new(MockRemote::returning(vec![])));
    assert_eq!(store.quotes(), default_quotes().as_slice());
}

#[test]
fn export_then_import_file() {
    let dir = tempfile::tempdir().expect("temp dir");
    let export_path = dir.path().join("quotes.json");

    let storage = FileStore::open(dir.path().join("data")).expect("open");
    let mut store = QuoteStore::open(storage, Arc::new(MockRemote::returning(vec![])));
    store.export_file(&export_path).expect("export");

    let exported: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&export_path).expect("read")).expect("json");
    assert_eq!(exported.as_array().map(Vec::len), Some(5));
    assert_eq!(exported[0]["category"], "Motivation");

    assert_eq!(store.import_file(&export_path).expect("import"), 5);
    assert_eq!(store.len(), 10);

    let err = store
        .import_file(dir.path().join("missing.json"))
        .expect_err("missing file");
    assert!(matches!(err, QuoteError::Io(_)));
}
