use std::path::PathBuf;

use serde_json::{json, Value};
use tempfile::TempDir;
use warren_core::{Record, RecordPatch, Store, StoreError, Table};
use warren_store::{ChangeNotifier, DurableStore, JsonFileBackend, StoreSettings};

struct Fixture {
    _dir: TempDir,
    path: PathBuf,
}

impl Fixture {
    fn new() -> Self {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = dir.path().join("data.json");
        Self { _dir: dir, path }
    }

    fn with_contents(contents: impl AsRef<[u8]>) -> Self {
        let fixture = Self::new();
        std::fs::write(&fixture.path, contents).expect("seed data file");
        fixture
    }

    async fn open(&self) -> Result<DurableStore, StoreError> {
        DurableStore::open(
            JsonFileBackend::new(&self.path),
            ChangeNotifier::new(),
            StoreSettings::builder().build(),
        )
        .await
    }

    fn read_json(&self) -> Value {
        let raw = std::fs::read_to_string(&self.path).expect("read data file");
        serde_json::from_str(&raw).expect("data file is json")
    }
}

fn completed(url: &str, code: &str) -> Record {
    Record {
        original: url.to_string(),
        short_code: code.to_string(),
        ack: false,
        progress: 1.0,
        shortened_url: Some(format!("http://localhost:3000/{code}")),
    }
}

#[tokio::test]
async fn missing_file_heals_and_second_start_is_identical() {
    let fixture = Fixture::new();

    let store = fixture.open().await.unwrap();
    assert_eq!(fixture.read_json(), json!({ "completed": {}, "pending": {} }));
    assert_eq!(store.flush_stats().writes, 1);
    drop(store);

    let store = fixture.open().await.unwrap();
    assert_eq!(fixture.read_json(), json!({ "completed": {}, "pending": {} }));
    assert_eq!(store.flush_stats().writes, 0);
}

#[tokio::test]
async fn empty_file_heals() {
    let fixture = Fixture::with_contents("");

    fixture.open().await.unwrap();

    assert_eq!(fixture.read_json(), json!({ "completed": {}, "pending": {} }));
}

#[tokio::test]
async fn missing_table_heals_without_losing_the_other() {
    let fixture = Fixture::with_contents(
        r#"{ "completed": { "abc": { "original": "http://a", "shortCode": "abc", "ack": true, "progress": 1 } } }"#,
    );

    let store = fixture.open().await.unwrap();

    let json = fixture.read_json();
    assert_eq!(json["pending"], json!({}));
    assert_eq!(json["completed"]["abc"]["ack"], true);
    let record = store.query(Table::Completed, "abc").await.unwrap().unwrap();
    assert!(record.ack);
}

#[tokio::test]
async fn corrupt_file_is_fatal_and_left_untouched() {
    let fixture = Fixture::with_contents("definitely not json");

    let err = fixture.open().await.unwrap_err();

    match err {
        StoreError::CorruptPersistedState { path, .. } => {
            assert!(path.ends_with("data.json"));
        }
        other => panic!("expected corrupt state error, got {other:?}"),
    }
    let raw = std::fs::read_to_string(&fixture.path).unwrap();
    assert_eq!(raw, "definitely not json");
}

#[tokio::test]
async fn non_utf8_file_is_fatal_and_left_untouched() {
    let bytes = [0xff, 0xfe, b'{', b'"', 0xc3];
    let fixture = Fixture::with_contents(bytes);

    let err = fixture.open().await.unwrap_err();

    assert!(matches!(err, StoreError::CorruptPersistedState { .. }));
    assert_eq!(std::fs::read(&fixture.path).unwrap(), bytes);
}

#[tokio::test]
async fn unreadable_path_refuses_to_open_instead_of_healing() {
    let fixture = Fixture::new();
    std::fs::create_dir(&fixture.path).unwrap();

    let err = fixture.open().await.unwrap_err();

    assert!(matches!(err, StoreError::Io(_)), "got {err:?}");
    assert!(fixture.path.is_dir());
}

#[tokio::test]
async fn persisted_state_round_trips_through_a_cold_start() {
    let fixture = Fixture::new();

    let store = fixture.open().await.unwrap();
    store
        .insert(Table::Pending, "http://a", Record::pending("http://a"))
        .await
        .unwrap();
    store
        .update(Table::Pending, "http://a", RecordPatch::progress("abcd", 0.4))
        .await
        .unwrap();
    store
        .insert(Table::Pending, "http://b", Record::pending("http://b"))
        .await
        .unwrap();
    store
        .insert(Table::Completed, "zzzzzzzzzz", completed("http://c", "zzzzzzzzzz"))
        .await
        .unwrap();
    store
        .update(Table::Completed, "zzzzzzzzzz", RecordPatch::ack())
        .await
        .unwrap();
    store.remove(Table::Pending, "http://b").await.unwrap();

    let before_pending = store.list(Table::Pending).await.unwrap();
    let before_completed = store.list(Table::Completed).await.unwrap();
    store.shutdown().await;
    drop(store);

    let reopened = fixture.open().await.unwrap();
    assert_eq!(reopened.list(Table::Pending).await.unwrap(), before_pending);
    assert_eq!(reopened.list(Table::Completed).await.unwrap(), before_completed);

    for (key, record) in before_pending {
        assert_eq!(
            reopened.query(Table::Pending, &key).await.unwrap(),
            Some(record)
        );
    }
    assert!(reopened.query(Table::Pending, "http://b").await.unwrap().is_none());

    let json = fixture.read_json();
    assert_eq!(
        json["completed"]["zzzzzzzzzz"]["shortenedURL"],
        "http://localhost:3000/zzzzzzzzzz"
    );
    assert!(json["pending"]["http://a"].get("shortenedURL").is_none());
}

#[tokio::test]
async fn lifecycle_keeps_pending_until_ack_removes_it() {
    let fixture = Fixture::new();
    let store = fixture.open().await.unwrap();
    let url = "http://a";

    store
        .insert(Table::Pending, url, Record::pending(url))
        .await
        .unwrap();

    let mut code = String::new();
    for c in "0123456789".chars() {
        code.push(c);
        let progress = code.len() as f64 / 10.0;
        let updated = store
            .update(Table::Pending, url, RecordPatch::progress(code.clone(), progress))
            .await
            .unwrap();
        assert_eq!(updated.short_code.len(), code.len());
    }

    let pending = store.query(Table::Pending, url).await.unwrap().unwrap();
    assert_eq!(pending.short_code.len(), 10);
    assert_eq!(pending.progress, 1.0);

    store
        .insert(Table::Completed, &code, completed(url, &code))
        .await
        .unwrap();

    assert!(store.query(Table::Pending, url).await.unwrap().is_some());
    let done = store.query(Table::Completed, &code).await.unwrap().unwrap();
    assert_eq!(done.progress, 1.0);

    let acked = store
        .update(Table::Completed, &code, RecordPatch::ack())
        .await
        .unwrap();
    store.remove(Table::Pending, &acked.original).await.unwrap();

    assert!(store.query(Table::Pending, url).await.unwrap().is_none());
    assert!(store.query(Table::Completed, &code).await.unwrap().unwrap().ack);
}
