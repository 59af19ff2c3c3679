use screening_core::model::{SavedCollection, ScoredResult, SubjectId};
use storage::repository::{DurableStore, SAVED_RESULTS_KEY, Storage};
use storage::sqlite::SqliteRepository;
use storage::{decode_collection, encode_collection};

fn collection_of(ids: &[&str]) -> SavedCollection {
    SavedCollection::from_entries(
        ids.iter()
            .map(|id| ScoredResult::new(SubjectId::parse(id).unwrap(), 1, 1, 42.0)),
    )
}

#[tokio::test]
async fn sqlite_store_reads_absent_before_first_write() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_absent?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("migrate");

    let store = repo.store(SAVED_RESULTS_KEY);
    assert!(store.read_all().await.unwrap().is_none());
}

#[tokio::test]
async fn sqlite_store_replaces_whole_value() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_replace?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("migrate");
    let store = repo.store(SAVED_RESULTS_KEY);

    store
        .write_all(&encode_collection(&collection_of(&["u1", "u2"])).unwrap())
        .await
        .unwrap();
    store
        .write_all(&encode_collection(&collection_of(&["u3"])).unwrap())
        .await
        .unwrap();

    let bytes = store.read_all().await.unwrap().expect("value present");
    let collection = decode_collection(&bytes).unwrap();
    assert_eq!(collection.len(), 1);
    assert_eq!(collection.entries()[0].subject_id().as_str(), "u3");
}

#[tokio::test]
async fn keys_are_isolated() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_keys?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("migrate");

    repo.store("a").write_all(b"[]").await.unwrap();
    assert!(repo.store("b").read_all().await.unwrap().is_none());
}

#[tokio::test]
async fn migrations_are_idempotent() {
    let url = "sqlite:file:memdb_migrate_twice?mode=memory&cache=shared";
    let repo = SqliteRepository::connect(url).await.expect("connect");
    repo.migrate().await.expect("first migrate");
    repo.migrate().await.expect("second migrate");

    let storage = Storage::sqlite(url).await.expect("storage");
    storage.saved_results.write_all(b"[]").await.unwrap();
    assert_eq!(
        storage.saved_results.read_all().await.unwrap().as_deref(),
        Some(&b"[]"[..])
    );
}
