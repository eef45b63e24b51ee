use gallery_storage::local_store::{FAVORITES_NAMESPACE, SIGNED_URL_CACHE_NAMESPACE};
use gallery_storage::{FileStore, LocalStore, StorageError};
use pretty_assertions::assert_eq;

#[test]
fn test_file_store_round_trips_record() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileStore::new(dir.path().join("nested"));

    assert_eq!(store.read(SIGNED_URL_CACHE_NAMESPACE).unwrap(), None);

    store.write(SIGNED_URL_CACHE_NAMESPACE, r#"{"a":1}"#).unwrap();
    assert_eq!(
        store.read(SIGNED_URL_CACHE_NAMESPACE).unwrap().as_deref(),
        Some(r#"{"a":1}"#)
    );
    assert!(dir
        .path()
        .join("nested")
        .join("pixellens.signed-url-cache.json")
        .exists());
}

#[test]
fn test_file_store_overwrite_leaves_no_temp_file() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileStore::new(dir.path());

    store.write(FAVORITES_NAMESPACE, "[]").unwrap();
    store.write(FAVORITES_NAMESPACE, r#"["a"]"#).unwrap();

    assert_eq!(
        store.read(FAVORITES_NAMESPACE).unwrap().as_deref(),
        Some(r#"["a"]"#)
    );

    let files: Vec<_> = std::fs::read_dir(dir.path())
        .unwrap()
        .map(|entry| entry.unwrap().file_name().into_string().unwrap())
        .collect();
    assert_eq!(files, vec!["pixellens.favorites.json".to_string()]);
}

#[test]
fn test_file_store_remove() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileStore::new(dir.path());

    store.write(FAVORITES_NAMESPACE, "[]").unwrap();
    store.remove(FAVORITES_NAMESPACE).unwrap();
    assert_eq!(store.read(FAVORITES_NAMESPACE).unwrap(), None);

    // Removing again is not an error
    store.remove(FAVORITES_NAMESPACE).unwrap();
}

#[test]
fn test_file_store_rejects_path_traversal() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileStore::new(dir.path());

    let result = store.write("../escape", "x");
    assert!(matches!(result, Err(StorageError::InvalidNamespace(_))));
}

#[test]
fn test_file_store_failed_rename_removes_temp_file() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileStore::new(dir.path());

    // A non-empty directory where the record should go makes the rename fail
    let blocker = dir.path().join("pixellens.favorites.json");
    std::fs::create_dir(&blocker).unwrap();
    std::fs::write(blocker.join("occupied"), "x").unwrap();

    let result = store.write(FAVORITES_NAMESPACE, "[]");

    assert!(matches!(result, Err(StorageError::Io { .. })));
    assert!(!dir.path().join("pixellens.favorites.json.tmp").exists());
}
