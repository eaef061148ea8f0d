use storage::keys;
use storage::{FileStore, KeyValueStore};
use tempfile::TempDir;

#[test]
fn file_store_survives_reopen() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("quiz-data.json");

    {
        let store = FileStore::open(&path).expect("open");
        store.set(keys::DATA_VERSION, keys::CURRENT_VERSION).unwrap();
        store.set(keys::TRAINING_MODE, "wrong_only").unwrap();
        store.set(keys::QUESTIONS, "[]").unwrap();
        store.remove(keys::QUESTIONS).unwrap();
    }

    let reopened = FileStore::open(&path).expect("reopen");
    assert_eq!(
        reopened.get(keys::DATA_VERSION).unwrap().as_deref(),
        Some(keys::CURRENT_VERSION)
    );
    assert_eq!(
        reopened.get(keys::TRAINING_MODE).unwrap().as_deref(),
        Some("wrong_only")
    );
    assert_eq!(reopened.get(keys::QUESTIONS).unwrap(), None);
}
