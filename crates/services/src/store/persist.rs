//! Reading and writing quiz state through a `KeyValueStore`.

use std::collections::BTreeMap;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use quiz_core::model::{Question, RecordBook, TrainingMode};
use storage::keys;
use storage::repository::{KeyValueStore, StorageError};

use crate::error::LoadError;

/// Everything that survives a restart.
#[derive(Debug, Default)]
pub(crate) struct PersistedState {
    pub questions: Vec<Question>,
    pub normal: RecordBook,
    pub wrong_only: RecordBook,
    pub mode: TrainingMode,
}

/// Borrowed view of the state to write.
pub(crate) struct Snapshot<'a> {
    pub questions: &'a [Question],
    pub normal: &'a RecordBook,
    pub wrong_only: &'a RecordBook,
    pub mode: TrainingMode,
}

fn read_json(kv: &dyn KeyValueStore, key: &'static str) -> Result<Option<Value>, LoadError> {
    let Some(text) = kv.get(key)? else {
        return Ok(None);
    };
    serde_json::from_str(&text)
        .map(Some)
        .map_err(|err| LoadError::Corrupt {
            key,
            message: err.to_string(),
        })
}

/// Decode a stored list item by item. Items that do not decode are skipped;
/// anything other than a list yields an empty collection.
fn list_or_default<T: DeserializeOwned>(value: Option<Value>, key: &'static str) -> Vec<T> {
    let items = match value {
        None => return Vec::new(),
        Some(Value::Array(items)) => items,
        Some(_) => {
            tracing::warn!(key, "persisted entry is not a list, using default");
            return Vec::new();
        }
    };
    let total = items.len();
    let decoded: Vec<T> = items
        .into_iter()
        .filter_map(|item| serde_json::from_value(item).ok())
        .collect();
    if decoded.len() < total {
        tracing::warn!(key, skipped = total - decoded.len(), "dropped malformed persisted items");
    }
    decoded
}

/// Decode a stored index-keyed map entry by entry, skipping entries whose
/// key is not an index or whose value does not decode.
fn map_or_default<V: DeserializeOwned>(
    value: Option<Value>,
    key: &'static str,
) -> BTreeMap<usize, V> {
    let entries = match value {
        None => return BTreeMap::new(),
        Some(Value::Object(entries)) => entries,
        Some(_) => {
            tracing::warn!(key, "persisted entry is not an object, using default");
            return BTreeMap::new();
        }
    };
    let total = entries.len();
    let decoded: BTreeMap<usize, V> = entries
        .into_iter()
        .filter_map(|(index, item)| {
            let index = index.parse::<usize>().ok()?;
            let item = serde_json::from_value::<V>(item).ok()?;
            Some((index, item))
        })
        .collect();
    if decoded.len() < total {
        tracing::warn!(key, skipped = total - decoded.len(), "dropped malformed persisted entries");
    }
    decoded
}

fn read_mode(kv: &dyn KeyValueStore) -> Result<TrainingMode, LoadError> {
    let Some(raw) = kv.get(keys::TRAINING_MODE)? else {
        return Ok(TrainingMode::default());
    };
    Ok(raw.parse().unwrap_or_else(|_| {
        tracing::warn!(value = %raw, "unknown persisted training mode, resetting to normal");
        TrainingMode::default()
    }))
}

/// Load all entries.
///
/// Parse failures of the raw text abort the load; everything is read before
/// anything is returned, so callers either get a complete state or an error.
///
/// # Errors
///
/// Returns `LoadError` if the backend fails or an entry is not JSON.
pub(crate) fn load_state(kv: &dyn KeyValueStore) -> Result<PersistedState, LoadError> {
    if let Some(version) = kv.get(keys::DATA_VERSION)? {
        if !keys::COMPATIBLE_VERSIONS.contains(&version.as_str()) {
            tracing::warn!(%version, expected = keys::CURRENT_VERSION, "data version mismatch, data may need migration");
        }
    }

    let questions = read_json(kv, keys::QUESTIONS)?;
    let answers = read_json(kv, keys::USER_ANSWERS)?;
    let results = read_json(kv, keys::QUESTION_RESULTS)?;
    let wrong_answers = read_json(kv, keys::WRONG_ONLY_ANSWERS)?;
    let wrong_results = read_json(kv, keys::WRONG_ONLY_RESULTS)?;
    let mode = read_mode(kv)?;

    Ok(PersistedState {
        questions: list_or_default(questions, keys::QUESTIONS),
        normal: RecordBook::from_parts(
            map_or_default(answers, keys::USER_ANSWERS),
            map_or_default(results, keys::QUESTION_RESULTS),
        ),
        wrong_only: RecordBook::from_parts(
            map_or_default(wrong_answers, keys::WRONG_ONLY_ANSWERS),
            map_or_default(wrong_results, keys::WRONG_ONLY_RESULTS),
        ),
        mode,
    })
}

fn write_json(
    kv: &dyn KeyValueStore,
    key: &'static str,
    value: &impl Serialize,
) -> Result<(), StorageError> {
    let text =
        serde_json::to_string(value).map_err(|err| StorageError::Serialization(err.to_string()))?;
    kv.set(key, &text)
}

/// Write every entry. Stops at the first failing key.
///
/// # Errors
///
/// Returns the backend's `StorageError`.
pub(crate) fn save_state(kv: &dyn KeyValueStore, state: &Snapshot<'_>) -> Result<(), StorageError> {
    kv.set(keys::DATA_VERSION, keys::CURRENT_VERSION)?;
    write_json(kv, keys::QUESTIONS, &state.questions)?;
    write_json(kv, keys::USER_ANSWERS, state.normal.answers())?;
    write_json(kv, keys::QUESTION_RESULTS, state.normal.results())?;
    kv.set(keys::TRAINING_MODE, state.mode.as_str())?;
    write_json(kv, keys::WRONG_ONLY_ANSWERS, state.wrong_only.answers())?;
    write_json(kv, keys::WRONG_ONLY_RESULTS, state.wrong_only.results())?;
    Ok(())
}

/// Remove `keys_to_remove`, attempting every key even after a failure.
///
/// # Errors
///
/// Returns the first `StorageError` encountered.
pub(crate) fn remove_keys(
    kv: &dyn KeyValueStore,
    keys_to_remove: &[&str],
) -> Result<(), StorageError> {
    let mut first_err = None;
    for key in keys_to_remove {
        if let Err(err) = kv.remove(key) {
            tracing::error!(key, error = %err, "failed to remove persisted entry");
            first_err.get_or_insert(err);
        }
    }
    first_err.map_or(Ok(()), Err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use storage::InMemoryStore;

    #[test]
    fn empty_backend_loads_defaults() {
        let state = load_state(&InMemoryStore::new()).unwrap();
        assert!(state.questions.is_empty());
        assert!(state.normal.is_empty());
        assert_eq!(state.mode, TrainingMode::Normal);
    }

    #[test]
    fn wrong_shapes_fall_back_per_entry() {
        let kv = InMemoryStore::new();
        kv.set(keys::QUESTIONS, r#"{"not":"a list"}"#).unwrap();
        kv.set(keys::USER_ANSWERS, r#"{"0":["x"]}"#).unwrap();
        kv.set(keys::QUESTION_RESULTS, "[1,2]").unwrap();
        kv.set(keys::TRAINING_MODE, "speedrun").unwrap();

        let state = load_state(&kv).unwrap();
        assert!(state.questions.is_empty());
        assert_eq!(state.normal.answers().get(&0), Some(&vec!["x".to_string()]));
        assert!(state.normal.results().is_empty());
        assert_eq!(state.mode, TrainingMode::Normal);
    }

    #[test]
    fn malformed_items_are_dropped_individually() {
        let kv = InMemoryStore::new();
        kv.set(
            keys::QUESTIONS,
            r#"[
                {"section":"A","problem":"P1","options":["x"],"answer":["x"]},
                {"section":"A","problem":"P2","answer":["x"]}
            ]"#,
        )
        .unwrap();
        kv.set(
            keys::QUESTION_RESULTS,
            r#"{
                "0":{"userAnswer":["x"],"correctAnswer":["x"],"isCorrect":true,"submittedAt":"2023-11-14T22:13:20Z"},
                "1":{"userAnswer":["y"],"correctAnswer":["x"],"isCorrect":false,"submittedAt":"yesterday"},
                "two":{"userAnswer":["x"],"correctAnswer":["x"],"isCorrect":true,"submittedAt":"2023-11-14T22:13:20Z"}
            }"#,
        )
        .unwrap();

        let state = load_state(&kv).unwrap();
        assert_eq!(state.questions.len(), 1);
        assert_eq!(state.questions[0].problem(), "P1");
        assert_eq!(state.normal.results().len(), 1);
        assert!(state.normal.results()[&0].is_correct);
    }

    #[test]
    fn unparseable_entry_aborts_load() {
        let kv = InMemoryStore::new();
        kv.set(keys::USER_ANSWERS, "{broken").unwrap();
        let err = load_state(&kv).unwrap_err();
        assert!(matches!(
            err,
            LoadError::Corrupt {
                key: keys::USER_ANSWERS,
                ..
            }
        ));
    }

    #[test]
    fn remove_keys_clears_listed_entries() {
        let kv = InMemoryStore::new();
        kv.set(keys::QUESTIONS, "[]").unwrap();
        kv.set(keys::TRAINING_MODE, "memorize").unwrap();
        remove_keys(&kv, &keys::DATA_KEYS).unwrap();
        assert_eq!(kv.get(keys::QUESTIONS).unwrap(), None);
        assert_eq!(kv.get(keys::TRAINING_MODE).unwrap().as_deref(), Some("memorize"));
    }
}
