use serde::{Serialize, de::DeserializeOwned};

use crate::error::StorageError;
use crate::objects::ObjectStore;

/// Load a JSON object.
pub fn load_state<T: DeserializeOwned>(store: &ObjectStore, key: &str) -> Result<T, StorageError> {
    let body = store.get_object(key)?;
    Ok(serde_json::from_slice(&body)?)
}

/// Load a JSON object, treating a missing key as `None`.
pub fn load_state_opt<T: DeserializeOwned>(
    store: &ObjectStore,
    key: &str,
) -> Result<Option<T>, StorageError> {
    match load_state(store, key) {
        Ok(value) => Ok(Some(value)),
        Err(StorageError::NotFound { .. }) => Ok(None),
        Err(e) => Err(e),
    }
}

/// Save a JSON object.
pub fn save_state<T: Serialize>(
    store: &ObjectStore,
    key: &str,
    value: &T,
) -> Result<(), StorageError> {
    let body = serde_json::to_vec_pretty(value)?;
    store.put_object(key, &body)
}

/// Load every JSON object under `prefix`. Objects deleted between listing
/// and reading are skipped.
pub fn load_all<T: DeserializeOwned>(
    store: &ObjectStore,
    prefix: &str,
) -> Result<Vec<T>, StorageError> {
    let mut values = Vec::new();
    for key in store.list_objects(prefix)? {
        if let Some(value) = load_state_opt(store, &key)? {
            values.push(value);
        }
    }
    Ok(values)
}
