//! Keyed persistence for the task collection and the history ledger.
//!
//! Each collection lives under its own key as a JSON array. Reads are
//! lenient: a missing, unreadable or malformed value loads as an empty
//! collection. Writes happen synchronously on every change and failures are
//! logged, not propagated.

pub mod json_store;
pub mod memory;

use crate::error::AppError;
use serde::Serialize;
use serde::de::DeserializeOwned;

pub use json_store::FileStore;
pub use memory::MemoryStore;

pub const TASKS_KEY: &str = "tasks";
pub const HISTORY_KEY: &str = "taskHistory";

pub trait KeyValueStore {
    /// Returns `Ok(None)` when nothing has been stored under `key`.
    fn read(&self, key: &str) -> Result<Option<String>, AppError>;

    fn write(&self, key: &str, value: &str) -> Result<(), AppError>;
}

pub fn load_collection<T: DeserializeOwned>(store: &dyn KeyValueStore, key: &str) -> Vec<T> {
    let raw = match store.read(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return Vec::new(),
        Err(err) => {
            tracing::warn!(key, error = %err, "stored collection unreadable, starting empty");
            return Vec::new();
        }
    };

    match serde_json::from_str::<Vec<T>>(&raw) {
        Ok(items) => {
            tracing::debug!(key, count = items.len(), "loaded collection");
            items
        }
        Err(err) => {
            tracing::warn!(key, error = %err, "stored collection malformed, starting empty");
            Vec::new()
        }
    }
}

pub fn save_collection<T: Serialize>(store: &dyn KeyValueStore, key: &str, items: &[T]) {
    let result = serde_json::to_string(items)
        .map_err(AppError::from)
        .and_then(|encoded| store.write(key, &encoded));

    if let Err(err) = result {
        tracing::warn!(key, error = %err, "failed to persist collection");
    }
}
