use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Durable blob slots addressed by key.
///
/// Callers own the encoding; adapters only move bytes.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read the blob stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be read.
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError>;

    /// Replace the blob stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the blob cannot be written.
    async fn set(&self, key: &str, value: Vec<u8>) -> Result<(), StorageError>;
}

/// In-memory key/value store for tests and throwaway sessions.
///
/// Clones share the same slots, so a clone handed to a second service behaves like a
/// restart against the same durable store.
#[derive(Clone, Default)]
pub struct InMemoryKeyValueStore {
    slots: Arc<Mutex<HashMap<String, Vec<u8>>>>,
}

impl InMemoryKeyValueStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValueStore for InMemoryKeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        let guard = self
            .slots
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.get(key).cloned())
    }

    async fn set(&self, key: &str, value: Vec<u8>) -> Result<(), StorageError> {
        let mut guard = self
            .slots
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.insert(key.to_owned(), value);
        Ok(())
    }
}

/// Persistence handles behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub kv: Arc<dyn KeyValueStore>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        let kv: Arc<dyn KeyValueStore> = Arc::new(InMemoryKeyValueStore::new());
        Self { kv }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_key_reads_as_none() {
        let store = InMemoryKeyValueStore::new();
        assert_eq!(store.get("gameRecords").await.unwrap(), None);
    }

    #[tokio::test]
    async fn set_overwrites_and_is_shared_between_clones() {
        let store = InMemoryKeyValueStore::new();
        let other = store.clone();

        store.set("k", b"first".to_vec()).await.unwrap();
        store.set("k", b"second".to_vec()).await.unwrap();

        assert_eq!(other.get("k").await.unwrap(), Some(b"second".to_vec()));
    }

    #[tokio::test]
    async fn in_memory_storage_wires_a_kv_store() {
        let storage = Storage::in_memory();
        storage.kv.set("a", vec![1, 2, 3]).await.unwrap();
        assert_eq!(storage.kv.get("a").await.unwrap(), Some(vec![1, 2, 3]));
    }
}
