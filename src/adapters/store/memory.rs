use crate::domain::model::Record;
use crate::domain::ports::DocumentStore;
use crate::utils::error::{StoreError, StoreResult};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

/// In-process document store. Nothing outlives the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: Mutex<HashMap<String, Vec<Record>>>,
    closed: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn documents(&self, collection: &str) -> Vec<Record> {
        self.collections
            .lock()
            .map(|c| c.get(collection).cloned().unwrap_or_default())
            .unwrap_or_default()
    }

    pub fn count(&self, collection: &str) -> usize {
        self.collections
            .lock()
            .map(|c| c.get(collection).map_or(0, Vec::len))
            .unwrap_or(0)
    }

    pub fn collection_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .collections
            .lock()
            .map(|c| c.keys().cloned().collect())
            .unwrap_or_default();
        names.sort();
        names
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn insert_many(&self, collection: &str, documents: &[Record]) -> StoreResult<usize> {
        if self.closed.load(Ordering::Acquire) {
            return Err(StoreError::Disconnected);
        }
        let mut collections = self.collections.lock().map_err(|_| StoreError::Rejected {
            message: "store lock poisoned".to_string(),
        })?;
        collections
            .entry(collection.to_string())
            .or_default()
            .extend_from_slice(documents);
        Ok(documents.len())
    }

    async fn disconnect(&self) -> StoreResult<()> {
        self.closed.store(true, Ordering::Release);
        Ok(())
    }
}
