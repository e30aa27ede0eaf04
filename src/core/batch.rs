use crate::domain::model::Record;
use crate::domain::ports::DocumentStore;
use crate::utils::error::{ImportError, Result, StoreError};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

pub const DEFAULT_BATCH_SIZE: usize = 1000;

/// Submits records to a [`DocumentStore`] in fixed-size batches.
///
/// Batches go out sequentially and in order. The first failing batch aborts
/// the write and the whole call reports nothing inserted, although batches
/// before it are already in the store.
pub struct BatchWriter<S: DocumentStore + ?Sized> {
    store: Arc<S>,
    batch_size: usize,
    cancel: CancellationToken,
}

impl<S: DocumentStore + ?Sized> Clone for BatchWriter<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            batch_size: self.batch_size,
            cancel: self.cancel.clone(),
        }
    }
}

impl<S: DocumentStore + ?Sized> BatchWriter<S> {
    /// A `batch_size` of 0 falls back to [`DEFAULT_BATCH_SIZE`].
    pub fn new(store: Arc<S>, batch_size: usize) -> Self {
        let batch_size = if batch_size == 0 {
            DEFAULT_BATCH_SIZE
        } else {
            batch_size
        };
        Self {
            store,
            batch_size,
            cancel: CancellationToken::new(),
        }
    }

    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    pub async fn write(&self, collection: &str, records: &[Record]) -> Result<usize> {
        if records.is_empty() {
            return Ok(0);
        }

        let total_batches = records.len().div_ceil(self.batch_size);
        let mut total_inserted = 0;

        for (i, batch) in records.chunks(self.batch_size).enumerate() {
            let batch_index = i + 1;

            let outcome = tokio::select! {
                biased;
                _ = self.cancel.cancelled() => Err(StoreError::Cancelled),
                inserted = self.store.insert_many(collection, batch) => inserted,
            };

            let inserted = outcome.map_err(|source| ImportError::BatchInsert {
                collection: collection.to_string(),
                batch_index,
                total_batches,
                source,
            })?;
            total_inserted += inserted;

            if total_batches > 1 {
                tracing::debug!(
                    "Collection {}: batch {}/{} done ({} inserted)",
                    collection,
                    batch_index,
                    total_batches,
                    inserted
                );
            }
        }

        Ok(total_inserted)
    }
}
