use crate::domain::model::Record;
use crate::domain::ports::DocumentStore;
use crate::utils::error::{StoreError, StoreResult};
use async_trait::async_trait;
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Directory-backed store: one `<collection>.jsonl` file per collection under
/// `root`, one JSON document per line, appended on every insert.
///
/// An append that has started always runs to completion, even when the
/// caller stops waiting for it, so a file never ends in a partial line.
#[derive(Debug)]
pub struct JsonLinesStore {
    root: PathBuf,
    write_lock: Arc<Mutex<()>>,
    closed: AtomicBool,
}

impl JsonLinesStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            write_lock: Arc::new(Mutex::new(())),
            closed: AtomicBool::new(false),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn collection_path(&self, collection: &str) -> PathBuf {
        self.root.join(format!("{}.jsonl", collection))
    }
}

fn append(root: &Path, path: &Path, buffer: &[u8]) -> io::Result<()> {
    std::fs::create_dir_all(root)?;
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    file.write_all(buffer)?;
    file.flush()
}

fn check_collection_name(collection: &str) -> StoreResult<()> {
    if collection.is_empty() || collection.contains(['/', '\\', '\0']) {
        return Err(StoreError::Rejected {
            message: format!("invalid collection name '{}'", collection),
        });
    }
    Ok(())
}

#[async_trait]
impl DocumentStore for JsonLinesStore {
    async fn insert_many(&self, collection: &str, documents: &[Record]) -> StoreResult<usize> {
        if self.closed.load(Ordering::Acquire) {
            return Err(StoreError::Disconnected);
        }
        check_collection_name(collection)?;

        let mut buffer = Vec::new();
        for doc in documents {
            serde_json::to_writer(&mut buffer, doc)?;
            buffer.push(b'\n');
        }

        // The guard moves into the blocking task: a dropped caller leaves the
        // lock held until the append is done, and `disconnect` waits for it.
        let guard = Arc::clone(&self.write_lock).lock_owned().await;
        let root = self.root.clone();
        let path = self.collection_path(collection);
        tokio::task::spawn_blocking(move || {
            let _guard = guard;
            append(&root, &path, &buffer)
        })
        .await
        .map_err(io::Error::other)??;

        tracing::debug!("Appended {} documents to {}", documents.len(), collection);
        Ok(documents.len())
    }

    async fn disconnect(&self) -> StoreResult<()> {
        // Wait for an in-flight append before closing.
        let _guard = self.write_lock.lock().await;
        self.closed.store(true, Ordering::Release);
        Ok(())
    }
}
