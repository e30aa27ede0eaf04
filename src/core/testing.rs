//! In-memory doubles for the core's unit tests.

use crate::domain::model::Record;
use crate::domain::ports::{DocumentStore, FileSystem, WalkControl, WalkEntry};
use crate::utils::error::{StoreError, StoreResult};
use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

/// Records every `insert_many` call and can be told to reject one of them.
#[derive(Default)]
pub struct RecordingStore {
    calls: Mutex<Vec<(String, usize)>>,
    inserted: Mutex<HashMap<String, Vec<Record>>>,
    fail_on_call: Option<usize>,
    failing_collections: HashSet<String>,
    panicking_collections: HashSet<String>,
    delay: Option<Duration>,
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
}

impl RecordingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rejects the `n`th call (1-based) across all collections.
    pub fn failing_on_call(n: usize) -> Self {
        Self {
            fail_on_call: Some(n),
            ..Self::default()
        }
    }

    pub fn failing_for(collection: &str) -> Self {
        Self {
            failing_collections: HashSet::from([collection.to_string()]),
            ..Self::default()
        }
    }

    /// Panics inside `insert_many` for `collection`.
    pub fn panicking_for(collection: &str) -> Self {
        Self {
            panicking_collections: HashSet::from([collection.to_string()]),
            ..Self::default()
        }
    }

    /// Holds every call open for `delay` before answering.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Most `insert_many` calls seen running at the same time.
    pub fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }

    pub fn batch_sizes(&self) -> Vec<usize> {
        self.calls.lock().unwrap().iter().map(|(_, n)| *n).collect()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn stored(&self, collection: &str) -> Vec<Record> {
        self.inserted
            .lock()
            .unwrap()
            .get(collection)
            .cloned()
            .unwrap_or_default()
    }
}

#[async_trait]
impl DocumentStore for RecordingStore {
    async fn insert_many(&self, collection: &str, documents: &[Record]) -> StoreResult<usize> {
        let call_number = {
            let mut calls = self.calls.lock().unwrap();
            calls.push((collection.to_string(), documents.len()));
            calls.len()
        };
        if self.panicking_collections.contains(collection) {
            panic!("store crashed while inserting into {}", collection);
        }
        if let Some(delay) = self.delay {
            let running = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak_in_flight.fetch_max(running, Ordering::SeqCst);
            tokio::time::sleep(delay).await;
            self.in_flight.fetch_sub(1, Ordering::SeqCst);
        }
        if self.fail_on_call == Some(call_number) || self.failing_collections.contains(collection) {
            return Err(StoreError::Rejected {
                message: format!("call {} rejected", call_number),
            });
        }
        self.inserted
            .lock()
            .unwrap()
            .entry(collection.to_string())
            .or_default()
            .extend_from_slice(documents);
        Ok(documents.len())
    }

    async fn disconnect(&self) -> StoreResult<()> {
        Ok(())
    }
}

/// A file tree held in memory. `None` contents mark a directory.
#[derive(Default)]
pub struct MockFileSystem {
    entries: BTreeMap<PathBuf, Option<Vec<u8>>>,
    denied: HashSet<PathBuf>,
}

impl MockFileSystem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_dir(mut self, path: impl AsRef<Path>) -> Self {
        self.add_parents(path.as_ref());
        self.entries.insert(path.as_ref().to_path_buf(), None);
        self
    }

    pub fn with_file(mut self, path: impl AsRef<Path>, contents: &str) -> Self {
        self.add_parents(path.as_ref());
        self.entries
            .insert(path.as_ref().to_path_buf(), Some(contents.as_bytes().to_vec()));
        self
    }

    pub fn deny(mut self, path: impl AsRef<Path>) -> Self {
        self.denied.insert(path.as_ref().to_path_buf());
        self
    }

    fn add_parents(&mut self, path: &Path) {
        for ancestor in path.ancestors().skip(1) {
            if ancestor.as_os_str().is_empty() {
                continue;
            }
            self.entries.entry(ancestor.to_path_buf()).or_insert(None);
        }
    }

    fn check_access(&self, path: &Path) -> io::Result<()> {
        if self.denied.contains(path) {
            return Err(io::Error::new(io::ErrorKind::PermissionDenied, "permission denied"));
        }
        Ok(())
    }
}

impl FileSystem for MockFileSystem {
    async fn stat(&self, path: &Path) -> io::Result<bool> {
        self.check_access(path)?;
        match self.entries.get(path) {
            Some(contents) => Ok(contents.is_none()),
            None => Err(io::Error::new(io::ErrorKind::NotFound, "no such file or directory")),
        }
    }

    async fn read_file(&self, path: &Path) -> io::Result<Vec<u8>> {
        self.check_access(path)?;
        match self.entries.get(path) {
            Some(Some(contents)) => Ok(contents.clone()),
            Some(None) => Err(io::Error::new(io::ErrorKind::Other, "is a directory")),
            None => Err(io::Error::new(io::ErrorKind::NotFound, "no such file or directory")),
        }
    }

    fn walk(
        &self,
        root: &Path,
        visit: &mut dyn FnMut(WalkEntry) -> io::Result<WalkControl>,
    ) -> io::Result<()> {
        let mut skipped: Vec<PathBuf> = Vec::new();
        for (path, contents) in self.entries.range(root.to_path_buf()..) {
            if !path.starts_with(root) {
                break;
            }
            if skipped.iter().any(|s| path.starts_with(s)) {
                continue;
            }
            let entry = WalkEntry {
                path: path.clone(),
                is_dir: contents.is_none(),
                error: self.check_access(path).err(),
            };
            if visit(entry)? == WalkControl::SkipSubtree {
                skipped.push(path.clone());
            }
        }
        Ok(())
    }
}
