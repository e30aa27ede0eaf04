use super::value::Value;
use crate::utils::error::ImportError;
use serde::Serialize;
use std::collections::HashMap;
use std::time::Duration;

/// One JSON-derived document destined for the store.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Record {
    pub data: HashMap<String, Value>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.data.insert(key.into(), value.into())
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.data.remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.data.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl From<serde_json::Map<String, serde_json::Value>> for Record {
    fn from(map: serde_json::Map<String, serde_json::Value>) -> Self {
        let data = map.into_iter().map(|(k, v)| (k, Value::from(v))).collect();
        Self { data }
    }
}

/// Outcome of importing one file.
///
/// When `error` is set, `inserted_count` is always 0, even if earlier batches
/// of the file already reached the store.
#[derive(Debug)]
pub struct ImportResult {
    pub file_name: String,
    pub collection_name: String,
    pub inserted_count: usize,
    pub duration: Duration,
    pub error: Option<ImportError>,
}

impl ImportResult {
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// Results of a directory import, in completion order.
#[derive(Debug)]
pub struct DirectoryImportOutcome {
    pub results: Vec<ImportResult>,
    /// Set to `ImportError::AggregateImportFailure` when at least one file failed.
    pub failure: Option<ImportError>,
}

impl DirectoryImportOutcome {
    pub fn from_results(results: Vec<ImportResult>) -> Self {
        let total = results.len();
        let failed = results.iter().filter(|r| !r.is_success()).count();
        let failure = (failed > 0).then_some(ImportError::AggregateImportFailure { failed, total });
        Self { results, failure }
    }

    pub fn total_inserted(&self) -> usize {
        self.results.iter().map(|r| r.inserted_count).sum()
    }

    pub fn succeeded(&self) -> usize {
        self.results.iter().filter(|r| r.is_success()).count()
    }

    pub fn failed(&self) -> usize {
        self.results.len() - self.succeeded()
    }

    pub fn is_success(&self) -> bool {
        self.failure.is_none()
    }
}

/// What `import_path` produced, depending on how the path was classified.
#[derive(Debug)]
pub enum PathImport {
    File(ImportResult),
    Directory(DirectoryImportOutcome),
}

impl PathImport {
    pub fn total_inserted(&self) -> usize {
        match self {
            PathImport::File(result) => result.inserted_count,
            PathImport::Directory(outcome) => outcome.total_inserted(),
        }
    }

    /// The error a caller should surface for this run, if any.
    pub fn error(&self) -> Option<&ImportError> {
        match self {
            PathImport::File(result) => result.error.as_ref(),
            PathImport::Directory(outcome) => outcome.failure.as_ref(),
        }
    }
}
