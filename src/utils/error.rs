use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by a `DocumentStore` implementation.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid store URI '{uri}': {reason}")]
    InvalidUri { uri: String, reason: String },

    #[error("Unsupported store scheme: {scheme}")]
    UnsupportedScheme { scheme: String },

    #[error("Insert rejected by store: {message}")]
    Rejected { message: String },

    #[error("Store connection is closed")]
    Disconnected,

    #[error("Operation cancelled")]
    Cancelled,
}

#[derive(Error, Debug)]
pub enum ImportError {
    #[error("error checking path {}: {source}", .path.display())]
    PathAccess {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("error reading file {}: {source}", .path.display())]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON format in file {}: {source}", .path.display())]
    InvalidJsonFormat {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("error inserting into collection {collection} (batch {batch_index}/{total_batches}): {source}")]
    BatchInsert {
        collection: String,
        batch_index: usize,
        total_batches: usize,
        #[source]
        source: StoreError,
    },

    #[error("no JSON files found in directory {}", .path.display())]
    NoJsonFilesFound { path: PathBuf },

    #[error("error finding JSON files in directory {}: {source}", .path.display())]
    DirectoryWalk {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{failed} out of {total} files failed to import")]
    AggregateImportFailure { failed: usize, total: usize },

    #[error("import task for {} did not complete: {message}", .path.display())]
    TaskFailed { path: PathBuf, message: String },

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValue {
        field: String,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    /// Informational, the run itself completed.
    Low,
    /// Retrying later may help.
    Medium,
    High,
    Critical,
}

impl ImportError {
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            ImportError::AggregateImportFailure { .. } => ErrorSeverity::Low,
            ImportError::BatchInsert { .. } | ImportError::Store(_) => ErrorSeverity::Medium,
            ImportError::ReadFile { .. }
            | ImportError::InvalidJsonFormat { .. }
            | ImportError::NoJsonFilesFound { .. }
            | ImportError::PathAccess { .. }
            | ImportError::DirectoryWalk { .. } => ErrorSeverity::High,
            ImportError::TaskFailed { .. }
            | ImportError::ConfigError { .. }
            | ImportError::InvalidConfigValue { .. } => ErrorSeverity::Critical,
        }
    }

    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }
}

pub type Result<T> = std::result::Result<T, ImportError>;
pub type StoreResult<T> = std::result::Result<T, StoreError>;
