//! Store backends and URI-based selection between them.

pub mod jsonl;
pub mod memory;

pub use jsonl::JsonLinesStore;
pub use memory::MemoryStore;

use crate::domain::ports::DocumentStore;
use crate::utils::error::{StoreError, StoreResult};
use std::path::PathBuf;
use std::sync::Arc;
use url::Url;

/// Where a store URI points.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreLocation {
    /// `memory://`
    Memory,
    /// `file:///abs/path` or a plain filesystem path.
    Directory(PathBuf),
}

impl StoreLocation {
    pub fn parse(uri: &str) -> StoreResult<Self> {
        match Url::parse(uri) {
            Ok(url) => match url.scheme() {
                "memory" => Ok(StoreLocation::Memory),
                "file" => url
                    .to_file_path()
                    .map(StoreLocation::Directory)
                    .map_err(|_| StoreError::InvalidUri {
                        uri: uri.to_string(),
                        reason: "file URI must hold an absolute local path".to_string(),
                    }),
                scheme => Err(StoreError::UnsupportedScheme {
                    scheme: scheme.to_string(),
                }),
            },
            Err(url::ParseError::RelativeUrlWithoutBase) if !uri.trim().is_empty() => {
                Ok(StoreLocation::Directory(PathBuf::from(uri)))
            }
            Err(e) => Err(StoreError::InvalidUri {
                uri: uri.to_string(),
                reason: e.to_string(),
            }),
        }
    }
}

/// Opens the store `uri` points at, scoped to `database`.
pub fn connect(uri: &str, database: &str) -> StoreResult<Arc<dyn DocumentStore>> {
    let store: Arc<dyn DocumentStore> = match StoreLocation::parse(uri)? {
        StoreLocation::Memory => Arc::new(MemoryStore::new()),
        StoreLocation::Directory(root) => Arc::new(JsonLinesStore::new(root.join(database))),
    };
    tracing::debug!("Connected to store {} (database {})", uri, database);
    Ok(store)
}
