use crate::domain::model::Record;
use crate::utils::error::StoreResult;
use async_trait::async_trait;
use std::io;
use std::path::{Path, PathBuf};

/// Document-oriented storage backend.
///
/// Implementations are shared across concurrent file imports and must be safe
/// for concurrent use. Collections are created on first insert.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Inserts `documents` in order and returns how many the store accepted.
    async fn insert_many(&self, collection: &str, documents: &[Record]) -> StoreResult<usize>;

    async fn disconnect(&self) -> StoreResult<()>;
}

/// One entry reported by [`FileSystem::walk`].
#[derive(Debug)]
pub struct WalkEntry {
    pub path: PathBuf,
    pub is_dir: bool,
    /// Set when the entry could not be inspected or listed.
    pub error: Option<io::Error>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalkControl {
    Continue,
    /// Do not descend into this directory.
    SkipSubtree,
}

pub trait FileSystem: Send + Sync {
    /// Returns whether `path` is a directory.
    fn stat(&self, path: &Path) -> impl std::future::Future<Output = io::Result<bool>> + Send;

    fn read_file(&self, path: &Path)
        -> impl std::future::Future<Output = io::Result<Vec<u8>>> + Send;

    /// Visits `root` and everything below it, depth first. An error returned
    /// by `visit` stops the walk and is returned as is.
    fn walk(
        &self,
        root: &Path,
        visit: &mut dyn FnMut(WalkEntry) -> io::Result<WalkControl>,
    ) -> io::Result<()>;
}
