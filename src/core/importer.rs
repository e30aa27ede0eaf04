use super::batch::{BatchWriter, DEFAULT_BATCH_SIZE};
use super::normalizer::normalize;
use super::parser::parse_documents;
use super::paths::{classify, collection_name, discover_json_files, PathKind};
use crate::adapters::fs::LocalFileSystem;
use crate::domain::model::{DirectoryImportOutcome, ImportResult, PathImport};
use crate::domain::ports::{DocumentStore, FileSystem};
use crate::utils::error::{ImportError, Result};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

pub const DEFAULT_MAX_CONCURRENT_FILES: usize = 8;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportOptions {
    pub batch_size: usize,
    /// Strip `_id` and normalize dates before inserting.
    pub remove_id_field: bool,
    /// Upper bound on files imported at once in directory mode.
    pub max_concurrent_files: usize,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            remove_id_field: false,
            max_concurrent_files: DEFAULT_MAX_CONCURRENT_FILES,
        }
    }
}

/// Imports JSON files, or whole directories of them, into a [`DocumentStore`].
///
/// Each file goes to the collection named after it. In directory mode files
/// are imported concurrently and a failing file never stops its siblings.
pub struct Importer<S: DocumentStore + ?Sized, F: FileSystem = LocalFileSystem> {
    fs: Arc<F>,
    writer: BatchWriter<S>,
    options: ImportOptions,
    cancel: CancellationToken,
}

impl<S: DocumentStore + ?Sized, F: FileSystem> Clone for Importer<S, F> {
    fn clone(&self) -> Self {
        Self {
            fs: Arc::clone(&self.fs),
            writer: self.writer.clone(),
            options: self.options.clone(),
            cancel: self.cancel.clone(),
        }
    }
}

impl<S: DocumentStore + ?Sized + 'static> Importer<S, LocalFileSystem> {
    pub fn new(store: Arc<S>, options: ImportOptions) -> Self {
        Self::with_file_system(store, Arc::new(LocalFileSystem), options)
    }
}

impl<S, F> Importer<S, F>
where
    S: DocumentStore + ?Sized + 'static,
    F: FileSystem + 'static,
{
    pub fn with_file_system(store: Arc<S>, fs: Arc<F>, options: ImportOptions) -> Self {
        let cancel = CancellationToken::new();
        let writer = BatchWriter::new(store, options.batch_size).with_cancellation(cancel.clone());
        Self {
            fs,
            writer,
            options,
            cancel,
        }
    }

    /// Replaces the token that aborts in-flight store calls.
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.writer = self.writer.with_cancellation(cancel.clone());
        self.cancel = cancel;
        self
    }

    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn options(&self) -> &ImportOptions {
        &self.options
    }

    /// Imports a file or a directory, depending on what `path` is.
    ///
    /// Only a path that cannot be inspected, or a directory without JSON
    /// files, is an `Err`; per-file failures live in the returned results.
    pub async fn import_path(&self, path: &Path) -> Result<PathImport> {
        match classify(self.fs.as_ref(), path).await? {
            PathKind::File => Ok(PathImport::File(self.import_file(path).await)),
            PathKind::Directory => Ok(PathImport::Directory(self.import_directory(path).await?)),
        }
    }

    /// Imports one file. Failures are reported through `ImportResult::error`
    /// with an inserted count of 0.
    pub async fn import_file(&self, path: &Path) -> ImportResult {
        let started = Instant::now();
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let collection_name = collection_name(path);

        let outcome = self.load_file(path, &collection_name).await;
        let duration = started.elapsed();

        match outcome {
            Ok(inserted_count) => {
                tracing::info!(
                    "Imported {} -> {} ({} documents, {:?})",
                    file_name,
                    collection_name,
                    inserted_count,
                    duration
                );
                ImportResult {
                    file_name,
                    collection_name,
                    inserted_count,
                    duration,
                    error: None,
                }
            }
            Err(err) => {
                tracing::warn!("Failed to import {}: {}", path.display(), err);
                ImportResult {
                    file_name,
                    collection_name,
                    inserted_count: 0,
                    duration,
                    error: Some(err),
                }
            }
        }
    }

    async fn load_file(&self, path: &Path, collection: &str) -> Result<usize> {
        let bytes = self
            .fs
            .read_file(path)
            .await
            .map_err(|source| ImportError::ReadFile {
                path: path.to_path_buf(),
                source,
            })?;

        let mut records = parse_documents(path, &bytes)?;
        drop(bytes);

        let stats = normalize(&mut records, self.options.remove_id_field);
        if stats.unparsable_dates > 0 {
            tracing::warn!(
                "{}: {} date values could not be parsed and were kept as is",
                path.display(),
                stats.unparsable_dates
            );
        }

        self.writer.write(collection, &records).await
    }

    /// Imports every `.json` file below `dir`, a bounded number at a time.
    ///
    /// All files are attempted. When any of them fails the outcome carries an
    /// `AggregateImportFailure` next to the full result list.
    pub async fn import_directory(&self, dir: &Path) -> Result<DirectoryImportOutcome> {
        // The walk is synchronous; keep it off the runtime's worker threads.
        let fs = Arc::clone(&self.fs);
        let root = dir.to_path_buf();
        let files = tokio::task::spawn_blocking(move || discover_json_files(fs.as_ref(), &root))
            .await
            .map_err(|err| ImportError::TaskFailed {
                path: dir.to_path_buf(),
                message: err.to_string(),
            })??;
        if files.is_empty() {
            return Err(ImportError::NoJsonFilesFound {
                path: dir.to_path_buf(),
            });
        }

        let total = files.len();
        tracing::info!("Importing {} JSON files from {}", total, dir.display());

        let permits = Arc::new(Semaphore::new(self.options.max_concurrent_files.max(1)));
        let mut tasks: JoinSet<(PathBuf, ImportResult)> = JoinSet::new();
        let mut pending: HashSet<PathBuf> = HashSet::with_capacity(total);

        for path in files {
            let importer = self.clone();
            let permits = Arc::clone(&permits);
            pending.insert(path.clone());

            tasks.spawn(async move {
                let _permit = permits.acquire_owned().await.ok();
                let result = importer.import_file(&path).await;
                (path, result)
            });
        }

        let mut results = Vec::with_capacity(total);
        let mut task_errors = Vec::new();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((path, result)) => {
                    pending.remove(&path);
                    results.push(result);
                }
                Err(err) => task_errors.push(err.to_string()),
            }
        }

        // A task that panicked never handed back its path; whatever is still
        // pending belongs to one of those tasks.
        let message = task_errors.join("; ");
        for path in pending {
            results.push(task_failure(path, message.clone()));
        }

        let outcome = DirectoryImportOutcome::from_results(results);
        match &outcome.failure {
            Some(failure) => tracing::warn!("Directory import of {}: {}", dir.display(), failure),
            None => tracing::info!(
                "Directory import of {} finished: {} documents from {} files",
                dir.display(),
                outcome.total_inserted(),
                total
            ),
        }
        Ok(outcome)
    }
}

fn task_failure(path: PathBuf, message: String) -> ImportResult {
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    ImportResult {
        collection_name: collection_name(&path),
        file_name,
        inserted_count: 0,
        duration: Duration::ZERO,
        error: Some(ImportError::TaskFailed { path, message }),
    }
}
