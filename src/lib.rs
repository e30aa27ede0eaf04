pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::cli::CliArgs;
pub use crate::config::ImporterConfig;

pub use crate::adapters::fs::LocalFileSystem;
pub use crate::adapters::store::{connect, JsonLinesStore, MemoryStore};
pub use crate::core::{ImportOptions, Importer};
pub use crate::domain::model::{DirectoryImportOutcome, ImportResult, PathImport, Record};
pub use crate::domain::ports::{DocumentStore, FileSystem};
pub use crate::domain::value::Value;
pub use crate::utils::error::{ImportError, Result, StoreError};
