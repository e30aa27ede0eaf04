pub mod batch;
pub mod importer;
pub mod normalizer;
pub mod parser;
pub mod paths;

#[cfg(test)]
pub(crate) mod testing;

pub use crate::domain::model::{DirectoryImportOutcome, ImportResult, PathImport, Record};
pub use crate::domain::ports::{DocumentStore, FileSystem};
pub use crate::utils::error::Result;
pub use batch::BatchWriter;
pub use importer::{ImportOptions, Importer};
