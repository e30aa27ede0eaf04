use crate::domain::model::Record;
use crate::utils::error::{ImportError, Result};
use serde_json::{Map, Value as JsonValue};
use std::path::Path;

/// Parses a file's contents into records.
///
/// Accepts either an array of objects (order kept) or a single object, which
/// becomes a one-element sequence. Anything else is `InvalidJsonFormat`,
/// carrying the error from the single-object attempt.
pub fn parse_documents(path: &Path, bytes: &[u8]) -> Result<Vec<Record>> {
    if let Ok(documents) = serde_json::from_slice::<Vec<Map<String, JsonValue>>>(bytes) {
        tracing::debug!("Parsed {} documents from array in {}", documents.len(), path.display());
        return Ok(documents.into_iter().map(Record::from).collect());
    }

    let document: Map<String, JsonValue> =
        serde_json::from_slice(bytes).map_err(|source| ImportError::InvalidJsonFormat {
            path: path.to_path_buf(),
            source,
        })?;

    tracing::debug!("Parsed single document from {}", path.display());
    Ok(vec![Record::from(document)])
}
