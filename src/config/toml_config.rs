use super::ImporterConfig;
use crate::utils::error::{ImportError, Result};
use regex::Regex;
use serde::Deserialize;
use std::path::Path;
use std::sync::LazyLock;

static ENV_VAR_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").expect("env var pattern is valid"));

/// Optional TOML configuration file. Every key may be omitted.
///
/// ```toml
/// [store]
/// uri = "file:///var/lib/doc-importer"
/// database = "${IMPORT_DB}"
/// timeout_seconds = 30
///
/// [import]
/// batch_size = 500
/// remove_id_field = true
/// max_concurrent_files = 4
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TomlConfig {
    pub store: Option<StoreSection>,
    pub import: Option<ImportSection>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StoreSection {
    pub uri: Option<String>,
    pub database: Option<String>,
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ImportSection {
    pub batch_size: Option<usize>,
    pub remove_id_field: Option<bool>,
    pub max_concurrent_files: Option<usize>,
}

impl TomlConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(|e| ImportError::ConfigError {
            message: format!("failed to read {}: {}", path.as_ref().display(), e),
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed = Self::substitute_env_vars(content);

        toml::from_str(&processed).map_err(|e| ImportError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the variable's value. Unset variables are left
    /// in place.
    fn substitute_env_vars(content: &str) -> String {
        ENV_VAR_PATTERN
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .into_owned()
    }

    /// Layers the values present in this file over `base`.
    pub fn apply_to(&self, mut base: ImporterConfig) -> ImporterConfig {
        if let Some(store) = &self.store {
            if let Some(uri) = &store.uri {
                base.store_uri = uri.clone();
            }
            if let Some(database) = &store.database {
                base.database = database.clone();
            }
            if let Some(timeout) = store.timeout_seconds {
                base.timeout_seconds = timeout;
            }
        }
        if let Some(import) = &self.import {
            if let Some(batch_size) = import.batch_size {
                base.batch_size = batch_size;
            }
            if let Some(remove) = import.remove_id_field {
                base.remove_id_field = remove;
            }
            if let Some(max) = import.max_concurrent_files {
                base.max_concurrent_files = max;
            }
        }
        base
    }
}
