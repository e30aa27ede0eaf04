#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

use crate::core::batch::DEFAULT_BATCH_SIZE;
use crate::core::importer::{ImportOptions, DEFAULT_MAX_CONCURRENT_FILES};
use crate::utils::error::{ImportError, Result};
use crate::utils::validation::{
    validate_collection_safe_name, validate_positive_number, validate_range, validate_store_uri,
    Validate,
};
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

pub const ENV_STORE_URI: &str = "IMPORTER_STORE_URI";
pub const ENV_DATABASE: &str = "IMPORTER_DATABASE";
pub const ENV_TIMEOUT_SECONDS: &str = "IMPORTER_TIMEOUT_SECONDS";
pub const ENV_BATCH_SIZE: &str = "IMPORTER_BATCH_SIZE";
pub const ENV_REMOVE_ID: &str = "IMPORTER_REMOVE_ID";
pub const ENV_MAX_CONCURRENT_FILES: &str = "IMPORTER_MAX_CONCURRENT_FILES";

/// Everything needed to connect to a store and run an import.
#[derive(Debug, Clone, PartialEq)]
pub struct ImporterConfig {
    pub store_uri: String,
    pub database: String,
    pub timeout_seconds: u64,
    pub batch_size: usize,
    pub remove_id_field: bool,
    pub max_concurrent_files: usize,
}

impl Default for ImporterConfig {
    fn default() -> Self {
        Self {
            store_uri: "./store".to_string(),
            database: "test_db".to_string(),
            timeout_seconds: 10,
            batch_size: DEFAULT_BATCH_SIZE,
            remove_id_field: false,
            max_concurrent_files: DEFAULT_MAX_CONCURRENT_FILES,
        }
    }
}

impl ImporterConfig {
    /// Loads `path` into the process environment, or a `.env` file from the
    /// working directory when no path is given. Only an explicit path must
    /// exist.
    pub fn load_env_file(path: Option<&Path>) -> Result<()> {
        match path {
            Some(path) => {
                dotenvy::from_path(path).map_err(|e| ImportError::ConfigError {
                    message: format!("failed to load {}: {}", path.display(), e),
                })?;
            }
            None => {
                dotenvy::dotenv().ok();
            }
        }
        Ok(())
    }

    /// Overrides fields from the process environment.
    pub fn with_env(self) -> Result<Self> {
        self.merge_lookup(|key| std::env::var(key).ok())
    }

    /// Overrides fields from `lookup`, which maps environment variable names
    /// to values. Empty values are ignored.
    pub fn merge_lookup<L>(mut self, lookup: L) -> Result<Self>
    where
        L: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(uri) = get(ENV_STORE_URI) {
            self.store_uri = uri;
        }
        if let Some(database) = get(ENV_DATABASE) {
            self.database = database;
        }
        if let Some(raw) = get(ENV_TIMEOUT_SECONDS) {
            self.timeout_seconds = parse_value(ENV_TIMEOUT_SECONDS, &raw)?;
        }
        if let Some(raw) = get(ENV_BATCH_SIZE) {
            self.batch_size = parse_value(ENV_BATCH_SIZE, &raw)?;
        }
        if let Some(raw) = get(ENV_REMOVE_ID) {
            self.remove_id_field = parse_flag(ENV_REMOVE_ID, &raw)?;
        }
        if let Some(raw) = get(ENV_MAX_CONCURRENT_FILES) {
            self.max_concurrent_files = parse_value(ENV_MAX_CONCURRENT_FILES, &raw)?;
        }
        Ok(self)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    /// Batch size with 0 mapped to the default.
    pub fn effective_batch_size(&self) -> usize {
        if self.batch_size == 0 {
            DEFAULT_BATCH_SIZE
        } else {
            self.batch_size
        }
    }

    pub fn import_options(&self) -> ImportOptions {
        ImportOptions {
            batch_size: self.effective_batch_size(),
            remove_id_field: self.remove_id_field,
            max_concurrent_files: self.max_concurrent_files,
        }
    }
}

impl Validate for ImporterConfig {
    fn validate(&self) -> Result<()> {
        validate_store_uri("store_uri", &self.store_uri)?;
        validate_collection_safe_name("database", &self.database)?;
        validate_range("timeout_seconds", self.timeout_seconds, 1, 24 * 60 * 60)?;
        validate_range("batch_size", self.effective_batch_size(), 1, 100_000)?;
        validate_positive_number("max_concurrent_files", self.max_concurrent_files, 1)?;
        Ok(())
    }
}

fn parse_value<T>(field: &str, raw: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse()
        .map_err(|e: T::Err| ImportError::InvalidConfigValue {
            field: field.to_string(),
            value: raw.to_string(),
            reason: e.to_string(),
        })
}

fn parse_flag(field: &str, raw: &str) -> Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ImportError::InvalidConfigValue {
            field: field.to_string(),
            value: raw.to_string(),
            reason: "expected true/false".to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ImporterConfig::default().merge_lookup(lookup(&[])).unwrap();
        assert_eq!(config, ImporterConfig::default());
        assert_eq!(config.database, "test_db");
        assert_eq!(config.timeout(), Duration::from_secs(10));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_lookup_overrides() {
        let config = ImporterConfig::default()
            .merge_lookup(lookup(&[
                (ENV_STORE_URI, "memory://"),
                (ENV_DATABASE, "archive"),
                (ENV_TIMEOUT_SECONDS, "30"),
                (ENV_BATCH_SIZE, "250"),
                (ENV_REMOVE_ID, "yes"),
                (ENV_MAX_CONCURRENT_FILES, "2"),
                ("UNRELATED", "x"),
            ]))
            .unwrap();

        assert_eq!(config.store_uri, "memory://");
        assert_eq!(config.database, "archive");
        assert_eq!(config.timeout_seconds, 30);
        assert!(config.remove_id_field);
        assert_eq!(
            config.import_options(),
            ImportOptions {
                batch_size: 250,
                remove_id_field: true,
                max_concurrent_files: 2,
            }
        );
    }

    #[test]
    fn test_empty_values_are_ignored() {
        let config = ImporterConfig::default()
            .merge_lookup(lookup(&[(ENV_DATABASE, "  ")]))
            .unwrap();
        assert_eq!(config.database, "test_db");
    }

    #[test]
    fn test_invalid_numbers_are_rejected() {
        let err = ImporterConfig::default()
            .merge_lookup(lookup(&[(ENV_BATCH_SIZE, "lots")]))
            .unwrap_err();
        assert!(matches!(err, ImportError::InvalidConfigValue { field, .. } if field == ENV_BATCH_SIZE));

        let err = ImporterConfig::default()
            .merge_lookup(lookup(&[(ENV_REMOVE_ID, "maybe")]))
            .unwrap_err();
        assert!(matches!(err, ImportError::InvalidConfigValue { .. }));
    }

    #[test]
    fn test_zero_batch_size_falls_back() {
        let config = ImporterConfig {
            batch_size: 0,
            ..ImporterConfig::default()
        };
        assert_eq!(config.import_options().batch_size, DEFAULT_BATCH_SIZE);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation_failures() {
        let bad_uri = ImporterConfig {
            store_uri: "mongodb://db:27017".to_string(),
            ..ImporterConfig::default()
        };
        assert!(bad_uri.validate().is_err());

        let bad_database = ImporterConfig {
            database: "../etc".to_string(),
            ..ImporterConfig::default()
        };
        assert!(bad_database.validate().is_err());

        let no_workers = ImporterConfig {
            max_concurrent_files: 0,
            ..ImporterConfig::default()
        };
        assert!(no_workers.validate().is_err());
    }

    #[test]
    fn test_load_env_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "IMPORTER_TEST_ONLY_MARKER=1").unwrap();

        ImporterConfig::load_env_file(Some(file.path())).unwrap();
        assert_eq!(std::env::var("IMPORTER_TEST_ONLY_MARKER").unwrap(), "1");

        // The importer's own keys are absent from the file, so this only
        // depends on what the test environment already has.
        assert!(ImporterConfig::default().with_env().is_ok());
    }

    #[test]
    fn test_missing_env_file() {
        let err = ImporterConfig::load_env_file(Some(Path::new("/definitely/not/here/.env")))
            .unwrap_err();
        assert!(matches!(err, ImportError::ConfigError { .. }));

        assert!(ImporterConfig::load_env_file(None).is_ok());
    }
}
