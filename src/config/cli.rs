use super::ImporterConfig;
use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "doc-importer")]
#[command(about = "Import JSON files into a document store, one collection per file")]
pub struct CliArgs {
    /// JSON file or directory to import
    pub path: PathBuf,

    /// Path to a .env file with IMPORTER_* variables
    #[arg(long = "env", value_name = "FILE")]
    pub env_file: Option<PathBuf>,

    /// Path to a TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Store URI (memory://, file:///dir or a directory path)
    #[arg(long)]
    pub uri: Option<String>,

    #[arg(long)]
    pub database: Option<String>,

    #[arg(long)]
    pub batch_size: Option<usize>,

    /// Timeout for the whole run, in seconds
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Drop `_id` fields and convert dates before inserting
    #[arg(long)]
    pub remove_id: bool,

    #[arg(long)]
    pub max_concurrent_files: Option<usize>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    /// Emit logs as JSON
    #[arg(long)]
    pub log_json: bool,
}

impl CliArgs {
    /// Command-line flags take precedence over every other source.
    pub fn apply_to(&self, mut config: ImporterConfig) -> ImporterConfig {
        if let Some(uri) = &self.uri {
            config.store_uri = uri.clone();
        }
        if let Some(database) = &self.database {
            config.database = database.clone();
        }
        if let Some(batch_size) = self.batch_size {
            config.batch_size = batch_size;
        }
        if let Some(timeout) = self.timeout {
            config.timeout_seconds = timeout;
        }
        if self.remove_id {
            config.remove_id_field = true;
        }
        if let Some(max) = self.max_concurrent_files {
            config.max_concurrent_files = max;
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_override_config() {
        let args = CliArgs::parse_from([
            "doc-importer",
            "--uri",
            "memory://",
            "--batch-size",
            "50",
            "--remove-id",
            "data/users.json",
        ]);
        let config = args.apply_to(ImporterConfig::default());

        assert_eq!(args.path, PathBuf::from("data/users.json"));
        assert_eq!(config.store_uri, "memory://");
        assert_eq!(config.batch_size, 50);
        assert!(config.remove_id_field);
        assert_eq!(config.database, "test_db");
    }

    #[test]
    fn test_path_is_required() {
        assert!(CliArgs::try_parse_from(["doc-importer"]).is_err());
    }
}
