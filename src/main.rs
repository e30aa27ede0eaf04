use clap::Parser;
use doc_importer::config::toml_config::TomlConfig;
use doc_importer::utils::{logger, validation::Validate};
use doc_importer::{connect, CliArgs, ImportError, ImportResult, Importer, ImporterConfig, PathImport};
use std::time::{Duration, Instant};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();

    if args.log_json {
        logger::init_json_logger(args.verbose);
    } else {
        logger::init_cli_logger(args.verbose);
    }

    let config = match load_config(&args) {
        Ok(config) => config,
        Err(e) => fail(&e),
    };
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        fail(&e);
    }
    if args.verbose {
        tracing::debug!("Config: {:?}", config);
    }

    let store = match connect(&config.store_uri, &config.database) {
        Ok(store) => store,
        Err(e) => fail(&ImportError::from(e)),
    };

    let importer = Importer::new(store.clone(), config.import_options());
    let cancel = importer.cancellation_token();
    let timeout = config.timeout();
    let watchdog = tokio::spawn(async move {
        tokio::select! {
            _ = tokio::time::sleep(timeout) => {
                tracing::warn!("⏱️ Timeout of {:?} reached, cancelling import", timeout);
            }
            _ = tokio::signal::ctrl_c() => {
                tracing::warn!("Received interrupt signal, cancelling import");
            }
        }
        cancel.cancel();
    });

    tracing::info!("🚀 Starting import: {}", args.path.display());
    tracing::info!("Using store: {}, database: {}", config.store_uri, config.database);

    let started = Instant::now();
    let outcome = importer.import_path(&args.path).await;
    watchdog.abort();

    if let Err(e) = store.disconnect().await {
        tracing::error!("Error disconnecting from store: {}", e);
    }

    match outcome {
        Ok(import) => {
            display_results(&import, started.elapsed());
            if let Some(e) = import.error() {
                tracing::error!("❌ {}", e);
                let code = e.exit_code();
                if code > 0 {
                    std::process::exit(code);
                }
            }
        }
        Err(e) => {
            tracing::error!("❌ Error during import: {}", e);
            fail(&e);
        }
    }

    Ok(())
}

/// Defaults, then the TOML file, then the environment, then flags.
fn load_config(args: &CliArgs) -> doc_importer::Result<ImporterConfig> {
    ImporterConfig::load_env_file(args.env_file.as_deref())?;

    let mut config = ImporterConfig::default();
    if let Some(path) = &args.config {
        tracing::info!("📁 Loading configuration from: {}", path.display());
        config = TomlConfig::from_file(path)?.apply_to(config);
    }
    let config = config.with_env()?;
    Ok(args.apply_to(config))
}

fn fail(e: &ImportError) -> ! {
    eprintln!("❌ {}", e);
    std::process::exit(e.exit_code().max(1));
}

fn display_results(import: &PathImport, elapsed: Duration) {
    match import {
        PathImport::File(result) => {
            println!("\nImport results for file '{}':", result.file_name);
            println!("  Collection: {}", result.collection_name);
            println!("  Documents inserted: {}", result.inserted_count);
            println!("  Processing time: {:?}", result.duration);
            if let Some(e) = &result.error {
                println!("  Error: {}", e);
            }
        }
        PathImport::Directory(outcome) => {
            println!("\nDirectory import results ({} files):", outcome.results.len());
            for result in &outcome.results {
                println!("{}", result_line(result));
            }
            println!(
                "\nTotal: {} documents, {} files succeeded, {} files failed",
                outcome.total_inserted(),
                outcome.succeeded(),
                outcome.failed()
            );
        }
    }
    println!("\nTotal processing time: {:?}", elapsed);
}

fn result_line(result: &ImportResult) -> String {
    match &result.error {
        None => format!(
            "  ✓ {} -> {} ({} documents, {:?})",
            result.file_name, result.collection_name, result.inserted_count, result.duration
        ),
        Some(e) => format!("  ✗ {} -> Error: {}", result.file_name, e),
    }
}
