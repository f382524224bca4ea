//! Shared utilities for CLI commands

use anyhow::{Context, Result};
use sf_migrate::config::DEFAULT_CONFIG_FILE;
use sf_migrate::{Config, MigrationDb, RunReport};
use std::fmt;
use std::path::Path;

use crate::cli::GlobalArgs;

/// Error type representing a non-zero process exit code.
///
/// Use `return Err(ExitCode(N).into())` instead of `std::process::exit(N)`
/// so that RAII destructors run and the database is closed cleanly.
#[derive(Debug)]
pub(crate) struct ExitCode(pub(crate) i32);

impl fmt::Display for ExitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Control flow only; main() exits without printing this.
        write!(f, "")
    }
}

impl std::error::Error for ExitCode {}

/// Load config from `--config`, or `./storefront.yml` when present, then
/// apply command-line overrides.
pub(crate) fn load_config(global: &GlobalArgs) -> Result<Config> {
    let mut config = match &global.config {
        Some(path) => Config::load(Path::new(path))
            .with_context(|| format!("Failed to load config {path}"))?,
        None => Config::load_or_default(Path::new(DEFAULT_CONFIG_FILE))
            .context("Failed to load storefront.yml")?,
    };
    if let Some(database) = &global.database {
        config.database.path = database.clone();
    }
    Ok(config)
}

/// Open the configured DuckDB database.
pub(crate) fn open_database(config: &Config) -> Result<MigrationDb> {
    MigrationDb::new(&config.database.path)
        .with_context(|| format!("Failed to open database {}", config.database.path))
}

/// Print a run report as text or JSON, and map failure to exit code 1.
pub(crate) fn finish_report(report: &RunReport, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
    } else {
        println!("{report}");
    }

    if report.success {
        Ok(())
    } else {
        if !json {
            if let Some(failure) = &report.failure {
                eprintln!("Error: {failure}");
            }
        }
        Err(ExitCode(1).into())
    }
}
