//! Status command implementation

use anyhow::{Context, Result};
use sf_migrate::is_database_migrated;
use sf_schema::BASELINE_TABLE;

use crate::cli::GlobalArgs;
use crate::commands::common::{load_config, open_database, ExitCode};

/// Exit code when the baseline schema is missing.
const NOT_MIGRATED_EXIT: i32 = 2;

/// Execute the status command
pub async fn execute(global: &GlobalArgs) -> Result<()> {
    let config = load_config(global)?;
    let sentinel = config.sentinel_or(BASELINE_TABLE);
    let db = open_database(&config)?;

    let migrated = is_database_migrated(&db, sentinel)
        .with_context(|| format!("Failed to probe {}", config.database.path))?;

    if migrated {
        println!("{}: migrated (table '{sentinel}' present)", config.database.path);
        Ok(())
    } else {
        println!("{}: not migrated (table '{sentinel}' missing)", config.database.path);
        Err(ExitCode(NOT_MIGRATED_EXIT).into())
    }
}
