//! Migrate command implementation

use anyhow::{Context, Result};
use sf_migrate::Engine;
use sf_schema::storefront_catalog;

use crate::cli::{GlobalArgs, MigrateArgs};
use crate::commands::common::{finish_report, load_config, open_database};

/// Execute the migrate command
pub async fn execute(args: &MigrateArgs, global: &GlobalArgs) -> Result<()> {
    let config = load_config(global)?;
    let catalog = storefront_catalog().context("Invalid migration catalog")?;
    let db = open_database(&config)?;

    if !args.json {
        println!(
            "Migrating {} ({} units)",
            config.database.path,
            catalog.len()
        );
    }

    let report = Engine::new(&db)
        .with_classifier(config.classifier())
        .run(&catalog);
    finish_report(&report, args.json)
}
