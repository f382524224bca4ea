//! External command implementation: apply the catalog through a database CLI

use anyhow::{Context, Result};
use sf_migrate::{ExternalRunner, ShellTool};
use sf_schema::storefront_catalog;

use crate::cli::{ExternalArgs, GlobalArgs};
use crate::commands::common::{finish_report, load_config};

/// Execute the external command
pub async fn execute(args: &ExternalArgs, global: &GlobalArgs) -> Result<()> {
    let config = load_config(global)?;
    let catalog = storefront_catalog().context("Invalid migration catalog")?;
    let template = args
        .command
        .clone()
        .unwrap_or_else(|| config.external_command());
    let tool = ShellTool::new(template).context("Invalid external command template")?;

    if !args.json {
        println!("Migrating via: {}", tool.template());
        if args.dry_run {
            println!("Dry run - commands are printed, not executed");
        }
    }

    let report = ExternalRunner::new(tool)
        .with_classifier(config.classifier())
        .dry_run(args.dry_run)
        .run(&catalog)
        .await;
    finish_report(&report, args.json)
}
