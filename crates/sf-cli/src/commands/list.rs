//! List command implementation

use anyhow::{Context, Result};
use sf_schema::storefront_catalog;

/// Execute the list command
pub async fn execute() -> Result<()> {
    let catalog = storefront_catalog().context("Invalid migration catalog")?;

    for unit in &catalog {
        println!("{:<32} {}", unit.name(), unit.kind_label());
    }
    println!();
    println!("{} migration units", catalog.len());
    Ok(())
}
