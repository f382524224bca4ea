//! Show command implementation

use anyhow::{bail, Context, Result};
use sf_migrate::UnitKind;
use sf_schema::storefront_catalog;

use crate::cli::ShowArgs;

/// Execute the show command
pub async fn execute(args: &ShowArgs) -> Result<()> {
    let catalog = storefront_catalog().context("Invalid migration catalog")?;
    let Some(unit) = catalog.get(&args.name) else {
        bail!("Unknown migration unit '{}' (see `sfm list`)", args.name);
    };

    println!("-- {} ({})", unit.name(), unit.kind_label());
    match unit.kind() {
        UnitKind::Declarative { sql } => println!("{}", sql.trim_end()),
        UnitKind::Imperative { check, action } => {
            println!("-- skipped when {} exists", check.describe());
            println!("{action};");
        }
    }
    Ok(())
}
