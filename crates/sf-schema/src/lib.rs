//! sf-schema - the storefront's migration catalog
//!
//! Units are embedded `.sql` files plus probe-guarded column additions. The
//! list is append-only: a shipped unit's name and body never change, new
//! units go at the end.

use sf_migrate::{Catalog, MigrateResult, MigrationUnit};

/// Table whose presence means the baseline schema is in place.
pub const BASELINE_TABLE: &str = "products";

/// Build the production catalog, in application order.
pub fn storefront_catalog() -> MigrateResult<Catalog> {
    Catalog::new(vec![
        MigrationUnit::declarative("0001_core_tables", include_str!("sql/0001_core_tables.sql")),
        MigrationUnit::declarative(
            "0002_default_category",
            include_str!("sql/0002_default_category.sql"),
        ),
        MigrationUnit::declarative("0003_carts", include_str!("sql/0003_carts.sql")),
        MigrationUnit::declarative("0004_orders", include_str!("sql/0004_orders.sql")),
        MigrationUnit::add_column("0005_products_image_url", "products", "image_url", "VARCHAR"),
        MigrationUnit::add_column(
            "0006_users_is_admin",
            "users",
            "is_admin",
            "BOOLEAN NOT NULL DEFAULT false",
        ),
        MigrationUnit::declarative("0007_reviews", include_str!("sql/0007_reviews.sql")),
        MigrationUnit::declarative(
            "0008_order_status_index",
            include_str!("sql/0008_order_status_index.sql"),
        ),
    ])
}
