//! Apply the production catalog to real DuckDB databases.

use sf_migrate::{
    is_database_migrated, run_migrations, Classifier, MigrationDb, SchemaProbe, Target, UnitStatus,
};
use sf_schema::{storefront_catalog, BASELINE_TABLE};

const TABLES: &[&str] = &[
    "users",
    "categories",
    "products",
    "carts",
    "cart_items",
    "orders",
    "order_items",
    "reviews",
];

#[test]
fn fresh_database_migrates_completely() {
    let db = MigrationDb::open_memory().unwrap();
    let catalog = storefront_catalog().unwrap();
    assert!(!is_database_migrated(&db, BASELINE_TABLE).unwrap());

    let rep = run_migrations(&db, &catalog);
    assert!(rep.success, "{rep}");
    assert_eq!(rep.applied, catalog.len());

    let classifier = Classifier::default();
    let probe = SchemaProbe::new(&db, &classifier);
    for table in TABLES {
        assert!(probe.table_exists(table).unwrap(), "missing table {table}");
    }
    assert!(probe.column_exists("products", "image_url").unwrap());
    assert!(probe.column_exists("users", "is_admin").unwrap());
    assert!(is_database_migrated(&db, BASELINE_TABLE).unwrap());

    let categories = db.query_count("SELECT COUNT(*) FROM categories").unwrap();
    assert_eq!(categories, 1);
}

#[test]
fn rerun_reports_every_unit_skipped() {
    let db = MigrationDb::open_memory().unwrap();
    let catalog = storefront_catalog().unwrap();
    assert!(run_migrations(&db, &catalog).success);

    let rep = run_migrations(&db, &catalog);
    assert!(rep.success, "{rep}");
    assert!(
        rep.outcomes.iter().all(|o| o.status == UnitStatus::Skipped),
        "{rep}"
    );
    assert_eq!(db.query_count("SELECT COUNT(*) FROM categories").unwrap(), 1);
}

#[test]
fn partially_migrated_database_catches_up() {
    let catalog = storefront_catalog().unwrap();
    for k in [1, 4, 6] {
        let db = MigrationDb::open_memory().unwrap();
        assert!(run_migrations(&db, &catalog.prefix(k)).success);

        let rep = run_migrations(&db, &catalog);
        assert!(rep.success, "k={k}: {rep}");
        assert_eq!(rep.skipped, k, "k={k}");
        assert_eq!(rep.applied, catalog.len() - k, "k={k}");
    }
}

#[test]
fn migrated_file_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("storefront.duckdb");
    let catalog = storefront_catalog().unwrap();
    {
        let db = MigrationDb::open(&path).unwrap();
        assert!(run_migrations(&db, &catalog).success);
    }
    let db = MigrationDb::open(&path).unwrap();
    assert!(is_database_migrated(&db, BASELINE_TABLE).unwrap());
    assert_eq!(run_migrations(&db, &catalog).skipped, catalog.len());
}
