use super::*;
use crate::target::MigrationDb;

/// Delegates to DuckDB but rejects every `information_schema` query, forcing
/// the doomed-SELECT strategy.
struct NoMetadata(MigrationDb);

impl Target for NoMetadata {
    fn execute_batch(&self, sql: &str) -> MigrateResult<()> {
        self.0.execute_batch(sql)
    }

    fn execute(&self, sql: &str) -> MigrateResult<()> {
        self.0.execute(sql)
    }

    fn query_count(&self, sql: &str) -> MigrateResult<i64> {
        if sql.contains("information_schema") {
            return Err(MigrateError::ExecutionError(
                "Catalog Error: information_schema is unavailable".to_string(),
            ));
        }
        self.0.query_count(sql)
    }

    fn db_type(&self) -> &'static str {
        "duckdb-no-metadata"
    }
}

/// Every query fails with a connectivity error.
struct Disconnected;

impl Target for Disconnected {
    fn execute_batch(&self, _sql: &str) -> MigrateResult<()> {
        Err(MigrateError::ExecutionError("IO Error: connection lost".to_string()))
    }

    fn execute(&self, _sql: &str) -> MigrateResult<()> {
        Err(MigrateError::ExecutionError("IO Error: connection lost".to_string()))
    }

    fn query_count(&self, _sql: &str) -> MigrateResult<i64> {
        Err(MigrateError::ExecutionError("IO Error: connection lost".to_string()))
    }

    fn db_type(&self) -> &'static str {
        "disconnected"
    }
}

fn db_with_products() -> MigrationDb {
    let db = MigrationDb::open_memory().unwrap();
    db.execute_batch("CREATE TABLE products (id INTEGER PRIMARY KEY, title VARCHAR NOT NULL);")
        .unwrap();
    db
}

#[test]
fn test_table_exists_via_metadata() {
    let db = db_with_products();
    let classifier = Classifier::default();
    let probe = SchemaProbe::new(&db, &classifier);
    assert!(probe.table_exists("products").unwrap());
    assert!(probe.table_exists("PRODUCTS").unwrap());
    assert!(probe.table_exists("main.products").unwrap());
    assert!(!probe.table_exists("orders").unwrap());
}

#[test]
fn test_column_exists_via_metadata() {
    let db = db_with_products();
    let classifier = Classifier::default();
    let probe = SchemaProbe::new(&db, &classifier);
    assert!(probe.column_exists("products", "title").unwrap());
    assert!(!probe.column_exists("products", "image_url").unwrap());
    assert!(!probe.column_exists("orders", "status").unwrap());
}

#[test]
fn test_baseline_migrated() {
    let classifier = Classifier::default();
    let empty = MigrationDb::open_memory().unwrap();
    assert!(!SchemaProbe::new(&empty, &classifier)
        .baseline_migrated("products")
        .unwrap());

    let db = db_with_products();
    assert!(SchemaProbe::new(&db, &classifier)
        .baseline_migrated("products")
        .unwrap());
}

#[test]
fn test_check_dispatch() {
    let db = db_with_products();
    let classifier = Classifier::default();
    let probe = SchemaProbe::new(&db, &classifier);
    assert!(probe
        .check(&SchemaCheck::TableExists {
            table: "products".to_string()
        })
        .unwrap());
    assert!(!probe
        .check(&SchemaCheck::ColumnExists {
            table: "products".to_string(),
            column: "image_url".to_string(),
        })
        .unwrap());
}

#[test]
fn test_doomed_select_fallback() {
    let target = NoMetadata(db_with_products());
    let classifier = Classifier::default();
    let probe = SchemaProbe::new(&target, &classifier);
    assert!(probe.table_exists("products").unwrap());
    assert!(!probe.table_exists("orders").unwrap());
    assert!(probe.column_exists("products", "title").unwrap());
    assert!(!probe.column_exists("products", "image_url").unwrap());
    assert!(!probe.column_exists("orders", "status").unwrap());
}

#[test]
fn test_ambiguous_probe_failure_is_an_error() {
    let classifier = Classifier::default();
    let probe = SchemaProbe::new(&Disconnected, &classifier);
    let err = probe.table_exists("products").unwrap_err();
    match err {
        MigrateError::ProbeError { subject, message } => {
            assert_eq!(subject, "products");
            assert!(message.contains("connection lost"));
        }
        other => panic!("expected probe error, got {other:?}"),
    }
}
