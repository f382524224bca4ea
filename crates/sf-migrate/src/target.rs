//! Migration targets.
//!
//! [`Target`] is the seam between the engine and a live database. The DuckDB
//! implementation covers both a bare [`duckdb::Connection`] and the owning
//! [`MigrationDb`] wrapper.

use crate::error::{MigrateError, MigrateResult};
use duckdb::Connection;
use std::path::Path;

/// A database the engine can migrate.
///
/// Errors must carry the driver's message as [`MigrateError::ExecutionError`]
/// so the classifier can inspect it.
pub trait Target {
    /// Execute one or more statements.
    fn execute_batch(&self, sql: &str) -> MigrateResult<()>;

    /// Execute a single statement.
    fn execute(&self, sql: &str) -> MigrateResult<()>;

    /// Run a query returning one integer in the first column of the first row.
    fn query_count(&self, sql: &str) -> MigrateResult<i64>;

    /// Database type identifier for logging.
    fn db_type(&self) -> &'static str;

    /// Execute `sql` inside `BEGIN TRANSACTION` / `COMMIT`, rolling back on
    /// error so a failed batch leaves no partial state.
    fn execute_atomic(&self, sql: &str) -> MigrateResult<()> {
        self.execute_batch("BEGIN TRANSACTION")?;
        match self.execute_batch(sql) {
            Ok(()) => {
                if let Err(commit_err) = self.execute_batch("COMMIT") {
                    let _ = self.execute_batch("ROLLBACK");
                    return Err(commit_err);
                }
                Ok(())
            }
            Err(err) => {
                let _ = self.execute_batch("ROLLBACK");
                Err(err)
            }
        }
    }
}

impl Target for Connection {
    fn execute_batch(&self, sql: &str) -> MigrateResult<()> {
        Connection::execute_batch(self, sql).map_err(MigrateError::from)
    }

    fn execute(&self, sql: &str) -> MigrateResult<()> {
        Connection::execute_batch(self, sql).map_err(MigrateError::from)
    }

    fn query_count(&self, sql: &str) -> MigrateResult<i64> {
        self.query_row(sql, [], |row| row.get::<_, i64>(0))
            .map_err(MigrateError::from)
    }

    fn db_type(&self) -> &'static str {
        "duckdb"
    }
}

/// Owning wrapper around the storefront's DuckDB connection.
///
/// Single-threaded; migrations never run concurrently.
pub struct MigrationDb {
    conn: Connection,
}

impl MigrationDb {
    /// Open (or create) the database at `path`. No migrations are run.
    pub fn open(path: &Path) -> MigrateResult<Self> {
        let conn = Connection::open(path)
            .map_err(|e| MigrateError::ConnectionError(format!("{e}: {}", path.display())))?;
        Ok(Self { conn })
    }

    /// Create an empty in-memory database.
    pub fn open_memory() -> MigrateResult<Self> {
        let conn =
            Connection::open_in_memory().map_err(|e| MigrateError::ConnectionError(e.to_string()))?;
        Ok(Self { conn })
    }

    /// Open from a path string, treating `:memory:` as in-memory.
    pub fn new(path: &str) -> MigrateResult<Self> {
        if path == ":memory:" {
            Self::open_memory()
        } else {
            Self::open(Path::new(path))
        }
    }

    /// Borrow the underlying DuckDB connection.
    pub fn conn(&self) -> &Connection {
        &self.conn
    }
}

impl Target for MigrationDb {
    fn execute_batch(&self, sql: &str) -> MigrateResult<()> {
        Target::execute_batch(&self.conn, sql)
    }

    fn execute(&self, sql: &str) -> MigrateResult<()> {
        Target::execute(&self.conn, sql)
    }

    fn query_count(&self, sql: &str) -> MigrateResult<i64> {
        self.conn.query_count(sql)
    }

    fn db_type(&self) -> &'static str {
        self.conn.db_type()
    }
}
