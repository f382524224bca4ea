//! sf-migrate - forward-only schema migrations for the storefront database
//!
//! Applies an ordered, append-only [`Catalog`] of migration units to a live
//! schema. There is no version table: every run re-derives state from the
//! schema itself, so running the full catalog again from any starting point
//! is always safe. Two transports share the catalog and the error
//! classification rules: the in-process [`Engine`] and the
//! [`ExternalRunner`], which shells out to a database CLI.

pub mod catalog;
pub mod classify;
pub mod config;
pub mod engine;
pub mod error;
pub mod external;
pub mod normalize;
pub mod parser;
pub mod probe;
pub mod report;
pub mod sql_utils;
pub mod target;

pub use catalog::{Catalog, MigrationUnit, SchemaCheck, UnitKind};
pub use classify::{Classifier, ErrorClass};
pub use config::Config;
pub use engine::{is_database_migrated, run_migrations, Engine};
pub use error::{MigrateError, MigrateResult};
pub use external::{ExternalRunner, ExternalTool, ShellTool, ToolOutput};
pub use probe::SchemaProbe;
pub use report::{ExecutionOutcome, RunFailure, RunReport, Transport, UnitStatus};
pub use target::{MigrationDb, Target};
