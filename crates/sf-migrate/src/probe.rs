//! Read-only schema probes.
//!
//! State is always re-derived from the live schema; there is no version
//! table. Metadata lookups go through `information_schema`. If that query
//! itself fails, the probe falls back to a doomed `SELECT ... LIMIT 0` and
//! reads its error: a "not found" error is a successful `false`, anything
//! else is a [`MigrateError::ProbeError`].

use crate::catalog::SchemaCheck;
use crate::classify::Classifier;
use crate::error::{MigrateError, MigrateResult};
use crate::sql_utils::{quote_ident, string_literal, TableName};
use crate::target::Target;

/// Schema probe bound to a target.
pub struct SchemaProbe<'a, T: Target + ?Sized> {
    target: &'a T,
    classifier: &'a Classifier,
}

impl<'a, T: Target + ?Sized> SchemaProbe<'a, T> {
    pub fn new(target: &'a T, classifier: &'a Classifier) -> Self {
        Self { target, classifier }
    }

    /// Whether a table or view named `name` (optionally `schema.name`) exists.
    pub fn table_exists(&self, name: &str) -> MigrateResult<bool> {
        let table = TableName::parse(name);
        let sql = format!(
            "SELECT COUNT(*) FROM information_schema.tables WHERE {}",
            table.metadata_predicate()
        );
        match self.target.query_count(&sql) {
            Ok(count) => Ok(count > 0),
            Err(err) => {
                log::debug!("metadata lookup for table {name} failed, probing with SELECT: {err}");
                self.doomed_select(name, &format!("SELECT * FROM {} LIMIT 0", table.quoted()))
            }
        }
    }

    /// Whether `column` exists on `table`. A missing table yields `false`.
    pub fn column_exists(&self, table: &str, column: &str) -> MigrateResult<bool> {
        let name = TableName::parse(table);
        let sql = format!(
            "SELECT COUNT(*) FROM information_schema.columns WHERE {} \
             AND lower(column_name) = lower({})",
            name.metadata_predicate(),
            string_literal(column)
        );
        match self.target.query_count(&sql) {
            Ok(count) => Ok(count > 0),
            Err(err) => {
                log::debug!(
                    "metadata lookup for column {table}.{column} failed, probing with SELECT: {err}"
                );
                self.doomed_select(
                    &format!("{table}.{column}"),
                    &format!(
                        "SELECT {} FROM {} LIMIT 0",
                        quote_ident(column),
                        name.quoted()
                    ),
                )
            }
        }
    }

    /// True iff the sentinel table exists.
    pub fn baseline_migrated(&self, sentinel: &str) -> MigrateResult<bool> {
        self.table_exists(sentinel)
    }

    /// Evaluate an imperative unit's precondition.
    pub fn check(&self, check: &SchemaCheck) -> MigrateResult<bool> {
        match check {
            SchemaCheck::TableExists { table } => self.table_exists(table),
            SchemaCheck::ColumnExists { table, column } => self.column_exists(table, column),
        }
    }

    fn doomed_select(&self, subject: &str, select: &str) -> MigrateResult<bool> {
        let counted = format!("SELECT COUNT(*) FROM ({select}) AS probe");
        match self.target.query_count(&counted) {
            Ok(_) => Ok(true),
            Err(err) => {
                let message = err.driver_message();
                if self.classifier.is_not_found(&message) {
                    Ok(false)
                } else {
                    Err(MigrateError::ProbeError {
                        subject: subject.to_string(),
                        message,
                    })
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "probe_test.rs"]
mod tests;
