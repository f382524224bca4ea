//! Migration catalog: the ordered, append-only list of migration units.
//!
//! A [`Catalog`] is an ordinary value built by the caller and handed to the
//! engine. Units are never edited or removed once they have shipped; new
//! units are appended at the end.

use crate::error::{MigrateError, MigrateResult};
use crate::parser::split_statements;
use crate::sql_utils::quote_ident;
use std::collections::HashSet;

/// A read-only schema condition checked before an imperative action runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaCheck {
    /// Table (or view) exists.
    TableExists { table: String },
    /// Column exists on a table.
    ColumnExists { table: String, column: String },
}

impl SchemaCheck {
    /// Short description for log lines.
    pub fn describe(&self) -> String {
        match self {
            SchemaCheck::TableExists { table } => format!("table {table}"),
            SchemaCheck::ColumnExists { table, column } => format!("column {table}.{column}"),
        }
    }
}

/// What a migration unit does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnitKind {
    /// Raw schema-change statements, batched with a statement-by-statement fallback.
    Declarative { sql: String },
    /// A change with no native "only if missing" form: run `action` only when
    /// `check` reports the target state absent.
    Imperative { check: SchemaCheck, action: String },
}

/// One named step of the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationUnit {
    name: String,
    kind: UnitKind,
}

impl MigrationUnit {
    /// A unit of raw schema-change statements.
    pub fn declarative(name: impl Into<String>, sql: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: UnitKind::Declarative { sql: sql.into() },
        }
    }

    /// A probe-guarded unit.
    pub fn imperative(name: impl Into<String>, check: SchemaCheck, action: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: UnitKind::Imperative {
                check,
                action: action.into(),
            },
        }
    }

    /// `ALTER TABLE .. ADD COLUMN`, guarded by a column-existence probe.
    pub fn add_column(
        name: impl Into<String>,
        table: &str,
        column: &str,
        definition: &str,
    ) -> Self {
        let action = format!(
            "ALTER TABLE {} ADD COLUMN {} {}",
            quote_ident(table),
            quote_ident(column),
            definition.trim()
        );
        Self::imperative(
            name,
            SchemaCheck::ColumnExists {
                table: table.to_string(),
                column: column.to_string(),
            },
            action,
        )
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> &UnitKind {
        &self.kind
    }

    /// `declarative` or `imperative`.
    pub fn kind_label(&self) -> &'static str {
        match self.kind {
            UnitKind::Declarative { .. } => "declarative",
            UnitKind::Imperative { .. } => "imperative",
        }
    }
}

/// Ordered, immutable list of migration units with unique names.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    units: Vec<MigrationUnit>,
}

impl Catalog {
    /// Build a catalog, rejecting empty names, duplicate names, and units
    /// with no executable SQL.
    pub fn new(units: Vec<MigrationUnit>) -> MigrateResult<Self> {
        let mut seen = HashSet::new();
        for unit in &units {
            if unit.name.trim().is_empty() {
                return Err(MigrateError::CatalogInvalid(
                    "migration unit with empty name".to_string(),
                ));
            }
            if !seen.insert(unit.name.as_str()) {
                return Err(MigrateError::CatalogInvalid(format!(
                    "duplicate migration name '{}'",
                    unit.name
                )));
            }
            let body = match &unit.kind {
                UnitKind::Declarative { sql } => sql,
                UnitKind::Imperative { action, .. } => action,
            };
            if split_statements(body).is_empty() {
                return Err(MigrateError::CatalogInvalid(format!(
                    "migration '{}' has no statements",
                    unit.name
                )));
            }
        }
        Ok(Self { units })
    }

    /// All units, in application order.
    pub fn list(&self) -> &[MigrationUnit] {
        &self.units
    }

    pub fn iter(&self) -> std::slice::Iter<'_, MigrationUnit> {
        self.units.iter()
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// Look up a unit by name.
    pub fn get(&self, name: &str) -> Option<&MigrationUnit> {
        self.units.iter().find(|u| u.name == name)
    }

    /// A catalog holding only the first `count` units.
    pub fn prefix(&self, count: usize) -> Catalog {
        Catalog {
            units: self.units.iter().take(count).cloned().collect(),
        }
    }

    /// The same units in reverse order.
    pub fn reversed(&self) -> Catalog {
        Catalog {
            units: self.units.iter().rev().cloned().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a MigrationUnit;
    type IntoIter = std::slice::Iter<'a, MigrationUnit>;

    fn into_iter(self) -> Self::IntoIter {
        self.units.iter()
    }
}

#[cfg(test)]
#[path = "catalog_test.rs"]
mod tests;
