//! In-process execution engine.
//!
//! Units are applied strictly in catalog order and the run stops at the first
//! fatal failure. A declarative unit is first tried as one transactional
//! batch; if that fails, its statements are replayed one at a time so that
//! already-applied statements can be skipped individually.

use crate::catalog::{Catalog, MigrationUnit, SchemaCheck, UnitKind};
use crate::classify::{Classifier, ErrorClass};
use crate::error::{MigrateError, MigrateResult};
use crate::normalize::normalize;
use crate::parser::{parse_create_table, split_statements, TableDefinition};
use crate::probe::SchemaProbe;
use crate::report::{report, ExecutionOutcome, RunReport, Transport};
use crate::target::Target;
use chrono::Utc;

/// Decision for a statement that failed during the fallback path.
#[derive(Debug)]
enum StatementFailure {
    /// Already applied; count as skipped and continue.
    Skip,
    /// Abort the run.
    Fatal(String),
}

/// Applies migration units to a [`Target`].
pub struct Engine<'a, T: Target + ?Sized> {
    target: &'a T,
    classifier: Classifier,
}

impl<'a, T: Target + ?Sized> Engine<'a, T> {
    pub fn new(target: &'a T) -> Self {
        Self {
            target,
            classifier: Classifier::default(),
        }
    }

    /// Replace the error classifier (e.g. for another SQL dialect).
    pub fn with_classifier(mut self, classifier: Classifier) -> Self {
        self.classifier = classifier;
        self
    }

    pub fn classifier(&self) -> &Classifier {
        &self.classifier
    }

    fn probe(&self) -> SchemaProbe<'_, T> {
        SchemaProbe::new(self.target, &self.classifier)
    }

    /// Apply every unit in order, stopping at the first failure.
    pub fn run(&self, catalog: &Catalog) -> RunReport {
        let started_at = Utc::now();
        let mut outcomes = Vec::with_capacity(catalog.len());
        log::debug!(
            "Running {} migrations against {} (ignorable errors: {:?})",
            catalog.len(),
            self.target.db_type(),
            self.classifier.patterns()
        );

        for unit in catalog {
            let outcome = self.apply(unit);
            let failed = outcome.error().is_some();
            outcomes.push(outcome);
            if failed {
                log::debug!("Stopping run after failed migration {}", unit.name());
                break;
            }
        }

        report(outcomes, Transport::InProcess, started_at)
    }

    /// Apply a single unit.
    pub fn apply(&self, unit: &MigrationUnit) -> ExecutionOutcome {
        log::debug!("Applying migration {} ({})", unit.name(), unit.kind_label());
        match unit.kind() {
            UnitKind::Imperative { check, action } => self.apply_imperative(unit.name(), check, action),
            UnitKind::Declarative { sql } => self.apply_declarative(unit.name(), sql),
        }
    }

    fn apply_imperative(&self, name: &str, check: &SchemaCheck, action: &str) -> ExecutionOutcome {
        match self.probe().check(check) {
            Ok(true) => {
                log::info!("Migration {name}: {} already present", check.describe());
                return ExecutionOutcome::skipped(name, 1);
            }
            Ok(false) => {}
            Err(err) => return ExecutionOutcome::failed(name, action, err.to_string()),
        }

        match self.target.execute(action) {
            Ok(()) => ExecutionOutcome::applied(name, 1, 0),
            Err(err) => {
                let message = err.driver_message();
                match self.classifier.classify(&message) {
                    ErrorClass::Ignorable => {
                        log::info!("Migration {name}: {} appeared concurrently ({message})", check.describe());
                        ExecutionOutcome::skipped(name, 1)
                    }
                    ErrorClass::Fatal => ExecutionOutcome::failed(name, action, message),
                }
            }
        }
    }

    fn apply_declarative(&self, name: &str, sql: &str) -> ExecutionOutcome {
        let batch = normalize(sql);
        let batch_err = match self.target.execute_atomic(&batch) {
            Ok(()) => {
                let count = split_statements(sql).len();
                return ExecutionOutcome::applied(name, count, 0);
            }
            Err(err) => err,
        };
        log::debug!("Migration {name}: batch failed, replaying statement by statement: {batch_err}");

        let mut executed = 0;
        let mut skipped = 0;
        for statement in split_statements(sql) {
            match self.target.execute(&statement) {
                Ok(()) => executed += 1,
                Err(err) => match self.on_statement_failure(name, &statement, &err) {
                    StatementFailure::Skip => skipped += 1,
                    StatementFailure::Fatal(message) => {
                        return ExecutionOutcome::failed(name, &statement, message);
                    }
                },
            }
        }

        if executed == 0 && skipped > 0 {
            ExecutionOutcome::skipped(name, skipped)
        } else {
            ExecutionOutcome::applied(name, executed, skipped)
        }
    }

    fn on_statement_failure(&self, name: &str, statement: &str, err: &MigrateError) -> StatementFailure {
        let message = err.driver_message();
        if self.classifier.is_ignorable(&message) {
            log::info!("Migration {name}: statement already applied ({message})");
            return StatementFailure::Skip;
        }

        if self.classifier.is_missing_relation(&message) {
            if let Some(definition) = parse_create_table(statement) {
                if !definition.references.is_empty() {
                    return self.resolve_missing_reference(name, &definition, message);
                }
            }
        }
        StatementFailure::Fatal(message)
    }

    /// A `CREATE TABLE` with foreign keys failed on a missing relation.
    ///
    /// Tolerated only when the error names one of the referenced tables, every
    /// referenced table exists and the table itself exists. Any table verified
    /// absent is fatal. A probe that cannot answer logs a warning and the run
    /// continues.
    fn resolve_missing_reference(
        &self,
        name: &str,
        definition: &TableDefinition,
        message: String,
    ) -> StatementFailure {
        let names_reference = definition
            .references
            .iter()
            .any(|table| self.classifier.mentions_relation(&message, table));
        if !names_reference {
            return StatementFailure::Fatal(message);
        }

        let probe = self.probe();
        let mut unverified = Vec::new();
        for table in &definition.references {
            match probe.table_exists(table) {
                Ok(true) => {}
                Ok(false) => {
                    return StatementFailure::Fatal(format!(
                        "{message} (referenced table '{table}' does not exist)"
                    ));
                }
                Err(err) => unverified.push(format!("{table}: {err}")),
            }
        }
        match probe.table_exists(&definition.table) {
            Ok(true) => {}
            Ok(false) => {
                return StatementFailure::Fatal(format!(
                    "{message} (table '{}' was not created)",
                    definition.table
                ));
            }
            Err(err) => unverified.push(format!("{}: {err}", definition.table)),
        }

        if unverified.is_empty() {
            log::info!(
                "Migration {name}: table '{}' and its foreign key targets present, tolerating '{message}'",
                definition.table
            );
        } else {
            log::warn!(
                "Migration {name}: could not verify tables ({}), continuing after '{message}'",
                unverified.join("; ")
            );
        }
        StatementFailure::Skip
    }
}

/// Apply `catalog` to `target` with the default classifier.
pub fn run_migrations<T: Target + ?Sized>(target: &T, catalog: &Catalog) -> RunReport {
    Engine::new(target).run(catalog)
}

/// Whether the baseline sentinel table exists. No version table is consulted.
pub fn is_database_migrated<T: Target + ?Sized>(target: &T, sentinel: &str) -> MigrateResult<bool> {
    let classifier = Classifier::default();
    SchemaProbe::new(target, &classifier).baseline_migrated(sentinel)
}

#[cfg(test)]
#[path = "engine_test.rs"]
mod tests;
