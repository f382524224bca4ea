//! External CLI runner.
//!
//! Walks the same catalog as the in-process engine but hands each normalized
//! unit to an external database CLI, one process at a time. Imperative units
//! need a live probe, so they are skipped here with a notice. Failure output
//! is classified with the same [`Classifier`] the engine uses.
//!
//! A CLI stops at the first failing statement, so an "already applied" error
//! from a multi-statement unit says nothing about the statements after it.
//! Such a unit is replayed one statement per invocation, in source order.

use crate::catalog::{Catalog, MigrationUnit, UnitKind};
use crate::classify::Classifier;
use crate::error::{MigrateError, MigrateResult};
use crate::normalize::normalize;
use crate::parser::split_statements;
use crate::report::{report, ExecutionOutcome, RunReport, Transport};
use async_trait::async_trait;
use chrono::Utc;

/// Placeholder replaced by the escaped SQL in a command template.
pub const SQL_PLACEHOLDER: &str = "{sql}";

/// Captured result of one external invocation.
#[derive(Debug, Clone)]
pub struct ToolOutput {
    pub success: bool,
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl ToolOutput {
    /// The text to classify: stderr, or stdout when stderr is empty.
    pub fn failure_message(&self) -> &str {
        let stderr = self.stderr.trim();
        if stderr.is_empty() {
            self.stdout.trim()
        } else {
            stderr
        }
    }
}

/// An external process that executes SQL text.
#[async_trait]
pub trait ExternalTool: Send + Sync {
    /// Run the tool with `sql` and wait for it to exit.
    async fn execute(&self, sql: &str) -> MigrateResult<ToolOutput>;

    /// Human-readable command line, for dry runs and logs.
    fn describe(&self, sql: &str) -> String;
}

/// Escape `value` as a double-quoted shell word.
///
/// `\`, `"`, `$` and `` ` `` are backslash-escaped, so the shell passes the
/// text through verbatim.
///
/// # Examples
/// ```
/// use sf_migrate::external::shell_escape;
/// assert_eq!(shell_escape("SELECT 1;"), "\"SELECT 1;\"");
/// assert_eq!(shell_escape("say \"hi\" $HOME"), "\"say \\\"hi\\\" \\$HOME\"");
/// ```
pub fn shell_escape(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len() + 2);
    escaped.push('"');
    for ch in value.chars() {
        if matches!(ch, '\\' | '"' | '$' | '`') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped.push('"');
    escaped
}

/// Runs a command template through `sh -c`.
///
/// The template must contain `{sql}`, e.g. `duckdb shop.duckdb -c {sql}`.
#[derive(Debug, Clone)]
pub struct ShellTool {
    template: String,
}

impl ShellTool {
    pub fn new(template: impl Into<String>) -> MigrateResult<Self> {
        let template = template.into();
        if !template.contains(SQL_PLACEHOLDER) {
            return Err(MigrateError::ToolError(format!(
                "command template must contain {SQL_PLACEHOLDER}: {template}"
            )));
        }
        Ok(Self { template })
    }

    pub fn template(&self) -> &str {
        &self.template
    }

    /// The shell command line for `sql`.
    pub fn command_line(&self, sql: &str) -> String {
        self.template.replace(SQL_PLACEHOLDER, &shell_escape(sql))
    }
}

#[async_trait]
impl ExternalTool for ShellTool {
    async fn execute(&self, sql: &str) -> MigrateResult<ToolOutput> {
        let command_line = self.command_line(sql);
        let output = tokio::process::Command::new("sh")
            .arg("-c")
            .arg(&command_line)
            .output()
            .await
            .map_err(|e| MigrateError::ToolError(format!("failed to spawn sh: {e}")))?;

        Ok(ToolOutput {
            success: output.status.success(),
            exit_code: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        })
    }

    fn describe(&self, sql: &str) -> String {
        self.command_line(sql)
    }
}

/// Applies a catalog through an [`ExternalTool`].
pub struct ExternalRunner<T: ExternalTool> {
    tool: T,
    classifier: Classifier,
    dry_run: bool,
}

impl<T: ExternalTool> ExternalRunner<T> {
    pub fn new(tool: T) -> Self {
        Self {
            tool,
            classifier: Classifier::default(),
            dry_run: false,
        }
    }

    pub fn with_classifier(mut self, classifier: Classifier) -> Self {
        self.classifier = classifier;
        self
    }

    /// Describe each invocation instead of running it.
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Apply every unit in order, stopping at the first fatal failure.
    pub async fn run(&self, catalog: &Catalog) -> RunReport {
        let started_at = Utc::now();
        let mut outcomes = Vec::with_capacity(catalog.len());

        for unit in catalog {
            let outcome = self.apply(unit).await;
            let failed = outcome.error().is_some();
            outcomes.push(outcome);
            if failed {
                break;
            }
        }

        report(outcomes, Transport::External, started_at)
    }

    /// Apply one unit through the tool.
    pub async fn apply(&self, unit: &MigrationUnit) -> ExecutionOutcome {
        let name = unit.name();
        let sql = match unit.kind() {
            UnitKind::Imperative { check, .. } => {
                log::warn!(
                    "Skipping imperative migration {name} ({} probe needs an in-process run)",
                    check.describe()
                );
                return ExecutionOutcome::skipped(name, 0)
                    .with_note("imperative, skipped by external runner");
            }
            UnitKind::Declarative { sql } => sql,
        };

        let batch = normalize(sql);
        let statements = split_statements(sql);

        if self.dry_run {
            return ExecutionOutcome::skipped(name, 0)
                .with_note(format!("dry run: {}", self.tool.describe(&batch)));
        }

        log::debug!("Applying migration {name} via external tool");
        let output = match self.tool.execute(&batch).await {
            Ok(output) => output,
            Err(err) => return ExecutionOutcome::failed(name, &batch, err.to_string()),
        };

        if output.success {
            return ExecutionOutcome::applied(name, statements.len(), 0);
        }

        let message = output.failure_message();
        if !self.classifier.is_ignorable(message) {
            return ExecutionOutcome::failed(name, &batch, fatal_message(&output));
        }
        if statements.len() <= 1 {
            log::info!("Migration {name} already applied: {message}");
            return ExecutionOutcome::skipped(name, statements.len());
        }

        log::debug!("Migration {name}: batch stopped at an applied statement ({message}), replaying statement by statement");
        self.replay(name, &statements).await
    }

    /// Run each statement in its own invocation, classifying every failure.
    async fn replay(&self, name: &str, statements: &[String]) -> ExecutionOutcome {
        let mut executed = 0;
        let mut skipped = 0;

        for statement in statements {
            let output = match self.tool.execute(&normalize(statement)).await {
                Ok(output) => output,
                Err(err) => return ExecutionOutcome::failed(name, statement, err.to_string()),
            };
            if output.success {
                executed += 1;
                continue;
            }

            let message = output.failure_message();
            if self.classifier.is_ignorable(message) {
                log::info!("Migration {name}: statement already applied ({message})");
                skipped += 1;
            } else {
                return ExecutionOutcome::failed(name, statement, fatal_message(&output));
            }
        }

        if executed == 0 {
            ExecutionOutcome::skipped(name, skipped)
        } else {
            ExecutionOutcome::applied(name, executed, skipped)
        }
    }
}

/// The tool's error text, or its exit code when it printed nothing.
fn fatal_message(output: &ToolOutput) -> String {
    let message = output.failure_message();
    if message.is_empty() {
        format!("external tool exited with code {}", output.exit_code)
    } else {
        message.to_string()
    }
}

#[cfg(test)]
#[path = "external_test.rs"]
mod tests;
