//! Per-unit outcomes and the aggregated run report.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

/// How the catalog was applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Transport {
    /// Embedded driver call.
    InProcess,
    /// One external CLI process per unit.
    External,
}

impl fmt::Display for Transport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Transport::InProcess => write!(f, "in-process"),
            Transport::External => write!(f, "external"),
        }
    }
}

/// The statement that failed and the raw driver error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnitFailure {
    pub statement: String,
    pub message: String,
}

/// Result of applying one unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum UnitStatus {
    Applied,
    Skipped,
    Failed(UnitFailure),
}

/// Outcome of one unit in one run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExecutionOutcome {
    pub unit: String,
    #[serde(flatten)]
    pub status: UnitStatus,
    pub statements_executed: usize,
    pub statements_skipped: usize,
    /// Why a unit was skipped, when it was not simply already applied.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl ExecutionOutcome {
    pub fn applied(unit: &str, executed: usize, skipped: usize) -> Self {
        Self {
            unit: unit.to_string(),
            status: UnitStatus::Applied,
            statements_executed: executed,
            statements_skipped: skipped,
            note: None,
        }
    }

    pub fn skipped(unit: &str, skipped: usize) -> Self {
        Self {
            unit: unit.to_string(),
            status: UnitStatus::Skipped,
            statements_executed: 0,
            statements_skipped: skipped,
            note: None,
        }
    }

    pub fn failed(unit: &str, statement: &str, message: impl Into<String>) -> Self {
        Self {
            unit: unit.to_string(),
            status: UnitStatus::Failed(UnitFailure {
                statement: statement.to_string(),
                message: message.into(),
            }),
            statements_executed: 0,
            statements_skipped: 0,
            note: None,
        }
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    pub fn is_applied(&self) -> bool {
        matches!(self.status, UnitStatus::Applied)
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self.status, UnitStatus::Skipped)
    }

    pub fn error(&self) -> Option<&UnitFailure> {
        match &self.status {
            UnitStatus::Failed(failure) => Some(failure),
            _ => None,
        }
    }

    /// The single report line for this outcome.
    pub fn line(&self) -> String {
        match (&self.status, &self.note) {
            (UnitStatus::Applied, _) => format!("✓ {}", self.unit),
            (UnitStatus::Skipped, Some(note)) => format!("↷ {} ({note})", self.unit),
            (UnitStatus::Skipped, None) => format!("↷ {} (already applied)", self.unit),
            (UnitStatus::Failed(failure), _) => format!("✗ {}: {}", self.unit, failure.message),
        }
    }
}

/// The failing unit of an aborted run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunFailure {
    pub unit: String,
    pub statement: String,
    pub message: String,
}

impl fmt::Display for RunFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "migration '{}' failed: {}\n  statement: {}",
            self.unit, self.message, self.statement
        )
    }
}

/// Aggregated result of one invocation. Returned to the caller, never stored.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub success: bool,
    pub transport: Transport,
    pub started_at: DateTime<Utc>,
    pub duration_ms: u64,
    pub lines: Vec<String>,
    pub applied: usize,
    pub skipped: usize,
    pub failure: Option<RunFailure>,
    pub outcomes: Vec<ExecutionOutcome>,
}

impl RunReport {
    /// Newline-joined per-unit lines, suitable for showing to an operator.
    pub fn log(&self) -> String {
        self.lines.join("\n")
    }

    /// One-line summary.
    pub fn summary(&self) -> String {
        let status = if self.success { "succeeded" } else { "FAILED" };
        format!(
            "Migration run {status} ({}): {} applied, {} skipped in {}ms",
            self.transport, self.applied, self.skipped, self.duration_ms
        )
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in &self.lines {
            writeln!(f, "  {line}")?;
        }
        if let Some(failure) = &self.failure {
            writeln!(f, "    statement: {}", failure.statement)?;
        }
        write!(f, "{}", self.summary())
    }
}

/// Fold per-unit outcomes into a report.
///
/// `success` is true iff no outcome failed. Callers stop applying units at
/// the first failure, so a failed outcome is the last one.
pub fn report(
    outcomes: Vec<ExecutionOutcome>,
    transport: Transport,
    started_at: DateTime<Utc>,
) -> RunReport {
    let lines = outcomes.iter().map(ExecutionOutcome::line).collect();
    let applied = outcomes.iter().filter(|o| o.is_applied()).count();
    let skipped = outcomes.iter().filter(|o| o.is_skipped()).count();
    let failure = outcomes.iter().find_map(|o| {
        o.error().map(|e| RunFailure {
            unit: o.unit.clone(),
            statement: e.statement.clone(),
            message: e.message.clone(),
        })
    });

    let duration_ms = u64::try_from((Utc::now() - started_at).num_milliseconds()).unwrap_or(0);

    RunReport {
        success: failure.is_none(),
        transport,
        started_at,
        duration_ms,
        lines,
        applied,
        skipped,
        failure,
        outcomes,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lines_per_status() {
        let rep = report(
            vec![
                ExecutionOutcome::applied("0001_core", 3, 0),
                ExecutionOutcome::skipped("0002_carts", 2),
                ExecutionOutcome::skipped("0003_image_url", 0).with_note("imperative, skipped"),
            ],
            Transport::InProcess,
            Utc::now(),
        );
        assert!(rep.success);
        assert_eq!(
            rep.lines,
            vec![
                "✓ 0001_core",
                "↷ 0002_carts (already applied)",
                "↷ 0003_image_url (imperative, skipped)",
            ]
        );
        assert_eq!(rep.applied, 1);
        assert_eq!(rep.skipped, 2);
        assert!(rep.failure.is_none());
        assert_eq!(rep.log().lines().count(), 3);
    }

    #[test]
    fn test_failure_carries_unit_and_error() {
        let rep = report(
            vec![
                ExecutionOutcome::applied("0001_core", 1, 0),
                ExecutionOutcome::failed("0002_bad", "CRATE TABLE x", "syntax error near CRATE"),
            ],
            Transport::External,
            Utc::now(),
        );
        assert!(!rep.success);
        let failure = rep.failure.as_ref().unwrap();
        assert_eq!(failure.unit, "0002_bad");
        assert_eq!(failure.statement, "CRATE TABLE x");
        assert_eq!(rep.lines[1], "✗ 0002_bad: syntax error near CRATE");
        assert!(rep.summary().contains("FAILED"));
        assert!(rep.to_string().contains("statement: CRATE TABLE x"));
    }

    #[test]
    fn test_empty_run_is_successful() {
        let rep = report(Vec::new(), Transport::InProcess, Utc::now());
        assert!(rep.success);
        assert!(rep.lines.is_empty());
    }
}
