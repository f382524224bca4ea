//! Error classification for migration failures.
//!
//! Driver error text is the only signal available, so classification is plain
//! substring matching. When a driver changes its wording, the pattern tables
//! here change with it.

use serde::Serialize;

/// Outcome of classifying a driver error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorClass {
    /// The state the statement would have produced already holds.
    Ignorable,
    /// Anything else. Aborts the run.
    Fatal,
}

/// Fragments meaning "this change is already applied".
///
/// Covers SQLite-family wording and DuckDB's catalog/constraint errors
/// (`Table with name x already exists!`, `Duplicate key ... violates unique constraint`).
pub const DEFAULT_IGNORABLE_PATTERNS: &[&str] = &[
    "already exists",
    "duplicate column",
    "index already exists",
    "unique constraint failed",
    "duplicate key",
];

/// Fragments meaning a referenced table or view is missing.
const MISSING_RELATION_PATTERNS: &[&str] = &[
    "no such table",
    "does not exist",
    "table or view not found",
];

/// Fragments a doomed `SELECT` produces when the probed object is absent.
const NOT_FOUND_PATTERNS: &[&str] = &[
    "no such table",
    "no such column",
    "does not exist",
    "does not have a column",
    "not found",
];

/// Pattern-table classifier for driver error messages.
///
/// Matching is case-insensitive. The classifier is a plain value so a caller
/// can swap it per database dialect without touching the engine.
#[derive(Debug, Clone)]
pub struct Classifier {
    ignorable: Vec<String>,
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new(DEFAULT_IGNORABLE_PATTERNS.iter().copied())
    }
}

impl Classifier {
    /// Build a classifier from an explicit ignorable pattern table.
    pub fn new<I, S>(patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let ignorable = patterns
            .into_iter()
            .map(|p| p.as_ref().trim().to_lowercase())
            .filter(|p| !p.is_empty())
            .collect();
        Self { ignorable }
    }

    /// Extend the ignorable table (e.g. from `classifier.ignorable` in config).
    pub fn with_extra_patterns<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for pattern in patterns {
            let pattern = pattern.as_ref().trim().to_lowercase();
            if !pattern.is_empty() && !self.ignorable.contains(&pattern) {
                self.ignorable.push(pattern);
            }
        }
        self
    }

    /// The active ignorable patterns, lowercased.
    pub fn patterns(&self) -> &[String] {
        &self.ignorable
    }

    /// Classify a raw driver error message.
    pub fn classify(&self, message: &str) -> ErrorClass {
        let lower = message.to_lowercase();
        if self.ignorable.iter().any(|p| lower.contains(p.as_str())) {
            ErrorClass::Ignorable
        } else {
            ErrorClass::Fatal
        }
    }

    /// Shorthand for `classify(message) == ErrorClass::Ignorable`.
    pub fn is_ignorable(&self, message: &str) -> bool {
        self.classify(message) == ErrorClass::Ignorable
    }

    /// Whether the error says a referenced table is missing.
    pub fn is_missing_relation(&self, message: &str) -> bool {
        contains_any(message, MISSING_RELATION_PATTERNS)
    }

    /// Whether `message` names `table` as a whole identifier.
    ///
    /// Only the unqualified part of `table` is matched, so `main.carts` is
    /// found in `no such table: carts` and `carts` is not found in
    /// `no such table: carts_archive`.
    pub fn mentions_relation(&self, message: &str, table: &str) -> bool {
        let bare = table.rsplit('.').next().unwrap_or(table).to_lowercase();
        if bare.is_empty() {
            return false;
        }
        let lower = message.to_lowercase();
        lower.match_indices(bare.as_str()).any(|(start, _)| {
            let end = start + bare.len();
            let before = lower[..start].chars().next_back();
            let after = lower[end..].chars().next();
            !before.is_some_and(is_ident_char) && !after.is_some_and(is_ident_char)
        })
    }

    /// Whether the error says the selected table or column is absent.
    pub fn is_not_found(&self, message: &str) -> bool {
        contains_any(message, NOT_FOUND_PATTERNS)
    }
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

fn contains_any(message: &str, patterns: &[&str]) -> bool {
    let lower = message.to_lowercase();
    patterns.iter().any(|p| lower.contains(p))
}

#[cfg(test)]
#[path = "classify_test.rs"]
mod tests;
