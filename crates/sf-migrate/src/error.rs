//! Error types for sf-migrate

use thiserror::Error;

/// Migration engine errors
#[derive(Error, Debug)]
pub enum MigrateError {
    /// Failed to open or create the target database (MG001)
    #[error("[MG001] Database connection failed: {0}")]
    ConnectionError(String),

    /// Driver reported an error while executing SQL (MG002)
    #[error("[MG002] SQL execution failed: {0}")]
    ExecutionError(String),

    /// A schema probe failed for a reason other than "not found" (MG003)
    #[error("[MG003] Schema probe failed for {subject}: {message}")]
    ProbeError { subject: String, message: String },

    /// The catalog violates its construction rules (MG004)
    #[error("[MG004] Invalid migration catalog: {0}")]
    CatalogInvalid(String),

    /// Explicit config path does not exist (MG005)
    #[error("[MG005] Config file not found: {path}")]
    ConfigNotFound { path: String },

    /// Config file could not be read or parsed (MG006)
    #[error("[MG006] Failed to parse config: {message}")]
    ConfigParseError { message: String },

    /// External migration tool could not be started (MG007)
    #[error("[MG007] External tool failed: {0}")]
    ToolError(String),
}

/// Result type alias for [`MigrateError`]
pub type MigrateResult<T> = Result<T, MigrateError>;

impl MigrateError {
    /// The raw driver text, without the error code prefix.
    ///
    /// This is what the error classifier matches against.
    pub fn driver_message(&self) -> String {
        match self {
            MigrateError::ExecutionError(msg) | MigrateError::ConnectionError(msg) => msg.clone(),
            MigrateError::ProbeError { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }
}

impl From<duckdb::Error> for MigrateError {
    fn from(err: duckdb::Error) -> Self {
        MigrateError::ExecutionError(err.to_string())
    }
}
