//! Configuration types and parsing for `storefront.yml`

use crate::classify::Classifier;
use crate::error::{MigrateError, MigrateResult};
use crate::external::{shell_escape, SQL_PLACEHOLDER};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default config file name, resolved against the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "storefront.yml";

/// Migration configuration from storefront.yml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Target database settings
    #[serde(default)]
    pub database: DatabaseConfig,

    /// External CLI runner settings
    #[serde(default)]
    pub external: ExternalConfig,

    /// Extra error classification patterns
    #[serde(default)]
    pub classifier: ClassifierConfig,
}

/// Target database settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DatabaseConfig {
    /// DuckDB file path, or `:memory:`
    #[serde(default = "default_database_path")]
    pub path: String,

    /// Table whose presence means the baseline schema is in place
    #[serde(default)]
    pub sentinel: Option<String>,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_database_path(),
            sentinel: None,
        }
    }
}

fn default_database_path() -> String {
    "storefront.duckdb".to_string()
}

/// External CLI runner settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExternalConfig {
    /// Command template containing `{sql}`; derived from the database path when unset
    #[serde(default)]
    pub command: Option<String>,
}

/// Extra ignorable error fragments, appended to the built-in table
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClassifierConfig {
    #[serde(default)]
    pub ignorable: Vec<String>,
}

impl Config {
    /// Parse config from a YAML string.
    pub fn from_yaml(yaml: &str) -> MigrateResult<Self> {
        serde_yaml::from_str(yaml).map_err(|e| MigrateError::ConfigParseError {
            message: e.to_string(),
        })
    }

    /// Load config from an explicit path. The file must exist.
    pub fn load(path: &Path) -> MigrateResult<Self> {
        if !path.exists() {
            return Err(MigrateError::ConfigNotFound {
                path: path.display().to_string(),
            });
        }
        let content = std::fs::read_to_string(path).map_err(|e| MigrateError::ConfigParseError {
            message: format!("{}: {e}", path.display()),
        })?;
        Self::from_yaml(&content)
    }

    /// Load config from `path` if it exists, otherwise use defaults.
    pub fn load_or_default(path: &Path) -> MigrateResult<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            log::debug!("No config at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Command template for the external runner.
    pub fn external_command(&self) -> String {
        match &self.external.command {
            Some(command) => command.clone(),
            None => format!(
                "duckdb {} -c {SQL_PLACEHOLDER}",
                shell_escape(&self.database.path)
            ),
        }
    }

    /// Sentinel table, falling back to `default`.
    pub fn sentinel_or<'a>(&'a self, default: &'a str) -> &'a str {
        self.database.sentinel.as_deref().unwrap_or(default)
    }

    /// The default classifier extended with configured patterns.
    pub fn classifier(&self) -> Classifier {
        Classifier::default().with_extra_patterns(&self.classifier.ignorable)
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
