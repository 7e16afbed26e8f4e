//! Configuration loading.
//!
//! ```text
//! TOML text
//!   ↓ serde (DTO layer, every rule field optional)
//! ConfigDto
//!   ↓ loader: validate + convert, collecting all errors
//! Config { fail_on, analyzer, rules: Vec<Rule> }
//! ```

pub mod dto;
pub mod loader;

pub use loader::RuleError;

use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::rules::Rule;
use crate::types::{should_fail, Severity, Violation};

/// Validated configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Schema version (default `"1"`).
    pub version: String,
    /// Root package of the project. Informational only.
    pub base_package: Option<String>,
    /// Failure threshold.
    pub fail_on: FailOn,
    /// Source discovery settings.
    pub analyzer: AnalyzerConfig,
    /// Rules in declaration order.
    pub rules: Vec<Rule>,
}

impl Config {
    /// Creates a configuration from rules with default settings.
    #[must_use]
    pub fn new(rules: Vec<Rule>) -> Self {
        Self {
            version: "1".to_owned(),
            base_package: None,
            fail_on: FailOn::default(),
            analyzer: AnalyzerConfig::default(),
            rules,
        }
    }

    /// Sets the failure threshold.
    #[must_use]
    pub fn with_fail_on(mut self, severity: Severity) -> Self {
        self.fail_on = FailOn::new(severity);
        self
    }

    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed or validated.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::parse(&content)
    }

    /// Parses configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid or any rule fails validation.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let dto: dto::ConfigDto = toml::from_str(content).map_err(|e| ConfigError::Parse {
            message: e.to_string(),
        })?;
        loader::load(dto)
    }
}

/// Severity threshold at which a run fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FailOn {
    severity: Severity,
}

impl FailOn {
    /// Creates a threshold.
    #[must_use]
    pub fn new(severity: Severity) -> Self {
        Self { severity }
    }

    /// The threshold severity.
    #[must_use]
    pub fn severity(self) -> Severity {
        self.severity
    }

    /// Returns true if any violation is at least as severe as the threshold.
    #[must_use]
    pub fn should_fail(self, violations: &[Violation]) -> bool {
        should_fail(violations, self.severity)
    }
}

impl Default for FailOn {
    fn default() -> Self {
        Self::new(Severity::Error)
    }
}

/// Source discovery settings, used by front ends.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzerConfig {
    /// Source root, relative to the project directory (default: `.`).
    #[serde(default = "default_root")]
    pub root: PathBuf,

    /// Glob patterns to exclude, relative to the root.
    #[serde(default)]
    pub exclude: Vec<String>,

    /// Worker count for rule evaluation. Values above 1 enable fan-out.
    #[serde(default)]
    pub parallelism: Option<usize>,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
            exclude: Vec::new(),
            parallelism: None,
        }
    }
}

fn default_root() -> PathBuf {
    PathBuf::from(".")
}

/// Configuration errors.
#[derive(Debug, thiserror::Error, Diagnostic)]
pub enum ConfigError {
    /// IO error reading config file.
    #[error("Failed to read config file {path}: {source}")]
    #[diagnostic(code(jtrace::config::io))]
    Io {
        /// Path that failed to read.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// Parse error in config file.
    #[error("Failed to parse config: {message}")]
    #[diagnostic(code(jtrace::config::parse), help("check the TOML syntax near the reported line"))]
    Parse {
        /// Parse error message.
        message: String,
    },

    /// One or more rules failed validation.
    #[error("configuration validation errors:\n{}", format_errors(.0))]
    #[diagnostic(
        code(jtrace::config::invalid),
        help("run `jtrace rules` to list the fields each rule type accepts")
    )]
    Invalid(Vec<RuleError>),
}

fn format_errors(errors: &[RuleError]) -> String {
    errors
        .iter()
        .map(|e| format!("  - {e}"))
        .collect::<Vec<_>>()
        .join("\n")
}
