//! Rule engine: one import, every rule, ordered violations.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use rayon::prelude::*;
use rayon::ThreadPoolBuilder;
use thiserror::Error;
use tracing::{debug, info};

use crate::analysis::analyze_rule;
use crate::config::{Config, ConfigError};
use crate::importer::SourceImporter;
use crate::model::StructuralModel;
use crate::rules::Rule;
use crate::types::{LintResult, Violation};

/// Errors that abort a run.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The per-run worker pool could not be started.
    #[error("Failed to start worker pool: {0}")]
    WorkerPool(#[from] rayon::ThreadPoolBuildError),

    /// The background analysis task panicked or was cancelled.
    #[error("Analysis task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Imports sources once and evaluates every configured rule against them.
///
/// Cloning is cheap; clones share the configuration.
#[derive(Debug, Clone)]
pub struct RuleEngine {
    config: Arc<Config>,
}

impl RuleEngine {
    /// Creates an engine from a validated configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    /// Creates an engine from a configuration file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed or validated.
    pub fn from_config_file(path: &Path) -> Result<Self, EngineError> {
        Ok(Self::new(Config::from_file(path)?))
    }

    /// The engine's configuration.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Runs the full pipeline synchronously.
    ///
    /// Unreadable or unparseable sources are skipped with a warning.
    ///
    /// # Errors
    ///
    /// Returns an error if the worker pool cannot be started.
    pub fn run<P: AsRef<Path>>(&self, sources: &[P]) -> Result<LintResult, EngineError> {
        info!(
            "Starting analysis of {} source files with {} rules",
            sources.len(),
            self.config.rules.len()
        );

        let outcome = SourceImporter::new().import_sources(sources);
        let violations = self.evaluate(&outcome.model)?;

        let result = LintResult {
            violations,
            files_checked: outcome.files_imported,
            classes_checked: outcome.model.class_count(),
        };
        info!(
            "Analysis complete: {} violations in {} classes",
            result.violations.len(),
            result.classes_checked
        );
        Ok(result)
    }

    /// Runs the full pipeline on a blocking worker thread.
    ///
    /// # Errors
    ///
    /// Returns an error if the run fails or the task cannot be joined.
    pub async fn run_async(&self, sources: Vec<PathBuf>) -> Result<LintResult, EngineError> {
        let engine = self.clone();
        tokio::task::spawn_blocking(move || engine.run(&sources)).await?
    }

    /// Evaluates every rule against an already built model.
    ///
    /// Violations are concatenated in rule declaration order. With
    /// `analyzer.parallelism > 1` rules are evaluated on a worker pool that
    /// lives only for this call.
    ///
    /// # Errors
    ///
    /// Returns an error if the worker pool cannot be started.
    pub fn evaluate(&self, model: &StructuralModel) -> Result<Vec<Violation>, EngineError> {
        let rules = &self.config.rules;
        let workers = self.config.analyzer.parallelism.unwrap_or(1);

        let per_rule: Vec<Vec<Violation>> = if workers > 1 && rules.len() > 1 {
            let pool = ThreadPoolBuilder::new()
                .num_threads(workers)
                .thread_name(|i| format!("jtrace-rule-{i}"))
                .build()?;
            pool.install(|| rules.par_iter().map(|r| evaluate_rule(r, model)).collect())
        } else {
            rules.iter().map(|r| evaluate_rule(r, model)).collect()
        };

        Ok(per_rule.into_iter().flatten().collect())
    }
}

fn evaluate_rule(rule: &Rule, model: &StructuralModel) -> Vec<Violation> {
    let violations = analyze_rule(rule, model);
    debug!(
        "Rule {} ({}): {} violations",
        rule.id,
        rule.type_name(),
        violations.len()
    );
    violations
}
