//! Cycles command implementation.

use anyhow::Result;
use jtrace_core::{detect_cycles, AnalyzerConfig, SourceImporter};
use std::path::Path;

use super::Outcome;
use crate::config_resolver::ConfigNotFound;

/// Runs the cycles command.
///
/// A configuration is optional here; without one the whole project
/// directory is scanned.
pub fn run(path: &Path, exclude: &[String], config_path: Option<&Path>) -> Result<Outcome> {
    let cycles = find(path, exclude, config_path)?;

    if cycles.is_empty() {
        println!("No dependency cycles found");
        return Ok(Outcome::Passed);
    }

    println!("Found {} dependency cycle(s):\n", cycles.len());
    for (i, cycle) in cycles.iter().enumerate() {
        println!("  {}. {cycle}", i + 1);
    }
    Ok(Outcome::Failed)
}

fn find(path: &Path, exclude: &[String], config_path: Option<&Path>) -> Result<Vec<String>> {
    let analyzer = match super::load_config(path, config_path) {
        Ok(config) => config.analyzer,
        Err(err) if err.is::<ConfigNotFound>() => AnalyzerConfig::default(),
        Err(err) => return Err(err),
    };
    let root = super::source_root(path, &analyzer);
    let files = super::discover_sources(&root, &merged_excludes(&analyzer, exclude))?;

    let outcome = SourceImporter::new().import_sources(&files);
    Ok(detect_cycles(&outcome.model))
}

fn merged_excludes(analyzer: &AnalyzerConfig, extra: &[String]) -> Vec<String> {
    analyzer.exclude.iter().chain(extra).cloned().collect()
}
