//! Scan command implementation.

use anyhow::{Context, Result};
use jtrace_core::{LintResult, RuleEngine, Severity};

use super::Outcome;
use crate::ScanArgs;

/// Runs the scan command.
///
/// `fail_on` overrides the configured threshold.
pub fn run(
    args: &ScanArgs,
    fail_on: Option<Severity>,
    config_path: Option<&std::path::Path>,
) -> Result<Outcome> {
    let (result, threshold) = analyze(args, fail_on, config_path)?;
    super::output::print(&result, args.format)?;
    Ok(outcome(&result, threshold))
}

/// Discovers sources and runs the engine, returning the result and the
/// threshold in effect.
pub fn analyze(
    args: &ScanArgs,
    fail_on: Option<Severity>,
    config_path: Option<&std::path::Path>,
) -> Result<(LintResult, Severity)> {
    let config = super::load_config(&args.path, config_path)?;
    let threshold = fail_on.unwrap_or_else(|| config.fail_on.severity());

    let root = super::source_root(&args.path, &config.analyzer);
    let mut exclude = config.analyzer.exclude.clone();
    exclude.extend(args.exclude.iter().cloned());
    let files = super::discover_sources(&root, &exclude)?;

    tracing::info!(
        "Analyzing {} with {} rules (fail on {threshold})",
        root.display(),
        config.rules.len()
    );

    let result = RuleEngine::new(config)
        .run(&files)
        .context("Analysis failed")?;
    Ok((result, threshold))
}

/// Applies the pass/fail rule.
#[must_use]
pub fn outcome(result: &LintResult, threshold: Severity) -> Outcome {
    if result.should_fail(threshold) {
        Outcome::Failed
    } else {
        Outcome::Passed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::OutputFormat;
    use std::fs;
    use std::path::{Path, PathBuf};
    use tempfile::TempDir;

    const CONFIG: &str = r#"
[analyzer]
root = "src"
exclude = ["**/legacy/**"]

[[rules]]
id = "fields-private"
type = "visibility"
in = "app..*"
target = "field"
must_be = "private"
severity = "warning"
"#;

    fn project() -> TempDir {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("jtrace.toml"), CONFIG).unwrap();
        let write = |rel: &str, src: &str| {
            let path = tmp.path().join("src").join(rel);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, src).unwrap();
        };
        write("app/A.java", "package app;\npublic class A { int count; }\n");
        write("app/legacy/B.java", "package app.legacy;\npublic class B { int count; }\n");
        tmp
    }

    fn args(path: &Path) -> ScanArgs {
        ScanArgs {
            path: PathBuf::from(path),
            format: OutputFormat::Compact,
            exclude: Vec::new(),
        }
    }

    #[test]
    fn config_threshold_applies() {
        let tmp = project();
        let (result, threshold) = analyze(&args(tmp.path()), None, None).unwrap();
        assert_eq!(result.files_checked, 1);
        assert_eq!(result.violations.len(), 1);
        assert_eq!(threshold, Severity::Error);
        assert_eq!(outcome(&result, threshold), Outcome::Passed);
    }

    #[test]
    fn override_threshold_fails() {
        let tmp = project();
        let (result, threshold) =
            analyze(&args(tmp.path()), Some(Severity::Warning), None).unwrap();
        assert_eq!(outcome(&result, threshold), Outcome::Failed);
    }

    #[test]
    fn cli_excludes_add_to_config_excludes() {
        let tmp = project();
        let mut args = args(tmp.path());
        args.exclude.push("app/A.java".to_owned());
        let (result, _) = analyze(&args, None, None).unwrap();
        assert_eq!(result.files_checked, 0);
        assert!(result.violations.is_empty());
    }

    #[test]
    fn missing_config_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let explicit = tmp.path().join("absent.toml");
        assert!(analyze(&args(tmp.path()), None, Some(&explicit)).is_err());
    }
}
