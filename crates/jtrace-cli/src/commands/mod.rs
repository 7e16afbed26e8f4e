//! Subcommand implementations and the plumbing they share.

pub mod cycles;
pub mod enforce;
pub mod init;
pub mod output;
pub mod rules;
pub mod scan;

use anyhow::{bail, Context, Result};
use jtrace_core::{AnalyzerConfig, Config, SourceImporter};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::config_resolver;

/// How a command finished, short of a fatal error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Nothing at or above the threshold.
    Passed,
    /// Violations (or cycles) at or above the threshold.
    Failed,
}

impl Outcome {
    /// Maps the outcome to a process exit code.
    #[must_use]
    pub fn exit_code(self) -> ExitCode {
        match self {
            Self::Passed => ExitCode::SUCCESS,
            Self::Failed => ExitCode::from(1),
        }
    }
}

/// Locates and loads the configuration for `project`.
///
/// Errors keep their concrete type ([`config_resolver::ConfigNotFound`] or
/// [`jtrace_core::ConfigError`]) so `main` can render them as diagnostics.
pub fn load_config(project: &Path, explicit: Option<&Path>) -> Result<Config> {
    let path = config_resolver::locate(project, explicit)?;
    let config = Config::from_file(&path)?;
    tracing::debug!(
        "Loaded {} rules from {}",
        config.rules.len(),
        path.display()
    );
    Ok(config)
}

/// Returns the source root for a project: `analyzer.root` joined onto it.
#[must_use]
pub fn source_root(project: &Path, analyzer: &AnalyzerConfig) -> PathBuf {
    if analyzer.root.is_absolute() {
        analyzer.root.clone()
    } else {
        project.join(&analyzer.root)
    }
}

/// Walks `root` for Java sources, honouring `.gitignore` and `exclude` globs.
///
/// Exclusion globs match paths relative to `root`. The result is sorted.
pub fn discover_sources(root: &Path, exclude: &[String]) -> Result<Vec<PathBuf>> {
    if !root.is_dir() {
        bail!("Source root {} is not a directory", root.display());
    }

    let patterns = exclude
        .iter()
        .map(|p| glob::Pattern::new(p).with_context(|| format!("Invalid exclude pattern `{p}`")))
        .collect::<Result<Vec<_>>>()?;

    let importer = SourceImporter::new();
    let mut builder = ignore::WalkBuilder::new(root);
    builder.hidden(false).git_ignore(true);

    let mut files = Vec::new();
    for entry in builder.build() {
        let entry = entry?;
        let path = entry.path();
        if !path.is_file() || !importer.accepts(path) {
            continue;
        }

        let rel = path.strip_prefix(root).unwrap_or(path);
        if patterns.iter().any(|p| p.matches_path(rel)) {
            tracing::debug!("Excluded {}", rel.display());
            continue;
        }
        files.push(path.to_path_buf());
    }

    files.sort();
    tracing::info!("Discovered {} source files under {}", files.len(), root.display());
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn touch(root: &Path, rel: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "class A {}").unwrap();
    }

    #[test]
    fn discovers_java_files_sorted() {
        let tmp = TempDir::new().unwrap();
        touch(tmp.path(), "b/B.java");
        touch(tmp.path(), "a/A.java");
        touch(tmp.path(), "a/notes.txt");

        let files = discover_sources(tmp.path(), &[]).unwrap();
        assert_eq!(
            files,
            [tmp.path().join("a/A.java"), tmp.path().join("b/B.java")]
        );
    }

    #[test]
    fn exclude_globs_are_relative_to_root() {
        let tmp = TempDir::new().unwrap();
        touch(tmp.path(), "com/app/Service.java");
        touch(tmp.path(), "com/app/generated/Stub.java");

        let files = discover_sources(tmp.path(), &["**/generated/**".to_owned()]).unwrap();
        assert_eq!(files, [tmp.path().join("com/app/Service.java")]);
    }

    #[test]
    fn invalid_exclude_is_an_error() {
        let tmp = TempDir::new().unwrap();
        assert!(discover_sources(tmp.path(), &["[".to_owned()]).is_err());
    }

    #[test]
    fn missing_root_is_an_error() {
        let tmp = TempDir::new().unwrap();
        assert!(discover_sources(&tmp.path().join("nope"), &[]).is_err());
    }

    #[test]
    fn source_root_joins_relative_root() {
        let analyzer = AnalyzerConfig {
            root: PathBuf::from("src/main/java"),
            ..AnalyzerConfig::default()
        };
        assert_eq!(
            source_root(Path::new("/work"), &analyzer),
            PathBuf::from("/work/src/main/java")
        );
    }

    #[test]
    fn config_loading() {
        let tmp = TempDir::new().unwrap();
        let explicit = tmp.path().join("jtrace.toml");
        let err = load_config(tmp.path(), Some(&explicit)).unwrap_err();
        assert!(err.downcast_ref::<jtrace_core::ConfigError>().is_some());

        fs::write(&explicit, "fail_on = \"warning\"\n").unwrap();
        let config = load_config(tmp.path(), None).unwrap();
        assert!(config.rules.is_empty());
    }

    #[test]
    fn missing_config_keeps_its_type() {
        let tmp = TempDir::new().unwrap();
        // A global config on this machine would satisfy the search.
        if let Err(not_found) = config_resolver::locate(tmp.path(), None) {
            assert_eq!(not_found.project, tmp.path());
            let wrapped = load_config(tmp.path(), None).unwrap_err();
            assert!(wrapped.is::<config_resolver::ConfigNotFound>());
        }
    }

    #[test]
    fn invalid_config_surfaces_config_error() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("jtrace.toml"), "[[rules]]\ntype = \"nope\"\n").unwrap();
        let err = load_config(tmp.path(), None).unwrap_err();
        assert!(err.downcast_ref::<jtrace_core::ConfigError>().is_some());
    }
}
