//! Locating `jtrace.toml`.
//!
//! An explicit `--config` path is used as given. Otherwise the first existing
//! file of the search path wins:
//!
//! 1. `{project}/jtrace.toml`
//! 2. `{project}/.jtrace.toml`
//! 3. `{global}/config.toml`, where `{global}` is `$JTRACE_CONFIG_DIR` or `~/.jtrace`

use miette::Diagnostic;
use std::path::{Path, PathBuf};

const PROJECT_CONFIG_NAMES: [&str; 2] = ["jtrace.toml", ".jtrace.toml"];

const GLOBAL_CONFIG_NAME: &str = "config.toml";

/// No configuration file exists anywhere on the search path.
#[derive(Debug, thiserror::Error, Diagnostic)]
#[error(
    "No jtrace configuration found for {} (searched: {})",
    .project.display(),
    searched_list(.searched)
)]
#[diagnostic(
    code(jtrace::config::not_found),
    help("run `jtrace init` to create a starter jtrace.toml, or pass --config")
)]
pub struct ConfigNotFound {
    /// Project directory the lookup started from.
    pub project: PathBuf,
    /// Every candidate that was checked, in order.
    pub searched: Vec<PathBuf>,
}

fn searched_list(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Returns the configuration file for `project`.
///
/// # Errors
///
/// Returns [`ConfigNotFound`] when there is no explicit path and no
/// candidate on the search path exists.
pub fn locate(project: &Path, explicit: Option<&Path>) -> Result<PathBuf, ConfigNotFound> {
    locate_in(project, explicit, global_config_dir().as_deref())
}

fn locate_in(
    project: &Path,
    explicit: Option<&Path>,
    global_dir: Option<&Path>,
) -> Result<PathBuf, ConfigNotFound> {
    // A missing explicit file is reported by the loader with its IO error.
    if let Some(path) = explicit {
        return Ok(path.to_path_buf());
    }

    let searched = search_path(project, global_dir);
    match searched.iter().find(|candidate| candidate.is_file()) {
        Some(found) => {
            tracing::debug!("Using config {}", found.display());
            Ok(found.clone())
        }
        None => Err(ConfigNotFound {
            project: project.to_path_buf(),
            searched,
        }),
    }
}

fn search_path(project: &Path, global_dir: Option<&Path>) -> Vec<PathBuf> {
    PROJECT_CONFIG_NAMES
        .iter()
        .map(|name| project.join(name))
        .chain(global_dir.map(|dir| dir.join(GLOBAL_CONFIG_NAME)))
        .collect()
}

/// `$JTRACE_CONFIG_DIR`, else `~/.jtrace`.
#[must_use]
pub fn global_config_dir() -> Option<PathBuf> {
    match std::env::var_os("JTRACE_CONFIG_DIR") {
        Some(dir) => Some(PathBuf::from(dir)),
        None => home::home_dir().map(|h| h.join(".jtrace")),
    }
}
