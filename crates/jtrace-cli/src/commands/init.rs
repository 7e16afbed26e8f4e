//! Init command implementation.

use anyhow::{bail, Context, Result};
use std::path::Path;

const CONFIG_FILE: &str = "jtrace.toml";

const DEFAULT_CONFIG: &str = r#"# jtrace configuration

version = "1"
base_package = "com.example"

# Fail when a violation at or above this severity is found: error | warning | info
fail_on = "error"

[analyzer]
# Source root, relative to this file
root = "src/main/java"

# Glob patterns to exclude, relative to the source root
exclude = ["**/generated/**"]

# Evaluate rules on this many worker threads
# parallelism = 4

[[rules]]
id = "no-controller-to-repository"
type = "forbidden-dependency"
from = "com.example.controller..*"
to = "com.example.repository..*"
message = "Controllers must go through the service layer."

[[rules]]
id = "service-transactional"
type = "require-annotation"
in = "com.example.service..*"
target = "method"
annotation = "Transactional"
severity = "warning"

[[rules]]
id = "domain-fields-private"
type = "visibility"
in = "com.example.domain..*"
target = "field"
must_be = "private"
severity = "info"

[[rules]]
id = "layers"
type = "layering"
forbid_cycles = true
allowed_dependencies = [
    { from = "controller", to = "service" },
    { from = "service", to = "repository" },
    { from = "service", to = "domain" },
    { from = "repository", to = "domain" },
]

[[rules.layers]]
name = "controller"
packages = ["com.example.controller..*"]

[[rules.layers]]
name = "service"
packages = ["com.example.service..*"]

[[rules.layers]]
name = "repository"
packages = ["com.example.repository..*"]

[[rules.layers]]
name = "domain"
packages = ["com.example.domain..*"]
"#;

/// Writes a starter configuration into `dir`.
pub fn run(dir: &Path, force: bool) -> Result<()> {
    let config_path = dir.join(CONFIG_FILE);

    if config_path.exists() && !force {
        bail!(
            "Configuration file already exists at {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    std::fs::write(&config_path, DEFAULT_CONFIG)
        .with_context(|| format!("Failed to write {}", config_path.display()))?;

    println!("Created {}", config_path.display());
    println!("\nNext steps:");
    println!("  1. Edit {CONFIG_FILE} to match your packages");
    println!("  2. Run: jtrace scan");

    Ok(())
}
