//! Enforce command implementation.
//!
//! Same pipeline as `scan`, with an optional threshold override and a
//! verdict line on stderr for CI logs.

use anyhow::Result;
use jtrace_core::Severity;
use std::path::Path;

use super::Outcome;
use crate::ScanArgs;

/// Runs the enforce command.
pub fn run(args: &ScanArgs, fail_on: Option<Severity>, config_path: Option<&Path>) -> Result<Outcome> {
    let (result, threshold) = super::scan::analyze(args, fail_on, config_path)?;
    super::output::print(&result, args.format)?;

    let outcome = super::scan::outcome(&result, threshold);
    let blocking = result
        .violations
        .iter()
        .filter(|v| v.severity.is_at_least(threshold))
        .count();
    match outcome {
        Outcome::Failed => eprintln!(
            "Architecture check failed: {blocking} violation(s) at or above {threshold}"
        ),
        Outcome::Passed => eprintln!("Architecture check passed (fail on {threshold})"),
    }
    Ok(outcome)
}
