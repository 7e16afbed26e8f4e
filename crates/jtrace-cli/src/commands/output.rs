//! Shared output formatting for lint results.

use anyhow::Result;
use jtrace_core::{LintResult, Severity};
use std::fmt::Write;

use crate::OutputFormat;

/// Number of rules listed in the "most violated" summary.
const TOP_RULES: usize = 5;

/// Print lint results in the specified format.
pub fn print(result: &LintResult, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => print!("{}", render_text(result)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(result)?),
        OutputFormat::Compact => print!("{}", render_compact(result)),
    }
    Ok(())
}

fn color(severity: Severity) -> &'static str {
    match severity {
        Severity::Error => "\x1b[31m",
        Severity::Warning => "\x1b[33m",
        Severity::Info => "\x1b[34m",
    }
}

/// Violations grouped by severity, then the most violated rules and a
/// summary line.
fn render_text(result: &LintResult) -> String {
    let mut out = String::new();

    for severity in Severity::ALL {
        let group = result.by_severity(severity);
        if group.is_empty() {
            continue;
        }
        let _ = writeln!(
            out,
            "{}{} ({})\x1b[0m\n",
            color(severity),
            severity.as_str().to_uppercase(),
            group.len()
        );
        for violation in group {
            let _ = writeln!(out, "{}", violation.format());
        }
    }

    let counts = result.rule_counts();
    if !counts.is_empty() {
        let _ = writeln!(out, "Most violated rules:");
        for (rule_id, count) in counts.into_iter().take(TOP_RULES) {
            let _ = writeln!(out, "  {rule_id:<30} {count}");
        }
        out.push('\n');
    }

    let (errors, warnings, infos) = result.count_by_severity();
    let summary_color = if errors > 0 {
        color(Severity::Error)
    } else if warnings > 0 {
        color(Severity::Warning)
    } else {
        "\x1b[32m"
    };
    let _ = writeln!(
        out,
        "{summary_color}Found {errors} error(s), {warnings} warning(s), {infos} info(s) in {} file(s), {} class(es)\x1b[0m",
        result.files_checked, result.classes_checked
    );
    out
}

fn render_compact(result: &LintResult) -> String {
    let mut out = String::new();
    for v in &result.violations {
        let _ = writeln!(
            out,
            "{}:{}: {} [{}] {}",
            v.location.file.display(),
            v.location.line,
            v.severity,
            v.rule_id,
            v.message,
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use jtrace_core::{Location, Violation};

    fn result() -> LintResult {
        let v = |id: &str, severity| {
            Violation::new(
                id,
                "visibility",
                severity,
                Location::new("src/A.java", 1, "app.A"),
                format!("{id} broken"),
            )
        };
        LintResult {
            violations: vec![
                v("info-rule", Severity::Info),
                v("err-rule", Severity::Error),
                v("err-rule", Severity::Error),
                v("warn-rule", Severity::Warning),
            ],
            files_checked: 3,
            classes_checked: 5,
        }
    }

    #[test]
    fn text_groups_errors_first() {
        let text = render_text(&result());
        let error_pos = text.find("ERROR (2)").unwrap();
        let warning_pos = text.find("WARNING (1)").unwrap();
        let info_pos = text.find("INFO (1)").unwrap();
        assert!(error_pos < warning_pos && warning_pos < info_pos);
        assert!(text.contains("2 error(s), 1 warning(s), 1 info(s) in 3 file(s), 5 class(es)"));
    }

    #[test]
    fn text_lists_most_violated_rules_first() {
        let text = render_text(&result());
        let summary = &text[text.find("Most violated rules:").unwrap()..];
        let first = summary.lines().nth(1).unwrap();
        assert!(first.trim_start().starts_with("err-rule"));
        assert!(first.trim_end().ends_with('2'));
    }

    #[test]
    fn text_for_clean_run_has_only_summary() {
        let text = render_text(&LintResult::new());
        assert!(!text.contains("Most violated"));
        assert!(text.contains("Found 0 error(s)"));
    }

    #[test]
    fn compact_is_one_line_per_violation() {
        let compact = render_compact(&result());
        assert_eq!(compact.lines().count(), 4);
        assert_eq!(
            compact.lines().next().unwrap(),
            "src/A.java:1: info [info-rule] info-rule broken"
        );
    }
}
