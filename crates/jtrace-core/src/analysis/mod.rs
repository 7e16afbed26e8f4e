//! Rule analyzers.
//!
//! Each analyzer is a pure function of one rule and the frozen model. They
//! never mutate the model, so rules can be evaluated concurrently.

mod annotation;
mod dependency;
mod layering;
mod visibility;

pub use layering::LayerResolver;

use crate::model::{ClassUnit, StructuralModel};
use crate::rules::{Rule, RuleKind};
use crate::types::{Location, Violation};

/// Evaluates one rule against the model.
///
/// Violations come back in the analyzer's own traversal order, which follows
/// the model's FQN ordering.
#[must_use]
pub fn analyze_rule(rule: &Rule, model: &StructuralModel) -> Vec<Violation> {
    match &rule.kind {
        RuleKind::ForbiddenDependency { from, to } => dependency::analyze(rule, from, to, model),
        RuleKind::RequireAnnotation {
            package,
            target,
            annotation,
        } => annotation::analyze(rule, package, *target, annotation, model),
        RuleKind::Layering {
            layers,
            allowed,
            forbid_cycles,
        } => layering::analyze(rule, layers, allowed, *forbid_cycles, model),
        RuleKind::Visibility {
            package,
            target,
            required,
        } => visibility::analyze(rule, package, *target, *required, model),
    }
}

/// Builds a violation located at line 1 of `class`'s source file.
fn class_violation(
    rule: &Rule,
    class: &ClassUnit,
    symbol: impl Into<String>,
    message: String,
) -> Violation {
    Violation::new(
        &rule.id,
        rule.type_name(),
        rule.severity,
        Location::new(class.source_file(), 1, symbol),
        message,
    )
}
