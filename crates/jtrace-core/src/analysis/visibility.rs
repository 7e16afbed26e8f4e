//! Visibility analyzer.

use crate::model::{StructuralModel, Visibility};
use crate::pattern::Pattern;
use crate::rules::{Rule, Target};
use crate::types::Violation;

use super::class_violation;

pub(super) fn analyze(
    rule: &Rule,
    package: &Pattern,
    target: Target,
    required: Visibility,
    model: &StructuralModel,
) -> Vec<Violation> {
    let mut violations = Vec::new();

    for class in model.classes().filter(|c| package.matches(c.fqn())) {
        let observed: Vec<(String, Visibility)> = match target {
            Target::Class => vec![(class.fqn().to_owned(), class.visibility())],
            Target::Method => class
                .methods()
                .iter()
                .map(|m| (format!("{}#{}", class.fqn(), m.name), m.visibility))
                .collect(),
            Target::Field => class
                .fields()
                .iter()
                .map(|f| (format!("{}.{}", class.fqn(), f.name), f.visibility))
                .collect(),
        };

        for (symbol, actual) in observed {
            if actual == required {
                continue;
            }
            let message = format!(
                "Visibility violation: {symbol} must be {required}, but is {actual}. {}",
                rule.message
            );
            let suggestion = format!("Make {symbol} {required}");
            violations.push(class_violation(rule, class, symbol, message).with_suggestion(suggestion));
        }
    }
    violations
}
