//! Forbidden dependency analyzer.

use crate::dependency::has_dependency;
use crate::model::{ClassUnit, StructuralModel};
use crate::pattern::Pattern;
use crate::rules::Rule;
use crate::types::Violation;

use super::class_violation;

/// One violation per ordered pair `(a, b)` where `a` matches `from`, `b`
/// matches `to`, and `a` depends on `b`. A class matching both patterns is
/// paired with itself too.
pub(super) fn analyze(
    rule: &Rule,
    from: &Pattern,
    to: &Pattern,
    model: &StructuralModel,
) -> Vec<Violation> {
    let targets: Vec<&ClassUnit> = model.classes().filter(|c| to.matches(c.fqn())).collect();

    let mut violations = Vec::new();
    for source in model.classes().filter(|c| from.matches(c.fqn())) {
        for target in &targets {
            if !has_dependency(model, source, target) {
                continue;
            }
            violations.push(
                class_violation(
                    rule,
                    source,
                    source.fqn(),
                    format!(
                        "Forbidden dependency: {} -> {}. {}",
                        source.fqn(),
                        target.fqn(),
                        rule.message
                    ),
                )
                .with_suggestion(format!(
                    "Remove the reference to {} from {}",
                    target.name(),
                    source.name()
                )),
            );
        }
    }
    violations
}

#[cfg(test)]
mod tests {
    use crate::analysis::analyze_rule;
    use crate::model::{ClassKind, ClassUnit, FieldUnit, StructuralModel, Visibility};
    use crate::pattern::Pattern;
    use crate::rules::{Rule, RuleKind};

    fn model() -> StructuralModel {
        let mut b = StructuralModel::builder();
        b.add_imports("app.controller", ["app.repository.UserRepository"]);
        b.add_class(
            ClassUnit::new("app.controller", "UserController", Visibility::Public, ClassKind::Class)
                .with_source_file("UserController.java"),
        );
        b.add_class(
            ClassUnit::new("app.controller", "OrderController", Visibility::Public, ClassKind::Class)
                .with_field(FieldUnit::new(
                    "orders",
                    "app.repository.OrderRepository",
                    Visibility::Private,
                )),
        );
        b.add_class(ClassUnit::new(
            "app.repository",
            "UserRepository",
            Visibility::Public,
            ClassKind::Interface,
        ));
        b.add_class(ClassUnit::new(
            "app.repository",
            "OrderRepository",
            Visibility::Public,
            ClassKind::Interface,
        ));
        b.build()
    }

    fn rule() -> Rule {
        Rule::new(
            "no-controller-to-repo",
            RuleKind::ForbiddenDependency {
                from: Pattern::new("app.controller..*"),
                to: Pattern::new("app.repository..*"),
            },
        )
        .with_message("Use the service layer")
    }

    #[test]
    fn one_violation_per_dependent_pair() {
        let violations = analyze_rule(&rule(), &model());
        let pairs: Vec<&str> = violations.iter().map(|v| v.message.as_str()).collect();
        assert_eq!(
            pairs,
            [
                // package-level import reaches both controllers
                "Forbidden dependency: app.controller.OrderController -> app.repository.OrderRepository. Use the service layer",
                "Forbidden dependency: app.controller.OrderController -> app.repository.UserRepository. Use the service layer",
                "Forbidden dependency: app.controller.UserController -> app.repository.UserRepository. Use the service layer",
            ]
        );
    }

    #[test]
    fn location_points_at_dependent_class() {
        let violations = analyze_rule(&rule(), &model());
        let last = violations.last().unwrap();
        assert_eq!(last.location.file.to_str(), Some("UserController.java"));
        assert_eq!(last.location.line, 1);
        assert_eq!(last.location.symbol, "app.controller.UserController");
        assert_eq!(last.rule_type, "forbidden-dependency");
    }

    #[test]
    fn self_reference_counts_when_both_patterns_match() {
        let mut b = StructuralModel::builder();
        b.add_class(
            ClassUnit::new("app.legacy", "Node", Visibility::Public, ClassKind::Class)
                .with_field(FieldUnit::new("next", "app.legacy.Node", Visibility::Private)),
        );
        let rule = Rule::new(
            "no-legacy",
            RuleKind::ForbiddenDependency {
                from: Pattern::new("app..*"),
                to: Pattern::new("app.legacy..*"),
            },
        );
        let violations = analyze_rule(&rule, &b.build());
        assert_eq!(violations.len(), 1);
        assert!(violations[0]
            .message
            .starts_with("Forbidden dependency: app.legacy.Node -> app.legacy.Node."));
    }

    #[test]
    fn no_violation_in_reverse_direction() {
        let reversed = Rule::new(
            "r",
            RuleKind::ForbiddenDependency {
                from: Pattern::new("app.repository..*"),
                to: Pattern::new("app.controller..*"),
            },
        );
        assert!(analyze_rule(&reversed, &model()).is_empty());
    }
}
