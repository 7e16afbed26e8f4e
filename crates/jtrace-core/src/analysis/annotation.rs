//! Required annotation analyzer.

use crate::model::{ClassUnit, StructuralModel};
use crate::pattern::Pattern;
use crate::rules::{Rule, Target};
use crate::types::Violation;

use super::class_violation;

pub(super) fn analyze(
    rule: &Rule,
    package: &Pattern,
    target: Target,
    annotation: &str,
    model: &StructuralModel,
) -> Vec<Violation> {
    let mut violations = Vec::new();
    let mut missing = |class: &ClassUnit, symbol: String| {
        let message = format!("Missing @{annotation} on {symbol}. {}", rule.message);
        violations.push(
            class_violation(rule, class, symbol.as_str(), message)
                .with_suggestion(format!("Annotate {symbol} with @{annotation}")),
        );
    };

    for class in model.classes().filter(|c| package.matches(c.fqn())) {
        match target {
            Target::Class => {
                if !is_annotated(class.annotations(), annotation) {
                    missing(class, class.fqn().to_owned());
                }
            }
            Target::Method => {
                for method in class.methods() {
                    if !is_annotated(&method.annotations, annotation) {
                        missing(class, format!("{}#{}", class.fqn(), method.name));
                    }
                }
            }
            Target::Field => {
                for field in class.fields() {
                    if !is_annotated(&field.annotations, annotation) {
                        missing(class, format!("{}.{}", class.fqn(), field.name));
                    }
                }
            }
        }
    }
    violations
}

/// Lenient presence check: `Transactional`, `@Transactional` and
/// `org.springframework.transaction.annotation.Transactional` are equivalent.
fn is_annotated(present: &[String], required: &str) -> bool {
    let required = strip_at(required);
    present.iter().map(|a| strip_at(a)).any(|a| {
        a == required || simple_name(a) == simple_name(required)
    })
}

fn strip_at(name: &str) -> &str {
    name.strip_prefix('@').unwrap_or(name)
}

fn simple_name(name: &str) -> &str {
    name.rsplit_once('.').map_or(name, |(_, simple)| simple)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::analyze_rule;
    use crate::model::{ClassKind, FieldUnit, MethodUnit, Visibility};
    use crate::rules::RuleKind;

    fn rule(target: Target, annotation: &str) -> Rule {
        Rule::new(
            "annotated",
            RuleKind::RequireAnnotation {
                package: Pattern::new("app.service..*"),
                target,
                annotation: annotation.into(),
            },
        )
    }

    fn model() -> StructuralModel {
        let mut b = StructuralModel::builder();
        b.add_class(
            ClassUnit::new("app.service", "UserService", Visibility::Public, ClassKind::Class)
                .with_annotation("Service")
                .with_method(
                    MethodUnit::new("save", "void", Visibility::Public)
                        .with_annotation("Transactional"),
                )
                .with_method(MethodUnit::new("findAll", "List", Visibility::Public))
                .with_field(
                    FieldUnit::new("repo", "UserRepository", Visibility::Private)
                        .with_annotation("org.springframework.beans.factory.annotation.Autowired"),
                ),
        );
        b.add_class(
            ClassUnit::new("app.web", "Controller", Visibility::Public, ClassKind::Class)
                .with_method(MethodUnit::new("get", "void", Visibility::Public)),
        );
        b.build()
    }

    #[test]
    fn flags_only_the_unannotated_method() {
        let violations = analyze_rule(&rule(Target::Method, "Transactional"), &model());
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].location.symbol, "app.service.UserService#findAll");
        assert!(violations[0].message.starts_with("Missing @Transactional"));
    }

    #[test]
    fn class_target() {
        assert!(analyze_rule(&rule(Target::Class, "@Service"), &model()).is_empty());
        let violations = analyze_rule(&rule(Target::Class, "Component"), &model());
        assert_eq!(violations[0].location.symbol, "app.service.UserService");
    }

    #[test]
    fn field_target_matches_qualified_annotation() {
        assert!(analyze_rule(&rule(Target::Field, "Autowired"), &model()).is_empty());
        let violations = analyze_rule(&rule(Target::Field, "Inject"), &model());
        assert_eq!(violations[0].location.symbol, "app.service.UserService.repo");
    }

    #[test]
    fn lenient_matching() {
        let present = vec!["Transactional".to_string()];
        assert!(is_annotated(&present, "Transactional"));
        assert!(is_annotated(&present, "@Transactional"));
        assert!(is_annotated(
            &present,
            "org.springframework.transaction.annotation.Transactional"
        ));
        assert!(!is_annotated(&present, "Transaction"));
        assert!(!is_annotated(&[], "Transactional"));
    }
}
