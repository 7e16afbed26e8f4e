//! Rules command implementation.

use jtrace_core::RuleKind;

/// Fields accepted by each rule type, beyond `id`, `severity` and `message`.
static RULE_FIELDS: [(&str, &str, &str); 4] = [
    (
        "forbidden-dependency",
        "from, to",
        "Classes matching `from` must not depend on classes matching `to`",
    ),
    (
        "require-annotation",
        "in, target (class|method|field, default method), annotation",
        "Elements of classes matching `in` must carry the annotation",
    ),
    (
        "layering",
        "layers, allowed_dependencies, forbid_cycles (default true)",
        "Cross-layer dependencies must be declared as allowed",
    ),
    (
        "visibility",
        "in, target (class|method|field, default class), must_be",
        "Elements of classes matching `in` must have the given visibility",
    ),
];

/// Runs the rules command.
pub fn run() {
    println!("Available rule types:\n");
    println!("{:<22} Description", "Type");
    println!("{}", "-".repeat(80));

    for name in RuleKind::TYPE_NAMES {
        let Some((_, fields, description)) = RULE_FIELDS.iter().find(|(n, _, _)| *n == name)
        else {
            continue;
        };
        println!("{name:<22} {description}");
        println!("{:<22} fields: {fields}", "");
    }

    println!("\nEvery rule also takes `id` (required), `severity` and `message`.");
    println!("Type names are also accepted in camelCase, e.g. `forbiddenDependency`.");
    println!("\nPattern forms for `from`, `to`, `in` and layer packages:");
    println!("  com.app..*     the package and all subpackages");
    println!("  com.app.*      direct members of the package");
    println!("  com.*.Service  glob (`*`, `?`)");
    println!("  ^com\\.app.*$   regular expression");
    println!("  com.app.Foo    exact name");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_rule_type_is_described() {
        for name in RuleKind::TYPE_NAMES {
            assert!(
                RULE_FIELDS.iter().any(|(n, _, _)| *n == name),
                "{name} has no description"
            );
        }
    }
}
