//! Structural dependency relation between classes.
//!
//! A class depends on another when its package imports the other's FQN, or
//! when one of its fields or method signatures names a type equal to or
//! nested within the other's FQN. Array and varargs types count as their
//! element type. Otherwise names are compared as written: wildcard and
//! static imports, generics and inherited members are not resolved.

use crate::model::{element_type, ClassUnit, StructuralModel};

/// Returns true if `from` structurally depends on `to`.
#[must_use]
pub fn has_dependency(model: &StructuralModel, from: &ClassUnit, to: &ClassUnit) -> bool {
    let target = to.fqn();

    let imported = model
        .imports_of(from)
        .is_some_and(|imports| imports.contains(target));

    imported || from.referenced_types().any(|ty| refers_to(ty, target))
}

/// True if `type_name` is `fqn` itself or a name nested under it.
pub(crate) fn refers_to(type_name: &str, fqn: &str) -> bool {
    element_type(type_name)
        .strip_prefix(fqn)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with('.'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ClassKind, FieldUnit, MethodUnit, Visibility};

    fn class(package: &str, name: &str) -> ClassUnit {
        ClassUnit::new(package, name, Visibility::Public, ClassKind::Class)
    }

    #[test]
    fn import_creates_dependency_for_whole_package() {
        let mut b = StructuralModel::builder();
        b.add_imports("web", ["repo.UserRepository"]);
        b.add_class(class("web", "UserController"));
        b.add_class(class("web", "HealthController"));
        b.add_class(class("repo", "UserRepository"));
        let m = b.build();

        let repo = m.class("repo.UserRepository").unwrap();
        assert!(has_dependency(&m, m.class("web.UserController").unwrap(), repo));
        // Imports are tracked per package, not per file.
        assert!(has_dependency(&m, m.class("web.HealthController").unwrap(), repo));
        assert!(!has_dependency(&m, repo, m.class("web.UserController").unwrap()));
    }

    #[test]
    fn field_and_signature_types() {
        let mut b = StructuralModel::builder();
        b.add_class(class("a", "Holder").with_field(FieldUnit::new(
            "entry",
            "b.Map.Entry",
            Visibility::Private,
        )));
        b.add_class(class("a", "Service").with_method(
            MethodUnit::new("find", "void", Visibility::Public).with_parameter("id", "b.Id"),
        ));
        b.add_class(class("b", "Map"));
        b.add_class(class("b", "Id"));
        b.add_class(class("b", "MapX"));
        let m = b.build();

        let holder = m.class("a.Holder").unwrap();
        assert!(has_dependency(&m, holder, m.class("b.Map").unwrap()));
        assert!(!has_dependency(&m, holder, m.class("b.MapX").unwrap()));
        assert!(has_dependency(&m, m.class("a.Service").unwrap(), m.class("b.Id").unwrap()));
    }

    #[test]
    fn return_type_creates_dependency() {
        let mut b = StructuralModel::builder();
        b.add_class(
            class("a", "Lookup").with_method(MethodUnit::new("get", "b.Id", Visibility::Public)),
        );
        b.add_class(class("b", "Id"));
        let m = b.build();
        let lookup = m.class("a.Lookup").unwrap();
        assert!(lookup.fields().is_empty());
        assert!(lookup.methods()[0].parameters.is_empty());
        assert!(has_dependency(&m, lookup, m.class("b.Id").unwrap()));
    }

    #[test]
    fn simple_names_do_not_resolve() {
        let mut b = StructuralModel::builder();
        b.add_class(class("a", "A").with_field(FieldUnit::new("b", "B", Visibility::Private)));
        b.add_class(class("a", "B"));
        let m = b.build();
        assert!(!has_dependency(&m, m.class("a.A").unwrap(), m.class("a.B").unwrap()));
    }

    #[test]
    fn refers_to_requires_segment_boundary() {
        assert!(refers_to("com.a.B", "com.a.B"));
        assert!(refers_to("com.a.B.Inner", "com.a.B"));
        assert!(!refers_to("com.a.BB", "com.a.B"));
        assert!(!refers_to("com.a", "com.a.B"));
    }

    #[test]
    fn array_and_varargs_refer_to_element_type() {
        assert!(refers_to("com.a.User[]", "com.a.User"));
        assert!(refers_to("com.a.User[][]", "com.a.User"));
        assert!(refers_to("com.a.User...", "com.a.User"));
        assert!(refers_to("com.a.User.Role[]", "com.a.User"));
        assert!(!refers_to("com.a.Users[]", "com.a.User"));
        assert!(!refers_to("com.a.Users...", "com.a.User"));
    }
}
