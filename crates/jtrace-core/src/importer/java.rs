//! Java language extractor using Tree-sitter.

use std::collections::VecDeque;
use tree_sitter::{Language, Node, Parser};

use super::extractor::{ExtractError, FileAnalysis, LanguageExtractor, TypeDecl};
use crate::model::{ClassKind, FieldUnit, MethodUnit, Parameter, Visibility};

/// Extracts packages, imports and type declarations from Java source.
pub struct JavaExtractor {
    language: Language,
}

impl JavaExtractor {
    /// Creates a new Java extractor.
    #[must_use]
    pub fn new() -> Self {
        Self {
            language: tree_sitter_java::LANGUAGE.into(),
        }
    }

    fn text<'a>(node: Node<'_>, src: &'a [u8]) -> &'a str {
        node.utf8_text(src).unwrap_or("")
    }

    /// Source text with runs of whitespace collapsed to one space.
    fn normalized(node: Node<'_>, src: &[u8]) -> String {
        Self::text(node, src)
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Returns the dotted name child of a package or import declaration.
    fn name_child(node: Node<'_>, src: &[u8]) -> Option<String> {
        let mut cursor = node.walk();
        let found = node
            .children(&mut cursor)
            .find(|c| matches!(c.kind(), "scoped_identifier" | "identifier"));
        found.map(|c| Self::normalized(c, src).replace(' ', ""))
    }

    fn class_kind(node_kind: &str) -> Option<ClassKind> {
        match node_kind {
            "class_declaration" | "record_declaration" => Some(ClassKind::Class),
            "interface_declaration" => Some(ClassKind::Interface),
            "enum_declaration" => Some(ClassKind::Enum),
            "annotation_type_declaration" => Some(ClassKind::Annotation),
            _ => None,
        }
    }

    /// Reads visibility and annotations from a declaration's `modifiers` child.
    fn modifiers(node: Node<'_>, src: &[u8]) -> (Visibility, Vec<String>) {
        let mut visibility = Visibility::PackagePrivate;
        let mut annotations = Vec::new();

        let mut cursor = node.walk();
        let Some(modifiers) = node.children(&mut cursor).find(|c| c.kind() == "modifiers") else {
            return (visibility, annotations);
        };

        let mut cursor = modifiers.walk();
        for child in modifiers.children(&mut cursor) {
            match child.kind() {
                "public" => visibility = Visibility::Public,
                "protected" => visibility = Visibility::Protected,
                "private" => visibility = Visibility::Private,
                "marker_annotation" | "annotation" => {
                    if let Some(name) = child.child_by_field_name("name") {
                        annotations.push(Self::normalized(name, src).replace(' ', ""));
                    }
                }
                _ => {}
            }
        }
        (visibility, annotations)
    }

    /// Member declarations of a type body; enum bodies nest them one level deeper.
    fn members<'t>(body: Node<'t>) -> Vec<Node<'t>> {
        let mut out = Vec::new();
        let mut cursor = body.walk();
        for child in body.named_children(&mut cursor) {
            if child.kind() == "enum_body_declarations" {
                let mut inner = child.walk();
                out.extend(child.named_children(&mut inner));
            } else {
                out.push(child);
            }
        }
        out
    }

    fn fields(node: Node<'_>, src: &[u8]) -> Vec<FieldUnit> {
        let (visibility, annotations) = Self::modifiers(node, src);
        let Some(ty) = node.child_by_field_name("type") else {
            return Vec::new();
        };
        let type_name = Self::normalized(ty, src);

        let mut cursor = node.walk();
        node.children_by_field_name("declarator", &mut cursor)
            .filter_map(|d| d.child_by_field_name("name"))
            .map(|name| FieldUnit {
                name: Self::text(name, src).to_owned(),
                type_name: type_name.clone(),
                visibility,
                annotations: annotations.clone(),
            })
            .collect()
    }

    fn parameter(node: Node<'_>, src: &[u8]) -> Option<Parameter> {
        match node.kind() {
            "formal_parameter" => {
                let ty = node.child_by_field_name("type")?;
                let name = node.child_by_field_name("name")?;
                Some(Parameter::new(
                    Self::text(name, src),
                    Self::normalized(ty, src),
                ))
            }
            "spread_parameter" => {
                let mut cursor = node.walk();
                let children: Vec<Node<'_>> = node.named_children(&mut cursor).collect();
                let ty = children.iter().find(|c| {
                    !matches!(
                        c.kind(),
                        "modifiers" | "variable_declarator" | "marker_annotation" | "annotation"
                    )
                })?;
                let name = children
                    .iter()
                    .find(|c| c.kind() == "variable_declarator")
                    .and_then(|d| d.child_by_field_name("name"))?;
                Some(Parameter::new(
                    Self::text(name, src),
                    format!("{}...", Self::normalized(*ty, src)),
                ))
            }
            _ => None,
        }
    }

    fn method(node: Node<'_>, src: &[u8]) -> Option<MethodUnit> {
        let name = node.child_by_field_name("name")?;
        let return_type = node.child_by_field_name("type")?;
        let (visibility, annotations) = Self::modifiers(node, src);

        let mut parameters = Vec::new();
        if let Some(params) = node.child_by_field_name("parameters") {
            let mut cursor = params.walk();
            parameters.extend(
                params
                    .named_children(&mut cursor)
                    .filter_map(|p| Self::parameter(p, src)),
            );
        }

        Some(MethodUnit {
            name: Self::text(name, src).to_owned(),
            return_type: Self::normalized(return_type, src),
            visibility,
            parameters,
            annotations,
        })
    }

    /// Record components become private fields of the record.
    fn record_components(node: Node<'_>, src: &[u8]) -> Vec<FieldUnit> {
        let Some(params) = node.child_by_field_name("parameters") else {
            return Vec::new();
        };
        let mut cursor = params.walk();
        params
            .named_children(&mut cursor)
            .filter_map(|p| Self::parameter(p, src))
            .map(|p| FieldUnit::new(p.name, p.type_name, Visibility::Private))
            .collect()
    }

    /// Walks type declarations breadth-first, recording each nested type's parent.
    fn collect_types(root: Node<'_>, src: &[u8]) -> Vec<TypeDecl> {
        let mut queue: VecDeque<(Node<'_>, Option<String>)> = VecDeque::new();
        let mut cursor = root.walk();
        for node in root.named_children(&mut cursor) {
            if Self::class_kind(node.kind()).is_some() {
                queue.push_back((node, None));
            }
        }

        let mut types = Vec::new();
        while let Some((node, enclosing)) = queue.pop_front() {
            let Some(kind) = Self::class_kind(node.kind()) else {
                continue;
            };
            let Some(name) = node.child_by_field_name("name") else {
                continue;
            };
            let name = Self::text(name, src).to_owned();
            let (visibility, annotations) = Self::modifiers(node, src);

            let mut decl = TypeDecl {
                name,
                kind,
                visibility,
                annotations,
                fields: Vec::new(),
                methods: Vec::new(),
                enclosing,
            };
            if node.kind() == "record_declaration" {
                decl.fields.extend(Self::record_components(node, src));
            }

            if let Some(body) = node.child_by_field_name("body") {
                for member in Self::members(body) {
                    match member.kind() {
                        "field_declaration" | "constant_declaration" => {
                            decl.fields.extend(Self::fields(member, src));
                        }
                        "method_declaration" => {
                            decl.methods.extend(Self::method(member, src));
                        }
                        kind if Self::class_kind(kind).is_some() => {
                            queue.push_back((member, Some(decl.name.clone())));
                        }
                        _ => {}
                    }
                }
            }
            types.push(decl);
        }
        types
    }

    fn first_error(root: Node<'_>) -> Option<Node<'_>> {
        let mut stack = vec![root];
        while let Some(node) = stack.pop() {
            if node.is_error() || node.is_missing() {
                return Some(node);
            }
            if !node.has_error() {
                continue;
            }
            let mut cursor = node.walk();
            let children: Vec<Node<'_>> = node.children(&mut cursor).collect();
            stack.extend(children.into_iter().rev());
        }
        None
    }
}

impl Default for JavaExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl LanguageExtractor for JavaExtractor {
    fn language_id(&self) -> &'static str {
        "java"
    }

    fn extensions(&self) -> &'static [&'static str] {
        &[".java"]
    }

    fn analyze(&self, source: &str) -> Result<FileAnalysis, ExtractError> {
        let mut parser = Parser::new();
        parser.set_language(&self.language)?;

        let src = source.as_bytes();
        let tree = parser.parse(src, None).ok_or(ExtractError::NoTree)?;
        let root = tree.root_node();

        if root.has_error() {
            let at = Self::first_error(root).unwrap_or(root).start_position();
            return Err(ExtractError::Syntax {
                line: at.row + 1,
                column: at.column + 1,
            });
        }

        let mut result = FileAnalysis::default();
        let mut cursor = root.walk();
        for node in root.named_children(&mut cursor) {
            match node.kind() {
                "package_declaration" => {
                    result.package = Self::name_child(node, src);
                }
                "import_declaration" => {
                    if let Some(name) = Self::name_child(node, src) {
                        result.imports.push(name);
                    }
                }
                _ => {}
            }
        }
        result.types = Self::collect_types(root, src);

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn analyze(src: &str) -> FileAnalysis {
        JavaExtractor::new().analyze(src).unwrap()
    }

    #[test]
    fn extracts_package_and_imports() {
        let a = analyze(
            "package com.myapp.service;\n\
             import com.myapp.repository.UserRepository;\n\
             import java.util.*;\n\
             import static org.junit.Assert.assertTrue;\n\
             public class UserService {}\n",
        );
        assert_eq!(a.package.as_deref(), Some("com.myapp.service"));
        assert_eq!(
            a.imports,
            [
                "com.myapp.repository.UserRepository",
                "java.util",
                "org.junit.Assert.assertTrue"
            ]
        );
    }

    #[test]
    fn missing_package_is_default() {
        let a = analyze("class Main {}\n");
        assert!(a.package.is_none());
        assert_eq!(a.types[0].name, "Main");
        assert_eq!(a.types[0].visibility, Visibility::PackagePrivate);
    }

    #[test]
    fn extracts_class_annotations_and_visibility() {
        let a = analyze(
            "package a;\n@Service\n@org.springframework.stereotype.Component(\"x\")\npublic class S {}\n",
        );
        let t = &a.types[0];
        assert_eq!(t.kind, ClassKind::Class);
        assert_eq!(t.visibility, Visibility::Public);
        assert_eq!(
            t.annotations,
            ["Service", "org.springframework.stereotype.Component"]
        );
    }

    #[test]
    fn extracts_fields_and_methods() {
        let a = analyze(
            "package a;\n\
             public class UserService {\n\
               @Autowired private UserRepository repo;\n\
               int x, y;\n\
               public UserService() {}\n\
               @Transactional\n\
               public User save(User user, boolean flush) { return user; }\n\
               protected void log(String... parts) {}\n\
             }\n",
        );
        let t = &a.types[0];
        assert_eq!(t.fields.len(), 3);
        assert_eq!(t.fields[0].name, "repo");
        assert_eq!(t.fields[0].type_name, "UserRepository");
        assert_eq!(t.fields[0].visibility, Visibility::Private);
        assert_eq!(t.fields[0].annotations, ["Autowired"]);
        assert_eq!(t.fields[2].name, "y");
        assert_eq!(t.fields[2].visibility, Visibility::PackagePrivate);

        assert_eq!(t.methods.len(), 2, "constructors are not methods");
        assert_eq!(t.methods[0].signature(), "save(User, boolean)");
        assert_eq!(t.methods[0].return_type, "User");
        assert_eq!(t.methods[0].annotations, ["Transactional"]);
        assert_eq!(t.methods[1].visibility, Visibility::Protected);
        assert_eq!(t.methods[1].parameters[0].type_name, "String...");
    }

    #[test]
    fn generic_types_keep_source_text() {
        let a = analyze("package a;\nclass C { java.util.Map<String,  User> byId; }\n");
        assert_eq!(a.types[0].fields[0].type_name, "java.util.Map<String, User>");
    }

    #[test]
    fn nested_types_link_to_enclosing() {
        let a = analyze(
            "package a;\n\
             public class Outer {\n\
               private static class Inner { Outer back; }\n\
               interface Callback { void done(); }\n\
             }\n",
        );
        let names: Vec<&str> = a.types.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, ["Outer", "Inner", "Callback"]);
        assert_eq!(a.types[1].enclosing.as_deref(), Some("Outer"));
        assert_eq!(a.types[1].visibility, Visibility::Private);
        assert_eq!(a.types[2].kind, ClassKind::Interface);
        assert!(a.types[0].fields.is_empty(), "members stay with their declaring type");
        assert_eq!(a.types[1].fields[0].type_name, "Outer");
    }

    #[test]
    fn enum_body_members() {
        let a = analyze(
            "package a;\n\
             public enum Status {\n\
               ACTIVE, INACTIVE;\n\
               private final String label = \"\";\n\
               public String label() { return label; }\n\
             }\n",
        );
        let t = &a.types[0];
        assert_eq!(t.kind, ClassKind::Enum);
        assert_eq!(t.fields.len(), 1);
        assert_eq!(t.methods[0].name, "label");
    }

    #[test]
    fn interface_constants_and_annotation_types() {
        let a = analyze(
            "package a;\n\
             public interface Limits { int MAX = 10; }\n\
             @interface Marker {}\n",
        );
        assert_eq!(a.types[0].fields[0].name, "MAX");
        assert_eq!(a.types[1].kind, ClassKind::Annotation);
    }

    #[test]
    fn record_components_are_fields() {
        let a = analyze("package a;\npublic record Point(int x, Money y) {}\n");
        let t = &a.types[0];
        assert_eq!(t.kind, ClassKind::Class);
        assert_eq!(t.fields[1].type_name, "Money");
        assert_eq!(t.fields[1].visibility, Visibility::Private);
    }

    #[test]
    fn syntax_error_is_reported() {
        let err = JavaExtractor::new()
            .analyze("package a;\npublic class {\n")
            .unwrap_err();
        assert!(matches!(err, ExtractError::Syntax { .. }));
    }

    #[test]
    fn empty_source() {
        let a = analyze("");
        assert!(a.package.is_none());
        assert!(a.imports.is_empty());
        assert!(a.types.is_empty());
    }
}
