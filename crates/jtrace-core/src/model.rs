//! Structural model of a Java codebase.
//!
//! The model is accumulated through a [`ModelBuilder`] during import and then
//! frozen into a [`StructuralModel`], which exposes no mutators. Analyzers only
//! ever see the frozen model.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Access level of a class or member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Visibility {
    /// `public`
    Public,
    /// `protected`
    Protected,
    /// No access modifier.
    PackagePrivate,
    /// `private`
    Private,
}

impl Visibility {
    /// Returns the configuration name (e.g. `"package-private"`).
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Public => "public",
            Self::Protected => "protected",
            Self::PackagePrivate => "package-private",
            Self::Private => "private",
        }
    }
}

impl std::fmt::Display for Visibility {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned for a visibility string outside the closed set.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown visibility `{0}`, expected: public, protected, package-private, private")]
pub struct UnknownVisibility(pub String);

impl FromStr for Visibility {
    type Err = UnknownVisibility;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "public" => Ok(Self::Public),
            "protected" => Ok(Self::Protected),
            "package-private" | "package_private" => Ok(Self::PackagePrivate),
            "private" => Ok(Self::Private),
            _ => Err(UnknownVisibility(s.to_string())),
        }
    }
}

/// Kind of type declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClassKind {
    /// `class` (records are folded in here).
    Class,
    /// `interface`
    Interface,
    /// `enum`
    Enum,
    /// `@interface`
    Annotation,
}

/// A method parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameter {
    /// Parameter name.
    pub name: String,
    /// Type name as written in source.
    pub type_name: String,
}

impl Parameter {
    /// Creates a parameter.
    #[must_use]
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
        }
    }
}

/// A method declared directly in a class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodUnit {
    /// Method name.
    pub name: String,
    /// Return type name as written in source.
    pub return_type: String,
    /// Declared visibility.
    pub visibility: Visibility,
    /// Parameters in declaration order.
    pub parameters: Vec<Parameter>,
    /// Annotation names as written, without `@`.
    pub annotations: Vec<String>,
}

impl MethodUnit {
    /// Creates a method with no parameters and no annotations.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        return_type: impl Into<String>,
        visibility: Visibility,
    ) -> Self {
        Self {
            name: name.into(),
            return_type: return_type.into(),
            visibility,
            parameters: Vec::new(),
            annotations: Vec::new(),
        }
    }

    /// Adds a parameter.
    #[must_use]
    pub fn with_parameter(mut self, name: impl Into<String>, type_name: impl Into<String>) -> Self {
        self.parameters.push(Parameter::new(name, type_name));
        self
    }

    /// Adds an annotation.
    #[must_use]
    pub fn with_annotation(mut self, annotation: impl Into<String>) -> Self {
        self.annotations.push(annotation.into());
        self
    }

    /// Returns `name(T1, T2)`, the per-class uniqueness key.
    #[must_use]
    pub fn signature(&self) -> String {
        let types: Vec<&str> = self
            .parameters
            .iter()
            .map(|p| p.type_name.as_str())
            .collect();
        format!("{}({})", self.name, types.join(", "))
    }
}

/// A field declared directly in a class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldUnit {
    /// Field name.
    pub name: String,
    /// Type name as written in source.
    pub type_name: String,
    /// Declared visibility.
    pub visibility: Visibility,
    /// Annotation names as written, without `@`.
    pub annotations: Vec<String>,
}

impl FieldUnit {
    /// Creates a field with no annotations.
    #[must_use]
    pub fn new(name: impl Into<String>, type_name: impl Into<String>, visibility: Visibility) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
            visibility,
            annotations: Vec::new(),
        }
    }

    /// Adds an annotation.
    #[must_use]
    pub fn with_annotation(mut self, annotation: impl Into<String>) -> Self {
        self.annotations.push(annotation.into());
        self
    }
}

/// A class, interface, enum or annotation type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassUnit {
    name: String,
    fqn: String,
    package: String,
    visibility: Visibility,
    kind: ClassKind,
    annotations: Vec<String>,
    methods: Vec<MethodUnit>,
    fields: Vec<FieldUnit>,
    source_file: PathBuf,
    enclosing: Option<String>,
}

impl ClassUnit {
    /// Creates a class in `package` (empty for the default package).
    #[must_use]
    pub fn new(
        package: impl Into<String>,
        name: impl Into<String>,
        visibility: Visibility,
        kind: ClassKind,
    ) -> Self {
        let package = package.into();
        let name = name.into();
        Self {
            fqn: qualify(&package, &name),
            name,
            package,
            visibility,
            kind,
            annotations: Vec::new(),
            methods: Vec::new(),
            fields: Vec::new(),
            source_file: PathBuf::new(),
            enclosing: None,
        }
    }

    /// Sets the declaring source file.
    #[must_use]
    pub fn with_source_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.source_file = path.into();
        self
    }

    /// Links this class to the FQN of its enclosing class.
    #[must_use]
    pub fn with_enclosing(mut self, enclosing_fqn: impl Into<String>) -> Self {
        self.enclosing = Some(enclosing_fqn.into());
        self
    }

    /// Adds a class-level annotation.
    #[must_use]
    pub fn with_annotation(mut self, annotation: impl Into<String>) -> Self {
        self.annotations.push(annotation.into());
        self
    }

    /// Adds a method, replacing any existing method with the same signature.
    #[must_use]
    pub fn with_method(mut self, method: MethodUnit) -> Self {
        self.add_method(method);
        self
    }

    /// Adds a field, replacing any existing field with the same name.
    #[must_use]
    pub fn with_field(mut self, field: FieldUnit) -> Self {
        self.add_field(field);
        self
    }

    pub(crate) fn add_method(&mut self, method: MethodUnit) {
        let signature = method.signature();
        if let Some(existing) = self.methods.iter_mut().find(|m| m.signature() == signature) {
            *existing = method;
        } else {
            self.methods.push(method);
        }
    }

    pub(crate) fn add_field(&mut self, field: FieldUnit) {
        if let Some(existing) = self.fields.iter_mut().find(|f| f.name == field.name) {
            *existing = field;
        } else {
            self.fields.push(field);
        }
    }

    /// Simple name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Fully-qualified name.
    #[must_use]
    pub fn fqn(&self) -> &str {
        &self.fqn
    }

    /// Package name (empty for the default package).
    #[must_use]
    pub fn package(&self) -> &str {
        &self.package
    }

    /// Declared visibility.
    #[must_use]
    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    /// Declaration kind.
    #[must_use]
    pub fn kind(&self) -> ClassKind {
        self.kind
    }

    /// Class-level annotations.
    #[must_use]
    pub fn annotations(&self) -> &[String] {
        &self.annotations
    }

    /// Methods declared directly in this class.
    #[must_use]
    pub fn methods(&self) -> &[MethodUnit] {
        &self.methods
    }

    /// Fields declared directly in this class.
    #[must_use]
    pub fn fields(&self) -> &[FieldUnit] {
        &self.fields
    }

    /// Declaring source file.
    #[must_use]
    pub fn source_file(&self) -> &Path {
        &self.source_file
    }

    /// FQN of the enclosing class, for nested types.
    #[must_use]
    pub fn enclosing(&self) -> Option<&str> {
        self.enclosing.as_deref()
    }

    /// All type names this class mentions in fields and method signatures.
    pub fn referenced_types(&self) -> impl Iterator<Item = &str> {
        let field_types = self.fields.iter().map(|f| f.type_name.as_str());
        let method_types = self.methods.iter().flat_map(|m| {
            std::iter::once(m.return_type.as_str())
                .chain(m.parameters.iter().map(|p| p.type_name.as_str()))
        });
        field_types.chain(method_types)
    }
}

/// A package and the union of imports across all its files.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageUnit {
    name: String,
    imports: BTreeSet<String>,
    classes: BTreeSet<String>,
}

impl PackageUnit {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::default()
        }
    }

    /// Package name (empty for the default package).
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Imported names from every file in this package.
    #[must_use]
    pub fn imports(&self) -> &BTreeSet<String> {
        &self.imports
    }

    /// FQNs of the member classes.
    #[must_use]
    pub fn classes(&self) -> &BTreeSet<String> {
        &self.classes
    }
}

/// Mutable accumulator used while importing sources.
#[derive(Debug, Default)]
pub struct ModelBuilder {
    packages: BTreeMap<String, PackageUnit>,
    classes: BTreeMap<String, ClassUnit>,
}

impl ModelBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Ensures a package exists and merges imports into it.
    pub fn add_imports<I, S>(&mut self, package: &str, imports: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.package_mut(package)
            .imports
            .extend(imports.into_iter().map(Into::into));
        self
    }

    /// Registers a class under its FQN, replacing any earlier class with that FQN.
    pub fn add_class(&mut self, class: ClassUnit) -> &mut Self {
        let fqn = class.fqn.clone();
        self.package_mut(&class.package).classes.insert(fqn.clone());
        self.classes.insert(fqn, class);
        self
    }

    /// Number of classes registered so far.
    #[must_use]
    pub fn class_count(&self) -> usize {
        self.classes.len()
    }

    /// Freezes the builder into a read-only model.
    #[must_use]
    pub fn build(self) -> StructuralModel {
        StructuralModel {
            packages: self.packages,
            classes: self.classes,
        }
    }

    fn package_mut(&mut self, name: &str) -> &mut PackageUnit {
        self.packages
            .entry(name.to_string())
            .or_insert_with(|| PackageUnit::new(name))
    }
}

/// Read-only structural model. Iteration is ordered by name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructuralModel {
    packages: BTreeMap<String, PackageUnit>,
    classes: BTreeMap<String, ClassUnit>,
}

impl StructuralModel {
    /// Creates a builder.
    #[must_use]
    pub fn builder() -> ModelBuilder {
        ModelBuilder::new()
    }

    /// All classes, ordered by FQN.
    pub fn classes(&self) -> impl Iterator<Item = &ClassUnit> {
        self.classes.values()
    }

    /// All packages, ordered by name.
    pub fn packages(&self) -> impl Iterator<Item = &PackageUnit> {
        self.packages.values()
    }

    /// Looks up a class by FQN.
    #[must_use]
    pub fn class(&self, fqn: &str) -> Option<&ClassUnit> {
        self.classes.get(fqn)
    }

    /// Looks up a package by name.
    #[must_use]
    pub fn package(&self, name: &str) -> Option<&PackageUnit> {
        self.packages.get(name)
    }

    /// Import set of the package declaring `class`.
    #[must_use]
    pub fn imports_of(&self, class: &ClassUnit) -> Option<&BTreeSet<String>> {
        self.packages.get(class.package()).map(PackageUnit::imports)
    }

    /// Resolves a referenced name to the model class it denotes.
    ///
    /// Matches an exact FQN, or a name nested under a class FQN
    /// (`com.a.Outer.Inner` resolves to `com.a.Outer`); the longest such
    /// class wins. Array and varargs suffixes are ignored.
    #[must_use]
    pub fn resolve(&self, name: &str) -> Option<&ClassUnit> {
        let name = element_type(name);
        if let Some(class) = self.classes.get(name) {
            return Some(class);
        }
        let mut candidate = name;
        while let Some((head, _)) = candidate.rsplit_once('.') {
            if let Some(class) = self.classes.get(head) {
                return Some(class);
            }
            candidate = head;
        }
        None
    }

    /// Number of classes.
    #[must_use]
    pub fn class_count(&self) -> usize {
        self.classes.len()
    }

    /// Returns true if the model holds no classes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

/// Joins a package and a simple name into an FQN.
#[must_use]
pub fn qualify(package: &str, name: &str) -> String {
    if package.is_empty() {
        name.to_string()
    } else {
        format!("{package}.{name}")
    }
}

/// Strips array (`[]`) and varargs (`...`) suffixes from a type name.
pub(crate) fn element_type(type_name: &str) -> &str {
    let mut name = type_name.trim_end();
    while let Some(inner) = name
        .strip_suffix("[]")
        .or_else(move || name.strip_suffix("..."))
    {
        name = inner.trim_end();
    }
    name
}
