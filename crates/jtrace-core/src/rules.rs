//! Validated architecture rules.
//!
//! [`Rule`] is a closed set: every variant of [`RuleKind`] has exactly one
//! analyzer, and dispatch is an exhaustive `match`.

use std::str::FromStr;

use crate::model::Visibility;
use crate::pattern::Pattern;
use crate::types::Severity;

/// A configured rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    /// Unique rule id.
    pub id: String,
    /// Severity of violations produced by this rule.
    pub severity: Severity,
    /// Message attached to every violation.
    pub message: String,
    /// What the rule checks.
    pub kind: RuleKind,
}

impl Rule {
    /// Creates a rule with the default message for its kind.
    #[must_use]
    pub fn new(id: impl Into<String>, kind: RuleKind) -> Self {
        Self {
            id: id.into(),
            severity: Severity::Error,
            message: kind.default_message(),
            kind,
        }
    }

    /// Sets the severity.
    #[must_use]
    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    /// Sets the message.
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Rule type name, e.g. `"forbidden-dependency"`.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        self.kind.type_name()
    }
}

/// The rule variants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleKind {
    /// Classes matching `from` must not depend on classes matching `to`.
    ForbiddenDependency {
        /// Dependent classes.
        from: Pattern,
        /// Forbidden targets.
        to: Pattern,
    },
    /// Elements of classes matching `package` must carry an annotation.
    RequireAnnotation {
        /// Selected classes.
        package: Pattern,
        /// Which elements are checked.
        target: Target,
        /// Required annotation name.
        annotation: String,
    },
    /// Dependencies between layers must be declared.
    Layering {
        /// Layers in declaration order.
        layers: Vec<Layer>,
        /// Permitted `from -> to` layer edges.
        allowed: Vec<AllowedDependency>,
        /// Reject cycles among the allowed edges.
        forbid_cycles: bool,
    },
    /// Elements of classes matching `package` must have a given visibility.
    Visibility {
        /// Selected classes.
        package: Pattern,
        /// Which elements are checked.
        target: Target,
        /// Required visibility.
        required: Visibility,
    },
}

impl RuleKind {
    /// Canonical type names.
    pub const TYPE_NAMES: [&'static str; 4] = [
        "forbidden-dependency",
        "require-annotation",
        "layering",
        "visibility",
    ];

    /// Rule type name.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::ForbiddenDependency { .. } => "forbidden-dependency",
            Self::RequireAnnotation { .. } => "require-annotation",
            Self::Layering { .. } => "layering",
            Self::Visibility { .. } => "visibility",
        }
    }

    /// Message used when the configuration provides none.
    #[must_use]
    pub fn default_message(&self) -> String {
        match self {
            Self::ForbiddenDependency { from, to } => {
                format!("Dependency from {from} to {to} is forbidden")
            }
            Self::RequireAnnotation {
                package,
                target,
                annotation,
            } => format!("{target} in {package} must be annotated with @{annotation}"),
            Self::Layering {
                layers, allowed, ..
            } => format!(
                "Layering rule with {} layers and {} allowed dependencies",
                layers.len(),
                allowed.len()
            ),
            Self::Visibility {
                package,
                target,
                required,
            } => format!("{target} in {package} must be {required}"),
        }
    }
}

/// Normalizes a type string (`forbiddenDependency`, `FORBIDDEN_DEPENDENCY`)
/// to its kebab-case name, or `None` if it is not a known rule type.
#[must_use]
pub fn canonical_type_name(raw: &str) -> Option<&'static str> {
    let squash = |s: &str| {
        s.chars()
            .filter(|c| !matches!(c, '-' | '_'))
            .collect::<String>()
            .to_ascii_lowercase()
    };
    let key = squash(raw);
    RuleKind::TYPE_NAMES
        .into_iter()
        .find(|&name| squash(name) == key)
}

/// Element kind a rule applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Target {
    /// The class itself.
    Class,
    /// Each declared method.
    Method,
    /// Each declared field.
    Field,
}

impl Target {
    /// Lowercase name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Class => "class",
            Self::Method => "method",
            Self::Field => "field",
        }
    }
}

impl std::fmt::Display for Target {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned for a target string outside `class`, `method`, `field`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown target `{0}`, expected: class, method, field")]
pub struct UnknownTarget(pub String);

impl FromStr for Target {
    type Err = UnknownTarget;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "class" => Ok(Self::Class),
            "method" => Ok(Self::Method),
            "field" => Ok(Self::Field),
            _ => Err(UnknownTarget(s.to_string())),
        }
    }
}

/// A named group of packages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layer {
    /// Layer name.
    pub name: String,
    /// Patterns selecting the layer's classes.
    pub packages: Vec<Pattern>,
}

impl Layer {
    /// Creates a layer from pattern strings.
    #[must_use]
    pub fn new<S: AsRef<str>>(name: impl Into<String>, packages: &[S]) -> Self {
        Self {
            name: name.into(),
            packages: packages.iter().map(|p| Pattern::new(p.as_ref())).collect(),
        }
    }
}

/// A permitted dependency between two layers.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AllowedDependency {
    /// Dependent layer.
    pub from: String,
    /// Layer depended upon.
    pub to: String,
}

impl AllowedDependency {
    /// Creates an allowed edge.
    #[must_use]
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }
}
