//! TOML deserialization types (DTO layer).
//!
//! Every rule field is optional here so the loader can report all missing
//! fields at once instead of failing on the first one serde notices.

use serde::Deserialize;

use super::AnalyzerConfig;

/// Raw configuration document.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigDto {
    /// Schema version.
    #[serde(default)]
    pub version: Option<String>,

    /// Root package of the project. Informational only.
    #[serde(default, alias = "basePackage")]
    pub base_package: Option<String>,

    /// Failure threshold.
    #[serde(default, alias = "failOn")]
    pub fail_on: Option<FailOnDto>,

    /// Source discovery settings.
    #[serde(default)]
    pub analyzer: AnalyzerConfig,

    /// Rules in declaration order.
    #[serde(default)]
    pub rules: Vec<RuleDto>,
}

/// `fail_on = "warning"` or `[fail_on] severity = "warning"`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum FailOnDto {
    /// Bare severity string.
    Level(String),
    /// Table with a `severity` key.
    Table {
        /// Severity string.
        severity: String,
    },
}

impl FailOnDto {
    /// The severity string, whichever form was used.
    #[must_use]
    pub fn severity(&self) -> &str {
        match self {
            Self::Level(s) | Self::Table { severity: s } => s,
        }
    }
}

/// One `[[rules]]` entry.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RuleDto {
    /// Rule id.
    #[serde(default)]
    pub id: Option<String>,

    /// Rule type, kebab-case or camelCase.
    #[serde(default, rename = "type")]
    pub rule_type: Option<String>,

    /// Severity string.
    #[serde(default)]
    pub severity: Option<String>,

    /// Violation message.
    #[serde(default)]
    pub message: Option<String>,

    /// Dependent class pattern (forbidden-dependency).
    #[serde(default)]
    pub from: Option<String>,

    /// Target class pattern (forbidden-dependency).
    #[serde(default)]
    pub to: Option<String>,

    /// Selected class pattern (require-annotation, visibility).
    #[serde(default, rename = "in")]
    pub package: Option<String>,

    /// Element kind (require-annotation, visibility).
    #[serde(default)]
    pub target: Option<String>,

    /// Required annotation (require-annotation).
    #[serde(default)]
    pub annotation: Option<String>,

    /// Required visibility (visibility).
    #[serde(default, alias = "mustBe")]
    pub must_be: Option<String>,

    /// Layers (layering).
    #[serde(default)]
    pub layers: Option<Vec<LayerDto>>,

    /// Allowed layer edges (layering).
    #[serde(default, alias = "allowedDependencies")]
    pub allowed_dependencies: Vec<AllowedDependencyDto>,

    /// Reject cycles among allowed edges (layering).
    #[serde(default, alias = "forbidCycles")]
    pub forbid_cycles: Option<bool>,
}

/// One `[[rules.layers]]` entry.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LayerDto {
    /// Layer name.
    #[serde(default)]
    pub name: Option<String>,

    /// Package patterns.
    #[serde(default)]
    pub packages: Vec<String>,
}

/// One allowed `from -> to` edge.
#[derive(Debug, Clone, Deserialize)]
pub struct AllowedDependencyDto {
    /// Dependent layer.
    pub from: String,
    /// Layer depended upon.
    pub to: String,
}
