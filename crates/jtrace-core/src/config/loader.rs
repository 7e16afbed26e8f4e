//! DTO → validated configuration, collecting every error.

use std::collections::HashSet;

use crate::model::{UnknownVisibility, Visibility};
use crate::pattern::Pattern;
use crate::rules::{
    canonical_type_name, AllowedDependency, Layer, Rule, RuleKind, Target, UnknownTarget,
};
use crate::types::{Severity, UnknownSeverity};

use super::dto::{ConfigDto, LayerDto, RuleDto};
use super::{Config, ConfigError, FailOn};

/// One invalid field in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RuleError {
    /// A required field is absent.
    #[error("{context}: missing required field `{field}`")]
    MissingField {
        /// Offending rule (e.g. `rules[2] (id: layering, type: layering)`).
        context: String,
        /// Field name.
        field: String,
    },

    /// A required field is present but empty.
    #[error("{context}: field `{field}` must not be empty")]
    EmptyField {
        /// Offending rule.
        context: String,
        /// Field name.
        field: String,
    },

    /// The rule type is not one of the supported variants.
    #[error(
        "{context}: unknown rule type `{value}`, expected one of: {}",
        RuleKind::TYPE_NAMES.join(", ")
    )]
    UnknownType {
        /// Offending rule.
        context: String,
        /// The invalid value.
        value: String,
    },

    /// Invalid severity string.
    #[error("{context}: {source}")]
    Severity {
        /// Offending rule, or `fail_on`.
        context: String,
        /// Parse failure.
        source: UnknownSeverity,
    },

    /// Invalid target string.
    #[error("{context}: {source}")]
    Target {
        /// Offending rule.
        context: String,
        /// Parse failure.
        source: UnknownTarget,
    },

    /// Invalid visibility string.
    #[error("{context}: {source}")]
    Visibility {
        /// Offending rule.
        context: String,
        /// Parse failure.
        source: UnknownVisibility,
    },

    /// Two rules share an id.
    #[error("{context}: duplicate rule id `{id}`")]
    DuplicateId {
        /// Offending rule.
        context: String,
        /// The repeated id.
        id: String,
    },

    /// Two layers of one rule share a name.
    #[error("{context}: duplicate layer `{name}`")]
    DuplicateLayer {
        /// Offending rule.
        context: String,
        /// The repeated name.
        name: String,
    },

    /// An allowed dependency names a layer the rule does not declare.
    #[error("{context}: allowed dependency references undeclared layer `{name}`")]
    UnknownLayer {
        /// Offending rule.
        context: String,
        /// The undeclared name.
        name: String,
    },
}

/// Converts a [`ConfigDto`] into a validated [`Config`].
///
/// # Errors
///
/// Returns [`ConfigError::Invalid`] with every validation error found across
/// the whole document.
pub fn load(dto: ConfigDto) -> Result<Config, ConfigError> {
    let mut errors = Vec::new();

    let fail_on = match dto.fail_on.as_ref().map(|f| f.severity().parse::<Severity>()) {
        None => FailOn::default(),
        Some(Ok(severity)) => FailOn::new(severity),
        Some(Err(source)) => {
            errors.push(RuleError::Severity {
                context: "fail_on".into(),
                source,
            });
            FailOn::default()
        }
    };

    let mut ids = HashSet::new();
    let mut rules = Vec::with_capacity(dto.rules.len());
    for (index, rule) in dto.rules.into_iter().enumerate() {
        let mut ctx = RuleContext::new(index, &rule, &mut errors);
        if let Some(id) = rule.id.as_deref().filter(|&id| !ids.insert(id.to_owned())) {
            ctx.push(|context| RuleError::DuplicateId {
                context,
                id: id.to_owned(),
            });
        }
        if let Some(rule) = convert_rule(&rule, &mut ctx) {
            rules.push(rule);
        }
    }

    if !errors.is_empty() {
        return Err(ConfigError::Invalid(errors));
    }

    Ok(Config {
        version: dto.version.unwrap_or_else(|| "1".to_owned()),
        base_package: dto.base_package,
        fail_on,
        analyzer: dto.analyzer,
        rules,
    })
}

/// Error sink for one rule, prefixing every error with the rule's context.
struct RuleContext<'e> {
    context: String,
    errors: &'e mut Vec<RuleError>,
}

impl<'e> RuleContext<'e> {
    fn new(index: usize, dto: &RuleDto, errors: &'e mut Vec<RuleError>) -> Self {
        let id = dto.id.as_deref().unwrap_or("?");
        let ty = dto.rule_type.as_deref().unwrap_or("?");
        Self {
            context: format!("rules[{index}] (id: {id}, type: {ty})"),
            errors,
        }
    }

    fn push(&mut self, make: impl FnOnce(String) -> RuleError) {
        self.errors.push(make(self.context.clone()));
    }

    fn missing(&mut self, field: &str) {
        self.push(|context| RuleError::MissingField {
            context,
            field: field.to_owned(),
        });
    }

    fn empty(&mut self, field: &str) {
        self.push(|context| RuleError::EmptyField {
            context,
            field: field.to_owned(),
        });
    }

    /// A present, non-blank string field.
    fn required<'d>(&mut self, value: &'d Option<String>, field: &str) -> Option<&'d str> {
        match value.as_deref() {
            None => {
                self.missing(field);
                None
            }
            Some(s) if s.trim().is_empty() => {
                self.empty(field);
                None
            }
            Some(s) => Some(s.trim()),
        }
    }

    fn pattern(&mut self, value: &Option<String>, field: &str) -> Option<Pattern> {
        self.required(value, field).map(Pattern::new)
    }

    fn target(&mut self, value: Option<&str>, default: Target) -> Option<Target> {
        match value.map(str::parse::<Target>) {
            None => Some(default),
            Some(Ok(target)) => Some(target),
            Some(Err(source)) => {
                self.push(|context| RuleError::Target { context, source });
                None
            }
        }
    }
}

fn convert_rule(dto: &RuleDto, ctx: &mut RuleContext<'_>) -> Option<Rule> {
    let id = ctx.required(&dto.id, "id");

    let severity = match dto.severity.as_deref().map(str::parse::<Severity>) {
        None => Some(Severity::Error),
        Some(Ok(severity)) => Some(severity),
        Some(Err(source)) => {
            ctx.push(|context| RuleError::Severity { context, source });
            None
        }
    };

    let kind = match ctx.required(&dto.rule_type, "type") {
        None => None,
        Some(raw) => match canonical_type_name(raw) {
            Some("forbidden-dependency") => convert_forbidden_dependency(dto, ctx),
            Some("require-annotation") => convert_require_annotation(dto, ctx),
            Some("layering") => convert_layering(dto, ctx),
            Some("visibility") => convert_visibility(dto, ctx),
            _ => {
                ctx.push(|context| RuleError::UnknownType {
                    context,
                    value: raw.to_owned(),
                });
                None
            }
        },
    };

    let (id, severity, kind) = (id?, severity?, kind?);
    let rule = Rule::new(id, kind).with_severity(severity);
    Some(match dto.message.as_deref().filter(|m| !m.trim().is_empty()) {
        Some(message) => rule.with_message(message),
        None => rule,
    })
}

fn convert_forbidden_dependency(dto: &RuleDto, ctx: &mut RuleContext<'_>) -> Option<RuleKind> {
    let from = ctx.pattern(&dto.from, "from");
    let to = ctx.pattern(&dto.to, "to");
    Some(RuleKind::ForbiddenDependency {
        from: from?,
        to: to?,
    })
}

fn convert_require_annotation(dto: &RuleDto, ctx: &mut RuleContext<'_>) -> Option<RuleKind> {
    let package = ctx.pattern(&dto.package, "in");
    let annotation = ctx.required(&dto.annotation, "annotation");
    let target = ctx.target(dto.target.as_deref(), Target::Method);
    Some(RuleKind::RequireAnnotation {
        package: package?,
        target: target?,
        annotation: annotation?.trim_start_matches('@').to_owned(),
    })
}

fn convert_visibility(dto: &RuleDto, ctx: &mut RuleContext<'_>) -> Option<RuleKind> {
    let package = ctx.pattern(&dto.package, "in");
    let target = ctx.target(dto.target.as_deref(), Target::Class);
    let required = match ctx.required(&dto.must_be, "must_be").map(str::parse::<Visibility>) {
        None => None,
        Some(Ok(visibility)) => Some(visibility),
        Some(Err(source)) => {
            ctx.push(|context| RuleError::Visibility { context, source });
            None
        }
    };
    Some(RuleKind::Visibility {
        package: package?,
        target: target?,
        required: required?,
    })
}

fn convert_layering(dto: &RuleDto, ctx: &mut RuleContext<'_>) -> Option<RuleKind> {
    let (layers, mut valid) = match dto.layers.as_deref() {
        None => {
            ctx.missing("layers");
            (Vec::new(), false)
        }
        Some([]) => {
            ctx.empty("layers");
            (Vec::new(), false)
        }
        Some(dtos) => convert_layers(dtos, ctx),
    };

    // Edges are checked against every layer name that parsed, even when a
    // sibling layer entry is broken.
    let declared: HashSet<&str> = layers.iter().map(|l| l.name.as_str()).collect();
    let mut allowed = Vec::with_capacity(dto.allowed_dependencies.len());
    for dep in &dto.allowed_dependencies {
        for name in [&dep.from, &dep.to] {
            if !layers.is_empty() && !declared.contains(name.as_str()) {
                valid = false;
                ctx.push(|context| RuleError::UnknownLayer {
                    context,
                    name: name.clone(),
                });
            }
        }
        allowed.push(AllowedDependency::new(&dep.from, &dep.to));
    }

    valid.then(|| RuleKind::Layering {
        layers,
        allowed,
        forbid_cycles: dto.forbid_cycles.unwrap_or(true),
    })
}

/// Converts layer entries. Returns every layer that has a name, and whether
/// all entries were valid.
fn convert_layers(dtos: &[LayerDto], ctx: &mut RuleContext<'_>) -> (Vec<Layer>, bool) {
    let mut names = HashSet::new();
    let mut layers = Vec::with_capacity(dtos.len());
    let mut valid = true;

    for (j, dto) in dtos.iter().enumerate() {
        let name = ctx.required(&dto.name, &format!("layers[{j}].name"));
        if dto.packages.is_empty() {
            ctx.empty(&format!("layers[{j}].packages"));
            valid = false;
        }
        for (k, package) in dto.packages.iter().enumerate() {
            if package.trim().is_empty() {
                ctx.empty(&format!("layers[{j}].packages[{k}]"));
                valid = false;
            }
        }

        let Some(name) = name else {
            valid = false;
            continue;
        };
        if !names.insert(name) {
            ctx.push(|context| RuleError::DuplicateLayer {
                context,
                name: name.to_owned(),
            });
            valid = false;
        }
        let packages: Vec<&str> = dto.packages.iter().map(|p| p.trim()).collect();
        layers.push(Layer::new(name, &packages));
    }

    (layers, valid)
}
