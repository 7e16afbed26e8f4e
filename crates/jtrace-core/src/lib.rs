//! # jtrace-core
//!
//! Static architecture rule checking for Java source code.
//!
//! Sources are parsed with Tree-sitter into a [`StructuralModel`] of
//! packages, classes, methods and fields. Each configured [`Rule`] is then
//! evaluated against the frozen model:
//!
//! - forbidden dependencies between class patterns
//! - required annotations on classes, methods or fields
//! - layering with declared allowed dependencies and cycle prohibition
//! - required visibility
//!
//! ## Example
//!
//! ```ignore
//! use jtrace_core::{Config, RuleEngine};
//!
//! let config = Config::from_file("jtrace.toml".as_ref())?;
//! let result = RuleEngine::new(config).run(&sources)?;
//! for violation in &result.violations {
//!     println!("{violation}");
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod analysis;
pub mod config;
pub mod cycle;
pub mod dependency;
pub mod engine;
pub mod importer;
pub mod model;
pub mod pattern;
pub mod rules;
mod types;

pub use analysis::analyze_rule;
pub use config::{AnalyzerConfig, Config, ConfigError, FailOn, RuleError};
pub use cycle::detect_cycles;
pub use dependency::has_dependency;
pub use engine::{EngineError, RuleEngine};
pub use importer::{ImportOutcome, SourceImporter};
pub use model::{ClassKind, ClassUnit, ModelBuilder, StructuralModel, Visibility};
pub use pattern::{matches, matches_all, matches_any, Pattern};
pub use rules::{AllowedDependency, Layer, Rule, RuleKind, Target};
pub use types::{should_fail, LintResult, Location, Severity, UnknownSeverity, Violation};
