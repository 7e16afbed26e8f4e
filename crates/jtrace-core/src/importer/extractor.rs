//! Language-agnostic extraction types and trait.
//!
//! A [`LanguageExtractor`] turns raw source text into a [`FileAnalysis`]: the
//! package, imports and every type declaration in the file, nested ones
//! included. The importer folds these into the structural model.

use crate::model::{ClassKind, FieldUnit, MethodUnit, Visibility};

/// A type declaration extracted from source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDecl {
    /// Simple name.
    pub name: String,
    /// Declaration kind.
    pub kind: ClassKind,
    /// Resolved visibility.
    pub visibility: Visibility,
    /// Class-level annotation names, without `@`.
    pub annotations: Vec<String>,
    /// Fields declared directly in this type.
    pub fields: Vec<FieldUnit>,
    /// Methods declared directly in this type.
    pub methods: Vec<MethodUnit>,
    /// Simple name of the directly enclosing type, for nested types.
    pub enclosing: Option<String>,
}

/// Result of analyzing a single source file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileAnalysis {
    /// Declared package, if any.
    pub package: Option<String>,
    /// Imported names, without any trailing `.*`.
    pub imports: Vec<String>,
    /// Top-level declarations first, then nested ones in discovery order.
    pub types: Vec<TypeDecl>,
}

/// Why a source file could not be analyzed.
#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    /// The grammar could not be loaded into the parser.
    #[error("failed to load grammar: {0}")]
    Language(#[from] tree_sitter::LanguageError),

    /// The parser produced no tree.
    #[error("parser produced no syntax tree")]
    NoTree,

    /// The source contains syntax errors.
    #[error("syntax error at line {line}, column {column}")]
    Syntax {
        /// Line (1-indexed).
        line: usize,
        /// Column (1-indexed).
        column: usize,
    },
}

/// Trait for language-specific Tree-sitter extraction.
pub trait LanguageExtractor: Send + Sync {
    /// Language identifier (e.g. `"java"`).
    fn language_id(&self) -> &'static str;

    /// File extensions this extractor handles (e.g. `&[".java"]`).
    fn extensions(&self) -> &'static [&'static str];

    /// Extracts package, imports and declarations from source code.
    ///
    /// # Errors
    ///
    /// Returns an error if the source cannot be parsed cleanly.
    fn analyze(&self, source: &str) -> Result<FileAnalysis, ExtractError>;
}
