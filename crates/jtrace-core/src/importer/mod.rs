//! Source importer.
//!
//! Reads and parses each source file and folds the results into a
//! [`ModelBuilder`]. A file that cannot be read or parsed is logged and
//! skipped; the import itself never fails.

mod extractor;
mod java;

pub use extractor::{ExtractError, FileAnalysis, LanguageExtractor, TypeDecl};
pub use java::JavaExtractor;

use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::model::{qualify, ClassUnit, ModelBuilder, StructuralModel};

/// A per-file import failure. Never fatal to the run.
#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    /// The file could not be read.
    #[error("failed to read {path}: {source}")]
    Read {
        /// File path.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// The file could not be parsed.
    #[error("failed to parse {path}: {source}")]
    Parse {
        /// File path.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: ExtractError,
    },
}

/// Model plus counters from one import.
#[derive(Debug)]
pub struct ImportOutcome {
    /// The frozen structural model.
    pub model: StructuralModel,
    /// Files folded into the model.
    pub files_imported: usize,
    /// Files skipped because of read or parse failures.
    pub files_skipped: usize,
}

/// Builds a structural model from source files.
pub struct SourceImporter {
    extractor: Box<dyn LanguageExtractor>,
}

impl SourceImporter {
    /// Creates an importer for Java sources.
    #[must_use]
    pub fn new() -> Self {
        Self::with_extractor(Box::new(JavaExtractor::new()))
    }

    /// Creates an importer backed by a custom extractor.
    #[must_use]
    pub fn with_extractor(extractor: Box<dyn LanguageExtractor>) -> Self {
        Self { extractor }
    }

    /// Returns true if `path` has an extension this importer handles.
    #[must_use]
    pub fn accepts(&self, path: &Path) -> bool {
        let name = path.to_string_lossy();
        self.extractor
            .extensions()
            .iter()
            .any(|ext| name.ends_with(ext))
    }

    /// Imports every path into a fresh model.
    ///
    /// Later files overwrite earlier classes with the same FQN.
    pub fn import_sources<P: AsRef<Path>>(&self, paths: &[P]) -> ImportOutcome {
        let mut builder = ModelBuilder::new();
        let mut files_imported = 0;
        let mut files_skipped = 0;

        for path in paths {
            let path = path.as_ref();
            match self.import_file(path, &mut builder) {
                Ok(()) => files_imported += 1,
                Err(e) => {
                    warn!("Skipping source file: {e}");
                    files_skipped += 1;
                }
            }
        }

        info!(
            "Imported {} {} files ({} skipped), {} classes",
            files_imported,
            self.extractor.language_id(),
            files_skipped,
            builder.class_count()
        );

        ImportOutcome {
            model: builder.build(),
            files_imported,
            files_skipped,
        }
    }

    /// Parses one file and folds it into `builder`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed. The builder is
    /// left untouched in that case.
    pub fn import_file(&self, path: &Path, builder: &mut ModelBuilder) -> Result<(), ImportError> {
        let source = std::fs::read_to_string(path).map_err(|source| ImportError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let analysis = self
            .extractor
            .analyze(&source)
            .map_err(|source| ImportError::Parse {
                path: path.to_path_buf(),
                source,
            })?;

        debug!(
            "{}: {} imports, {} types",
            path.display(),
            analysis.imports.len(),
            analysis.types.len()
        );
        fold(path, analysis, builder);
        Ok(())
    }
}

impl Default for SourceImporter {
    fn default() -> Self {
        Self::new()
    }
}

fn fold(path: &Path, analysis: FileAnalysis, builder: &mut ModelBuilder) {
    let package = analysis.package.unwrap_or_default();
    builder.add_imports(&package, analysis.imports);

    for decl in analysis.types {
        let mut class = ClassUnit::new(&package, decl.name, decl.visibility, decl.kind)
            .with_source_file(path);
        if let Some(enclosing) = decl.enclosing {
            class = class.with_enclosing(qualify(&package, &enclosing));
        }
        for annotation in decl.annotations {
            class = class.with_annotation(annotation);
        }
        for field in decl.fields {
            class = class.with_field(field);
        }
        for method in decl.methods {
            class = class.with_method(method);
        }
        builder.add_class(class);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Visibility;
    use std::fs;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn imports_classes_and_package_imports() {
        let dir = TempDir::new().unwrap();
        let a = write(
            &dir,
            "A.java",
            "package com.app;\nimport com.lib.X;\npublic class A { X x; }\n",
        );
        let b = write(
            &dir,
            "B.java",
            "package com.app;\nimport com.lib.Y;\nclass B {}\n",
        );

        let outcome = SourceImporter::new().import_sources(&[a.clone(), b]);
        assert_eq!(outcome.files_imported, 2);
        assert_eq!(outcome.files_skipped, 0);

        let model = outcome.model;
        let pkg = model.package("com.app").unwrap();
        assert!(pkg.imports().contains("com.lib.X"));
        assert!(pkg.imports().contains("com.lib.Y"));
        assert_eq!(pkg.classes().len(), 2);

        let class = model.class("com.app.A").unwrap();
        assert_eq!(class.source_file(), a.as_path());
        assert_eq!(model.class("com.app.B").unwrap().visibility(), Visibility::PackagePrivate);
    }

    #[test]
    fn skips_unreadable_and_unparseable_files() {
        let dir = TempDir::new().unwrap();
        let good = write(&dir, "Good.java", "package p;\nclass Good {}\n");
        let bad = write(&dir, "Bad.java", "package p;\nclass {{{\n");
        let missing = dir.path().join("Missing.java");

        let outcome = SourceImporter::new().import_sources(&[bad, missing, good]);
        assert_eq!(outcome.files_imported, 1);
        assert_eq!(outcome.files_skipped, 2);
        assert!(outcome.model.class("p.Good").is_some());
    }

    #[test]
    fn nested_types_registered_under_package() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            "Outer.java",
            "package p;\npublic class Outer { static class Inner {} }\n",
        );
        let model = SourceImporter::new().import_sources(&[path]).model;
        let inner = model.class("p.Inner").unwrap();
        assert_eq!(inner.enclosing(), Some("p.Outer"));
        assert!(model.class("p.Outer").unwrap().enclosing().is_none());
    }

    #[test]
    fn accepts_java_extension_only() {
        let importer = SourceImporter::new();
        assert!(importer.accepts(Path::new("src/A.java")));
        assert!(!importer.accepts(Path::new("src/A.kt")));
    }
}
