//! Function Extraction Module
//!
//! Per-language extractors that turn a source file into an ordered list of
//! [`FunctionDescriptor`]s.
//!
//! | Language | Strategy |
//! |----------|----------|
//! | Python | tree-sitter grammar (exact end lines, docstrings) |
//! | Java | line regex + brace counting, or tree-sitter with `java-grammar` |
//! | JavaScript / TypeScript | three line regexes + brace counting |
//!
//! ## Usage
//!
//! ```rust,ignore
//! use docsift::analyzer::parser::Extractors;
//!
//! let extractors = Extractors::new(&config.extraction)?;
//! let functions = extractors.extract_file(Path::new("src/app.py"), "python")?;
//! ```

pub mod boundary;
pub mod java;
pub mod javascript;
pub mod language;
pub mod python;
pub mod traits;

pub use boundary::BraceBoundaryResolver;
pub use java::{JavaExtractor, JavaStrategy, JavaStrategyPreference};
pub use javascript::JavaScriptExtractor;
pub use language::{ExtractorKind, Language, supported_languages};
pub use python::PythonExtractor;
pub use traits::{
    FunctionExtractor, create_ts_parser, get_node_lines, get_node_text, parse_strict, read_source,
};

use std::path::Path;

use crate::config::ExtractionConfig;
use crate::types::{FunctionDescriptor, Result};

/// The fixed extractor table, one entry per [`ExtractorKind`].
///
/// Capability checks (which Java strategy is usable) happen once in
/// [`Extractors::new`]; lookups afterwards are a plain match.
pub struct Extractors {
    python: PythonExtractor,
    java: JavaExtractor,
    javascript: JavaScriptExtractor,
}

impl Extractors {
    pub fn new(config: &ExtractionConfig) -> Result<Self> {
        let java_strategy = JavaStrategy::resolve(config.java_strategy)?;
        tracing::debug!("Java extraction strategy: {:?}", java_strategy);

        Ok(Self {
            python: PythonExtractor::new()?,
            java: JavaExtractor::new(java_strategy)?,
            javascript: JavaScriptExtractor::new(),
        })
    }

    pub fn with_defaults() -> Result<Self> {
        Self::new(&ExtractionConfig::default())
    }

    pub fn get(&self, kind: ExtractorKind) -> &dyn FunctionExtractor {
        match kind {
            ExtractorKind::Python => &self.python,
            ExtractorKind::Java => &self.java,
            ExtractorKind::JavaScript => &self.javascript,
        }
    }

    pub fn java_strategy(&self) -> JavaStrategy {
        self.java.strategy()
    }

    /// Extract from in-memory text using a language key (`py`, `java`, `tsx`, ...)
    pub fn extract_source(
        &self,
        path: &str,
        content: &str,
        language: &str,
    ) -> Result<Vec<FunctionDescriptor>> {
        let kind = ExtractorKind::from_key(language)?;
        self.get(kind).extract(path, content)
    }

    /// Read and extract a file.
    ///
    /// Fails with `UnsupportedLanguage` for an unknown key, `NotFound` for a
    /// missing file, `Encoding` for non-UTF-8 bytes and, for Python,
    /// `MalformedSource` on a syntax error.
    pub fn extract_file(&self, path: &Path, language: &str) -> Result<Vec<FunctionDescriptor>> {
        let kind = ExtractorKind::from_key(language)?;
        let content = read_source(path)?;
        self.get(kind).extract(&path.to_string_lossy(), &content)
    }
}

/// Extract functions from a file with the default extractor table.
pub fn extract_functions(path: &Path, language: &str) -> Result<Vec<FunctionDescriptor>> {
    Extractors::with_defaults()?.extract_file(path, language)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SiftError;
    use proptest::prelude::*;
    use tempfile::TempDir;

    #[test]
    fn test_table_covers_every_kind() {
        let extractors = Extractors::with_defaults().unwrap();
        for kind in ExtractorKind::ALL {
            assert_eq!(extractors.get(kind).kind(), kind);
        }
    }

    #[test]
    fn test_extract_file_by_key() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("Calc.java");
        std::fs::write(&path, "public int add(int a, int b) {\n  return a+b;\n}").unwrap();

        let functions = extract_functions(&path, "java").unwrap();
        assert_eq!(functions.len(), 1);
        assert_eq!(functions[0].end_line, 3);
        assert_eq!(functions[0].source_file, path.to_string_lossy());
    }

    #[test]
    fn test_extract_file_errors() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("app.py");
        std::fs::write(&path, "def f():\n    pass\n").unwrap();

        assert!(matches!(
            extract_functions(&path, "cobol"),
            Err(SiftError::UnsupportedLanguage(_))
        ));
        assert!(matches!(
            extract_functions(&dir.path().join("missing.py"), "python"),
            Err(SiftError::NotFound { .. })
        ));

        let bad = dir.path().join("bad.js");
        std::fs::write(&bad, [0x66u8, 0x28, 0x29, 0xc3, 0x28]).unwrap();
        assert!(matches!(
            extract_functions(&bad, "js"),
            Err(SiftError::Encoding { .. })
        ));
    }

    #[test]
    fn test_unsupported_key_checked_before_file() {
        let dir = TempDir::new().unwrap();
        assert!(matches!(
            extract_functions(&dir.path().join("missing.rb"), "ruby"),
            Err(SiftError::UnsupportedLanguage(_))
        ));
    }

    #[test]
    fn test_extract_source_typescript_key() {
        let extractors = Extractors::with_defaults().unwrap();
        let functions = extractors
            .extract_source("a.ts", "function f(x: number) {\n}\n", "ts")
            .unwrap();
        assert_eq!(functions[0].parameters, vec!["x: number"]);
    }

    proptest! {
        #[test]
        fn prop_line_invariants_hold(src in "[a-z(){}=;, \n]{0,120}") {
            let extractors = Extractors::with_defaults().unwrap();
            for key in ["java", "js"] {
                let functions = extractors.extract_source("p", &src, key).unwrap();
                for f in functions {
                    prop_assert!(f.start_line >= 1);
                    prop_assert!(f.end_line >= f.start_line);
                    prop_assert!(!f.name.is_empty());
                }
            }
        }
    }
}
