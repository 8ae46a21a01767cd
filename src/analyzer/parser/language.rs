//! Language Detection Module
//!
//! **Single source of truth** for file-language detection and for the
//! language keys accepted by function extraction.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use docsift::analyzer::parser::language::{ExtractorKind, Language};
//!
//! let lang = Language::from_path("src/app.tsx");
//! assert_eq!(lang, Some(Language::TypeScript));
//! assert_eq!(lang.and_then(|l| l.extractor()), Some(ExtractorKind::JavaScript));
//! ```

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::types::SiftError;

// =============================================================================
// Language Metadata Table
// =============================================================================

struct LanguageMeta {
    /// Lowercase key used in language histograms and reports
    key: &'static str,
    /// File extensions (without dot, lowercase)
    extensions: &'static [&'static str],
    /// Additional names accepted by `FromStr`
    aliases: &'static [&'static str],
    /// Extractor handling this language, if any
    extractor: Option<ExtractorKind>,
}

macro_rules! lang_meta {
    ($key:literal, [$($ext:literal),*], [$($alias:literal),*], $extractor:expr) => {
        LanguageMeta {
            key: $key,
            extensions: &[$($ext),*],
            aliases: &[$($alias),*],
            extractor: $extractor,
        }
    };
}

impl Language {
    fn meta(&self) -> LanguageMeta {
        match self {
            Language::Python => lang_meta!("python", ["py"], ["py"], Some(ExtractorKind::Python)),
            Language::JavaScript => lang_meta!("javascript", ["js", "jsx"], ["js", "jsx"], Some(ExtractorKind::JavaScript)),
            Language::TypeScript => lang_meta!("typescript", ["ts", "tsx"], ["ts", "tsx"], Some(ExtractorKind::JavaScript)),
            Language::Java => lang_meta!("java", ["java"], [], Some(ExtractorKind::Java)),
            Language::Markdown => lang_meta!("markdown", ["md"], ["md"], None),
            Language::Text => lang_meta!("text", ["txt"], ["txt"], None),
            Language::Json => lang_meta!("json", ["json"], [], None),
            Language::Xml => lang_meta!("xml", ["xml"], [], None),
            Language::Yaml => lang_meta!("yaml", ["yml", "yaml"], ["yml"], None),
        }
    }
}

// =============================================================================
// Language Enum
// =============================================================================

/// Languages recognized by extension during repository scans
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Python,
    JavaScript,
    TypeScript,
    Java,
    Markdown,
    Text,
    Json,
    Xml,
    Yaml,
}

impl Language {
    pub const ALL: [Language; 9] = [
        Language::Python,
        Language::JavaScript,
        Language::TypeScript,
        Language::Java,
        Language::Markdown,
        Language::Text,
        Language::Json,
        Language::Xml,
        Language::Yaml,
    ];

    /// Languages whose files are treated as code
    pub const CODE: [Language; 4] = [
        Language::Python,
        Language::JavaScript,
        Language::TypeScript,
        Language::Java,
    ];

    pub fn as_str(&self) -> &'static str {
        self.meta().key
    }

    /// Detect language from a file extension (case-insensitive, no dot)
    pub fn from_extension(ext: &str) -> Option<Self> {
        let ext = ext.to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|lang| lang.meta().extensions.contains(&ext.as_str()))
    }

    /// Detect language from a path's extension
    pub fn from_path<P: AsRef<Path>>(path: P) -> Option<Self> {
        path.as_ref()
            .extension()
            .and_then(|e| e.to_str())
            .and_then(Self::from_extension)
    }

    pub fn is_code(&self) -> bool {
        Self::CODE.contains(self)
    }

    /// Extractor responsible for this language
    pub fn extractor(&self) -> Option<ExtractorKind> {
        self.meta().extractor
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Language {
    type Err = SiftError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|lang| {
                let meta = lang.meta();
                meta.key == key || meta.aliases.contains(&key.as_str())
            })
            .ok_or_else(|| SiftError::UnsupportedLanguage(s.to_string()))
    }
}

// =============================================================================
// Extractor Kind
// =============================================================================

/// Closed set of function extractors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtractorKind {
    Python,
    Java,
    /// JavaScript and TypeScript share one extractor
    JavaScript,
}

impl ExtractorKind {
    pub const ALL: [ExtractorKind; 3] = [
        ExtractorKind::Python,
        ExtractorKind::Java,
        ExtractorKind::JavaScript,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ExtractorKind::Python => "python",
            ExtractorKind::Java => "java",
            ExtractorKind::JavaScript => "javascript",
        }
    }

    /// Resolve an extraction language key such as `py`, `tsx` or `java`.
    ///
    /// Returns `UnsupportedLanguage` for unknown keys and for known
    /// languages without an extractor (e.g. `markdown`).
    pub fn from_key(key: &str) -> crate::types::Result<Self> {
        key.parse::<Language>()
            .ok()
            .and_then(|lang| lang.extractor())
            .ok_or_else(|| SiftError::UnsupportedLanguage(key.to_string()))
    }
}

impl fmt::Display for ExtractorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Canonical languages with a registered extractor
pub fn supported_languages() -> Vec<&'static str> {
    ExtractorKind::ALL.iter().map(|k| k.as_str()).collect()
}
