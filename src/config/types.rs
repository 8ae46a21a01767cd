//! Configuration Types
//!
//! All configuration structures with sensible defaults.
//! Supports global (~/.config/docsift/) and project (.docsift/) level configuration.

use serde::{Deserialize, Serialize};

use crate::analyzer::parser::JavaStrategyPreference;
use crate::types::{Result, SiftError};

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Repository walk settings
    pub scanner: ScannerConfig,

    /// Function extraction settings
    pub extraction: ExtractionConfig,

    /// Documentation search settings
    pub search: SearchConfig,
}

impl Config {
    /// Validate configuration values.
    /// Returns `SiftError::Config` on validation failure.
    pub fn validate(&self) -> Result<()> {
        if self.search.extension.trim().is_empty() {
            return Err(SiftError::Config(
                "search.extension must not be empty".to_string(),
            ));
        }

        if self.search.docs_dir.trim().is_empty() {
            return Err(SiftError::Config(
                "search.docs_dir must not be empty".to_string(),
            ));
        }

        if let Some(dir) = self
            .scanner
            .extra_ignored_dirs
            .iter()
            .find(|d| d.trim().is_empty() || d.contains('/'))
        {
            return Err(SiftError::Config(format!(
                "scanner.extra_ignored_dirs entries must be plain directory names, got {:?}",
                dir
            )));
        }

        Ok(())
    }
}

// =============================================================================
// Scanner Configuration
// =============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ScannerConfig {
    /// Directory names pruned in addition to the built-in ignore set
    pub extra_ignored_dirs: Vec<String>,

    /// Also honour `.gitignore` files while walking
    pub respect_gitignore: bool,
}

// =============================================================================
// Extraction Configuration
// =============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// `auto`, `grammar` or `heuristic`
    pub java_strategy: JavaStrategyPreference,
}

// =============================================================================
// Search Configuration
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Folder holding the generated documentation
    pub docs_dir: String,

    /// Extension of searchable documents, without the dot
    pub extension: String,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            docs_dir: "documentation-generated".to_string(),
            extension: "md".to_string(),
        }
    }
}

impl SearchConfig {
    /// Extension with any leading dot removed
    pub fn normalized_extension(&self) -> &str {
        self.extension.trim().trim_start_matches('.')
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.search.docs_dir, "documentation-generated");
        assert_eq!(config.search.extension, "md");
        assert!(!config.scanner.respect_gitignore);
        assert_eq!(
            config.extraction.java_strategy,
            JavaStrategyPreference::Auto
        );
    }

    #[test]
    fn test_empty_extension_rejected() {
        let mut config = Config::default();
        config.search.extension = "  ".to_string();
        assert!(matches!(config.validate(), Err(SiftError::Config(_))));
    }

    #[test]
    fn test_nested_ignored_dir_rejected() {
        let mut config = Config::default();
        config.scanner.extra_ignored_dirs = vec!["generated".into(), "a/b".into()];
        assert!(matches!(config.validate(), Err(SiftError::Config(_))));
    }

    #[test]
    fn test_normalized_extension() {
        let config = SearchConfig {
            docs_dir: "docs".into(),
            extension: ".md".into(),
        };
        assert_eq!(config.normalized_extension(), "md");
    }
}
