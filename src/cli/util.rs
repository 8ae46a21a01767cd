//! CLI Common Utilities
//!
//! Shared initialization for command handlers.

use std::path::Path;

use serde::Serialize;

use crate::analyzer::{Extractors, Language, RepositoryScanner};
use crate::config::{Config, ConfigLoader};
use crate::types::{Result, SiftError};

/// Resources shared by the analysis commands
pub struct CommandContext {
    pub config: Config,
    pub scanner: RepositoryScanner,
    pub extractors: Extractors,
}

impl CommandContext {
    /// Load configuration (an explicit file replaces the layered lookup)
    /// and build the scanner and extractor table from it.
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let config = load_config(config_path)?;
        let scanner = RepositoryScanner::from_config(&config.scanner);
        let extractors = Extractors::new(&config.extraction)?;

        Ok(Self {
            config,
            scanner,
            extractors,
        })
    }
}

pub fn load_config(config_path: Option<&Path>) -> Result<Config> {
    match config_path {
        Some(path) => ConfigLoader::load_from_file(path),
        None => ConfigLoader::load(),
    }
}

pub fn is_json(format: &str) -> bool {
    format.eq_ignore_ascii_case("json")
}

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Language key for a file: the explicit one, else its extension
pub fn resolve_language(path: &Path, language: Option<&str>) -> Result<String> {
    if let Some(language) = language {
        return Ok(language.to_string());
    }
    Language::from_path(path)
        .map(|l| l.as_str().to_string())
        .ok_or_else(|| {
            SiftError::UnsupportedLanguage(format!(
                "cannot infer language of {} (use --language)",
                path.display()
            ))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_language() {
        assert_eq!(
            resolve_language(Path::new("src/App.tsx"), None).unwrap(),
            "typescript"
        );
        assert_eq!(
            resolve_language(Path::new("script"), Some("py")).unwrap(),
            "py"
        );
        assert!(matches!(
            resolve_language(Path::new("Makefile"), None),
            Err(SiftError::UnsupportedLanguage(_))
        ));
    }

    #[test]
    fn test_is_json() {
        assert!(is_json("json"));
        assert!(is_json("JSON"));
        assert!(!is_json("text"));
    }
}
