//! Configuration Loader (Figment-based)
//!
//! Loads and merges configuration from multiple sources using Figment:
//! 1. Built-in defaults (Serialized)
//! 2. Global config (~/.config/docsift/config.toml)
//! 3. Project config (.docsift/config.toml)
//! 4. Environment variables (DOCSIFT_* prefix, `__` between sections)

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use std::env;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::types::Config;
use crate::types::{Result, SiftError};

/// Configuration loader
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with full resolution chain using Figment:
    /// defaults → global → project → env vars
    pub fn load() -> Result<Config> {
        let mut figment = Figment::new().merge(Serialized::defaults(Config::default()));

        if let Some(global_path) = Self::global_config_path()
            && global_path.exists()
        {
            debug!("Loading global config from: {}", global_path.display());
            figment = figment.merge(Toml::file(&global_path));
        }

        let project_path = Self::project_config_path();
        if project_path.exists() {
            debug!("Loading project config from: {}", project_path.display());
            figment = figment.merge(Toml::file(&project_path));
        }

        // DOCSIFT_SEARCH__DOCS_DIR -> search.docs_dir
        figment = figment.merge(Env::prefixed("DOCSIFT_").split("__"));

        Self::extract(figment)
    }

    /// Load configuration from a specific file only
    pub fn load_from_file(path: &Path) -> Result<Config> {
        if !path.exists() {
            return Err(SiftError::not_found(path));
        }

        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(path));

        Self::extract(figment)
    }

    fn extract(figment: Figment) -> Result<Config> {
        let config: Config = figment
            .extract()
            .map_err(|e| SiftError::Config(format!("Configuration error: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    // =========================================================================
    // Path Management
    // =========================================================================

    /// Get path to global config directory (~/.config/docsift/)
    pub fn global_dir() -> Option<PathBuf> {
        env::var("XDG_CONFIG_HOME")
            .ok()
            .map(PathBuf::from)
            .or_else(|| {
                env::var("HOME")
                    .ok()
                    .map(|home| PathBuf::from(home).join(".config"))
            })
            .map(|p| p.join("docsift"))
    }

    /// Get path to global config file
    pub fn global_config_path() -> Option<PathBuf> {
        Self::global_dir().map(|dir| dir.join("config.toml"))
    }

    /// Get path to project config file
    pub fn project_config_path() -> PathBuf {
        PathBuf::from(".docsift/config.toml")
    }

    // =========================================================================
    // Config Commands
    // =========================================================================

    /// Show config file paths
    pub fn show_path() {
        println!("Configuration paths:");
        println!();

        if let Some(global) = Self::global_config_path() {
            let exists = if global.exists() { "✓" } else { "✗" };
            println!("  Global:  {} {}", exists, global.display());
        } else {
            println!("  Global:  (not available)");
        }

        let project = Self::project_config_path();
        let exists = if project.exists() { "✓" } else { "✗" };
        println!("  Project: {} {}", exists, project.display());
    }

    /// Show an effective configuration
    pub fn show_config(config: &Config, as_json: bool) -> Result<()> {
        if as_json {
            println!("{}", serde_json::to_string_pretty(config)?);
        } else {
            println!(
                "{}",
                toml::to_string_pretty(config).map_err(|e| SiftError::Config(e.to_string()))?
            );
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::parser::JavaStrategyPreference;
    use figment::Jail;

    #[test]
    fn test_load_default_config() {
        Jail::expect_with(|jail| {
            jail.set_env("XDG_CONFIG_HOME", jail.directory().join("xdg").display());

            let config = ConfigLoader::load().map_err(|e| e.to_string())?;
            assert_eq!(config.search.docs_dir, "documentation-generated");
            assert_eq!(config.search.extension, "md");
            assert!(config.scanner.extra_ignored_dirs.is_empty());
            Ok(())
        });
    }

    #[test]
    fn test_project_overrides_global() {
        Jail::expect_with(|jail| {
            let xdg = jail.directory().join("xdg");
            jail.create_dir("xdg/docsift")?;
            jail.create_file(
                "xdg/docsift/config.toml",
                r#"
                [search]
                docs_dir = "global-docs"
                extension = "txt"
                "#,
            )?;
            jail.create_dir(".docsift")?;
            jail.create_file(
                ".docsift/config.toml",
                r#"
                [search]
                docs_dir = "project-docs"

                [extraction]
                java_strategy = "heuristic"
                "#,
            )?;
            jail.set_env("XDG_CONFIG_HOME", xdg.display());

            let config = ConfigLoader::load().map_err(|e| e.to_string())?;
            assert_eq!(config.search.docs_dir, "project-docs");
            assert_eq!(config.search.extension, "txt");
            assert_eq!(
                config.extraction.java_strategy,
                JavaStrategyPreference::Heuristic
            );
            Ok(())
        });
    }

    #[test]
    fn test_env_override() {
        Jail::expect_with(|jail| {
            jail.set_env("XDG_CONFIG_HOME", jail.directory().join("xdg").display());
            jail.set_env("DOCSIFT_SEARCH__DOCS_DIR", "from-env");
            jail.set_env("DOCSIFT_SCANNER__RESPECT_GITIGNORE", "true");

            let config = ConfigLoader::load().map_err(|e| e.to_string())?;
            assert_eq!(config.search.docs_dir, "from-env");
            assert!(config.scanner.respect_gitignore);
            Ok(())
        });
    }

    #[test]
    fn test_invalid_values_rejected() {
        Jail::expect_with(|jail| {
            jail.set_env("XDG_CONFIG_HOME", jail.directory().join("xdg").display());
            jail.create_dir(".docsift")?;
            jail.create_file(".docsift/config.toml", "[search]\nextension = \"\"\n")?;

            assert!(matches!(ConfigLoader::load(), Err(SiftError::Config(_))));
            Ok(())
        });
    }

    #[test]
    fn test_load_from_file() {
        Jail::expect_with(|jail| {
            jail.create_file("custom.toml", "[scanner]\nextra_ignored_dirs = [\"generated\"]\n")?;

            let config = ConfigLoader::load_from_file(Path::new("custom.toml"))
                .map_err(|e| e.to_string())?;
            assert_eq!(config.scanner.extra_ignored_dirs, vec!["generated"]);

            assert!(matches!(
                ConfigLoader::load_from_file(Path::new("missing.toml")),
                Err(SiftError::NotFound { .. })
            ));
            Ok(())
        });
    }
}
