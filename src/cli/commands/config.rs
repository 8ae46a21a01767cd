//! Config Command
//!
//! Usage:
//!   docsift config show [-f json]
//!   docsift config path

use crate::config::{Config, ConfigLoader};
use crate::types::Result;

/// Print the effective configuration (TOML, or JSON with `-f json`)
pub fn show(config: &Config, format: &str) -> Result<()> {
    ConfigLoader::show_config(config, format == "json")
}

/// Print where configuration files are looked up
pub fn path() -> Result<()> {
    ConfigLoader::show_path();
    Ok(())
}
