//! Architecture Classification
//!
//! Best-effort layer detection from directory naming conventions. A layer
//! is recorded as soon as a directory path mentions it, even when that
//! directory holds no code files.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Serialize;

use super::scanner::RepositoryScanner;
use super::scanner::repository::{ensure_dir, is_dir, relative_path};
use crate::types::Result;

/// Extensions counted as layer members
const LAYER_FILE_EXTENSIONS: &[&str] = &[".py", ".js", ".java", ".ts"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Layer {
    Controller,
    Service,
    Model,
    Repository,
    Dto,
    Configuration,
    Utility,
    Test,
}

impl Layer {
    /// (layer, path markers) in match priority
    const RULES: [(Layer, &'static [&'static str]); 8] = [
        (Layer::Controller, &["controller"]),
        (Layer::Service, &["service"]),
        (Layer::Model, &["model", "entity"]),
        (Layer::Repository, &["repository", "dao"]),
        (Layer::Dto, &["dto"]),
        (Layer::Configuration, &["config"]),
        (Layer::Utility, &["util", "helper"]),
        (Layer::Test, &["test"]),
    ];

    /// Layer named by a relative directory path, if any
    pub fn from_path(relative_dir: &str) -> Option<Self> {
        let path = relative_dir.to_lowercase();
        Self::RULES
            .iter()
            .find(|(_, markers)| markers.iter().any(|m| path.contains(m)))
            .map(|(layer, _)| *layer)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Layer::Controller => "controller",
            Layer::Service => "service",
            Layer::Model => "model",
            Layer::Repository => "repository",
            Layer::Dto => "dto",
            Layer::Configuration => "configuration",
            Layer::Utility => "utility",
            Layer::Test => "test",
        }
    }
}

impl std::fmt::Display for Layer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Coarse architectural pattern label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ArchitecturePattern {
    #[serde(rename = "MVC/Layered Architecture")]
    Layered,
    #[serde(rename = "Repository Pattern")]
    Repository,
    #[serde(rename = "Data Transfer Object Pattern")]
    DataTransferObject,
}

impl ArchitecturePattern {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Layered => "MVC/Layered Architecture",
            Self::Repository => "Repository Pattern",
            Self::DataTransferObject => "Data Transfer Object Pattern",
        }
    }
}

impl std::fmt::Display for ArchitecturePattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// A code file attributed to a layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LayerFile {
    pub file: String,
    /// Containing directory, relative to the root
    pub path: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ArchitectureSummary {
    pub layers: BTreeMap<Layer, Vec<LayerFile>>,
    pub patterns: Vec<ArchitecturePattern>,
}

impl ArchitectureSummary {
    pub fn has_layer(&self, layer: Layer) -> bool {
        self.layers.contains_key(&layer)
    }

    fn detect_patterns(&mut self) {
        self.patterns.clear();
        if self.has_layer(Layer::Controller) || self.has_layer(Layer::Service) {
            self.patterns.push(ArchitecturePattern::Layered);
        }
        if self.has_layer(Layer::Model) && self.has_layer(Layer::Repository) {
            self.patterns.push(ArchitecturePattern::Repository);
        }
        if self.has_layer(Layer::Dto) {
            self.patterns.push(ArchitecturePattern::DataTransferObject);
        }
    }
}

impl RepositoryScanner {
    /// Classify directories of `root` into layers and derive patterns.
    ///
    /// Fails with `NotFound` only; an absent layer is not an error.
    pub fn analyze_architecture(&self, root: &Path) -> Result<ArchitectureSummary> {
        ensure_dir(root)?;

        let mut summary = ArchitectureSummary::default();

        for result in self.walker(root, &[]).build() {
            let entry = match result {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::warn!("Skipping unreadable entry: {}", e);
                    continue;
                }
            };

            if is_dir(&entry) {
                let dir = relative_path(root, entry.path());
                if let Some(layer) = Layer::from_path(&dir) {
                    summary.layers.entry(layer).or_default();
                }
                continue;
            }

            let name = entry.file_name().to_string_lossy().to_string();
            if !LAYER_FILE_EXTENSIONS.iter().any(|ext| name.ends_with(ext)) {
                continue;
            }
            let dir = entry
                .path()
                .parent()
                .map(|p| relative_path(root, p))
                .unwrap_or_default();
            if let Some(layer) = Layer::from_path(&dir) {
                summary
                    .layers
                    .entry(layer)
                    .or_default()
                    .push(LayerFile { file: name, path: dir });
            }
        }

        summary.detect_patterns();
        tracing::debug!(
            "Architecture: {} layers, patterns {:?}",
            summary.layers.len(),
            summary.patterns
        );
        Ok(summary)
    }
}

/// Analyze `root` with the default ignore rules.
pub fn analyze_architecture(root: &Path) -> Result<ArchitectureSummary> {
    RepositoryScanner::new().analyze_architecture(root)
}
