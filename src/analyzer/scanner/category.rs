//! File categorization by name and path markers.
//!
//! Every rule is a case-insensitive substring test; the first rule that
//! matches decides, so a file lands in at most one bucket.

use std::path::PathBuf;

use serde::Serialize;

use crate::analyzer::parser::Language;

const DOC_EXTENSIONS: &[&str] = &[".md", ".txt", ".rst"];
const CONFIG_MARKERS: &[&str] = &[
    "config",
    "setting",
    "properties",
    "pom.xml",
    "package.json",
    "requirements.txt",
];
const TEST_MARKERS: &[&str] = &["test", "spec"];
const MAIN_MARKERS: &[&str] = &["main", "app", "index", "application"];

/// Bucket a scanned file is filed under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FileCategory {
    Code,
    Documentation,
    Configuration,
    Test,
    Main,
}

impl FileCategory {
    /// Decide the bucket for a file with a recognized extension.
    ///
    /// Returns `None` when no rule matches.
    pub fn classify(file_name: &str, language: Language) -> Option<Self> {
        let name = file_name.to_lowercase();
        let has_marker = |markers: &[&str]| markers.iter().any(|m| name.contains(m));

        if language.is_code() {
            Some(Self::Code)
        } else if DOC_EXTENSIONS.iter().any(|ext| name.ends_with(ext)) {
            Some(Self::Documentation)
        } else if has_marker(CONFIG_MARKERS) {
            Some(Self::Configuration)
        } else if has_marker(TEST_MARKERS) {
            Some(Self::Test)
        } else if has_marker(MAIN_MARKERS) {
            Some(Self::Main)
        } else {
            None
        }
    }
}

/// Role of a code file, inferred from naming conventions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FilePurpose {
    Controller,
    Service,
    Model,
    Repository,
    Utility,
    Test,
    Configuration,
    Main,
    Other,
}

impl FilePurpose {
    pub fn from_path(file_name: &str, relative_path: &str) -> Self {
        let name = file_name.to_lowercase();
        let path = relative_path.to_lowercase();
        let in_path = |markers: &[&str]| markers.iter().any(|m| path.contains(m));
        let in_name = |markers: &[&str]| markers.iter().any(|m| name.contains(m));

        if in_path(&["controller"]) || in_name(&["controller"]) {
            Self::Controller
        } else if in_path(&["service"]) || in_name(&["service"]) {
            Self::Service
        } else if in_path(&["model", "entity", "dto"]) {
            Self::Model
        } else if in_path(&["repository", "dao"]) {
            Self::Repository
        } else if in_path(&["util", "helper"]) {
            Self::Utility
        } else if in_path(&["test"]) || in_name(&["spec"]) {
            Self::Test
        } else if in_path(&["config"]) || in_name(&["setting"]) {
            Self::Configuration
        } else if in_name(&["main", "app", "application"]) {
            Self::Main
        } else {
            Self::Other
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Controller => "controller",
            Self::Service => "service",
            Self::Model => "model",
            Self::Repository => "repository",
            Self::Utility => "utility",
            Self::Test => "test",
            Self::Configuration => "configuration",
            Self::Main => "main",
            Self::Other => "other",
        }
    }
}

impl std::fmt::Display for FilePurpose {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A code file selected for analysis
#[derive(Debug, Clone, Serialize)]
pub struct CodeFile {
    /// Path relative to the scanned root, `/`-separated
    pub path: String,
    pub name: String,
    pub full_path: PathBuf,
    pub language: Language,
    pub purpose: FilePurpose,
}

/// The five disjoint buckets of a repository scan
#[derive(Debug, Clone, Default, Serialize)]
pub struct CategorizedFiles {
    pub code: Vec<CodeFile>,
    pub documentation: Vec<String>,
    pub configuration: Vec<String>,
    pub test: Vec<String>,
    pub main: Vec<String>,
}

impl CategorizedFiles {
    pub(crate) fn add(&mut self, category: FileCategory, file: CodeFile) {
        match category {
            FileCategory::Code => self.code.push(file),
            FileCategory::Documentation => self.documentation.push(file.path),
            FileCategory::Configuration => self.configuration.push(file.path),
            FileCategory::Test => self.test.push(file.path),
            FileCategory::Main => self.main.push(file.path),
        }
    }

    /// (bucket label, file count) in bucket order
    pub fn counts(&self) -> [(&'static str, usize); 5] {
        [
            ("code", self.code.len()),
            ("documentation", self.documentation.len()),
            ("configuration", self.configuration.len()),
            ("test", self.test.len()),
            ("main", self.main.len()),
        ]
    }

    pub fn total(&self) -> usize {
        self.counts().iter().map(|(_, n)| n).sum()
    }
}
