use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use ignore::{DirEntry, WalkBuilder};
use serde::Serialize;

use super::category::{CategorizedFiles, CodeFile, FileCategory, FilePurpose};
use super::ecosystem::PackageStructure;
use crate::analyzer::parser::Language;
use crate::config::ScannerConfig;
use crate::constants::scanner::IGNORED_DIRS;
use crate::types::{Result, SiftError};

/// Aggregate result of a repository scan
#[derive(Debug, Clone, Serialize)]
pub struct RepositoryStructure {
    pub root: PathBuf,
    /// Every non-hidden file outside the ignored directories
    pub total_files: usize,
    /// File count per recognized language
    pub language_counts: BTreeMap<Language, usize>,
    /// Visited directories relative to the root (root excluded)
    pub directories: Vec<String>,
    pub categorized_files: CategorizedFiles,
    pub package_structure: PackageStructure,
    /// Entries the walk could not read (logged and skipped)
    pub unreadable_entries: usize,
}

impl RepositoryStructure {
    pub fn language_count(&self, language: Language) -> usize {
        self.language_counts.get(&language).copied().unwrap_or(0)
    }
}

/// Walks a repository and classifies its files.
///
/// The walk prunes hidden entries and the fixed ignore set before descent,
/// never follows symlinks, and visits entries in file-name order.
#[derive(Debug, Clone)]
pub struct RepositoryScanner {
    ignored_dirs: Vec<String>,
    respect_gitignore: bool,
}

impl Default for RepositoryScanner {
    fn default() -> Self {
        Self::new()
    }
}

impl RepositoryScanner {
    pub fn new() -> Self {
        Self {
            ignored_dirs: IGNORED_DIRS.iter().map(|d| d.to_string()).collect(),
            respect_gitignore: false,
        }
    }

    pub fn from_config(config: &ScannerConfig) -> Self {
        Self::new()
            .with_ignored_dirs(config.extra_ignored_dirs.iter().cloned())
            .with_gitignore(config.respect_gitignore)
    }

    /// Prune additional directory names
    pub fn with_ignored_dirs(mut self, dirs: impl IntoIterator<Item = String>) -> Self {
        for dir in dirs {
            if !self.ignored_dirs.contains(&dir) {
                self.ignored_dirs.push(dir);
            }
        }
        self
    }

    pub fn with_gitignore(mut self, respect: bool) -> Self {
        self.respect_gitignore = respect;
        self
    }

    pub fn ignored_dirs(&self) -> &[String] {
        &self.ignored_dirs
    }

    /// Scan `root` into a [`RepositoryStructure`].
    ///
    /// Fails only when `root` is not an existing directory.
    pub fn scan(&self, root: &Path) -> Result<RepositoryStructure> {
        ensure_dir(root)?;

        let mut structure = RepositoryStructure {
            root: root.to_path_buf(),
            total_files: 0,
            language_counts: BTreeMap::new(),
            directories: Vec::new(),
            categorized_files: CategorizedFiles::default(),
            package_structure: PackageStructure::default(),
            unreadable_entries: 0,
        };

        for result in self.walker(root, &[]).build() {
            let entry = match result {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::warn!("Skipping unreadable entry: {}", e);
                    structure.unreadable_entries += 1;
                    continue;
                }
            };
            if entry.depth() == 0 {
                continue;
            }

            let relative = relative_path(root, entry.path());
            if is_dir(&entry) {
                structure.directories.push(relative);
                continue;
            }

            structure.total_files += 1;

            let Some(language) = Language::from_path(entry.path()) else {
                continue;
            };
            *structure.language_counts.entry(language).or_insert(0) += 1;

            let name = entry.file_name().to_string_lossy().to_string();
            if let Some(category) = FileCategory::classify(&name, language) {
                let file = code_file(&entry, relative, name, language);
                structure.categorized_files.add(category, file);
            }
        }

        structure.package_structure = PackageStructure::detect(root);

        tracing::info!(
            "Scanned {}: {} files, {} languages, {} unreadable",
            root.display(),
            structure.total_files,
            structure.language_counts.len(),
            structure.unreadable_entries
        );
        Ok(structure)
    }

    /// List files whose language is in `languages`, in walk order.
    ///
    /// An empty `languages` slice selects every code language.
    pub fn code_files_for_analysis(
        &self,
        root: &Path,
        languages: &[Language],
    ) -> Result<Vec<CodeFile>> {
        ensure_dir(root)?;

        let wanted: &[Language] = if languages.is_empty() {
            &Language::CODE
        } else {
            languages
        };

        let files: Vec<CodeFile> = self
            .walker(root, &[])
            .build()
            .filter_map(|result| {
                result
                    .map_err(|e| tracing::warn!("Skipping unreadable entry: {}", e))
                    .ok()
            })
            .filter(|entry| entry.depth() > 0 && !is_dir(entry))
            .filter_map(|entry| {
                let language = Language::from_path(entry.path())?;
                if !wanted.contains(&language) {
                    return None;
                }
                let name = entry.file_name().to_string_lossy().to_string();
                let relative = relative_path(root, entry.path());
                Some(code_file(&entry, relative, name, language))
            })
            .collect();

        tracing::debug!("{} files selected for analysis", files.len());
        Ok(files)
    }

    /// Walker rooted at `root` applying the scanner's pruning rules plus
    /// `extra_dirs` (used by the tree renderer).
    pub(crate) fn walker(&self, root: &Path, extra_dirs: &[&str]) -> WalkBuilder {
        let mut ignored = self.ignored_dirs.clone();
        ignored.extend(extra_dirs.iter().map(|d| d.to_string()));

        let git = self.respect_gitignore;
        let mut builder = WalkBuilder::new(root);
        builder
            .hidden(false)
            .ignore(false)
            .parents(git)
            .git_ignore(git)
            .git_global(git)
            .git_exclude(git)
            .require_git(false)
            .follow_links(false)
            .sort_by_file_name(|a, b| a.cmp(b))
            .filter_entry(move |entry| {
                if entry.depth() == 0 {
                    return true;
                }
                let name = entry.file_name().to_string_lossy();
                if name.starts_with('.') {
                    return false;
                }
                !(is_dir(entry) && ignored.iter().any(|d| *d == name))
            });
        builder
    }
}

pub(crate) fn ensure_dir(root: &Path) -> Result<()> {
    if root.is_dir() {
        Ok(())
    } else {
        Err(SiftError::not_found(root))
    }
}

pub(crate) fn is_dir(entry: &DirEntry) -> bool {
    entry.file_type().is_some_and(|t| t.is_dir())
}

/// `/`-separated path of `path` relative to `root`
pub(crate) fn relative_path(root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

fn code_file(entry: &DirEntry, relative: String, name: String, language: Language) -> CodeFile {
    CodeFile {
        purpose: FilePurpose::from_path(&name, &relative),
        path: relative,
        name,
        full_path: entry.path().to_path_buf(),
        language,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::scanner::ProjectType;
    use std::fs;
    use tempfile::TempDir;

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }

    #[test]
    fn test_scan_excludes_ignored_subtree() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "app.py", "print('hi')\n");
        write(dir.path(), "src/Main.java", "class Main {}\n");
        write(dir.path(), "node_modules/x.js", "module.exports = 1;\n");

        let structure = RepositoryScanner::new().scan(dir.path()).unwrap();

        assert_eq!(structure.total_files, 2);
        assert_eq!(structure.language_counts.len(), 2);
        assert_eq!(structure.language_count(Language::Python), 1);
        assert_eq!(structure.language_count(Language::Java), 1);
        assert_eq!(structure.language_count(Language::JavaScript), 0);
        assert_eq!(structure.directories, vec!["src"]);
        assert_eq!(structure.unreadable_entries, 0);
    }

    #[test]
    fn test_scan_skips_hidden_and_counts_unrecognized() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), ".env", "SECRET=1\n");
        write(dir.path(), ".git/config", "[core]\n");
        write(dir.path(), "Makefile", "all:\n");
        write(dir.path(), "docs/guide.md", "# Guide\n");

        let structure = RepositoryScanner::new().scan(dir.path()).unwrap();

        // Makefile counts toward the total but has no language or bucket
        assert_eq!(structure.total_files, 2);
        assert_eq!(structure.language_count(Language::Markdown), 1);
        assert_eq!(structure.categorized_files.documentation, vec!["docs/guide.md"]);
        assert_eq!(structure.categorized_files.total(), 1);
    }

    #[test]
    fn test_scan_categorizes_and_detects_ecosystem() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "requirements.txt", "flask==2.0\n");
        write(dir.path(), "services/user_service.py", "def f():\n    pass\n");
        write(dir.path(), "settings.json", "{}\n");

        let structure = RepositoryScanner::new().scan(dir.path()).unwrap();
        let files = &structure.categorized_files;

        assert_eq!(files.code.len(), 1);
        assert_eq!(files.code[0].path, "services/user_service.py");
        assert_eq!(files.code[0].purpose, FilePurpose::Service);
        assert_eq!(files.configuration, vec!["settings.json"]);
        assert_eq!(files.documentation, vec!["requirements.txt"]);
        assert_eq!(structure.package_structure.project_type, ProjectType::Python);
        assert_eq!(structure.package_structure.frameworks, vec!["Flask"]);
    }

    #[test]
    fn test_scan_missing_root() {
        let dir = TempDir::new().unwrap();
        let result = RepositoryScanner::new().scan(&dir.path().join("nope"));
        assert!(matches!(result, Err(SiftError::NotFound { .. })));
    }

    #[test]
    fn test_extra_ignored_dirs() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "generated/a.py", "");
        write(dir.path(), "b.py", "");

        let scanner = RepositoryScanner::from_config(&ScannerConfig {
            extra_ignored_dirs: vec!["generated".to_string()],
            respect_gitignore: false,
        });
        assert_eq!(scanner.scan(dir.path()).unwrap().total_files, 1);
    }

    #[test]
    fn test_gitignore_only_when_enabled() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), ".gitignore", "out/\n");
        write(dir.path(), "out/gen.js", "");
        write(dir.path(), "main.js", "");

        let plain = RepositoryScanner::new().scan(dir.path()).unwrap();
        assert_eq!(plain.total_files, 2);

        let strict = RepositoryScanner::new()
            .with_gitignore(true)
            .scan(dir.path())
            .unwrap();
        assert_eq!(strict.total_files, 1);
    }

    #[test]
    fn test_code_files_for_analysis() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "api/controllers/users.js", "");
        write(dir.path(), "web/App.tsx", "");
        write(dir.path(), "core/Model.java", "");
        write(dir.path(), "README.md", "");

        let scanner = RepositoryScanner::new();
        let all = scanner.code_files_for_analysis(dir.path(), &[]).unwrap();
        let paths: Vec<&str> = all.iter().map(|f| f.path.as_str()).collect();
        assert_eq!(
            paths,
            vec!["api/controllers/users.js", "core/Model.java", "web/App.tsx"]
        );
        assert_eq!(all[0].purpose, FilePurpose::Controller);
        assert_eq!(all[2].language, Language::TypeScript);

        let java = scanner
            .code_files_for_analysis(dir.path(), &[Language::Java])
            .unwrap();
        assert_eq!(java.len(), 1);
        assert!(java[0].full_path.ends_with("core/Model.java"));
    }
}
