//! Bounded directory tree rendering for generated documentation.

use std::path::{Path, PathBuf};

use super::repository::{RepositoryScanner, ensure_dir, is_dir};
use crate::analyzer::parser::Language;
use crate::constants::scanner::{TREE_MARKER_FILES, TREE_ONLY_IGNORED_DIRS};
use crate::constants::tree::{MAX_DEPTH, MAX_FILES_PER_DIR};
use crate::types::Result;

const INDENT: &str = "  ";

impl RepositoryScanner {
    /// Render the repository layout as an indented tree.
    ///
    /// Directories deeper than [`MAX_DEPTH`] are omitted and each directory
    /// lists at most [`MAX_FILES_PER_DIR`] recognized files. An empty
    /// repository renders as the single line `name/`.
    pub fn render_tree(&self, root: &Path) -> Result<String> {
        ensure_dir(root)?;

        let mut lines = vec![format!("{}/", root_name(root))];
        self.render_dir(root, 0, &mut lines);
        Ok(lines.join("\n"))
    }

    fn render_dir(&self, dir: &Path, level: usize, lines: &mut Vec<String>) {
        let (dirs, files) = self.children(dir);
        let pad = INDENT.repeat(level + 1);

        let shown: Vec<&String> = files.iter().filter(|f| is_tree_file(f)).collect();
        for file in shown.iter().take(MAX_FILES_PER_DIR) {
            lines.push(format!("{}├── {}", pad, file));
        }
        if shown.len() > MAX_FILES_PER_DIR {
            lines.push(format!(
                "{}└── ... and {} more files",
                pad,
                shown.len() - MAX_FILES_PER_DIR
            ));
        }

        if level >= MAX_DEPTH {
            return;
        }
        for (name, path) in dirs {
            lines.push(format!("{}├── {}/", pad, name));
            self.render_dir(&path, level + 1, lines);
        }
    }

    /// Immediate subdirectories and file names of `dir`, sorted by name
    fn children(&self, dir: &Path) -> (Vec<(String, PathBuf)>, Vec<String>) {
        let mut dirs = Vec::new();
        let mut files = Vec::new();

        let walker = self
            .walker(dir, TREE_ONLY_IGNORED_DIRS)
            .max_depth(Some(1))
            .build();

        for result in walker {
            let entry = match result {
                Ok(entry) if entry.depth() == 1 => entry,
                Ok(_) => continue,
                Err(e) => {
                    tracing::warn!("Skipping unreadable entry: {}", e);
                    continue;
                }
            };

            let name = entry.file_name().to_string_lossy().to_string();
            if is_dir(&entry) {
                dirs.push((name, entry.into_path()));
            } else {
                files.push(name);
            }
        }

        (dirs, files)
    }
}

fn is_tree_file(name: &str) -> bool {
    Language::from_path(name).is_some() || TREE_MARKER_FILES.contains(&name)
}

fn root_name(root: &Path) -> String {
    root.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .or_else(|| {
            root.canonicalize()
                .ok()
                .and_then(|p| p.file_name().map(|n| n.to_string_lossy().to_string()))
        })
        .unwrap_or_else(|| root.display().to_string())
}
