use std::path::{Path, PathBuf};
use std::sync::Arc;

use ignore::WalkBuilder;

use crate::analyzer::parser::read_source;
use crate::constants::search::DEFAULT_TITLE;

/// One documentation file held in memory.
///
/// The lowercased body and title are computed once so queries never
/// re-fold case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    filename: String,
    path: Option<PathBuf>,
    title: String,
    content: String,
    content_lower: String,
    title_lower: String,
}

impl Document {
    pub fn new(filename: impl Into<String>, content: impl Into<String>) -> Self {
        let content = content.into();
        let title = extract_title(&content);
        Self {
            filename: filename.into(),
            path: None,
            title_lower: title.to_lowercase(),
            content_lower: content.to_lowercase(),
            title,
            content,
        }
    }

    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub(crate) fn content_lower(&self) -> &str {
        &self.content_lower
    }

    pub(crate) fn title_lower(&self) -> &str {
        &self.title_lower
    }
}

/// Text of the first `# ` heading line, or the default title
pub fn extract_title(content: &str) -> String {
    content
        .split('\n')
        .find_map(|line| line.strip_prefix("# "))
        .map(|title| title.trim().to_string())
        .unwrap_or_else(|| DEFAULT_TITLE.to_string())
}

/// Immutable document collection served to queries.
///
/// Documents are unique by file name and keep their load order, which is
/// also the tie-break order for equal scores.
#[derive(Debug, Clone, Default)]
pub struct DocumentSnapshot {
    documents: Vec<Arc<Document>>,
}

impl DocumentSnapshot {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build from documents; a later document with an existing file name
    /// replaces the earlier one in its original position.
    pub fn from_documents(documents: impl IntoIterator<Item = Document>) -> Self {
        let mut snapshot = Self::default();
        for document in documents {
            snapshot.insert(document);
        }
        snapshot
    }

    fn insert(&mut self, document: Document) {
        let document = Arc::new(document);
        match self
            .documents
            .iter_mut()
            .find(|d| d.filename() == document.filename())
        {
            Some(slot) => *slot = document,
            None => self.documents.push(document),
        }
    }

    /// Load every `*.{extension}` file under `dir`, recursively and in
    /// path order, keyed by file name.
    ///
    /// A missing directory yields an empty snapshot; unreadable files are
    /// logged and skipped.
    pub fn load(dir: &Path, extension: &str) -> Self {
        if !dir.is_dir() {
            tracing::warn!("Documentation folder '{}' not found", dir.display());
            return Self::empty();
        }

        let extension = extension.trim_start_matches('.');
        let mut snapshot = Self::default();
        let walker = WalkBuilder::new(dir)
            .standard_filters(false)
            .follow_links(false)
            .sort_by_file_name(|a, b| a.cmp(b))
            .build();

        for result in walker {
            let entry = match result {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::warn!("Skipping unreadable entry: {}", e);
                    continue;
                }
            };
            if !entry.file_type().is_some_and(|t| t.is_file()) {
                continue;
            }
            let matches_extension = entry
                .path()
                .extension()
                .is_some_and(|e| e.eq_ignore_ascii_case(extension));
            if !matches_extension {
                continue;
            }

            let filename = entry.file_name().to_string_lossy().to_string();
            match read_source(entry.path()) {
                Ok(content) => {
                    snapshot.insert(Document::new(filename, content).with_path(entry.path()));
                }
                Err(e) => tracing::warn!("Error loading {}: {}", filename, e),
            }
        }

        tracing::info!(
            "Loaded {} documentation files from {}",
            snapshot.len(),
            dir.display()
        );
        snapshot
    }

    pub fn documents(&self) -> &[Arc<Document>] {
        &self.documents
    }

    pub fn get(&self, filename: &str) -> Option<&Arc<Document>> {
        self.documents.iter().find(|d| d.filename() == filename)
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_extract_title() {
        assert_eq!(extract_title("intro\n# Real Title  \n# Second"), "Real Title");
        assert_eq!(extract_title("## Only a subheading\n"), DEFAULT_TITLE);
        assert_eq!(extract_title("#NoSpace"), DEFAULT_TITLE);
        assert_eq!(extract_title(""), DEFAULT_TITLE);
    }

    #[test]
    fn test_duplicate_names_replace_in_place() {
        let snapshot = DocumentSnapshot::from_documents([
            Document::new("a.md", "# A1"),
            Document::new("b.md", "# B"),
            Document::new("a.md", "# A2"),
        ]);

        let titles: Vec<&str> = snapshot.documents().iter().map(|d| d.title()).collect();
        assert_eq!(titles, vec!["A2", "B"]);
    }

    #[test]
    fn test_load_filters_and_recurses() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("api")).unwrap();
        fs::write(dir.path().join("guide.md"), "# Guide\n").unwrap();
        fs::write(dir.path().join("api/users.MD"), "# Users\n").unwrap();
        fs::write(dir.path().join("notes.txt"), "# Notes\n").unwrap();
        fs::write(dir.path().join("broken.md"), [0xffu8, 0xfe]).unwrap();

        let snapshot = DocumentSnapshot::load(dir.path(), "md");

        let names: Vec<&str> = snapshot.documents().iter().map(|d| d.filename()).collect();
        assert_eq!(names, vec!["users.MD", "guide.md"]);
        assert!(snapshot.get("guide.md").unwrap().path().is_some());
    }

    #[test]
    fn test_load_missing_dir() {
        let dir = TempDir::new().unwrap();
        let snapshot = DocumentSnapshot::load(&dir.path().join("absent"), "md");
        assert!(snapshot.is_empty());
    }
}
