use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};

use serde::Serialize;

use super::document::{Document, DocumentSnapshot};
use crate::config::SearchConfig;
use crate::constants::search::{
    CONTEXT_LINES, EXACT_PHRASE_BONUS, MAX_EXCERPTS, MAX_RESULTS, MIN_TERM_CHARS, STATUS_TITLES,
    TITLE_WEIGHT,
};

/// A ranked hit. The document body is shared with the snapshot, only the
/// excerpts are owned.
#[derive(Debug, Clone)]
pub struct ScoredDocument {
    document: Arc<Document>,
    score: u32,
    excerpts: Vec<String>,
}

impl ScoredDocument {
    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn filename(&self) -> &str {
        self.document.filename()
    }

    pub fn title(&self) -> &str {
        self.document.title()
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn excerpts(&self) -> &[String] {
        &self.excerpts
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "filename": self.filename(),
            "title": self.title(),
            "score": self.score,
            "excerpts": self.excerpts,
        })
    }
}

/// Lowercased whitespace-separated query terms of at least
/// `MIN_TERM_CHARS` characters
fn tokenize(query: &str) -> Vec<String> {
    query
        .to_lowercase()
        .split_whitespace()
        .filter(|term| term.chars().count() >= MIN_TERM_CHARS)
        .map(String::from)
        .collect()
}

fn score(document: &Document, terms: &[String], phrase: &str) -> u32 {
    let content = document.content_lower();
    let title = document.title_lower();

    let mut total: u32 = 0;
    for term in terms {
        if title.contains(term.as_str()) {
            total += TITLE_WEIGHT;
        }
        total = total.saturating_add(content.matches(term.as_str()).count() as u32);
    }
    if content.contains(phrase) {
        total += EXACT_PHRASE_BONUS;
    }
    total
}

/// Context windows around lines containing any term, deduplicated and capped
fn excerpts(document: &Document, terms: &[String]) -> Vec<String> {
    let lines: Vec<&str> = document.content().split('\n').collect();
    let mut found: Vec<String> = Vec::new();

    for (i, line) in lines.iter().enumerate() {
        let line = line.to_lowercase();
        if !terms.iter().any(|term| line.contains(term.as_str())) {
            continue;
        }

        let start = i.saturating_sub(CONTEXT_LINES);
        let end = (i + CONTEXT_LINES + 1).min(lines.len());
        let excerpt = lines[start..end].join("\n");
        if !found.contains(&excerpt) {
            found.push(excerpt);
            if found.len() == MAX_EXCERPTS {
                break;
            }
        }
    }

    found
}

/// Score every document in `snapshot` against `query`.
///
/// Returns at most `MAX_RESULTS` documents with a positive score, best
/// first; equal scores keep snapshot order.
pub fn search(query: &str, snapshot: &DocumentSnapshot) -> Vec<ScoredDocument> {
    let terms = tokenize(query);
    if terms.is_empty() {
        return Vec::new();
    }
    let phrase = query.trim().to_lowercase();

    let mut hits: Vec<(u32, &Arc<Document>)> = snapshot
        .documents()
        .iter()
        .map(|doc| (score(doc, &terms, &phrase), doc))
        .filter(|(score, _)| *score > 0)
        .collect();

    hits.sort_by(|a, b| b.0.cmp(&a.0));
    hits.truncate(MAX_RESULTS);

    hits.into_iter()
        .map(|(score, doc)| ScoredDocument {
            document: Arc::clone(doc),
            score,
            excerpts: excerpts(doc, &terms),
        })
        .collect()
}

#[derive(Debug, Clone, Serialize)]
pub struct IndexStatus {
    pub document_count: usize,
    pub titles: Vec<String>,
    pub source: Option<String>,
}

/// Search index over a swappable document snapshot.
///
/// Queries clone the current `Arc` and run without holding the lock, so a
/// reload never blocks or disturbs a search that already started.
#[derive(Debug)]
pub struct RelevanceSearchIndex {
    source: Option<(PathBuf, String)>,
    snapshot: RwLock<Arc<DocumentSnapshot>>,
}

impl RelevanceSearchIndex {
    /// Load `*.{extension}` documents from `dir`
    pub fn new(dir: impl Into<PathBuf>, extension: impl Into<String>) -> Self {
        let dir = dir.into();
        let extension = extension.into();
        let snapshot = DocumentSnapshot::load(&dir, &extension);
        Self {
            source: Some((dir, extension)),
            snapshot: RwLock::new(Arc::new(snapshot)),
        }
    }

    pub fn from_config(config: &SearchConfig) -> Self {
        Self::new(&config.docs_dir, config.normalized_extension())
    }

    /// Fixed in-memory collection; `reload` keeps it as is
    pub fn from_snapshot(snapshot: DocumentSnapshot) -> Self {
        Self {
            source: None,
            snapshot: RwLock::new(Arc::new(snapshot)),
        }
    }

    pub fn source_dir(&self) -> Option<&Path> {
        self.source.as_ref().map(|(dir, _)| dir.as_path())
    }

    pub fn snapshot(&self) -> Arc<DocumentSnapshot> {
        let guard = self.snapshot.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&guard)
    }

    pub fn search(&self, query: &str) -> Vec<ScoredDocument> {
        let snapshot = self.snapshot();
        let results = search(query, &snapshot);
        tracing::debug!("Query {:?}: {} results", query, results.len());
        results
    }

    /// Rebuild the collection from its folder and swap it in.
    ///
    /// Returns the new document count.
    pub fn reload(&self) -> usize {
        let Some((dir, extension)) = &self.source else {
            return self.snapshot().len();
        };

        let fresh = Arc::new(DocumentSnapshot::load(dir, extension));
        let count = fresh.len();
        *self.snapshot.write().unwrap_or_else(PoisonError::into_inner) = fresh;
        tracing::info!("Reloaded {} documents", count);
        count
    }

    pub fn status(&self) -> IndexStatus {
        let snapshot = self.snapshot();
        IndexStatus {
            document_count: snapshot.len(),
            titles: snapshot
                .documents()
                .iter()
                .take(STATUS_TITLES)
                .map(|d| d.title().to_string())
                .collect(),
            source: self.source_dir().map(|d| d.display().to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::fs;
    use tempfile::TempDir;

    const SAMPLE_DOC: &str = r#"# Sample API Documentation

## User Management
This module handles user authentication and management.

### Functions
- create_user(username, password): Creates a new user
- delete_user(user_id): Deletes a user
- update_user(user_id, data): Updates user information
"#;

    fn sample_snapshot() -> DocumentSnapshot {
        DocumentSnapshot::from_documents([
            Document::new("overview.md", "# Overview\n\nGeneral project notes.\n"),
            Document::new("api.md", SAMPLE_DOC),
        ])
    }

    #[test]
    fn test_user_management_query() {
        let results = search("user management", &sample_snapshot());

        assert_eq!(results.len(), 1);
        let top = &results[0];
        assert_eq!(top.filename(), "api.md");
        assert_eq!(top.title(), "Sample API Documentation");
        assert!(top.score() >= 10, "score was {}", top.score());
        assert!(!top.excerpts().is_empty());
        assert!(top.excerpts().len() <= MAX_EXCERPTS);
    }

    #[test]
    fn test_score_components() {
        let doc = Document::new("d.md", "# Rust Guide\nrust and more rust\n");
        let terms = tokenize("Rust guide");

        // title: 2 terms x 3; body: "rust" x3, "guide" x1; phrase "rust guide" +5
        assert_eq!(score(&doc, &terms, "rust guide"), 6 + 4 + 5);
    }

    #[test]
    fn test_short_terms_dropped() {
        assert_eq!(tokenize("a an the API"), vec!["the", "api"]);
        assert!(tokenize("  to be  ").is_empty());
        assert!(search("", &sample_snapshot()).is_empty());
        assert!(search("is a", &sample_snapshot()).is_empty());
    }

    #[test]
    fn test_zero_scores_excluded() {
        assert!(search("kubernetes", &sample_snapshot()).is_empty());
        assert!(search("user", &DocumentSnapshot::empty()).is_empty());
    }

    #[test]
    fn test_ties_keep_snapshot_order() {
        let snapshot = DocumentSnapshot::from_documents(
            ["c.md", "a.md", "b.md", "d.md"]
                .into_iter()
                .map(|name| Document::new(name, "cache layer\n")),
        );

        let results = search("cache", &snapshot);
        let names: Vec<&str> = results.iter().map(|r| r.filename()).collect();
        assert_eq!(names, vec!["c.md", "a.md", "b.md"]);
    }

    #[test]
    fn test_excerpts_windowed_and_deduplicated() {
        let body = "alpha\nbeta\ntoken one\ngamma\ndelta\nepsilon\nzeta\neta\ntoken two\ntheta\n";
        let doc = Document::new("d.md", body);

        let found = excerpts(&doc, &tokenize("token"));
        assert_eq!(
            found,
            vec![
                "alpha\nbeta\ntoken one\ngamma\ndelta",
                "zeta\neta\ntoken two\ntheta\n",
            ]
        );

        let repeated = Document::new("r.md", "a\nb\nneedle\nc\nd\na\nb\nneedle\nc\nd");
        let found = excerpts(&repeated, &tokenize("needle"));
        // Identical windows collapse to one
        assert_eq!(found, vec!["a\nb\nneedle\nc\nd"]);
    }

    #[test]
    fn test_excerpts_capped() {
        let body = (0..20)
            .map(|i| format!("match {}\n\n\n\n\n", i))
            .collect::<String>();
        let doc = Document::new("d.md", body);
        assert_eq!(excerpts(&doc, &tokenize("match")).len(), MAX_EXCERPTS);
    }

    #[test]
    fn test_reload_swaps_snapshot() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("one.md"), "# One\nredis cache\n").unwrap();

        let index = RelevanceSearchIndex::new(dir.path(), "md");
        let before = index.snapshot();
        assert_eq!(index.search("redis").len(), 1);

        fs::write(dir.path().join("two.md"), "# Two\nredis cluster\n").unwrap();
        assert_eq!(index.reload(), 2);

        // Old snapshot held by an in-flight query is untouched
        assert_eq!(before.len(), 1);
        assert_eq!(search("redis", &before).len(), 1);
        assert_eq!(index.search("redis").len(), 2);

        let status = index.status();
        assert_eq!(status.document_count, 2);
        assert_eq!(status.titles, vec!["One", "Two"]);
        assert!(status.source.is_some());
    }

    #[test]
    fn test_fixed_snapshot_reload_is_noop() {
        let index = RelevanceSearchIndex::from_snapshot(sample_snapshot());
        assert_eq!(index.reload(), 2);
        assert!(index.status().source.is_none());
    }

    #[test]
    fn test_to_json() {
        let results = search("user management", &sample_snapshot());
        let json = results[0].to_json();
        assert_eq!(json["filename"], "api.md");
        assert!(json["excerpts"].is_array());
    }

    proptest! {
        #[test]
        fn prop_results_bounded_and_ordered(
            bodies in prop::collection::vec("[a-c ]{0,40}", 0..8),
            query in "[a-c ]{0,12}",
        ) {
            let snapshot = DocumentSnapshot::from_documents(
                bodies
                    .iter()
                    .enumerate()
                    .map(|(i, body)| Document::new(format!("{}.md", i), body.clone())),
            );
            let results = search(&query, &snapshot);

            prop_assert!(results.len() <= MAX_RESULTS);
            prop_assert!(results.iter().all(|r| r.score() > 0));
            prop_assert!(results.windows(2).all(|w| w[0].score() >= w[1].score()));
            prop_assert!(results.iter().all(|r| r.excerpts().len() <= MAX_EXCERPTS));
        }
    }
}
