//! Global Constants
//!
//! Centralized constants for scanning, rendering and retrieval.
//! All magic numbers should be defined here with documentation.

/// Repository scanning constants
pub mod scanner {
    /// Directories pruned before descent (build, vendor, cache and
    /// virtual-env conventions). Hidden directories are always pruned.
    pub const IGNORED_DIRS: &[&str] = &[
        "node_modules",
        "target",
        "__pycache__",
        "venv",
        "env",
        "build",
        "dist",
        "vendor",
    ];

    /// Extra directories hidden from the rendered tree only
    pub const TREE_ONLY_IGNORED_DIRS: &[&str] = &["bin", "obj"];

    /// Non-code files always shown in the rendered tree
    pub const TREE_MARKER_FILES: &[&str] =
        &["README.md", "pom.xml", "package.json", "requirements.txt"];
}

/// Tree rendering constants
pub mod tree {
    /// Deepest directory level rendered (root is level 0)
    pub const MAX_DEPTH: usize = 3;

    /// Files listed per directory before the "more" marker
    pub const MAX_FILES_PER_DIR: usize = 10;
}

/// Relevance search constants
pub mod search {
    /// Maximum documents returned per query
    pub const MAX_RESULTS: usize = 3;

    /// Maximum excerpts attached to one document
    pub const MAX_EXCERPTS: usize = 3;

    /// Lines of context on each side of a matching line
    pub const CONTEXT_LINES: usize = 2;

    /// Query terms shorter than this (in characters) are discarded
    pub const MIN_TERM_CHARS: usize = 3;

    /// Score added per query term found in the title
    pub const TITLE_WEIGHT: u32 = 3;

    /// Score added when the whole query appears verbatim in the body
    pub const EXACT_PHRASE_BONUS: u32 = 5;

    /// Title used when a document has no top-level heading
    pub const DEFAULT_TITLE: &str = "Untitled Document";

    /// Documents listed in a status report
    pub const STATUS_TITLES: usize = 5;
}

/// Report generation constants
pub mod report {
    /// Code files summarized in the overview report
    pub const MAX_DOCUMENTED_FILES: usize = 8;

    /// Classes listed per file
    pub const MAX_CLASSES_PER_FILE: usize = 5;

    /// Methods listed per class
    pub const MAX_METHODS_PER_CLASS: usize = 3;

    /// Extracted functions listed per file
    pub const MAX_FUNCTIONS_PER_FILE: usize = 2;
}
