//! Code Analyzer Module
//!
//! Heuristic structure recovery from source trees:
//! - Per-language function extraction (tree-sitter for Python, regex + brace counting elsewhere)
//! - Repository scanning, categorization and ecosystem inference
//! - Layer and pattern classification
//! - Coarse per-file structure summaries and Java class relationships

pub mod architecture;
pub mod parser;
pub mod relationships;
pub mod scanner;
pub mod structure;

pub use architecture::{ArchitecturePattern, ArchitectureSummary, Layer, analyze_architecture};
pub use parser::{Extractors, Language, extract_functions};
pub use relationships::ClassRelationships;
pub use scanner::{RepositoryScanner, RepositoryStructure, render_tree, scan_repository};
pub use structure::{ClassDescriptor, FileStructure, MethodDescriptor, StructureSummarizer};
