//! docsift - Code Structure Analysis and Documentation Search
//!
//! Recovers the structure of a source repository so a documentation step
//! can describe it, and ranks existing documentation against a question.
//!
//! ## Core Features
//!
//! - **Function Extraction**: Python via tree-sitter; Java and JS/TS via
//!   declaration patterns plus brace-balanced boundary resolution
//! - **Repository Scanning**: language histogram, file categories,
//!   ecosystem and framework inference, rendered directory tree
//! - **Architecture Hints**: layer and pattern classification from
//!   directory naming
//! - **Relevance Search**: keyword scoring with context excerpts over a
//!   swappable document snapshot
//!
//! ## Quick Start
//!
//! ```ignore
//! use docsift::{RelevanceSearchIndex, RepositoryScanner, extract_functions};
//!
//! let functions = extract_functions(Path::new("app/service.py"), "py")?;
//! let structure = RepositoryScanner::new().scan(Path::new("."))?;
//!
//! let index = RelevanceSearchIndex::new("documentation-generated", "md");
//! for hit in index.search("user management") {
//!     println!("{} ({})", hit.title(), hit.score());
//! }
//! ```
//!
//! ## Modules
//!
//! - [`analyzer`]: extractors, scanner, architecture, structure summaries
//! - [`search`]: document snapshot and relevance index
//! - [`report`]: Markdown repository overview
//! - [`config`]: layered configuration

pub mod analyzer;
pub mod cli;
pub mod config;
pub mod constants;
pub mod report;
pub mod search;
pub mod types;

// =============================================================================
// Core Re-exports
// =============================================================================

// Configuration
pub use config::{Config, ConfigLoader};

// Error Types
pub use types::error::{ErrorKind, Result, SiftError};

// Domain Records
pub use types::{CommitInfo, FunctionDescriptor};

// Analysis
pub use analyzer::{
    ArchitectureSummary, ClassRelationships, Extractors, FileStructure, Language,
    RepositoryScanner, RepositoryStructure, StructureSummarizer, analyze_architecture,
    extract_functions, render_tree, scan_repository,
};

// Search and reporting
pub use report::{ReportGenerator, RepositoryReport};
pub use search::{Document, DocumentSnapshot, RelevanceSearchIndex, ScoredDocument};
