//! Repository Scanning
//!
//! Inventory, categorization, ecosystem inference and tree rendering over a
//! single pruned directory walk (`ignore::WalkBuilder`).

pub mod category;
pub mod ecosystem;
pub mod repository;
pub mod tree;

pub use category::{CategorizedFiles, CodeFile, FileCategory, FilePurpose};
pub use ecosystem::{PackageStructure, ProjectType};
pub use repository::{RepositoryScanner, RepositoryStructure};

use std::path::Path;

use crate::types::Result;

/// Scan `root` with the default ignore rules.
pub fn scan_repository(root: &Path) -> Result<RepositoryStructure> {
    RepositoryScanner::new().scan(root)
}

/// Render `root` as a tree with the default ignore rules.
pub fn render_tree(root: &Path) -> Result<String> {
    RepositoryScanner::new().render_tree(root)
}
