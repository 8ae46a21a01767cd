//! Scan Command
//!
//! Inventory of a repository: file counts, languages, categories and the
//! inferred ecosystem.

use std::path::Path;

use crate::cli::ui::Output;
use crate::cli::util::{CommandContext, is_json, print_json};
use crate::types::Result;

pub fn run(ctx: &CommandContext, path: &Path, format: &str) -> Result<()> {
    let structure = ctx.scanner.scan(path)?;

    if is_json(format) {
        return print_json(&structure);
    }

    let out = Output::new();
    out.header(&format!("Repository: {}", structure.root.display()));
    out.field("Total files", structure.total_files);
    out.field("Directories", structure.directories.len());
    if structure.unreadable_entries > 0 {
        out.warning(&format!(
            "{} entries could not be read",
            structure.unreadable_entries
        ));
    }

    out.section("Languages");
    for (language, count) in &structure.language_counts {
        out.field(language.as_str(), count);
    }

    out.section("Categories");
    for (category, count) in structure.categorized_files.counts() {
        out.field(category, count);
    }

    let package = &structure.package_structure;
    out.section("Ecosystem");
    out.field("Project type", package.project_type.as_str());
    out.field("Main language", &package.main_language);
    if let Some(manifest) = &package.manifest {
        out.field("Manifest", manifest);
    }
    if !package.frameworks.is_empty() {
        out.field("Frameworks", package.frameworks.join(", "));
    }
    out.field("Dependencies", package.dependencies.len());

    Ok(())
}
