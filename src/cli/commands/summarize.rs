//! Summarize Command
//!
//! Coarse class/method/import outline of one file.

use std::path::Path;

use crate::analyzer::StructureSummarizer;
use crate::cli::ui::Output;
use crate::cli::util::{is_json, print_json, resolve_language};
use crate::types::Result;

pub fn run(file: &Path, language: Option<&str>, format: &str) -> Result<()> {
    let language = resolve_language(file, language)?;
    let structure = StructureSummarizer::new().summarize_file(file, &language)?;

    if is_json(format) {
        return print_json(&structure);
    }

    let out = Output::new();
    out.header(&file.display().to_string());

    if !structure.imports.is_empty() {
        out.section("Imports");
        for import in &structure.imports {
            out.item(import);
        }
    }

    if !structure.classes.is_empty() {
        out.section("Classes");
        for class in &structure.classes {
            println!("  {} (line {})", class.name, class.line);
            for method in &class.methods {
                println!("    - {}() (line {})", method.name, method.line);
            }
        }
    }

    if !structure.functions.is_empty() {
        out.section("Functions");
        for function in &structure.functions {
            println!("  {}() (line {})", function.name, function.line);
        }
    }
    Ok(())
}
