//! Functions Command
//!
//! Extract function descriptors from a single source file.

use std::path::Path;

use crate::cli::ui::Output;
use crate::cli::util::{CommandContext, is_json, print_json, resolve_language};
use crate::types::Result;

pub fn run(ctx: &CommandContext, file: &Path, language: Option<&str>, format: &str) -> Result<()> {
    let language = resolve_language(file, language)?;
    let functions = ctx.extractors.extract_file(file, &language)?;

    if is_json(format) {
        return print_json(&functions);
    }

    let out = Output::new();
    out.header(&format!("{} ({} functions)", file.display(), functions.len()));
    for function in &functions {
        println!(
            "\n{}({})  lines {}",
            function.name,
            function.parameters.join(", "),
            function.line_range()
        );
        if let Some(doc) = &function.docstring {
            for line in doc.lines() {
                println!("    {}", line);
            }
        }
    }

    if functions.is_empty() {
        out.info("No functions found");
    }
    Ok(())
}
