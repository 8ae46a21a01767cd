//! Diagram Command
//!
//! Mermaid class diagram of the Java classes in a repository.

use std::path::Path;

use crate::cli::ui::Output;
use crate::cli::util::{CommandContext, is_json, print_json};
use crate::types::Result;

pub fn run(ctx: &CommandContext, path: &Path, output: Option<&Path>, format: &str) -> Result<()> {
    let relationships = ctx.scanner.extract_class_relationships(path)?;

    if is_json(format) {
        return print_json(&relationships);
    }

    let diagram = relationships.to_mermaid();
    match output {
        Some(file) => {
            std::fs::write(file, format!("```mermaid\n{}\n```\n", diagram))?;
            Output::new().success(&format!(
                "Wrote {} classes to {}",
                relationships.classes.len(),
                file.display()
            ));
        }
        None => println!("{}", diagram),
    }
    Ok(())
}
