use std::path::Path;

use crate::cli::util::{CommandContext, is_json, print_json};
use crate::types::Result;

pub fn run(ctx: &CommandContext, path: &Path, format: &str) -> Result<()> {
    let tree = ctx.scanner.render_tree(path)?;

    if is_json(format) {
        return print_json(&serde_json::json!({ "tree": tree }));
    }
    println!("{}", tree);
    Ok(())
}
