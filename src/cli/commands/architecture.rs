use std::path::Path;

use crate::cli::ui::Output;
use crate::cli::util::{CommandContext, is_json, print_json};
use crate::types::Result;

pub fn run(ctx: &CommandContext, path: &Path, format: &str) -> Result<()> {
    let summary = ctx.scanner.analyze_architecture(path)?;

    if is_json(format) {
        return print_json(&summary);
    }

    let out = Output::new();
    out.header("Architecture");
    if summary.patterns.is_empty() {
        out.info("No architectural pattern detected");
    }
    for pattern in &summary.patterns {
        out.item(pattern);
    }

    out.section("Layers");
    for (layer, files) in &summary.layers {
        out.field(layer.as_str(), format!("{} files", files.len()));
        for file in files {
            println!("      {}/{}", file.path, file.file);
        }
    }
    Ok(())
}
