use std::path::Path;

use crate::cli::ui::Output;
use crate::cli::util::{CommandContext, is_json, print_json};
use crate::report::ReportGenerator;
use crate::types::Result;

pub fn run(ctx: &CommandContext, path: &Path, output: Option<&Path>, format: &str) -> Result<()> {
    let report = ReportGenerator::new(&ctx.scanner, &ctx.extractors).generate(path)?;

    if is_json(format) {
        return print_json(&report);
    }

    match output {
        Some(file) => {
            if let Some(parent) = file.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(file, &report.markdown)?;
            Output::new().success(&format!(
                "Documented {} of {} code files -> {}",
                report.files_documented,
                report.code_files_analyzed,
                file.display()
            ));
        }
        None => print!("{}", report.markdown),
    }
    Ok(())
}
