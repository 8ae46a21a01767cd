//! Search Command
//!
//! Rank documentation files against a free-text query.

use std::path::Path;

use crate::cli::ui::Output;
use crate::cli::util::{is_json, print_json};
use crate::config::SearchConfig;
use crate::search::RelevanceSearchIndex;
use crate::types::Result;

pub fn run(
    config: &SearchConfig,
    query: &str,
    docs_dir: Option<&Path>,
    status: bool,
    format: &str,
) -> Result<()> {
    let index = match docs_dir {
        Some(dir) => RelevanceSearchIndex::new(dir, config.normalized_extension()),
        None => RelevanceSearchIndex::from_config(config),
    };

    if status {
        let status = index.status();
        if is_json(format) {
            return print_json(&status);
        }
        let out = Output::new();
        out.header("Documentation index");
        if let Some(source) = &status.source {
            out.field("Folder", source);
        }
        out.field("Documents", status.document_count);
        for title in &status.titles {
            out.item(title);
        }
        return Ok(());
    }

    let results = index.search(query);

    if is_json(format) {
        let results: Vec<serde_json::Value> = results.iter().map(|r| r.to_json()).collect();
        return print_json(&results);
    }

    let out = Output::new();
    if results.is_empty() {
        out.info("No matching documents");
        return Ok(());
    }

    for result in &results {
        out.section(&format!(
            "{} ({}), score {}",
            result.title(),
            result.filename(),
            result.score()
        ));
        for excerpt in result.excerpts() {
            println!("{}\n", excerpt);
        }
    }
    Ok(())
}
