use crate::analyzer::parser::{Extractors, supported_languages};
use crate::cli::util::{is_json, print_json};
use crate::types::Result;

pub fn run(extractors: &Extractors, format: &str) -> Result<()> {
    let languages = supported_languages();
    let java_strategy = format!("{:?}", extractors.java_strategy()).to_lowercase();

    if is_json(format) {
        return print_json(&serde_json::json!({
            "languages": languages,
            "java_strategy": java_strategy,
        }));
    }

    for language in languages {
        println!("{}", language);
    }
    println!("\njava strategy: {}", java_strategy);
    Ok(())
}
