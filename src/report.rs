//! Repository Overview Report
//!
//! Markdown overview assembled from a scan, the architecture summary, the
//! rendered tree and coarse per-file structure. Nothing here calls a model;
//! the report is the deterministic skeleton a documentation step can extend.

use std::path::Path;

use serde::Serialize;

use crate::analyzer::parser::Extractors;
use crate::analyzer::scanner::CodeFile;
use crate::analyzer::{ArchitectureSummary, RepositoryScanner, RepositoryStructure, StructureSummarizer};
use crate::constants::report::{
    MAX_CLASSES_PER_FILE, MAX_DOCUMENTED_FILES, MAX_FUNCTIONS_PER_FILE, MAX_METHODS_PER_CLASS,
};
use crate::types::Result;

#[derive(Debug, Clone, Serialize)]
pub struct RepositoryReport {
    pub markdown: String,
    pub total_files: usize,
    pub code_files_analyzed: usize,
    pub files_documented: usize,
}

/// Builds [`RepositoryReport`]s with a shared scanner and extractor table
pub struct ReportGenerator<'a> {
    scanner: &'a RepositoryScanner,
    extractors: &'a Extractors,
    summarizer: StructureSummarizer,
}

impl<'a> ReportGenerator<'a> {
    pub fn new(scanner: &'a RepositoryScanner, extractors: &'a Extractors) -> Self {
        Self {
            scanner,
            extractors,
            summarizer: StructureSummarizer::new(),
        }
    }

    /// Generate the overview for `root`.
    ///
    /// Fails only when the root itself cannot be scanned. A code file that
    /// cannot be read or parsed is logged and left out of the detailed
    /// section.
    pub fn generate(&self, root: &Path) -> Result<RepositoryReport> {
        let structure = self.scanner.scan(root)?;
        let architecture = self.scanner.analyze_architecture(root)?;
        let tree = self.scanner.render_tree(root)?;
        let code_files = self.scanner.code_files_for_analysis(root, &[])?;

        let mut output = String::new();
        output.push_str("# Complete Repository Documentation\n\n");
        output.push_str(&format!("**Repository:** {}\n\n", root.display()));

        write_overview(&mut output, &structure);

        output.push_str("## Repository Structure\n```\n");
        output.push_str(&tree);
        output.push_str("\n```\n\n");

        write_architecture(&mut output, &architecture);
        write_distribution(&mut output, &structure);

        output.push_str("## Detailed File Documentation\n\n");
        let mut files_documented = 0;
        for file in code_files.iter().take(MAX_DOCUMENTED_FILES) {
            match self.document_file(file) {
                Ok(Some(section)) => {
                    output.push_str(&section);
                    files_documented += 1;
                }
                Ok(None) => {}
                Err(e) => tracing::warn!("Error processing {}: {}", file.path, e),
            }
        }

        output.push_str("## Summary\n");
        output.push_str(&format!(
            "- **Total files in repository:** {}\n",
            structure.total_files
        ));
        output.push_str(&format!("- **Code files analyzed:** {}\n", code_files.len()));
        output.push_str(&format!("- **Files documented:** {}\n", files_documented));
        output.push_str(&format!(
            "- **Languages detected:** {}\n",
            language_names(&structure).join(", ")
        ));

        tracing::info!(
            "Report for {}: {} of {} code files documented",
            root.display(),
            files_documented,
            code_files.len()
        );

        Ok(RepositoryReport {
            markdown: output,
            total_files: structure.total_files,
            code_files_analyzed: code_files.len(),
            files_documented,
        })
    }

    /// Section for one file, or `None` when it has neither classes nor functions
    fn document_file(&self, file: &CodeFile) -> Result<Option<String>> {
        let language = file.language.as_str();
        let functions = self.extractors.extract_file(&file.full_path, language)?;
        let structure = self.summarizer.summarize_file(&file.full_path, language)?;

        if functions.is_empty() && structure.classes.is_empty() {
            return Ok(None);
        }

        let mut section = String::new();
        section.push_str(&format!("### {}\n", file.path));
        section.push_str(&format!("**Language:** {}\n", title_case(language)));
        section.push_str(&format!("**Type:** {}\n\n", title_case(file.purpose.as_str())));

        if !structure.classes.is_empty() {
            section.push_str("**Classes:**\n");
            for class in structure.classes.iter().take(MAX_CLASSES_PER_FILE) {
                section.push_str(&format!("- `{}` (line {})\n", class.name, class.line));
                for method in class.methods.iter().take(MAX_METHODS_PER_CLASS) {
                    section.push_str(&format!("  - `{}()` (line {})\n", method.name, method.line));
                }
            }
            section.push('\n');
        }

        for function in functions.iter().take(MAX_FUNCTIONS_PER_FILE) {
            let params = if function.parameters.is_empty() {
                "None".to_string()
            } else {
                function.parameters.join(", ")
            };
            section.push_str(&format!("#### {}\n", function.name));
            section.push_str(&format!("**Parameters:** {}\n", params));
            section.push_str(&format!("**Lines:** {}\n\n", function.line_range()));
        }

        section.push_str("---\n\n");
        Ok(Some(section))
    }
}

fn write_overview(output: &mut String, structure: &RepositoryStructure) {
    let package = &structure.package_structure;
    output.push_str("## Repository Overview\n");
    output.push_str(&format!("- **Total Files:** {}\n", structure.total_files));
    output.push_str(&format!(
        "- **Languages:** {}\n",
        language_names(structure).join(", ")
    ));
    output.push_str(&format!(
        "- **Project Type:** {}\n",
        package.project_type.as_str()
    ));
    output.push_str(&format!(
        "- **Frameworks:** {}\n\n",
        package.frameworks.join(", ")
    ));
}

fn write_architecture(output: &mut String, architecture: &ArchitectureSummary) {
    let patterns: Vec<&str> = architecture.patterns.iter().map(|p| p.label()).collect();
    output.push_str("## Architecture Analysis\n");
    output.push_str(&format!("**Detected Patterns:** {}\n", patterns.join(", ")));
    output.push_str("**Architectural Layers:**\n");
    for (layer, files) in &architecture.layers {
        output.push_str(&format!(
            "- **{}:** {} files\n",
            title_case(layer.as_str()),
            files.len()
        ));
    }
    output.push('\n');
}

fn write_distribution(output: &mut String, structure: &RepositoryStructure) {
    output.push_str("## File Distribution\n");
    for (language, count) in &structure.language_counts {
        output.push_str(&format!(
            "- **{}:** {} files\n",
            title_case(language.as_str()),
            count
        ));
    }
    output.push('\n');
}

fn language_names(structure: &RepositoryStructure) -> Vec<&'static str> {
    structure.language_counts.keys().map(|l| l.as_str()).collect()
}

fn title_case(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
