//! Structure Summarizer
//!
//! Line-oriented keyword matching that yields imports, classes and
//! functions for overview reports. It is cheaper and coarser than the
//! function extractors: there is no boundary detection, so a method is
//! attached to the most recent class above it even when that class has
//! already ended.

use std::path::Path;

use serde::Serialize;

use super::parser::{ExtractorKind, read_source};
use crate::types::Result;

const JAVA_MODIFIERS: &[&str] = &["public ", "private ", "protected "];
const JAVA_STRIPPED_WORDS: &[&str] = &["public", "private", "protected", "static"];

/// A method or function line
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MethodDescriptor {
    pub name: String,
    /// 1-based line of the declaration
    pub line: u32,
    /// The trimmed declaration line
    pub raw_signature: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassDescriptor {
    pub name: String,
    pub line: u32,
    pub methods: Vec<MethodDescriptor>,
}

/// Coarse structure of one source file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FileStructure {
    pub imports: Vec<String>,
    pub classes: Vec<ClassDescriptor>,
    /// Functions outside any class
    pub functions: Vec<MethodDescriptor>,
}

impl FileStructure {
    fn open_class(&mut self, name: String, line: u32) {
        self.classes.push(ClassDescriptor {
            name,
            line,
            methods: Vec::new(),
        });
    }

    pub fn method_count(&self) -> usize {
        self.classes.iter().map(|c| c.methods.len()).sum()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct StructureSummarizer;

impl StructureSummarizer {
    pub fn new() -> Self {
        Self
    }

    /// Summarize a file, selecting rules by language key (`java`, `py`, `tsx`, ...)
    pub fn summarize_file(&self, path: &Path, language: &str) -> Result<FileStructure> {
        let kind = ExtractorKind::from_key(language)?;
        let content = read_source(path)?;
        Ok(self.summarize(&content, kind))
    }

    pub fn summarize(&self, content: &str, kind: ExtractorKind) -> FileStructure {
        match kind {
            ExtractorKind::Java => summarize_java(content),
            ExtractorKind::Python => summarize_python(content),
            ExtractorKind::JavaScript => summarize_javascript(content),
        }
    }
}

fn summarize_java(content: &str) -> FileStructure {
    let mut structure = FileStructure::default();

    for (index, line) in content.split('\n').enumerate() {
        let line = line.trim();
        let line_no = index as u32 + 1;

        if let Some(import) = line.strip_prefix("import ") {
            structure
                .imports
                .push(import.replace(';', "").trim().to_string());
        }

        if line.contains("class ") && line.contains('{') {
            if let Some(name) = java_class_name(line) {
                structure.open_class(name, line_no);
            }
            continue;
        }

        let is_method = JAVA_MODIFIERS.iter().any(|m| line.contains(m))
            && line.contains('(')
            && line.contains(')');
        if !is_method {
            continue;
        }
        if let (Some(class), Some(name)) = (structure.classes.last_mut(), java_method_name(line)) {
            class.methods.push(MethodDescriptor {
                name,
                line: line_no,
                raw_signature: line.to_string(),
            });
        }
    }

    structure
}

/// First word after `class `, up to the opening brace
fn java_class_name(line: &str) -> Option<String> {
    let (_, after) = line.split_once("class ")?;
    let head = after.split('{').next()?;
    head.split_whitespace().next().map(String::from)
}

/// Word before the opening parenthesis once modifiers are removed
fn java_method_name(line: &str) -> Option<String> {
    let mut stripped = line.to_string();
    for word in JAVA_STRIPPED_WORDS {
        stripped = stripped.replace(word, "");
    }
    let (before, _) = stripped.split_once('(')?;
    before.split_whitespace().last().map(String::from)
}

fn summarize_python(content: &str) -> FileStructure {
    let mut structure = FileStructure::default();

    for (index, line) in content.split('\n').enumerate() {
        let stripped = line.trim();
        let line_no = index as u32 + 1;

        if stripped.starts_with("import ") || stripped.starts_with("from ") {
            structure.imports.push(stripped.to_string());
        }

        if let Some(rest) = stripped.strip_prefix("class ") {
            let name = rest
                .split(['(', ':'])
                .next()
                .unwrap_or_default()
                .trim()
                .to_string();
            structure.open_class(name, line_no);
        }

        if let Some(rest) = stripped.strip_prefix("def ") {
            let function = MethodDescriptor {
                name: rest.split('(').next().unwrap_or_default().trim().to_string(),
                line: line_no,
                raw_signature: stripped.to_string(),
            };
            match structure.classes.last_mut() {
                Some(class) => class.methods.push(function),
                None => structure.functions.push(function),
            }
        }
    }

    structure
}

fn summarize_javascript(content: &str) -> FileStructure {
    let mut structure = FileStructure::default();

    for (index, line) in content.split('\n').enumerate() {
        let stripped = line.trim();
        let line_no = index as u32 + 1;

        if stripped.starts_with("import ")
            || (stripped.starts_with("const ") && stripped.contains("require("))
        {
            structure.imports.push(stripped.to_string());
        }

        if let Some(rest) = stripped.strip_prefix("class ") {
            let head = rest.split('{').next().unwrap_or_default();
            let name = head.split("extends").next().unwrap_or_default().trim();
            structure.open_class(name.to_string(), line_no);
        }

        if (stripped.starts_with("function ") || stripped.contains("function("))
            && let Some((_, after)) = stripped.split_once("function ")
        {
            let name = after.split('(').next().unwrap_or_default().trim();
            if !name.is_empty() {
                structure.functions.push(MethodDescriptor {
                    name: name.to_string(),
                    line: line_no,
                    raw_signature: stripped.to_string(),
                });
            }
        }
    }

    structure
}
