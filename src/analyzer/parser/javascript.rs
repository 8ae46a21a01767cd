use std::sync::LazyLock;

use regex::Regex;

use super::{BraceBoundaryResolver, ExtractorKind, FunctionExtractor};
use crate::types::{FunctionDescriptor, Result};

/// Alternative signature patterns, tried in order; the first match on a
/// line wins.
static PATTERNS: LazyLock<[Regex; 3]> = LazyLock::new(|| {
    [
        // function declaration: function name(a, b)
        Regex::new(r"function\s+(\w+)\s*\(([^)]*)\)").expect("function regex"),
        // arrow function bound to a variable: const name = (a, b) => {
        Regex::new(r"(?:const|let|var)\s+(\w+)\s*=\s*\(([^)]*)\)\s*=>\s*\{").expect("arrow regex"),
        // method shorthand: name(a, b) {
        Regex::new(r"(\w+)\s*\(([^)]*)\)\s*\{").expect("method regex"),
    ]
});

/// Regex-driven extractor shared by JavaScript and TypeScript.
///
/// Parameters are kept verbatim (defaults, type annotations and
/// destructuring are not interpreted). The method-shorthand pattern also
/// matches control-flow headers such as `if (x) {`.
pub struct JavaScriptExtractor {
    boundary: BraceBoundaryResolver,
}

impl JavaScriptExtractor {
    pub fn new() -> Self {
        Self {
            boundary: BraceBoundaryResolver::braces(),
        }
    }
}

impl Default for JavaScriptExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FunctionExtractor for JavaScriptExtractor {
    fn extract(&self, path: &str, content: &str) -> Result<Vec<FunctionDescriptor>> {
        let lines: Vec<&str> = content.split('\n').collect();
        let mut functions = Vec::new();

        for (index, line) in lines.iter().enumerate() {
            let Some(caps) = PATTERNS.iter().find_map(|re| re.captures(line)) else {
                continue;
            };

            let parameters = caps
                .get(2)
                .map(|m| split_parameters(m.as_str()))
                .unwrap_or_default();
            let end_line = self.boundary.closing_line(&lines, index);

            functions.push(FunctionDescriptor::new(
                &caps[1],
                parameters,
                index as u32 + 1,
                end_line as u32,
                path,
            ));
        }

        tracing::debug!("{}: {} js/ts functions", path, functions.len());
        Ok(functions)
    }

    fn kind(&self) -> ExtractorKind {
        ExtractorKind::JavaScript
    }
}

fn split_parameters(params: &str) -> Vec<String> {
    params
        .split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(src: &str) -> Vec<FunctionDescriptor> {
        JavaScriptExtractor::new().extract("app.js", src).unwrap()
    }

    #[test]
    fn test_function_declaration() {
        let functions = extract("function greet(name, greeting) {\n  return greeting + name;\n}");

        assert_eq!(functions.len(), 1);
        assert_eq!(functions[0].name, "greet");
        assert_eq!(functions[0].parameters, vec!["name", "greeting"]);
        assert_eq!((functions[0].start_line, functions[0].end_line), (1, 3));
    }

    #[test]
    fn test_arrow_function() {
        let functions = extract("const add = (a, b = 2) => {\n  return a + b;\n};\n");

        assert_eq!(functions.len(), 1);
        assert_eq!(functions[0].name, "add");
        assert_eq!(functions[0].parameters, vec!["a", "b = 2"]);
        assert_eq!(functions[0].end_line, 3);
    }

    #[test]
    fn test_method_shorthand_and_typed_params() {
        let src = r#"class Store {
  load(id: string, { force }) {
    return fetch(id);
  }
}"#;
        let functions = JavaScriptExtractor::new().extract("store.ts", src).unwrap();

        assert_eq!(functions.len(), 1);
        assert_eq!(functions[0].name, "load");
        assert_eq!(functions[0].parameters, vec!["id: string", "{ force }"]);
        assert_eq!((functions[0].start_line, functions[0].end_line), (2, 4));
    }

    #[test]
    fn test_first_pattern_wins() {
        // Matches both the declaration and the shorthand pattern
        let functions = extract("function run() {\n}\n");
        assert_eq!(functions.len(), 1);
        assert_eq!(functions[0].name, "run");
    }

    #[test]
    fn test_declaration_without_body_on_line() {
        let functions = extract("export default function main(argv)\n{\n}\n");
        assert_eq!(functions.len(), 1);
        assert_eq!(functions[0].name, "main");
        // No brace on the signature line: end falls back to the start line
        assert_eq!((functions[0].start_line, functions[0].end_line), (1, 1));
    }

    #[test]
    fn test_no_functions() {
        assert!(extract("").is_empty());
        assert!(extract("const x = 1;\nconsole.log(x);\n").is_empty());
    }
}
