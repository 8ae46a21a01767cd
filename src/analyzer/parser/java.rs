use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::{BraceBoundaryResolver, ExtractorKind, FunctionExtractor};
use crate::types::{FunctionDescriptor, Result, SiftError};

/// Single-line method signature: optional modifiers, return type, name,
/// argument list, opening brace.
static METHOD_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:public|private|protected|static|\s)*\s+\w+\s+(\w+)\s*\(([^)]*)\)\s*\{")
        .expect("method signature regex")
});

/// How Java methods are recognized, resolved once when the extractor is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JavaStrategy {
    /// tree-sitter grammar (requires the `java-grammar` feature)
    Grammar,
    /// Per-line regex plus brace counting
    Heuristic,
}

/// Requested strategy before capability resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JavaStrategyPreference {
    #[default]
    Auto,
    Grammar,
    Heuristic,
}

impl JavaStrategy {
    /// Whether a Java grammar is compiled into this build
    pub const fn grammar_available() -> bool {
        cfg!(feature = "java-grammar")
    }

    pub fn resolve(preference: JavaStrategyPreference) -> Result<Self> {
        match preference {
            JavaStrategyPreference::Auto if Self::grammar_available() => Ok(Self::Grammar),
            JavaStrategyPreference::Auto | JavaStrategyPreference::Heuristic => {
                Ok(Self::Heuristic)
            }
            JavaStrategyPreference::Grammar if Self::grammar_available() => Ok(Self::Grammar),
            JavaStrategyPreference::Grammar => Err(SiftError::Config(
                "java_strategy = \"grammar\" requires the java-grammar feature".to_string(),
            )),
        }
    }
}

/// Java method extractor.
///
/// The heuristic strategy only sees single-line signatures, and nested or
/// anonymous classes that share a brace count can shift a method's end line.
pub struct JavaExtractor {
    strategy: JavaStrategy,
    boundary: BraceBoundaryResolver,
}

impl JavaExtractor {
    pub fn new(strategy: JavaStrategy) -> Result<Self> {
        #[cfg(feature = "java-grammar")]
        if strategy == JavaStrategy::Grammar {
            let _ = super::create_ts_parser(tree_sitter_java::LANGUAGE, "Java")?;
        }

        Ok(Self {
            strategy,
            boundary: BraceBoundaryResolver::braces(),
        })
    }

    pub fn heuristic() -> Self {
        Self {
            strategy: JavaStrategy::Heuristic,
            boundary: BraceBoundaryResolver::braces(),
        }
    }

    pub fn strategy(&self) -> JavaStrategy {
        self.strategy
    }

    fn extract_heuristic(&self, path: &str, content: &str) -> Vec<FunctionDescriptor> {
        let lines: Vec<&str> = content.split('\n').collect();
        let mut functions = Vec::new();

        for (index, line) in lines.iter().enumerate() {
            let Some(caps) = METHOD_RE.captures(line) else {
                continue;
            };

            let name = &caps[1];
            let parameters = parameter_names(&caps[2]);
            let end_line = self.boundary.closing_line(&lines, index);

            functions.push(FunctionDescriptor::new(
                name,
                parameters,
                index as u32 + 1,
                end_line as u32,
                path,
            ));
        }

        functions
    }
}

impl FunctionExtractor for JavaExtractor {
    fn extract(&self, path: &str, content: &str) -> Result<Vec<FunctionDescriptor>> {
        let functions = match self.strategy {
            JavaStrategy::Heuristic => self.extract_heuristic(path, content),
            #[cfg(feature = "java-grammar")]
            JavaStrategy::Grammar => grammar::extract(path, content)?,
            #[cfg(not(feature = "java-grammar"))]
            JavaStrategy::Grammar => self.extract_heuristic(path, content),
        };

        tracing::debug!(
            "{}: {} java methods ({:?})",
            path,
            functions.len(),
            self.strategy
        );
        Ok(functions)
    }

    fn kind(&self) -> ExtractorKind {
        ExtractorKind::Java
    }
}

/// Declared variable name of each comma-separated argument (its last
/// whitespace-delimited token), discarding the type.
fn parameter_names(params: &str) -> Vec<String> {
    params
        .split(',')
        .filter_map(|p| p.split_whitespace().last())
        .map(String::from)
        .collect()
}

#[cfg(feature = "java-grammar")]
mod grammar {
    use tree_sitter::{Query, QueryCursor, StreamingIterator};

    use super::super::{create_ts_parser, get_node_lines, get_node_text};
    use crate::types::{FunctionDescriptor, Result, SiftError};

    pub(super) fn extract(path: &str, content: &str) -> Result<Vec<FunctionDescriptor>> {
        let mut parser = create_ts_parser(tree_sitter_java::LANGUAGE, "Java")?;
        let tree = parser
            .parse(content, None)
            .ok_or_else(|| SiftError::Parse {
                message: "Failed to parse Java file".to_string(),
                path: path.to_string(),
            })?;

        let query_str = r#"
            (method_declaration
                name: (identifier) @name
                parameters: (formal_parameters) @params
            ) @method
        "#;

        let bytes = content.as_bytes();
        let mut functions = Vec::new();

        let Ok(query) = Query::new(&tree_sitter_java::LANGUAGE.into(), query_str) else {
            return Ok(functions);
        };
        let capture_names = query.capture_names();

        let mut cursor = QueryCursor::new();
        let mut matches = cursor.matches(&query, tree.root_node(), bytes);

        while let Some(m) = matches.next() {
            let mut name = "";
            let mut params = None;
            let mut method = None;

            for cap in m.captures.iter() {
                match capture_names[cap.index as usize] {
                    "name" => name = get_node_text(cap.node, bytes),
                    "params" => params = Some(cap.node),
                    "method" => method = Some(cap.node),
                    _ => {}
                }
            }

            let Some(method) = method else { continue };
            if name.is_empty() {
                continue;
            }

            let (start_line, end_line) = get_node_lines(method);
            let parameters = params
                .map(|p| parameter_names(p, bytes))
                .unwrap_or_default();

            functions.push(FunctionDescriptor::new(
                name, parameters, start_line, end_line, path,
            ));
        }

        functions.sort_by_key(|f| f.start_line);
        Ok(functions)
    }

    fn parameter_names(params: tree_sitter::Node, content: &[u8]) -> Vec<String> {
        let mut names = Vec::new();
        let mut cursor = params.walk();

        for child in params.named_children(&mut cursor) {
            let name = match child.kind() {
                "formal_parameter" => child.child_by_field_name("name"),
                "spread_parameter" => {
                    let mut inner = child.walk();
                    child
                        .named_children(&mut inner)
                        .find(|n| n.kind() == "variable_declarator")
                        .and_then(|d| d.child_by_field_name("name"))
                }
                _ => None,
            };
            if let Some(name) = name {
                names.push(get_node_text(name, content).to_string());
            }
        }

        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(src: &str) -> Vec<FunctionDescriptor> {
        JavaExtractor::heuristic().extract("Calc.java", src).unwrap()
    }

    #[test]
    fn test_simple_method() {
        let functions = extract("public int add(int a, int b) {\n  return a+b;\n}");

        assert_eq!(functions.len(), 1);
        assert_eq!(functions[0].name, "add");
        assert_eq!(functions[0].parameters, vec!["a", "b"]);
        assert_eq!(functions[0].start_line, 1);
        assert_eq!(functions[0].end_line, 3);
        assert_eq!(functions[0].docstring, None);
    }

    #[test]
    fn test_methods_inside_class() {
        let src = r#"public class UserService {
    private final Repo repo;

    public User find(String id, boolean cached) {
        if (cached) {
            return cache.get(id);
        }
        return repo.find(id);
    }

    private static void reset() {
    }
}"#;
        let functions = extract(src);
        let names: Vec<&str> = functions.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["find", "reset"]);

        assert_eq!(functions[0].parameters, vec!["id", "cached"]);
        assert_eq!((functions[0].start_line, functions[0].end_line), (4, 9));
        assert!(functions[1].parameters.is_empty());
        assert_eq!((functions[1].start_line, functions[1].end_line), (11, 12));
    }

    #[test]
    fn test_multiline_signature_not_detected() {
        let src = "public int add(\n    int a,\n    int b) {\n  return a + b;\n}";
        assert!(extract(src).is_empty());
    }

    #[test]
    fn test_no_methods() {
        assert!(extract("").is_empty());
        assert!(extract("package demo;\n\nimport java.util.List;\n").is_empty());
    }

    #[test]
    fn test_parameter_names_take_last_token() {
        assert_eq!(parameter_names("final String name, int[] xs"), vec!["name", "xs"]);
        assert!(parameter_names("").is_empty());
        assert!(parameter_names("  ").is_empty());
    }

    #[test]
    fn test_strategy_resolution() {
        assert_eq!(
            JavaStrategy::resolve(JavaStrategyPreference::Heuristic).unwrap(),
            JavaStrategy::Heuristic
        );

        let auto = JavaStrategy::resolve(JavaStrategyPreference::Auto).unwrap();
        let grammar = JavaStrategy::resolve(JavaStrategyPreference::Grammar);
        if JavaStrategy::grammar_available() {
            assert_eq!(auto, JavaStrategy::Grammar);
            assert!(grammar.is_ok());
        } else {
            assert_eq!(auto, JavaStrategy::Heuristic);
            assert!(matches!(grammar, Err(SiftError::Config(_))));
        }
    }

    #[cfg(feature = "java-grammar")]
    #[test]
    fn test_grammar_strategy() {
        let extractor = JavaExtractor::new(JavaStrategy::Grammar).unwrap();
        let src = "class C {\n  public int add(int a,\n      int b) {\n    return a + b;\n  }\n}";
        let functions = extractor.extract("C.java", src).unwrap();

        assert_eq!(functions.len(), 1);
        assert_eq!(functions[0].parameters, vec!["a", "b"]);
        assert_eq!((functions[0].start_line, functions[0].end_line), (2, 5));
    }
}
