use tree_sitter::{Query, QueryCursor, StreamingIterator};

use super::{ExtractorKind, FunctionExtractor, get_node_lines, get_node_text, parse_strict};
use crate::types::{FunctionDescriptor, Result};

/// Grammar-based Python extractor.
///
/// Any syntax error fails the whole file with `MalformedSource`.
pub struct PythonExtractor;

impl PythonExtractor {
    pub fn new() -> Result<Self> {
        // Validate that the grammar is available
        let _ = super::create_ts_parser(tree_sitter_python::LANGUAGE, "Python")?;
        Ok(Self)
    }
}

impl FunctionExtractor for PythonExtractor {
    fn extract(&self, path: &str, content: &str) -> Result<Vec<FunctionDescriptor>> {
        let tree = parse_strict(tree_sitter_python::LANGUAGE, "Python", path, content)?;
        let functions = extract_functions(tree.root_node(), content, path);

        tracing::debug!("{}: {} python functions", path, functions.len());
        Ok(functions)
    }

    fn kind(&self) -> ExtractorKind {
        ExtractorKind::Python
    }
}

fn extract_functions(
    root: tree_sitter::Node,
    content: &str,
    path: &str,
) -> Vec<FunctionDescriptor> {
    let query_str = r#"
        (function_definition
            name: (identifier) @name
            parameters: (parameters) @params
            body: (block) @body
        ) @function
    "#;

    let mut functions = Vec::new();
    let bytes = content.as_bytes();

    let Ok(query) = Query::new(&tree_sitter_python::LANGUAGE.into(), query_str) else {
        return functions;
    };
    let capture_names = query.capture_names();

    let mut cursor = QueryCursor::new();
    let mut matches = cursor.matches(&query, root, bytes);

    while let Some(m) = matches.next() {
        let mut name = "";
        let mut params = None;
        let mut body = None;
        let mut function = None;

        for cap in m.captures.iter() {
            match capture_names[cap.index as usize] {
                "name" => name = get_node_text(cap.node, bytes),
                "params" => params = Some(cap.node),
                "body" => body = Some(cap.node),
                "function" => function = Some(cap.node),
                _ => {}
            }
        }

        let Some(function) = function else { continue };
        if name.is_empty() {
            continue;
        }

        let (start_line, end_line) = get_node_lines(function);
        let parameters = params
            .map(|p| parameter_names(p, bytes))
            .unwrap_or_default();
        let docstring = body.and_then(|b| docstring(b, bytes));

        functions.push(
            FunctionDescriptor::new(name, parameters, start_line, end_line, path)
                .with_docstring(docstring),
        );
    }

    // Source order; nested definitions follow their enclosing function
    functions.sort_by_key(|f| f.start_line);
    functions
}

/// Names of the ordinary positional parameters.
///
/// Mirrors Python's `args` list: positional-only parameters before `/`
/// are dropped, and collection stops at `*`, `*args` or `**kwargs`.
fn parameter_names(params: tree_sitter::Node, content: &[u8]) -> Vec<String> {
    let mut names = Vec::new();
    let mut cursor = params.walk();

    for child in params.named_children(&mut cursor) {
        match child.kind() {
            "identifier" => names.push(get_node_text(child, content).to_string()),
            "default_parameter" | "typed_default_parameter" => {
                if let Some(name) = child.child_by_field_name("name") {
                    names.push(get_node_text(name, content).to_string());
                }
            }
            "typed_parameter" => {
                let mut inner = child.walk();
                let first = child.named_children(&mut inner).next();
                match first {
                    Some(node) if node.kind() == "identifier" => {
                        names.push(get_node_text(node, content).to_string());
                    }
                    // `*args: int` / `**kw: str`
                    _ => break,
                }
            }
            "positional_separator" => names.clear(),
            "keyword_separator" | "list_splat_pattern" | "dictionary_splat_pattern" => break,
            _ => {}
        }
    }

    names
}

/// Leading string-literal statement of a function body, cleaned.
///
/// Only a plain `str` literal counts: bytes, f-strings and anything with
/// interpolation yield `None`. Implicitly concatenated literals are joined.
fn docstring(body: tree_sitter::Node, content: &[u8]) -> Option<String> {
    let mut cursor = body.walk();
    let first = body
        .named_children(&mut cursor)
        .find(|n| n.kind() != "comment")?;

    if first.kind() != "expression_statement" {
        return None;
    }

    let mut inner = first.walk();
    let expr = first.named_children(&mut inner).next()?;
    let value = match expr.kind() {
        "string" => literal_value(expr, content)?,
        "concatenated_string" => {
            let mut parts = expr.walk();
            let mut joined = String::new();
            for part in expr.named_children(&mut parts) {
                joined.push_str(&literal_value(part, content)?);
            }
            joined
        }
        _ => return None,
    };

    Some(clean_docstring(&value))
}

/// Value of one `string` node, or `None` if it is not a plain `str` literal
fn literal_value(node: tree_sitter::Node, content: &[u8]) -> Option<String> {
    if node.kind() != "string" {
        return None;
    }
    let mut cursor = node.walk();
    if node
        .named_children(&mut cursor)
        .any(|n| n.kind() == "interpolation")
    {
        return None;
    }
    string_value(get_node_text(node, content))
}

/// Decode a Python string literal's source text.
///
/// `b` and `f` prefixes are rejected; `r` keeps backslashes verbatim.
fn string_value(literal: &str) -> Option<String> {
    let quote_at = literal.find(['"', '\''])?;
    let prefix = literal[..quote_at].to_ascii_lowercase();
    if prefix.contains('b') || prefix.contains('f') {
        return None;
    }

    let body = strip_string_quotes(&literal[quote_at..])?;
    if prefix.contains('r') {
        Some(body.to_string())
    } else {
        Some(decode_escapes(body))
    }
}

/// Remove the surrounding quotes of an unprefixed literal.
fn strip_string_quotes(literal: &str) -> Option<&str> {
    for quote in ["\"\"\"", "'''", "\"", "'"] {
        if literal.len() >= 2 * quote.len() && literal.starts_with(quote) && literal.ends_with(quote)
        {
            return Some(&literal[quote.len()..literal.len() - quote.len()]);
        }
    }
    None
}

/// Decode the standard escape sequences of a non-raw `str` literal.
///
/// Unknown escapes and `\N{...}` names are kept as written.
fn decode_escapes(body: &str) -> String {
    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        let Some(next) = chars.next() else {
            out.push('\\');
            break;
        };
        match next {
            '\n' => {}
            '\\' => out.push('\\'),
            '\'' => out.push('\''),
            '"' => out.push('"'),
            'a' => out.push('\u{07}'),
            'b' => out.push('\u{08}'),
            'f' => out.push('\u{0c}'),
            'n' => out.push('\n'),
            'r' => out.push('\r'),
            't' => out.push('\t'),
            'v' => out.push('\u{0b}'),
            '0'..='7' => {
                let mut code = next.to_digit(8).unwrap_or(0);
                for _ in 0..2 {
                    match chars.peek().and_then(|d| d.to_digit(8)) {
                        Some(d) => {
                            code = code * 8 + d;
                            chars.next();
                        }
                        None => break,
                    }
                }
                out.extend(char::from_u32(code));
            }
            'x' | 'u' | 'U' => {
                let width = match next {
                    'x' => 2,
                    'u' => 4,
                    _ => 8,
                };
                let digits: String = chars.clone().take(width).collect();
                match (digits.len() == width)
                    .then(|| u32::from_str_radix(&digits, 16).ok())
                    .flatten()
                    .and_then(char::from_u32)
                {
                    Some(decoded) => {
                        out.push(decoded);
                        for _ in 0..width {
                            chars.next();
                        }
                    }
                    None => {
                        out.push('\\');
                        out.push(next);
                    }
                }
            }
            other => {
                out.push('\\');
                out.push(other);
            }
        }
    }

    out
}

/// Normalise docstring indentation the way Python's `inspect.cleandoc` does.
///
/// Indentation is measured and cut in characters, never bytes: the first
/// line loses its leading whitespace, later lines lose the smallest
/// indentation among their non-blank members, then empty leading and
/// trailing lines are dropped.
fn clean_docstring(doc: &str) -> String {
    let expanded = expand_tabs(doc);
    let mut lines: Vec<String> = expanded.split('\n').map(String::from).collect();

    let margin = lines[1..]
        .iter()
        .filter(|l| !l.trim_start().is_empty())
        .map(|l| l.chars().take_while(|c| c.is_whitespace()).count())
        .min();

    lines[0] = lines[0].trim_start().to_string();
    if let Some(margin) = margin {
        for line in lines.iter_mut().skip(1) {
            *line = line.chars().skip(margin).collect();
        }
    }

    while lines.last().is_some_and(|l| l.is_empty()) {
        lines.pop();
    }
    while lines.first().is_some_and(|l| l.is_empty()) {
        lines.remove(0);
    }

    lines.join("\n")
}

/// `str.expandtabs(8)`: tabs advance to the next multiple of eight columns
fn expand_tabs(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut column = 0;
    for c in text.chars() {
        match c {
            '\t' => {
                let pad = 8 - column % 8;
                out.extend(std::iter::repeat_n(' ', pad));
                column += pad;
            }
            '\n' | '\r' => {
                out.push(c);
                column = 0;
            }
            _ => {
                out.push(c);
                column += 1;
            }
        }
    }
    out
}
