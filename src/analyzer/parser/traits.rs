use std::path::Path;

use super::ExtractorKind;
use crate::types::{FunctionDescriptor, Result, SiftError};

/// Capability implemented by every per-language extractor.
///
/// Extraction is deterministic for identical input and never fails on
/// readable text that merely contains no recognizable functions.
pub trait FunctionExtractor: Send + Sync {
    fn extract(&self, path: &str, content: &str) -> Result<Vec<FunctionDescriptor>>;
    fn kind(&self) -> ExtractorKind;
}

/// Read a whole source file as UTF-8.
///
/// Maps a missing file to `NotFound` and invalid bytes to `Encoding`.
pub fn read_source(path: &Path) -> Result<String> {
    let bytes = std::fs::read(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => SiftError::not_found(path),
        _ => SiftError::Io(e),
    })?;

    String::from_utf8(bytes).map_err(|e| SiftError::Encoding {
        path: path.to_path_buf(),
        message: e.utf8_error().to_string(),
    })
}

/// Extract text content from a tree-sitter node.
/// Returns empty string if extraction fails (with debug logging).
#[inline]
pub fn get_node_text<'a>(node: tree_sitter::Node, content: &'a [u8]) -> &'a str {
    node.utf8_text(content).unwrap_or_else(|e| {
        tracing::debug!(
            "UTF-8 extraction failed at {}:{}-{}:{}: {}",
            node.start_position().row + 1,
            node.start_position().column,
            node.end_position().row + 1,
            node.end_position().column,
            e
        );
        ""
    })
}

/// 1-based inclusive (start, end) lines of a tree-sitter node.
pub fn get_node_lines(node: tree_sitter::Node) -> (u32, u32) {
    (
        node.start_position().row as u32 + 1,
        node.end_position().row as u32 + 1,
    )
}

/// Create a tree-sitter parser for the given language.
pub fn create_ts_parser<L: Into<tree_sitter::Language>>(
    language: L,
    lang_name: &str,
) -> Result<tree_sitter::Parser> {
    let mut parser = tree_sitter::Parser::new();
    parser
        .set_language(&language.into())
        .map_err(|e| SiftError::Parse {
            message: format!("Failed to set {} language: {}", lang_name, e),
            path: String::new(),
        })?;
    Ok(parser)
}

/// Parse `content` and reject trees containing syntax errors.
///
/// Returns `MalformedSource` with the line of the first error or missing
/// node, so a single bad construct fails the whole file.
pub fn parse_strict<L: Into<tree_sitter::Language>>(
    language: L,
    lang_name: &str,
    path: &str,
    content: &str,
) -> Result<tree_sitter::Tree> {
    let mut parser = create_ts_parser(language, lang_name).map_err(|e| match e {
        SiftError::Parse { message, .. } => SiftError::Parse {
            message,
            path: path.to_string(),
        },
        other => other,
    })?;

    let tree = parser
        .parse(content, None)
        .ok_or_else(|| SiftError::Parse {
            message: format!("Failed to parse {} file", lang_name),
            path: path.to_string(),
        })?;

    if tree.root_node().has_error() {
        let line = first_error_line(tree.root_node()).unwrap_or(1);
        return Err(SiftError::MalformedSource {
            path: path.to_string(),
            line,
            message: format!("invalid {} syntax", lang_name),
        });
    }

    Ok(tree)
}

/// Line of the first ERROR or MISSING node in document order
fn first_error_line(root: tree_sitter::Node) -> Option<u32> {
    let mut cursor = root.walk();
    loop {
        let node = cursor.node();
        if node.is_error() || node.is_missing() {
            return Some(node.start_position().row as u32 + 1);
        }
        // Only descend into subtrees that contain an error
        if node.has_error() && cursor.goto_first_child() {
            continue;
        }
        loop {
            if cursor.goto_next_sibling() {
                break;
            }
            if !cursor.goto_parent() {
                return None;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    #[test]
    fn test_read_source_missing() {
        let dir = TempDir::new().unwrap();
        let err = read_source(&dir.path().join("nope.py")).unwrap_err();
        assert!(matches!(err, SiftError::NotFound { .. }));
    }

    #[test]
    fn test_read_source_invalid_utf8() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.py");
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(&[0x64, 0x65, 0x66, 0xff, 0xfe]).unwrap();

        let err = read_source(&path).unwrap_err();
        assert!(matches!(err, SiftError::Encoding { .. }));
    }

    #[test]
    fn test_parse_strict_reports_error_line() {
        let src = "def ok():\n    pass\n\ndef broken(:\n    pass\n";
        let err = parse_strict(tree_sitter_python::LANGUAGE, "Python", "x.py", src).unwrap_err();
        match err {
            SiftError::MalformedSource { path, line, .. } => {
                assert_eq!(path, "x.py");
                assert_eq!(line, 4);
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
