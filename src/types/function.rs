//! Function descriptors produced by the language extractors.

use serde::{Deserialize, Serialize};

/// A commit that touched a function's line range.
///
/// Populated by a version-control collaborator, never by the extractors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitInfo {
    pub hash: String,
    pub author: String,
    pub message: String,
    /// Inclusive (start, end) lines the commit was matched against
    pub line_range: Option<(u32, u32)>,
}

impl CommitInfo {
    pub fn new(
        hash: impl Into<String>,
        author: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            hash: hash.into(),
            author: author.into(),
            message: message.into(),
            line_range: None,
        }
    }

    pub fn with_line_range(mut self, start: u32, end: u32) -> Self {
        self.line_range = Some((start, end));
        self
    }
}

/// One recognized callable unit.
///
/// Lines are 1-based and inclusive; `end_line >= start_line` always holds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionDescriptor {
    pub name: String,
    /// Parameter names only, no types or defaults
    pub parameters: Vec<String>,
    pub docstring: Option<String>,
    pub start_line: u32,
    pub end_line: u32,
    pub source_file: String,
    #[serde(default)]
    pub associated_commits: Vec<CommitInfo>,
}

impl FunctionDescriptor {
    pub fn new(
        name: impl Into<String>,
        parameters: Vec<String>,
        start_line: u32,
        end_line: u32,
        source_file: impl Into<String>,
    ) -> Self {
        let start_line = start_line.max(1);
        Self {
            name: name.into(),
            parameters,
            docstring: None,
            start_line,
            end_line: end_line.max(start_line),
            source_file: source_file.into(),
            associated_commits: Vec::new(),
        }
    }

    pub fn with_docstring(mut self, docstring: Option<String>) -> Self {
        self.docstring = docstring;
        self
    }

    /// Key a version-control collaborator uses to look up commits
    pub fn commit_key(&self) -> (&str, u32, u32) {
        (&self.source_file, self.start_line, self.end_line)
    }

    pub fn attach_commit(&mut self, commit: CommitInfo) {
        self.associated_commits.push(commit);
    }

    /// Number of lines spanned, inclusive
    pub fn line_count(&self) -> u32 {
        self.end_line - self.start_line + 1
    }

    /// "start-end" range label used in reports
    pub fn line_range(&self) -> String {
        format!("{}-{}", self.start_line, self.end_line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_clamps_line_invariants() {
        let desc = FunctionDescriptor::new("f", vec![], 0, 0, "a.py");
        assert_eq!(desc.start_line, 1);
        assert_eq!(desc.end_line, 1);

        let desc = FunctionDescriptor::new("g", vec![], 10, 4, "a.py");
        assert_eq!(desc.start_line, 10);
        assert_eq!(desc.end_line, 10);
    }

    #[test]
    fn test_commit_association() {
        let mut desc = FunctionDescriptor::new("add", vec!["a".into()], 3, 9, "src/Calc.java");
        assert!(desc.associated_commits.is_empty());
        assert_eq!(desc.commit_key(), ("src/Calc.java", 3, 9));

        desc.attach_commit(CommitInfo::new("abc123", "dev", "fix add").with_line_range(3, 9));
        assert_eq!(desc.associated_commits.len(), 1);
        assert_eq!(desc.associated_commits[0].line_range, Some((3, 9)));
    }

    #[test]
    fn test_line_helpers() {
        let desc = FunctionDescriptor::new("f", vec![], 5, 7, "a.js");
        assert_eq!(desc.line_count(), 3);
        assert_eq!(desc.line_range(), "5-7");
    }
}
