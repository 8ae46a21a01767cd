//! Brace Boundary Resolver
//!
//! Finds where a multi-line construct ends by counting nesting delimiters,
//! for extractors that have no grammar.
//!
//! Delimiters inside string and comment literals are counted like any other
//! character. A literal holding an unbalanced brace therefore shifts the
//! reported end line; this is a known limitation of the heuristic.

/// Delimiter-nesting counter over a sequence of physical lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BraceBoundaryResolver {
    open: char,
    close: char,
}

impl Default for BraceBoundaryResolver {
    fn default() -> Self {
        Self::braces()
    }
}

impl BraceBoundaryResolver {
    /// Resolver for `{` / `}`
    pub const fn braces() -> Self {
        Self {
            open: '{',
            close: '}',
        }
    }

    pub const fn with_delimiters(open: char, close: char) -> Self {
        Self { open, close }
    }

    /// Resolve the closing line of the construct starting at `start`
    /// (0-based index into `lines`).
    ///
    /// Returns the 1-based line number of the first line, at or after
    /// `start`, where the running delimiter count returns to zero. When the
    /// start line has no opening delimiter, or the count never balances
    /// before end of input, returns `start + 1`, i.e. the start line itself
    /// in 1-based numbering. Never scans past the end of `lines`.
    pub fn closing_line<S: AsRef<str>>(&self, lines: &[S], start: usize) -> usize {
        let fallback = start + 1;

        let Some(first) = lines.get(start) else {
            return fallback;
        };
        if !first.as_ref().contains(self.open) {
            return fallback;
        }

        let mut depth: i64 = 0;
        for (offset, line) in lines[start..].iter().enumerate() {
            depth += self.delta(line.as_ref());
            if depth == 0 {
                return start + offset + 1;
            }
        }

        fallback
    }

    /// Net nesting change contributed by one line
    fn delta(&self, line: &str) -> i64 {
        line.chars().fold(0, |acc, c| {
            if c == self.open {
                acc + 1
            } else if c == self.close {
                acc - 1
            } else {
                acc
            }
        })
    }
}
