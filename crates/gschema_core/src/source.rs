//! Source documents with origin paths and line lookup.

use crate::span::Span;
use memchr::memchr_iter;
use std::fmt;
use std::path::{Path, PathBuf};

/// A 1-based line/column position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineCol {
    pub line: u32,
    pub column: u32,
}

impl fmt::Display for LineCol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Byte offsets of every line start in a document.
#[derive(Debug, Clone)]
pub struct LineIndex {
    line_starts: Vec<u32>,
}

impl LineIndex {
    #[must_use]
    pub fn new(text: &str) -> Self {
        let mut line_starts = vec![0];
        line_starts.extend(memchr_iter(b'\n', text.as_bytes()).map(|i| i as u32 + 1));
        Self { line_starts }
    }

    /// Converts a byte offset to a 1-based line and column.
    #[must_use]
    pub fn line_col(&self, offset: u32) -> LineCol {
        let line = match self.line_starts.binary_search(&offset) {
            Ok(exact) => exact,
            Err(next) => next - 1,
        };
        LineCol {
            line: line as u32 + 1,
            column: offset - self.line_starts[line] + 1,
        }
    }

    #[must_use]
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }
}

/// A document read from disk (or built in memory) together with its origin.
///
/// `line_offset` shifts reported lines for documents embedded inside a larger
/// host file.
#[derive(Debug, Clone)]
pub struct SourceFile {
    path: PathBuf,
    text: String,
    line_offset: u32,
    index: LineIndex,
}

impl SourceFile {
    pub fn new(path: impl Into<PathBuf>, text: impl Into<String>) -> Self {
        let text = text.into();
        let index = LineIndex::new(&text);
        Self {
            path: path.into(),
            text,
            line_offset: 0,
            index,
        }
    }

    /// Marks this document as starting on line `line` (1-based) of its host file.
    #[must_use]
    pub fn starting_at_line(mut self, line: u32) -> Self {
        self.line_offset = line.saturating_sub(1);
        self
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Location of `span.start` in the host file.
    #[must_use]
    pub fn location(&self, span: Span) -> Location {
        let LineCol { line, column } = self.index.line_col(span.start);
        Location {
            path: self.path.display().to_string(),
            line: line + self.line_offset,
            column,
        }
    }

    /// 1-based host-file line of `span.start`.
    #[must_use]
    pub fn line_of(&self, span: Span) -> u32 {
        self.location(span).line
    }
}

/// A printable `path:line:column` triple used in error messages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub path: String,
    pub line: u32,
    pub column: u32,
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.path, self.line, self.column)
    }
}
