//! Shared value types used across parsing, annotations and output.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Inclusive range of 0-based line indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LineRange {
    pub start: usize,
    pub end: usize,
}

impl LineRange {
    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(start <= end, "line range start must not exceed end");
        Self { start, end }
    }

    /// A range covering a single line
    pub fn line(line: usize) -> Self {
        Self::new(line, line)
    }

    pub fn line_count(&self) -> usize {
        self.end - self.start + 1
    }

    pub fn contains(&self, line: usize) -> bool {
        self.start <= line && line <= self.end
    }

    /// 1-based line number of the start, for messages
    pub fn display_start(&self) -> usize {
        self.start + 1
    }
}

/// Where a comment block lives in a file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockKind {
    /// File-level block delimited by the header markers
    Header,
    /// Block documenting the code that follows it
    Body,
}

impl std::fmt::Display for BlockKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BlockKind::Header => write!(f, "header"),
            BlockKind::Body => write!(f, "body"),
        }
    }
}

/// Information about a parsed source file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileInfo {
    /// Path of the file, relative to the walk root when possible
    pub path: String,
    /// File name without its extension
    pub name: String,
    /// File extension, used to pick the comment style and annotations
    #[serde(rename = "type")]
    pub file_type: String,
    /// First line index of the file
    pub start: usize,
    /// Last line index of the file
    pub end: usize,
}

impl FileInfo {
    pub fn new(path: &Path, line_count: usize) -> Self {
        let file_type = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_lowercase)
            .unwrap_or_default();
        let name = path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .unwrap_or_default()
            .to_string();

        Self {
            path: path.to_string_lossy().replace('\\', "/"),
            name,
            file_type,
            start: 0,
            end: line_count.saturating_sub(1),
        }
    }
}

/// A problem found while parsing that doesn't stop the run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub path: String,
    /// 1-based line the problem was found on
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
    pub message: String,
}

impl Diagnostic {
    pub fn new(path: impl Into<String>, line: Option<usize>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            line,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.line {
            Some(line) => write!(f, "{}:{}: {}", self.path, line, self.message),
            None => write!(f, "{}: {}", self.path, self.message),
        }
    }
}
