//! Comment block extraction
//!
//! Splits a file into raw comment blocks before any annotation is parsed.
//! The header is the first block delimited by the header markers; body
//! blocks are runs of documentation lines (or start/end delimited blocks for
//! styles like css) together with the code that follows them.
//!
//! ```text
//! ////                              <- header start
//! /// @page tests/java-file          <- header content
//! ////                              <- header end
//!
//! /// @name Body Block 1            <- body block
//! class HelloWorldApp { ... }       <- code of the body block
//! ```

use super::style::{CommentStyle, Delimiters};
use crate::types::{BlockKind, LineRange};
use serde::Serialize;
use thiserror::Error;

/// A comment block and the code that follows it, before annotation parsing
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RawBlock {
    pub kind: BlockKind,
    /// Comment content with the markers removed, paired with the 0-based
    /// line each piece came from
    pub comment: Vec<(usize, String)>,
    /// Lines spanned by the comment, markers included
    pub comment_range: LineRange,
    /// Code lines following the comment
    pub code: Vec<String>,
    pub code_range: Option<LineRange>,
}

impl RawBlock {
    fn new(kind: BlockKind, comment: Vec<(usize, String)>, comment_range: LineRange) -> Self {
        Self {
            kind,
            comment,
            comment_range,
            code: Vec::new(),
            code_range: None,
        }
    }

    /// Comment content lines without their line numbers
    pub fn comment_lines(&self) -> impl Iterator<Item = &str> {
        self.comment.iter().map(|(_, line)| line.as_str())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BlockError {
    #[error("header comment opened on line {} is never closed", .line + 1)]
    UnterminatedHeader { line: usize },
}

/// Find the file level header block.
///
/// For start/end header styles this is the first block opened by the header
/// start marker anywhere in the file. For line-only header styles it is a
/// run of header lines at the top of the file that is not directly followed
/// by code.
pub fn extract_header(lines: &[&str], style: &CommentStyle) -> Result<Option<RawBlock>, BlockError> {
    let header = &style.header;

    if !header.is_start_end() {
        return Ok(extract_line_header(lines, header));
    }

    let Some(open_at) = lines.iter().position(|l| header.open(l.trim()).is_some()) else {
        return Ok(None);
    };

    match read_delimited(lines, open_at, header) {
        Some((comment, close_at)) => Ok(Some(RawBlock::new(
            BlockKind::Header,
            comment,
            LineRange::new(open_at, close_at),
        ))),
        None => Err(BlockError::UnterminatedHeader { line: open_at }),
    }
}

fn extract_line_header(lines: &[&str], header: &Delimiters) -> Option<RawBlock> {
    let first = lines.iter().position(|l| !l.trim().is_empty())?;
    let mut comment = Vec::new();
    let mut last = first;

    for (index, line) in lines.iter().enumerate().skip(first) {
        match header.line_content(line.trim_start()) {
            Some(content) => {
                comment.push((index, content.to_string()));
                last = index;
            }
            None => break,
        }
    }

    if comment.is_empty() {
        return None;
    }

    // A run directly followed by code documents that code instead
    match lines.get(last + 1) {
        Some(next) if !next.trim().is_empty() => None,
        _ => Some(RawBlock::new(
            BlockKind::Header,
            comment,
            LineRange::new(first, last),
        )),
    }
}

/// Read a start/end delimited block opened on `open_at`. Returns the content
/// and the closing line, or `None` when the block is never closed.
fn read_delimited(
    lines: &[&str],
    open_at: usize,
    delims: &Delimiters,
) -> Option<(Vec<(usize, String)>, usize)> {
    let mut comment = Vec::new();
    let opening = delims.open(lines[open_at].trim()).unwrap_or_default();

    // Single line block: `/** @name Button **/`
    if let Some(inner) = delims.close(opening) {
        if !opening.trim().is_empty() {
            comment.push((open_at, inner.to_string()));
            return Some((comment, open_at));
        }
    }
    if !opening.trim().is_empty() {
        comment.push((open_at, opening.to_string()));
    }

    for (index, line) in lines.iter().enumerate().skip(open_at + 1) {
        if let Some(before) = delims.close(line.trim()) {
            if !before.is_empty() {
                comment.push((index, delims.inner_content(before).to_string()));
            }
            return Some((comment, index));
        }
        comment.push((index, delims.inner_content(line).to_string()));
    }

    None
}

/// Tracks the code collected for the block currently open
struct CodeCollector {
    block: RawBlock,
    pending_blanks: usize,
    blank_run: usize,
}

impl CodeCollector {
    fn new(block: RawBlock) -> Self {
        Self {
            block,
            pending_blanks: 0,
            blank_run: 0,
        }
    }

    /// Returns false once `blank_limit` consecutive blank lines were seen
    fn push(&mut self, index: usize, line: &str, blank_limit: usize) -> bool {
        if line.trim().is_empty() {
            self.blank_run += 1;
            if self.block.code_range.is_some() {
                self.pending_blanks += 1;
            }
            return blank_limit == 0 || self.blank_run < blank_limit;
        }

        self.blank_run = 0;
        let code = &mut self.block.code;
        code.extend(std::iter::repeat_n(String::new(), self.pending_blanks));
        self.pending_blanks = 0;
        code.push(line.to_string());

        self.block.code_range = Some(match self.block.code_range {
            Some(range) => LineRange::new(range.start, index),
            None => LineRange::line(index),
        });
        true
    }

    fn finish(self) -> RawBlock {
        self.block
    }
}

/// Extract the body blocks of a file.
///
/// - Consecutive documentation lines form one block.
/// - Plain comment lines (`//`) inside a run are skipped and don't end it.
/// - The block ends at a blank or code line; the code lines after it belong
///   to the block until the next block starts or `blank_limit` consecutive
///   blank lines are seen (`0` disables the limit).
/// - Lines in `skip` (the header) are never part of a body block.
pub fn extract_body(
    lines: &[&str],
    style: &CommentStyle,
    skip: Option<LineRange>,
    blank_limit: usize,
) -> Vec<RawBlock> {
    let body = &style.body;
    let mut blocks = Vec::new();
    let mut current: Option<CodeCollector> = None;
    let mut index = 0;

    while index < lines.len() {
        if let Some(range) = skip.filter(|r| r.contains(index)) {
            blocks.extend(current.take().map(CodeCollector::finish));
            index = range.end + 1;
            continue;
        }

        let line = lines[index];
        let trimmed = line.trim();

        if body.is_start_end() && body.open(trimmed).is_some() {
            blocks.extend(current.take().map(CodeCollector::finish));
            match read_delimited(lines, index, body) {
                Some((comment, close_at)) => {
                    let range = LineRange::new(index, close_at);
                    current = Some(CodeCollector::new(RawBlock::new(BlockKind::Body, comment, range)));
                    index = close_at + 1;
                }
                None => {
                    tracing::debug!("body comment opened on line {} is never closed", index + 1);
                    let comment = lines
                        .iter()
                        .enumerate()
                        .skip(index + 1)
                        .map(|(i, l)| (i, body.inner_content(l).to_string()))
                        .collect();
                    let range = LineRange::new(index, lines.len() - 1);
                    blocks.push(RawBlock::new(BlockKind::Body, comment, range));
                    index = lines.len();
                }
            }
            continue;
        }

        if !body.is_start_end() && body.line_content(trimmed).is_some() {
            blocks.extend(current.take().map(CodeCollector::finish));
            let (block, next) = read_line_run(lines, index, style, skip);
            current = Some(CodeCollector::new(block));
            index = next;
            continue;
        }

        if let Some(collector) = current.as_mut() {
            if !collector.push(index, line, blank_limit) {
                blocks.extend(current.take().map(CodeCollector::finish));
            }
        }
        index += 1;
    }

    blocks.extend(current.map(CodeCollector::finish));
    blocks
}

/// Read a run of documentation lines starting at `start`. Returns the block
/// and the index of the first line after its last documentation line.
fn read_line_run(
    lines: &[&str],
    start: usize,
    style: &CommentStyle,
    skip: Option<LineRange>,
) -> (RawBlock, usize) {
    let mut comment = Vec::new();
    let mut last = start;

    for (index, line) in lines.iter().enumerate().skip(start) {
        if skip.is_some_and(|r| r.contains(index)) {
            break;
        }
        let trimmed = line.trim();
        if let Some(content) = style.body.line_content(trimmed) {
            comment.push((index, content.to_string()));
            last = index;
        } else if !style.is_plain(trimmed) {
            break;
        }
    }

    let block = RawBlock::new(BlockKind::Body, comment, LineRange::new(start, last));
    (block, last + 1)
}
