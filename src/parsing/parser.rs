//! Turns source files into documentation blocks
//!
//! A file goes through three steps:
//! 1. The comment style for its extension splits it into raw blocks
//!    ([`extract_header`], [`extract_body`]).
//! 2. Each block is split into annotations, which are parsed and merged.
//! 3. Missing annotations are autofilled and every annotation is resolved
//!    against the finished block, in name order.

use super::blocks::{BlockError, RawBlock, extract_body, extract_header};
use super::normalize::normalize;
use super::style::{CommentStyle, StyleRegistry};
use crate::annotation::{
    AnnotationContext, AnnotationRegistry, AnnotationSet, AnnotationValue, BlockContext, DocBlock,
    ResolveContext,
};
use crate::config::Settings;
use crate::error::{DocError, DocResult};
use crate::types::{Diagnostic, FileInfo, LineRange};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

/// Documentation parsed from one file
#[derive(Debug, Clone, Serialize)]
pub struct DocFile {
    pub info: FileInfo,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub header: Option<DocBlock>,
    pub body: Vec<DocBlock>,
    /// Problems found while parsing, reported separately from the data
    #[serde(skip)]
    pub diagnostics: Vec<Diagnostic>,
}

/// Raw blocks of a file before annotations are parsed
#[derive(Debug, Clone, Serialize)]
pub struct ExtractedBlocks {
    pub info: FileInfo,
    pub header: Option<RawBlock>,
    pub body: Vec<RawBlock>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Read a file as UTF-8 text
pub fn read_source(path: &Path) -> DocResult<String> {
    let bytes = std::fs::read(path).map_err(|source| DocError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    String::from_utf8(bytes).map_err(|_| DocError::InvalidUtf8 {
        path: path.to_path_buf(),
    })
}

/// One annotation found in a comment block, before it is parsed
struct Piece<'a> {
    /// Name as written
    written: &'a str,
    /// Canonical name
    name: &'a str,
    /// Text after the name on the first line
    line: &'a str,
    /// Following lines, with their file line index
    contents: Vec<(usize, String)>,
    start: usize,
}

pub struct DocParser {
    settings: Arc<Settings>,
    styles: StyleRegistry,
    annotations: AnnotationRegistry,
}

impl DocParser {
    pub fn new(settings: Arc<Settings>) -> DocResult<Self> {
        let styles = StyleRegistry::from_config(&settings.comments)?;
        let annotations = AnnotationRegistry::from_settings(&settings)?;
        Ok(Self {
            settings,
            styles,
            annotations,
        })
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn annotations(&self) -> &AnnotationRegistry {
        &self.annotations
    }

    pub fn styles(&self) -> &StyleRegistry {
        &self.styles
    }

    /// Read and parse a file
    pub fn parse_file(&self, path: &Path) -> DocResult<DocFile> {
        let source = read_source(path)?;
        Ok(self.parse_source(path, &source))
    }

    /// Parse `source` as the contents of `path`. The extension of `path`
    /// picks the comment style and annotations.
    pub fn parse_source(&self, path: &Path, source: &str) -> DocFile {
        let extracted = self.extract_blocks(path, source);
        let set = self.annotations.list(&extracted.info.file_type);
        let style = self.styles.for_extension(&extracted.info.file_type);
        let mut diagnostics = extracted.diagnostics;
        let info = extracted.info;

        let header = extracted
            .header
            .as_ref()
            .and_then(|raw| self.parse_block(raw, &set, style, &info, &mut diagnostics));

        let body: Vec<DocBlock> = extracted
            .body
            .iter()
            .filter_map(|raw| self.parse_block(raw, &set, style, &info, &mut diagnostics))
            .collect();

        tracing::debug!(
            "[parser] {}: header={} body blocks={}",
            info.path,
            header.is_some(),
            body.len()
        );

        DocFile {
            info,
            header,
            body,
            diagnostics,
        }
    }

    /// Split `source` into raw header and body blocks
    pub fn extract_blocks(&self, path: &Path, source: &str) -> ExtractedBlocks {
        let lines: Vec<&str> = source.lines().collect();
        let info = FileInfo::new(path, lines.len());
        let style = self.styles.for_extension(&info.file_type);
        let mut diagnostics = Vec::new();

        let header = match extract_header(&lines, style) {
            Ok(header) => header,
            Err(e) => {
                tracing::warn!("[parser] {}: {e}", info.path);
                let BlockError::UnterminatedHeader { line } = e;
                diagnostics.push(Diagnostic::new(info.path.clone(), Some(line + 1), e.to_string()));
                None
            }
        };

        let skip = header.as_ref().map(|h| h.comment_range);
        let body = extract_body(&lines, style, skip, self.settings.blank_lines);

        ExtractedBlocks {
            info,
            header,
            body,
            diagnostics,
        }
    }

    /// Parse one raw block. Blocks without any annotation are dropped.
    fn parse_block(
        &self,
        raw: &RawBlock,
        set: &AnnotationSet,
        style: &CommentStyle,
        info: &FileInfo,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> Option<DocBlock> {
        let code = normalize(&raw.code);
        let block = BlockContext {
            kind: raw.kind,
            comment: raw.comment_range,
            code: &code,
            code_range: raw.code_range,
            file: info,
            prefix: &style.prefix,
            markdown: self.settings.markdown,
        };

        let mut annotations: BTreeMap<String, AnnotationValue> = BTreeMap::new();
        for piece in split_annotations(&raw.comment, &style.prefix, set) {
            let Some(annotation) = set.get(piece.name) else {
                continue;
            };
            let end = piece.contents.last().map_or(piece.start, |(i, _)| *i);
            let contents: Vec<&str> = piece.contents.iter().map(|(_, l)| l.as_str()).collect();

            let mut ctx = AnnotationContext::new(
                piece.name,
                piece.written,
                piece.line.trim().to_string(),
                normalize(&contents),
                LineRange::new(piece.start, end),
                &block,
                diagnostics,
            );
            if let Some(value) = annotation.parse(&mut ctx) {
                let merged = match annotations.remove(piece.name) {
                    Some(previous) => previous.merge(value),
                    None => value,
                };
                annotations.insert(piece.name.to_string(), merged);
            }
        }

        if annotations.is_empty() {
            return None;
        }

        for (name, annotation) in set.iter() {
            if annotations.contains_key(name) {
                continue;
            }
            if let Some(value) = annotation.autofill(&block) {
                annotations.insert(name.to_string(), value);
            }
        }

        let names: Vec<String> = annotations.keys().cloned().collect();
        for name in names {
            let Some(annotation) = set.get(&name) else {
                continue;
            };
            let resolved = match annotations.get(&name) {
                Some(current) => {
                    let mut ctx = ResolveContext::new(&name, &annotations, &block, diagnostics);
                    annotation.resolve(current, &mut ctx)
                }
                None => None,
            };
            if let Some(value) = resolved {
                annotations.insert(name, value);
            }
        }

        Some(DocBlock {
            annotations,
            range: Some(raw.comment_range),
        })
    }
}

/// Split comment lines into annotations.
///
/// A line starts an annotation when, after indentation, it is the prefix
/// followed by a registered name or alias. `\@` escapes the prefix. Lines
/// before the first annotation are ignored, and unknown `@word` lines are
/// content of the annotation before them.
fn split_annotations<'a>(
    comment: &'a [(usize, String)],
    prefix: &str,
    set: &'a AnnotationSet,
) -> Vec<Piece<'a>> {
    let escaped_prefix = format!("\\{prefix}");
    let mut pieces: Vec<Piece<'a>> = Vec::new();

    for (index, line) in comment {
        let trimmed = line.trim_start();

        let started = trimmed.strip_prefix(prefix).and_then(|rest| {
            let end = rest.find(char::is_whitespace).unwrap_or(rest.len());
            let written = &rest[..end];
            set.canonical(written).map(|name| (written, name, &rest[end..]))
        });

        match started {
            Some((written, name, rest)) => pieces.push(Piece {
                written,
                name,
                line: rest,
                contents: Vec::new(),
                start: *index,
            }),
            None => {
                if let Some(piece) = pieces.last_mut() {
                    let content = if trimmed.starts_with(&escaped_prefix) {
                        line.replacen(&escaped_prefix, prefix, 1)
                    } else {
                        line.clone()
                    };
                    piece.contents.push((*index, content));
                }
            }
        }
    }

    pieces
}
