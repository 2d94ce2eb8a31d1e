//! Annotations: the `@name value` pieces a comment block is made of
//!
//! Each annotation is a type implementing [`Annotation`]. The parser splits a
//! block into annotations, calls [`Annotation::parse`] for each one, fills in
//! missing values with [`Annotation::autofill`], and finally lets every
//! annotation adjust its value against the whole block in
//! [`Annotation::resolve`].

mod builtin;
mod custom;
mod markup;
pub mod patterns;
mod registry;
mod value;

pub use builtin::builtin_annotations;
pub use custom::CustomAnnotation;
pub use markup::{MarkupAnnotation, StatesAnnotation};
pub use registry::{AnnotationRegistry, AnnotationSet, RegistryError};
pub use value::{
    AnnotationValue, BlockInfo, DocBlock, FileSpan, Markup, Note, Param, RawCode, Requirement,
    ResolvedState, Returns, StateEntry, StateGroup, StateMarkup, Throw, Todo, TypeInfo,
    VersionInfo,
};

use crate::types::{BlockKind, Diagnostic, FileInfo, LineRange};
use std::collections::BTreeMap;

/// Behavior of a single annotation
pub trait Annotation: Send + Sync {
    /// Canonical name, written after the prefix (`name` for `@name`)
    fn name(&self) -> &str;

    /// Other names that mean the same annotation
    fn aliases(&self) -> Vec<&str> {
        Vec::new()
    }

    /// Turn the annotation text into a value. `None` drops the annotation.
    fn parse(&self, ctx: &mut AnnotationContext<'_>) -> Option<AnnotationValue> {
        Some(AnnotationValue::Text(ctx.line.clone()))
    }

    /// Value used when a block doesn't contain this annotation
    fn autofill(&self, _block: &BlockContext<'_>) -> Option<AnnotationValue> {
        None
    }

    /// Adjust the parsed value once the whole block is known. `None` keeps
    /// the value as it is.
    fn resolve(
        &self,
        _value: &AnnotationValue,
        _ctx: &mut ResolveContext<'_>,
    ) -> Option<AnnotationValue> {
        None
    }
}

/// The comment block an annotation belongs to
#[derive(Debug, Clone, Copy)]
pub struct BlockContext<'a> {
    pub kind: BlockKind,
    /// Lines spanned by the comment
    pub comment: LineRange,
    /// Normalized code following the comment
    pub code: &'a str,
    pub code_range: Option<LineRange>,
    pub file: &'a FileInfo,
    /// Annotation prefix of the file's comment style
    pub prefix: &'a str,
    /// Render descriptions to HTML
    pub markdown: bool,
}

impl BlockContext<'_> {
    /// Join the non-empty parts with newlines, rendering them to HTML when
    /// markdown output is enabled.
    pub fn markdown(&self, parts: &[Option<&str>]) -> String {
        let text = parts
            .iter()
            .flatten()
            .filter(|part| !part.is_empty())
            .copied()
            .collect::<Vec<_>>()
            .join("\n");

        if self.markdown && !text.is_empty() {
            comrak::markdown_to_html(&text, &comrak::Options::default())
        } else {
            text
        }
    }

    pub fn block_info(&self) -> BlockInfo {
        BlockInfo {
            kind: self.kind,
            comment: self.comment,
            code: self.code_range,
            file: FileSpan {
                path: self.file.path.clone(),
                start: self.file.start,
                end: self.file.end,
            },
        }
    }
}

/// Everything an annotation sees while parsing
pub struct AnnotationContext<'a> {
    /// Canonical name of the annotation
    pub name: &'a str,
    /// Name as written in the comment, possibly an alias
    pub written: &'a str,
    /// Normalized text after the name on the first line
    pub line: String,
    /// Normalized lines after the first one
    pub contents: String,
    /// File lines the annotation spans
    pub range: LineRange,
    pub block: &'a BlockContext<'a>,
    diagnostics: &'a mut Vec<Diagnostic>,
}

impl<'a> AnnotationContext<'a> {
    pub fn new(
        name: &'a str,
        written: &'a str,
        line: String,
        contents: String,
        range: LineRange,
        block: &'a BlockContext<'a>,
        diagnostics: &'a mut Vec<Diagnostic>,
    ) -> Self {
        Self {
            name,
            written,
            line,
            contents,
            range,
            block,
            diagnostics,
        }
    }

    /// Record a problem with this annotation
    pub fn warn(&mut self, message: impl Into<String>) {
        let message = message.into();
        tracing::warn!(
            "[annotation] {}:{}: @{}: {}",
            self.block.file.path,
            self.range.display_start(),
            self.written,
            message
        );
        self.diagnostics.push(Diagnostic::new(
            self.block.file.path.clone(),
            Some(self.range.display_start()),
            format!("@{}: {message}", self.written),
        ));
    }

    /// `description` followed by the annotation contents, see
    /// [`BlockContext::markdown`]
    pub fn markdown(&self, description: Option<&str>) -> String {
        self.block
            .markdown(&[description, Some(self.contents.as_str())])
    }
}

/// Everything an annotation sees while resolving
pub struct ResolveContext<'a> {
    pub name: &'a str,
    /// Values of every annotation in the block
    pub parsed: &'a BTreeMap<String, AnnotationValue>,
    pub block: &'a BlockContext<'a>,
    diagnostics: &'a mut Vec<Diagnostic>,
}

impl<'a> ResolveContext<'a> {
    pub fn new(
        name: &'a str,
        parsed: &'a BTreeMap<String, AnnotationValue>,
        block: &'a BlockContext<'a>,
        diagnostics: &'a mut Vec<Diagnostic>,
    ) -> Self {
        Self {
            name,
            parsed,
            block,
            diagnostics,
        }
    }

    pub fn warn(&mut self, line: usize, message: impl Into<String>) {
        let message = message.into();
        tracing::warn!(
            "[annotation] {}:{}: @{}: {}",
            self.block.file.path,
            line + 1,
            self.name,
            message
        );
        self.diagnostics.push(Diagnostic::new(
            self.block.file.path.clone(),
            Some(line + 1),
            format!("@{}: {message}", self.name),
        ));
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;

    #[test]
    fn test_markdown_joins_parts() {
        let file = file();
        let block = block(&file, "");
        assert_eq!(block.markdown(&[Some("first"), None, Some(""), Some("second")]), "first\nsecond");
    }

    #[test]
    fn test_markdown_renders_html_when_enabled() {
        let file = file();
        let mut block = block(&file, "");
        block.markdown = true;
        let html = block.markdown(&[Some("Print `Hello World`")]);
        assert!(html.contains("<code>Hello World</code>"));
    }

    #[test]
    fn test_warn_records_diagnostic() {
        let file = file();
        let block = block(&file, "");
        let mut diagnostics = Vec::new();
        let mut ctx = AnnotationContext::new(
            "returns",
            "return",
            String::new(),
            String::new(),
            LineRange::line(3),
            &block,
            &mut diagnostics,
        );
        ctx.warn("missing type");
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].line, Some(4));
        assert_eq!(diagnostics[0].message, "@return: missing type");
    }
}
