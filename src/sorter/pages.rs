//! Page tree built from `@page` annotations

use crate::annotation::DocBlock;
use crate::parsing::DocFile;
use crate::types::Diagnostic;
use serde::Serialize;
use std::collections::BTreeMap;

/// One page and the pages nested below it
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Page {
    /// Every header placed on this page, merged. Later files win.
    pub header: DocBlock,
    pub body: Vec<DocBlock>,
    pub subpages: BTreeMap<String, Page>,
}

impl Page {
    /// Page at a `/` separated path
    pub fn find(&self, path: &str) -> Option<&Page> {
        path.split('/')
            .filter(|p| !p.is_empty())
            .try_fold(self, |page, key| page.subpages.get(key))
    }
}

/// Top level pages by key
pub type Pages = BTreeMap<String, Page>;

/// Sort the blocks of every file onto pages.
///
/// A header is placed on each of its pages, or on `page_fallback` when it
/// has none. A body block goes on every page of its file header and every
/// page of its own.
pub fn build_pages(files: &[DocFile], page_fallback: &str) -> (Pages, Vec<Diagnostic>) {
    let mut root = Page::default();
    let mut diagnostics = Vec::new();
    let mut warn = |path: &str, line: Option<usize>, message: String| {
        tracing::warn!("[sorter] {path}: {message}");
        diagnostics.push(Diagnostic::new(path, line, message));
    };

    for file in files {
        let path = file.info.path.as_str();
        let mut header_pages: Vec<String> = Vec::new();

        if let Some(header) = &file.header {
            header_pages = header.pages().to_vec();
            if header_pages.is_empty() {
                if page_fallback.is_empty() {
                    warn(
                        path,
                        header.start_line(),
                        format!(
                            "header comment{} doesn't have a @page",
                            header.name().map(|n| format!(" ({n})")).unwrap_or_default()
                        ),
                    );
                } else {
                    header_pages.push(page_fallback.to_string());
                }
            }

            if header.name().is_none() {
                warn(path, header.start_line(), "header comment doesn't have a @name".to_string());
            }

            let header = without_page(header);
            for page in &header_pages {
                match page_mut(&mut root, page) {
                    Some(target) => target.header.annotations.extend(header.annotations.clone()),
                    None => warn(path, header.start_line(), format!("`{page}` isn't a valid page")),
                }
            }
        }

        for block in &file.body {
            let block_pages: Vec<&String> = block
                .pages()
                .iter()
                .filter(|page| !header_pages.contains(*page))
                .collect();

            if header_pages.is_empty() && block_pages.is_empty() {
                warn(
                    path,
                    block.start_line(),
                    format!("{} doesn't have a @page", block.name().unwrap_or("a block")),
                );
                continue;
            }

            let stripped = without_page(block);
            for page in header_pages.iter().chain(block_pages) {
                match page_mut(&mut root, page) {
                    Some(target) => target.body.push(stripped.clone()),
                    None => warn(path, block.start_line(), format!("`{page}` isn't a valid page")),
                }
            }
        }
    }

    (root.subpages, diagnostics)
}

fn without_page(block: &DocBlock) -> DocBlock {
    let mut block = block.clone();
    block.annotations.remove("page");
    block
}

/// Page at `path`, creating it and its parents. `None` for an empty path.
fn page_mut<'a>(root: &'a mut Page, path: &str) -> Option<&'a mut Page> {
    let mut keys = path.split('/').filter(|p| !p.is_empty()).peekable();
    keys.peek()?;
    Some(keys.fold(root, |page, key| {
        page.subpages.entry(key.to_string()).or_default()
    }))
}
