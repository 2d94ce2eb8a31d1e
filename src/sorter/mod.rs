//! Sorting parsed files into pages and navigation

mod nav;
mod pages;

pub use nav::{NavItem, NavLink, build_nav, param_case, title_case};
pub use pages::{Page, Pages, build_pages};

use crate::parsing::DocFile;
use crate::types::Diagnostic;
use serde::Serialize;

/// Pages and the navigation that links them
#[derive(Debug, Clone, Default, Serialize)]
pub struct SortedDocs {
    pub nav: Vec<NavItem>,
    pub pages: Pages,
}

/// Sort `files` onto pages and build the navigation
pub fn sort(files: &[DocFile], page_fallback: &str) -> (SortedDocs, Vec<Diagnostic>) {
    let (pages, diagnostics) = build_pages(files, page_fallback);
    let nav = build_nav(&pages);
    (SortedDocs { nav, pages }, diagnostics)
}
