//! Navigation built from the page tree

use super::pages::{Page, Pages};
use crate::annotation::DocBlock;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavItem {
    pub title: String,
    pub href: String,
    /// Links to the named blocks on this page
    pub body: Vec<NavLink>,
    pub subpages: Vec<NavItem>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavLink {
    pub title: String,
    pub href: String,
}

/// Navigation for every top level page, in key order. Top level
/// titles come from the key; subpages use their header `@name` when set.
pub fn build_nav(pages: &Pages) -> Vec<NavItem> {
    pages
        .iter()
        .map(|(key, page)| nav_item(key, page, "", title_case(key)))
        .collect()
}

fn nav_item(key: &str, page: &Page, parent_href: &str, title: String) -> NavItem {
    let href = format!("{parent_href}/{key}");
    NavItem {
        title,
        body: body_links(&href, &page.body),
        subpages: page
            .subpages
            .iter()
            .map(|(key, subpage)| {
                let title = subpage
                    .header
                    .name()
                    .map_or_else(|| title_case(key), str::to_string);
                nav_item(key, subpage, &href, title)
            })
            .collect(),
        href,
    }
}

fn body_links(href: &str, body: &[DocBlock]) -> Vec<NavLink> {
    body.iter()
        .filter_map(DocBlock::name)
        .map(|name| NavLink {
            title: name.to_string(),
            href: format!("{href}#{}", param_case(name)),
        })
        .collect()
}

/// Split on separators and lower-to-upper case changes, lowercased
fn words(text: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut previous_lower = false;

    for c in text.chars() {
        if !c.is_alphanumeric() {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            previous_lower = false;
            continue;
        }
        if c.is_uppercase() && previous_lower && !current.is_empty() {
            words.push(std::mem::take(&mut current));
        }
        previous_lower = c.is_lowercase() || c.is_numeric();
        current.extend(c.to_lowercase());
    }
    if !current.is_empty() {
        words.push(current);
    }
    words
}

/// `java-file` -> `Java File`
pub fn title_case(text: &str) -> String {
    words(text)
        .iter()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

/// `Body Block 1` -> `body-block-1`
pub fn param_case(text: &str) -> String {
    words(text).join("-")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotation::AnnotationValue;

    fn named(name: &str) -> DocBlock {
        let mut block = DocBlock::default();
        block
            .annotations
            .insert("name".into(), AnnotationValue::Text(name.into()));
        block
    }

    #[test]
    fn test_case_helpers() {
        assert_eq!(title_case("java-file"), "Java File");
        assert_eq!(title_case("buttonGroups"), "Button Groups");
        assert_eq!(title_case("under_score"), "Under Score");
        assert_eq!(param_case("Body Block 1"), "body-block-1");
        assert_eq!(param_case("HelloWorldApp"), "hello-world-app");
    }

    #[test]
    fn test_nav_tree() {
        let mut java = Page::default();
        java.body.push(named("Body Block 1"));
        java.body.push(DocBlock::default());

        let mut tests = Page::default();
        tests.subpages.insert("java-file".into(), java);
        tests.subpages.insert(
            "buttons".into(),
            Page {
                header: named("Button Styles"),
                ..Page::default()
            },
        );

        let mut components = Page {
            header: named("UI Components"),
            ..Page::default()
        };
        components.body.push(named("Button"));

        let mut pages = Pages::new();
        pages.insert("tests".into(), tests);
        pages.insert("components".into(), components);

        let nav = build_nav(&pages);
        assert_eq!(nav.len(), 2);

        assert_eq!(nav[0].title, "Components");
        assert_eq!(nav[0].href, "/components");
        assert_eq!(
            nav[0].body,
            vec![NavLink {
                title: "Button".into(),
                href: "/components#button".into()
            }]
        );

        assert_eq!(nav[1].subpages[0].title, "Button Styles");
        let java = &nav[1].subpages[1];
        assert_eq!(nav[1].title, "Tests");
        assert_eq!(java.title, "Java File");
        assert_eq!(java.href, "/tests/java-file");
        assert_eq!(java.body.len(), 1);
        assert_eq!(java.body[0].href, "/tests/java-file#body-block-1");
    }
}
