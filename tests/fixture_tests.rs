//! Parses the Java fixtures end to end

mod common;

use common::{default_parser, fixture, fixture_source};
use docblocks::{AnnotationValue, sort};
use std::path::Path;

#[test]
fn test_java_fixture_blocks() {
    let file = default_parser()
        .parse_file(&fixture("java/test.java"))
        .expect("fixture parses");

    assert_eq!(file.body.len(), 3);
    assert!(file.diagnostics.is_empty(), "{:?}", file.diagnostics);

    let header = file.header.as_ref().expect("fixture has a header");
    assert_eq!(header.author(), Some("Tyler Benton"));
    assert_eq!(header.page(), Some("tests/java-file"));

    assert_eq!(file.body[0].name(), Some("Body Block 1"));
    assert_eq!(file.body[1].name(), Some("Body Block 2"));
    assert_eq!(file.body[2].name(), Some("Body Block 3"));
}

#[test]
fn test_hello_world_fixture_names() {
    let file = default_parser()
        .parse_file(&fixture("java/hello-world.java"))
        .expect("fixture parses");

    let names: Vec<_> = file.body.iter().filter_map(|b| b.name()).collect();
    assert_eq!(names, vec!["HelloWorldApp", "saySomething", "saySomethingElse"]);
    assert_eq!(
        file.header.as_ref().and_then(|h| h.author()),
        Some("Tyler Benton")
    );
}

#[test]
fn test_plain_comment_belongs_to_no_block() {
    let file = default_parser()
        .parse_file(&fixture("java/test.java"))
        .expect("fixture parses");

    for block in &file.body {
        let description = block.description().unwrap_or_default();
        assert!(!description.contains("normal single-line"), "{description}");
    }
    assert_eq!(
        file.body[1].description(),
        Some("This is a normal multi-line comment.")
    );
}

#[test]
fn test_blocks_carry_their_code() {
    let file = default_parser()
        .parse_source(Path::new("test.java"), &fixture_source("java/test.java"));

    let Some(AnnotationValue::BlockInfo(info)) = file.body[2].get("blockinfo") else {
        panic!("expected blockinfo");
    };
    let code = info.code.expect("block is followed by code");
    assert_eq!(code.start, 28);
    assert_eq!(code.end, 32);
    assert_eq!(info.comment.start, 25);
}

#[test]
fn test_fixture_sorts_onto_its_page() {
    let parser = default_parser();
    let files = vec![
        parser.parse_file(&fixture("java/test.java")).expect("fixture parses"),
    ];

    let (sorted, diagnostics) = sort(&files, "general");
    assert!(diagnostics.is_empty());

    let page = sorted.pages["tests"]
        .subpages
        .get("java-file")
        .expect("page from the header");
    assert_eq!(page.body.len(), 3);
    assert_eq!(page.header.author(), Some("Tyler Benton"));

    let nav = &sorted.nav[0].subpages[0];
    assert_eq!(nav.href, "/tests/java-file");
    assert_eq!(nav.body[0].href, "/tests/java-file#body-block-1");
}
