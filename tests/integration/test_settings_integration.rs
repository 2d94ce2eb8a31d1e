//! Settings files driving comment styles and project annotations

use crate::common::TestProject;
use docblocks::{AnnotationValue, DocError, DocParser, Settings};
use std::path::Path;
use std::sync::Arc;

const SETTINGS: &str = r#"
page_fallback = "misc"
blank_lines = 2

[comments."scss, less"]
extend = "css"

[annotations.group-id]
kind = "list"
aliases = ["gid"]
filetypes = ["js"]

[annotations.experimental]
kind = "flag"
"#;

fn load(project: &TestProject, content: &str) -> Settings {
    let path = project.write_settings(content);
    Settings::load_from(path).expect("settings load")
}

#[test]
fn test_settings_file_overrides_defaults() {
    let project = TestProject::new();
    let settings = load(&project, SETTINGS);

    assert_eq!(settings.page_fallback, "misc");
    assert_eq!(settings.blank_lines, 2);
    assert!(settings.comments.contains_key("css"));
    assert!(settings.comments.contains_key("scss, less"));
    assert_eq!(settings.files, Settings::default().files);
}

#[test]
fn test_extended_style_parses_css_blocks() {
    let project = TestProject::new();
    let parser = DocParser::new(Arc::new(load(&project, SETTINGS))).unwrap();

    let source = "\
/**
 * @name Card
 * @experimental
 **/
.card {}
";
    let file = parser.parse_source(Path::new("card.less"), source);
    assert_eq!(file.body.len(), 1);
    assert_eq!(file.body[0].name(), Some("Card"));
    assert_eq!(file.body[0].get("experimental"), Some(&AnnotationValue::Flag(true)));
}

#[test]
fn test_custom_annotation_scoped_to_filetype() {
    let project = TestProject::new();
    let parser = DocParser::new(Arc::new(load(&project, SETTINGS))).unwrap();

    let source = "/// @name util\n/// @gid core, helpers\nfunction util() {}\n";
    let file = parser.parse_source(Path::new("util.js"), source);
    assert_eq!(
        file.body[0].get("group-id"),
        Some(&AnnotationValue::List(vec!["core".into(), "helpers".into()]))
    );

    let file = parser.parse_source(Path::new("util.rb"), "## @name util\n## @gid core\ndef util; end\n");
    assert!(file.body[0].get("group-id").is_none());
}

#[test]
fn test_alias_collision_is_rejected() {
    let project = TestProject::new();
    let settings = load(
        &project,
        "[annotations.heading-two]\naliases = [\"title\"]\n",
    );

    let err = DocParser::new(Arc::new(settings)).err().expect("alias collides");
    assert!(matches!(err, DocError::Registry(_)));
    assert_eq!(err.status_code(), "ANNOTATION_REGISTRY_ERROR");
}

#[test]
fn test_extend_of_unknown_style_is_rejected() {
    let project = TestProject::new();
    let settings = load(&project, "[comments.vue]\nextend = \"svelte\"\n");

    let err = DocParser::new(Arc::new(settings)).err().expect("unknown extend");
    assert!(matches!(err, DocError::UnknownStyleExtend { .. }));
}
