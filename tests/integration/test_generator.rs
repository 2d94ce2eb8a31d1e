//! Walking, parallel parsing and sorting over whole workspaces

use crate::common::TestProject;
use docblocks::indexing::{DocGenerator, IGNORE_FILE};
use docblocks::{DocOutput, Settings};
use std::sync::Arc;

fn settings(threads: usize) -> Settings {
    Settings {
        parallel_threads: threads,
        ..Settings::default()
    }
}

fn project() -> TestProject {
    let project = TestProject::new();
    project.add_file(
        "src/buttons/primary.scss",
        "////\n/// @name Buttons\n/// @page components\n////\n\n/// @name Primary\n.primary {}\n",
    );
    project.add_file(
        "src/buttons/ghost.scss",
        "////\n/// @page components\n/// @author Ana\n////\n\n/// @name Ghost\n.ghost {}\n",
    );
    project.add_file(
        "app/util.js",
        "/// @name clamp\n/// @page utils/math\n/// @arg {number} value\nfunction clamp(value) {}\n",
    );
    project.add_file("app/data.json", "{\"ignored\": true}");
    project.add_file("dist/bundle.js", "/// @name bundled\n/// @page utils\nvar x;\n");
    project
}

#[test]
fn test_headers_merge_and_blocks_collect() {
    let project = project();
    let generator = DocGenerator::with_root(Arc::new(settings(2)), project.path()).unwrap();
    let result = generator.generate(&[]).unwrap();

    assert_eq!(result.stats.files_parsed, 3);

    let DocOutput::Sorted(sorted) = result.output else {
        panic!("expected sorted output");
    };
    let components = &sorted.pages["components"];
    let names: Vec<_> = components.body.iter().filter_map(|b| b.name()).collect();
    assert_eq!(names, vec!["Ghost", "Primary"]);
    assert_eq!(components.header.name(), Some("Buttons"));
    assert_eq!(components.header.author(), Some("Ana"));

    let math = sorted.pages["utils"].subpages.get("math").unwrap();
    assert_eq!(math.body[0].name(), Some("clamp"));
    assert_eq!(sorted.nav[1].subpages[0].title, "Math");

    // ghost.scss has a header without @name
    assert_eq!(result.diagnostics.len(), 1);
    assert_eq!(result.diagnostics[0].path, "src/buttons/ghost.scss");
}

#[test]
fn test_thread_count_does_not_change_output() {
    let project = project();

    let single = DocGenerator::with_root(Arc::new(settings(1)), project.path())
        .unwrap()
        .generate(&[])
        .unwrap();
    let many = DocGenerator::with_root(Arc::new(settings(8)), project.path())
        .unwrap()
        .generate(&[])
        .unwrap();

    assert_eq!(
        serde_json::to_string(&single.output).unwrap(),
        serde_json::to_string(&many.output).unwrap()
    );
    assert_eq!(single.diagnostics, many.diagnostics);
}

#[test]
fn test_ignore_file_and_explicit_paths() {
    let project = project();
    project.add_file(&format!("src/{IGNORE_FILE}"), "buttons/ghost.scss\n");

    let generator = DocGenerator::with_root(Arc::new(settings(2)), project.path()).unwrap();
    let files = generator.collect_files(&[]).unwrap();
    let names: Vec<_> = files
        .iter()
        .filter_map(|f| f.file_name().and_then(|n| n.to_str()))
        .collect();
    assert_eq!(names, vec!["util.js", "primary.scss"]);

    let only = project.path().join("src/buttons");
    let result = generator.generate(&[only]).unwrap();
    assert_eq!(result.stats.files_parsed, 1);
}
