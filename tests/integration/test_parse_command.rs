//! Runs the `docblocks` binary against throwaway workspaces

use crate::common::TestProject;
use serde_json::Value;
use std::process::{Command, Output};

const BUTTON: &str = "\
////
/// @name Buttons
/// @page components/buttons
////

/// @name Primary
/// @description The main call to action
/// @markup
/// <button class=\"primary\">Go</button>
.primary { color: red; }
";

const ORPHAN: &str = "\
/// @name orphan
function orphan() {}
";

fn run(project: &TestProject, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_docblocks"))
        .args(args)
        .current_dir(project.path())
        .env_remove("DOCBLOCKS_CONFIG")
        .output()
        .expect("Failed to run docblocks")
}

fn stdout_json(output: &Output) -> Value {
    serde_json::from_slice(&output.stdout).unwrap_or_else(|e| {
        panic!(
            "stdout is not JSON ({e}): {}\nstderr: {}",
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr)
        )
    })
}

#[test]
fn test_parse_to_stdout() {
    let project = TestProject::new();
    project.add_file("src/button.scss", BUTTON);

    let output = run(&project, &["parse", "--out", "-"]);
    assert!(output.status.success());

    let json = stdout_json(&output);
    let page = &json["pages"]["components"]["subpages"]["buttons"];
    assert_eq!(page["header"]["name"], "Buttons");
    assert_eq!(page["body"][0]["name"], "Primary");
    assert_eq!(page["body"][0]["markup"][0]["id"], "0");
    assert_eq!(json["nav"][0]["subpages"][0]["href"], "/components/buttons");
}

#[test]
fn test_parse_writes_output_file() {
    let project = TestProject::new();
    project.add_file("src/button.scss", BUTTON);

    let output = run(&project, &["parse"]);
    assert!(output.status.success());

    let written = std::fs::read_to_string(project.path().join("docs.json"))
        .expect("docs.json was written");
    let json: Value = serde_json::from_str(&written).unwrap();
    assert!(json["pages"]["components"].is_object());
}

#[test]
fn test_parse_raw_groups_by_file_type() {
    let project = TestProject::new();
    project.add_file("src/button.scss", BUTTON);
    project.add_file("src/orphan.js", ORPHAN);

    let output = run(&project, &["parse", "--raw", "--out", "-"]);
    assert!(output.status.success());

    let json = stdout_json(&output);
    assert_eq!(json["scss"][0]["info"]["path"], "src/button.scss");
    assert_eq!(json["js"][0]["body"][0]["name"], "orphan");
}

#[test]
fn test_json_envelope_reports_warnings() {
    let project = TestProject::new();
    project.add_file("src/orphan.js", ORPHAN);

    let output = run(&project, &["parse", "--json"]);
    assert!(output.status.success());

    let json = stdout_json(&output);
    assert_eq!(json["status"], "success");
    assert_eq!(json["warnings"][0]["path"], "src/orphan.js");
    assert_eq!(json["warnings"][0]["message"], "orphan doesn't have a @page");
    assert!(json["meta"].is_null());

    let strict = run(&project, &["parse", "--json", "--strict"]);
    assert_eq!(strict.status.code(), Some(4));
}

#[test]
fn test_no_files_exit_code() {
    let project = TestProject::new();
    project.add_file("lib/not-matched.js", ORPHAN);

    let output = run(&project, &["parse"]);
    assert_eq!(output.status.code(), Some(3));
    assert!(String::from_utf8_lossy(&output.stderr).contains("No files matched"));
}

#[test]
fn test_blocks_command_dumps_raw_blocks() {
    let project = TestProject::new();
    let file = project.add_file("src/button.scss", BUTTON);

    let output = run(&project, &["blocks", file.to_str().unwrap()]);
    assert!(output.status.success());

    let json = stdout_json(&output);
    assert_eq!(json["header"]["kind"], "header");
    assert_eq!(json["body"][0]["comment"][0][1].as_str().map(str::trim), Some("@name Primary"));
    assert_eq!(json["body"][0]["code"][0], ".primary { color: red; }");
}

#[test]
fn test_annotations_command_lists_builtins() {
    let project = TestProject::new();

    let output = run(&project, &["annotations", "--json"]);
    assert!(output.status.success());

    let json = stdout_json(&output);
    let names: Vec<&str> = json["data"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|entry| entry["name"].as_str())
        .collect();
    assert!(names.contains(&"description"));
    assert!(names.contains(&"states"));
    assert_eq!(names.len(), 24);
}

#[test]
fn test_init_creates_settings() {
    let project = TestProject::new();

    let output = run(&project, &["init", "--force"]);
    assert!(output.status.success());
    assert!(project.path().join(".docblocks/settings.toml").exists());

    let again = run(&project, &["init"]);
    assert!(!again.status.success());
}

#[test]
fn test_unknown_settings_key_is_reported() {
    let project = TestProject::new();
    project.write_settings("bogus_option = 1\n");
    project.add_file("src/button.scss", BUTTON);

    let output = run(&project, &["parse", "--out", "-"]);
    assert!(output.status.success());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("'bogus_option'"), "stderr: {stderr}");
    assert!(stderr.contains("not a valid option"), "stderr: {stderr}");
}
