#![allow(dead_code)]

use docblocks::{DocParser, Settings};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;

/// A throwaway workspace with a `.docblocks` directory
pub struct TestProject {
    pub dir: TempDir,
}

impl TestProject {
    pub fn new() -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        fs::create_dir_all(dir.path().join(".docblocks")).expect("Failed to create config dir");
        Self { dir }
    }

    pub fn add_file(&self, path: &str, content: &str) -> PathBuf {
        let file_path = self.dir.path().join(path);
        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent dirs");
        }
        fs::write(&file_path, content).expect("Failed to write file");
        file_path
    }

    pub fn write_settings(&self, content: &str) -> PathBuf {
        self.add_file(".docblocks/settings.toml", content)
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }
}

/// Path of a file under `tests/fixtures`
pub fn fixture(path: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(path)
}

pub fn fixture_source(path: &str) -> String {
    fs::read_to_string(fixture(path)).expect("Failed to read fixture")
}

pub fn default_parser() -> DocParser {
    DocParser::new(Arc::new(Settings::default())).expect("default settings are valid")
}
