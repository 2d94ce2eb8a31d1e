//! File system walker for discovering files to parse
//!
//! This module provides directory traversal with support for:
//! - `files` globs from the configuration as a whitelist
//! - `ignore` globs from the configuration
//! - `.docblocksignore` files
//! - `.gitignore` rules when `gitignore` is enabled

use crate::Settings;
use crate::error::{DocError, DocResult};
use ignore::WalkBuilder;
use ignore::overrides::{Override, OverrideBuilder};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Name of the per-directory ignore file
pub const IGNORE_FILE: &str = ".docblocksignore";

/// Globs that are never parsed
const ALWAYS_IGNORED: &[&str] = &["*.json"];

/// Walks directories to find files to parse
#[derive(Debug)]
pub struct FileWalker {
    settings: Arc<Settings>,
    /// Directory the `files` and `ignore` globs are relative to
    root: PathBuf,
}

impl FileWalker {
    /// Create a walker whose globs are relative to `root`
    pub fn new(settings: Arc<Settings>, root: impl Into<PathBuf>) -> Self {
        Self {
            settings,
            root: root.into(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn overrides(&self) -> DocResult<Override> {
        let mut builder = OverrideBuilder::new(&self.root);
        let invalid = |glob: &str, e: ignore::Error| DocError::ConfigError {
            reason: format!("invalid glob '{glob}': {e}"),
        };

        for glob in &self.settings.files {
            builder.add(glob).map_err(|e| invalid(glob, e))?;
        }
        for glob in self.settings.ignore.iter().map(String::as_str).chain(ALWAYS_IGNORED.iter().copied()) {
            let negated = format!("!{}", glob.trim_start_matches('!'));
            builder.add(&negated).map_err(|e| invalid(glob, e))?;
        }

        builder.build().map_err(|e| DocError::ConfigError {
            reason: format!("invalid file globs: {e}"),
        })
    }

    /// Files to parse under `path`, sorted. A path naming a file is
    /// returned as is.
    pub fn walk(&self, path: &Path) -> DocResult<Vec<PathBuf>> {
        if path.is_file() {
            return Ok(vec![path.to_path_buf()]);
        }

        let overrides = self.overrides()?;
        let gitignore = self.settings.gitignore;
        let mut builder = WalkBuilder::new(path);

        builder
            .hidden(false) // hidden files are handled by the `.*` ignore glob
            .git_ignore(gitignore)
            .git_global(gitignore)
            .git_exclude(gitignore)
            .parents(true)
            .follow_links(false)
            .require_git(false)
            // `files` and `ignore` globs apply on top of the ignore files
            .filter_entry(move |entry| {
                let is_dir = entry.file_type().is_some_and(|ft| ft.is_dir());
                !overrides.matched(entry.path(), is_dir).is_ignore()
            });

        builder.add_custom_ignore_filename(IGNORE_FILE);

        let mut files: Vec<PathBuf> = builder
            .build()
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(e) => {
                    tracing::warn!("[walker] skipping entry: {e}");
                    None
                }
            })
            .filter(|entry| entry.file_type().is_some_and(|ft| ft.is_file()))
            .map(|entry| entry.into_path())
            .collect();

        files.sort();
        tracing::debug!("[walker] found {} files under {}", files.len(), path.display());
        Ok(files)
    }

    /// Files to parse under every path, without duplicates
    pub fn walk_all(&self, paths: &[PathBuf]) -> DocResult<Vec<PathBuf>> {
        let mut files = Vec::new();
        for path in paths {
            files.extend(self.walk(path)?);
        }
        files.sort();
        files.dedup();
        Ok(files)
    }

    /// Count files that would be parsed
    pub fn count_files(&self, path: &Path) -> DocResult<usize> {
        Ok(self.walk(path)?.len())
    }

    /// `path` relative to the walker root, with `/` separators
    pub fn display_path(&self, path: &Path) -> PathBuf {
        path.strip_prefix(&self.root)
            .map(Path::to_path_buf)
            .unwrap_or_else(|_| path.to_path_buf())
    }
}
