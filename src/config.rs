//! Configuration module for the documentation parser.
//!
//! This module provides a layered configuration system that supports:
//! - Default values
//! - TOML configuration file
//! - Environment variable overrides
//! - CLI argument overrides
//!
//! # Environment Variables
//!
//! Environment variables must be prefixed with `DOCBLOCKS_` and use double
//! underscores to separate nested levels:
//! - `DOCBLOCKS_PAGE_FALLBACK=api` sets `page_fallback`
//! - `DOCBLOCKS_BLANK_LINES=2` sets `blank_lines`
//! - `DOCBLOCKS_COMMENTS__CSS__PREFIX=%` sets `comments.css.prefix`

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Directory holding the workspace settings file
pub const CONFIG_DIR: &str = ".docblocks";

/// Key of the comment style every other style is layered on
pub const DEFAULT_STYLE_KEY: &str = "_";

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Settings {
    /// Version of the configuration schema
    #[serde(default = "default_version")]
    pub version: u32,

    /// Workspace root directory (where .docblocks is located)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workspace_root: Option<PathBuf>,

    /// Global debug mode
    #[serde(default = "default_false")]
    pub debug: bool,

    /// Globs of files to parse for documentation
    #[serde(default = "default_files")]
    pub files: Vec<String>,

    /// Globs of files to skip
    #[serde(default = "default_ignore")]
    pub ignore: Vec<String>,

    /// Add `.gitignore` rules to the ignore list
    #[serde(default = "default_false")]
    pub gitignore: bool,

    /// Page used when a header doesn't declare `@page`; empty disables it
    #[serde(default = "default_page_fallback")]
    pub page_fallback: String,

    /// Consecutive blank lines that stop a block from collecting more code
    #[serde(default = "default_blank_lines")]
    pub blank_lines: usize,

    /// Return the data by file instead of sorting it into pages
    #[serde(default = "default_false")]
    pub raw: bool,

    /// Render description fields from markdown to HTML
    #[serde(default = "default_false")]
    pub markdown: bool,

    /// Number of threads used to parse files
    #[serde(default = "default_parallel_threads")]
    pub parallel_threads: usize,

    /// Where the generated documentation is written
    #[serde(default = "default_output")]
    pub output: PathBuf,

    /// Comment styles keyed by comma separated file extensions
    #[serde(default = "default_comments")]
    pub comments: BTreeMap<String, CommentStyleConfig>,

    /// Additional annotations declared by the project
    #[serde(default)]
    pub annotations: BTreeMap<String, CustomAnnotationConfig>,
}

/// Partial comment style, layered on top of the default style
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq, Eq)]
pub struct CommentStyleConfig {
    /// Character that starts an annotation name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,

    /// File level comment block markers
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub header: Option<DelimiterConfig>,

    /// Declaration level comment block markers
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<DelimiterConfig>,

    /// Ordinary single line comment marker, ignored inside blocks
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plain: Option<String>,

    /// Name of another style to copy before applying this one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extend: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq, Eq)]
pub struct DelimiterConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<String>,
}

/// Value shape produced by a project defined annotation
#[derive(Debug, Deserialize, Serialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CustomAnnotationKind {
    /// The annotation line and its contents as one string
    #[default]
    Text,
    /// Comma separated values from the line and contents
    List,
    /// `true`/`false`, empty meaning `true`
    Flag,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq, Eq)]
pub struct CustomAnnotationConfig {
    #[serde(default)]
    pub kind: CustomAnnotationKind,

    #[serde(default)]
    pub aliases: Vec<String>,

    /// Restrict the annotation to these file types; empty means all
    #[serde(default)]
    pub filetypes: Vec<String>,
}

// Default value functions
fn default_version() -> u32 {
    1
}
fn default_false() -> bool {
    false
}
fn default_files() -> Vec<String> {
    vec![
        "app/**/*".to_string(),
        "src/**/*".to_string(),
        "*.md".to_string(),
    ]
}
fn default_ignore() -> Vec<String> {
    [
        ".*",
        "node_modules/",
        "bower_components/",
        "jspm_packages/",
        "dist/",
        "build/",
        "docs/",
        "tests/",
        "coverage/",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}
fn default_page_fallback() -> String {
    "general".to_string()
}
fn default_blank_lines() -> usize {
    4
}
fn default_parallel_threads() -> usize {
    num_cpus::get()
}
fn default_output() -> PathBuf {
    PathBuf::from("docs.json")
}

fn delimiters(start: &str, line: &str, end: &str) -> Option<DelimiterConfig> {
    let opt = |s: &str| (!s.is_empty()).then(|| s.to_string());
    Some(DelimiterConfig {
        start: opt(start),
        line: Some(line.to_string()),
        end: opt(end),
    })
}

fn default_comments() -> BTreeMap<String, CommentStyleConfig> {
    let mut comments = BTreeMap::new();

    comments.insert(
        DEFAULT_STYLE_KEY.to_string(),
        CommentStyleConfig {
            prefix: Some("@".to_string()),
            header: delimiters("////", "///", "////"),
            body: delimiters("", "///", ""),
            plain: Some("//".to_string()),
            extend: None,
        },
    );

    comments.insert(
        "css".to_string(),
        CommentStyleConfig {
            header: delimiters("/***", "*", "***/"),
            body: delimiters("/**", "*", "**/"),
            plain: Some(String::new()),
            ..Default::default()
        },
    );

    comments.insert(
        "rb, py, coffee, sh, bash, pl".to_string(),
        CommentStyleConfig {
            header: delimiters("###", "##", "###"),
            body: delimiters("", "##", ""),
            plain: Some("#".to_string()),
            ..Default::default()
        },
    );

    comments.insert(
        "html, md, markdown, mark, mdown, mkdn, mdml, mkd, mdwn, mdtxt, mdtext, text".to_string(),
        CommentStyleConfig {
            header: delimiters("<!----", "", "---->"),
            body: delimiters("<!---", "", "--->"),
            plain: Some(String::new()),
            ..Default::default()
        },
    );

    comments.insert(
        "jade".to_string(),
        CommentStyleConfig {
            header: delimiters("//-//", "//-/", "//-//"),
            body: delimiters("", "//-/", ""),
            plain: Some("//-".to_string()),
            ..Default::default()
        },
    );

    comments.insert(
        "cfm".to_string(),
        CommentStyleConfig {
            header: delimiters("<!-----", "", "----->"),
            body: delimiters("<!----", "", "---->"),
            plain: Some(String::new()),
            ..Default::default()
        },
    );

    comments
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            version: default_version(),
            workspace_root: None,
            debug: false,
            files: default_files(),
            ignore: default_ignore(),
            gitignore: false,
            page_fallback: default_page_fallback(),
            blank_lines: default_blank_lines(),
            raw: false,
            markdown: false,
            parallel_threads: default_parallel_threads(),
            output: default_output(),
            comments: default_comments(),
            annotations: BTreeMap::new(),
        }
    }
}

/// Top level keys accepted in settings.toml
const KNOWN_KEYS: &[&str] = &[
    "version",
    "workspace_root",
    "debug",
    "files",
    "ignore",
    "gitignore",
    "page_fallback",
    "blank_lines",
    "raw",
    "markdown",
    "parallel_threads",
    "output",
    "comments",
    "annotations",
];

impl Settings {
    /// Load configuration from all sources
    pub fn load() -> Result<Self, Box<figment::Error>> {
        Self::figment(Self::config_file())
            .extract()
            .map_err(Box::new)
            .map(|mut settings: Settings| {
                // If workspace_root is not set in config, detect it
                if settings.workspace_root.is_none() {
                    settings.workspace_root = Self::workspace_root();
                }
                settings
            })
    }

    /// Load configuration from a specific file
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, Box<figment::Error>> {
        Self::figment(path.as_ref().to_path_buf())
            .extract()
            .map_err(Box::new)
    }

    fn figment(config_path: PathBuf) -> Figment {
        Figment::new()
            // Start with defaults
            .merge(Serialized::defaults(Settings::default()))
            // Layer in config file if it exists
            .merge(Toml::file(config_path))
            // Double underscore (__) separates nested levels
            .merge(Env::prefixed("DOCBLOCKS_").map(|key| {
                key.as_str().to_lowercase().replace("__", ".").into()
            }))
    }

    /// Settings file `load` reads: the workspace config, or
    /// `.docblocks/settings.toml` in the current directory
    pub fn config_file() -> PathBuf {
        Self::find_workspace_config()
            .unwrap_or_else(|| PathBuf::from(CONFIG_DIR).join("settings.toml"))
    }

    /// Find the workspace config by looking for the .docblocks directory
    /// Searches from current directory up to root
    fn find_workspace_config() -> Option<PathBuf> {
        Self::workspace_root().map(|root| root.join(CONFIG_DIR).join("settings.toml"))
    }

    /// Get the workspace root directory (where .docblocks is located)
    pub fn workspace_root() -> Option<PathBuf> {
        let current = std::env::current_dir().ok()?;

        current
            .ancestors()
            .find(|ancestor| ancestor.join(CONFIG_DIR).is_dir())
            .map(Path::to_path_buf)
    }

    /// Top level keys in a settings file that aren't valid options
    pub fn unknown_keys(content: &str) -> Vec<String> {
        let Ok(table) = content.parse::<toml::Table>() else {
            return Vec::new();
        };

        table
            .keys()
            .filter(|key| !KNOWN_KEYS.contains(&key.as_str()))
            .cloned()
            .collect()
    }

    /// Warn about each unknown top level key in the file at `path`
    pub fn warn_unknown_keys(path: &Path) -> Vec<String> {
        let Ok(content) = std::fs::read_to_string(path) else {
            return Vec::new();
        };

        let unknown = Self::unknown_keys(&content);
        for key in &unknown {
            tracing::warn!(
                "'{key}' in {} is not a valid option, see 'docblocks config' for the available settings",
                path.display()
            );
        }
        unknown
    }

    /// Save current configuration to file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), Box<dyn std::error::Error>> {
        let parent = path.as_ref().parent().ok_or("Invalid path")?;
        std::fs::create_dir_all(parent)?;

        let toml_string = toml::to_string_pretty(self)?;
        std::fs::write(path, toml_string)?;

        Ok(())
    }

    /// Create a default settings file with helpful comments
    pub fn init_config_file(force: bool) -> Result<PathBuf, Box<dyn std::error::Error>> {
        let config_path = PathBuf::from(CONFIG_DIR).join("settings.toml");

        if !force && config_path.exists() {
            return Err("Configuration file already exists. Use --force to overwrite".into());
        }

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let template = r#"# docblocks configuration file

# Version of the configuration schema
version = 1

# Global debug mode
debug = false

# Files to parse for documentation
files = ["app/**/*", "src/**/*", "*.md"]

# Files to skip (gitignore syntax). `*.json` is always skipped.
ignore = [".*", "node_modules/", "bower_components/", "jspm_packages/", "dist/", "build/", "docs/", "tests/", "coverage/"]

# Add the rules from .gitignore files to the ignore list
gitignore = false

# Page used when a header comment doesn't declare @page (empty to disable)
page_fallback = "general"

# Stop collecting code for a block after this many blank lines
blank_lines = 4

# Output the data by file instead of sorting it into pages
raw = false

# Render descriptions from markdown to HTML
markdown = false

# Where `docblocks parse` writes the documentation
output = "docs.json"

# Comment styles are keyed by file extension. Several extensions can share a
# style ("rb, py"). Every style is layered on top of the default `_` style,
# and `extend = "css"` copies another style first.
[comments._]
prefix = "@"
plain = "//"
header = { start = "////", line = "///", end = "////" }
body = { line = "///" }

# [comments.scss]
# extend = "css"

# Project specific annotations
# [annotations.group-id]
# kind = "text"
# aliases = ["gid"]
"#;

        std::fs::write(&config_path, template)?;
        Ok(config_path)
    }
}
