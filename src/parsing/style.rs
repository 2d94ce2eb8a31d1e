//! Comment styles and their resolution by file extension
//!
//! A comment style describes how documentation comments are written in a
//! family of file types:
//! - `header`: the file level block, e.g. `////` ... `////` with `///` lines
//! - `body`: blocks that document the code following them, e.g. `///` lines
//! - `plain`: the ordinary single line comment, which is never documentation
//! - `prefix`: the character that starts an annotation name (`@`)
//!
//! Styles come from the `comments` table of the settings. Keys may list
//! several extensions (`"rb, py"`), every style is layered on top of the
//! default `_` style, and a style may `extend` another one.

use crate::config::{CommentStyleConfig, DEFAULT_STYLE_KEY, DelimiterConfig};
use crate::error::{DocError, DocResult};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;

/// Markers for one kind of comment block
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Delimiters {
    /// Line that opens the block (`////`, `/**`)
    pub start: Option<String>,
    /// Marker at the start of each line inside the block (`///`, `*`)
    pub line: Option<String>,
    /// Line that closes the block
    pub end: Option<String>,
}

impl Delimiters {
    /// Whether blocks are opened and closed by dedicated lines
    pub fn is_start_end(&self) -> bool {
        self.start.is_some() && self.end.is_some()
    }

    /// Content after the opening marker if `trimmed` opens a block
    pub fn open<'a>(&self, trimmed: &'a str) -> Option<&'a str> {
        let start = self.start.as_deref()?;
        strip_marker(trimmed, start)
    }

    /// Content before the closing marker if `trimmed` closes a block
    pub fn close<'a>(&self, trimmed: &'a str) -> Option<&'a str> {
        let end = self.end.as_deref()?;
        let trimmed = trimmed.trim_end();
        if trimmed == end {
            return Some("");
        }
        let before = trimmed.strip_suffix(end)?;
        before
            .ends_with(char::is_whitespace)
            .then(|| before.trim_end())
    }

    /// Content of a documentation line, `None` if the line doesn't carry
    /// the line marker
    pub fn line_content<'a>(&self, trimmed: &'a str) -> Option<&'a str> {
        let marker = self.line.as_deref()?;
        strip_marker(trimmed, marker)
    }

    /// Content of a line inside a start/end block. Lines without the line
    /// marker are kept as they are.
    pub fn inner_content<'a>(&self, line: &'a str) -> &'a str {
        let trimmed = line.trim_start();
        self.line_content(trimmed).unwrap_or(line)
    }
}

/// `marker` followed by whitespace or the end of the line. This keeps
/// `////` from reading as a `///` line and `//` from reading as either.
fn strip_marker<'a>(trimmed: &'a str, marker: &str) -> Option<&'a str> {
    let rest = trimmed.strip_prefix(marker)?;
    if rest.is_empty() || rest.starts_with(char::is_whitespace) {
        Some(rest)
    } else {
        None
    }
}

/// A fully resolved comment style
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentStyle {
    /// Character(s) that start an annotation name
    pub prefix: String,
    pub header: Delimiters,
    pub body: Delimiters,
    /// Ordinary single line comment marker
    pub plain: Option<String>,
}

impl CommentStyle {
    /// Whether the line is an ordinary comment that must be skipped
    pub fn is_plain(&self, trimmed: &str) -> bool {
        match self.plain.as_deref() {
            Some(plain) => {
                trimmed.starts_with(plain)
                    && self.body.line_content(trimmed).is_none()
                    && self.header.open(trimmed).is_none()
            }
            None => false,
        }
    }

    fn from_config(language: &str, config: &CommentStyleConfig) -> DocResult<Self> {
        let invalid = |reason: &str| DocError::InvalidCommentStyle {
            language: language.to_string(),
            reason: reason.to_string(),
        };

        let prefix = config
            .prefix
            .clone()
            .filter(|p| !p.is_empty())
            .ok_or_else(|| invalid("`prefix` must not be empty"))?;

        let header = delimiters(config.header.as_ref());
        let body = delimiters(config.body.as_ref());

        for (kind, delims) in [("header", &header), ("body", &body)] {
            if delims.start.is_some() != delims.end.is_some() {
                return Err(invalid(&format!(
                    "{kind} needs both `start` and `end`, or neither"
                )));
            }
            if !delims.is_start_end() && delims.line.is_none() {
                return Err(invalid(&format!(
                    "{kind} needs a `line` marker when it has no `start`/`end`"
                )));
            }
        }

        Ok(Self {
            prefix,
            header,
            body,
            plain: config.plain.clone().filter(|p| !p.is_empty()),
        })
    }
}

fn delimiters(config: Option<&DelimiterConfig>) -> Delimiters {
    let non_empty = |value: &Option<String>| value.clone().filter(|v| !v.is_empty());
    config
        .map(|c| Delimiters {
            start: non_empty(&c.start),
            line: non_empty(&c.line),
            end: non_empty(&c.end),
        })
        .unwrap_or_default()
}

/// Overlay `top` onto `base`, field by field
fn overlay(base: &CommentStyleConfig, top: &CommentStyleConfig) -> CommentStyleConfig {
    fn delims(base: &Option<DelimiterConfig>, top: &Option<DelimiterConfig>) -> Option<DelimiterConfig> {
        match (base, top) {
            (Some(b), Some(t)) => Some(DelimiterConfig {
                start: t.start.clone().or_else(|| b.start.clone()),
                line: t.line.clone().or_else(|| b.line.clone()),
                end: t.end.clone().or_else(|| b.end.clone()),
            }),
            (None, t) => t.clone(),
            (b, None) => b.clone(),
        }
    }

    CommentStyleConfig {
        prefix: top.prefix.clone().or_else(|| base.prefix.clone()),
        header: delims(&base.header, &top.header),
        body: delims(&base.body, &top.body),
        plain: top.plain.clone().or_else(|| base.plain.clone()),
        extend: None,
    }
}

/// Comment styles by file extension
#[derive(Debug, Clone)]
pub struct StyleRegistry {
    default: Arc<CommentStyle>,
    by_extension: HashMap<String, Arc<CommentStyle>>,
}

impl StyleRegistry {
    /// Build the registry from the `comments` settings table
    pub fn from_config(comments: &BTreeMap<String, CommentStyleConfig>) -> DocResult<Self> {
        // Split `"rb, py"` style keys so every extension has its own entry
        let mut flat: BTreeMap<String, CommentStyleConfig> = BTreeMap::new();
        for (key, config) in comments {
            for ext in key.split(',').map(str::trim).filter(|e| !e.is_empty()) {
                if flat.insert(ext.to_lowercase(), config.clone()).is_some() {
                    tracing::warn!("comment style for '{ext}' is declared more than once");
                }
            }
        }

        let default_config = flat.get(DEFAULT_STYLE_KEY).cloned().unwrap_or_default();
        let default = Arc::new(CommentStyle::from_config(DEFAULT_STYLE_KEY, &default_config)?);

        let mut resolved = HashMap::new();
        for ext in flat.keys().filter(|k| k.as_str() != DEFAULT_STYLE_KEY) {
            let config = resolve(ext, &flat, &default_config, &mut HashSet::new())?;
            let style = CommentStyle::from_config(ext, &config)?;
            resolved.insert(ext.clone(), Arc::new(style));
        }

        Ok(Self {
            default,
            by_extension: resolved,
        })
    }

    /// Style for a file extension, falling back to the default style
    pub fn for_extension(&self, ext: &str) -> &CommentStyle {
        self.by_extension
            .get(&ext.to_lowercase())
            .unwrap_or(&self.default)
    }

    pub fn default_style(&self) -> &CommentStyle {
        &self.default
    }

    /// Extensions with a dedicated style
    pub fn extensions(&self) -> impl Iterator<Item = &str> {
        self.by_extension.keys().map(String::as_str)
    }
}

fn resolve(
    ext: &str,
    flat: &BTreeMap<String, CommentStyleConfig>,
    default: &CommentStyleConfig,
    visiting: &mut HashSet<String>,
) -> DocResult<CommentStyleConfig> {
    if ext == DEFAULT_STYLE_KEY {
        return Ok(default.clone());
    }
    if !visiting.insert(ext.to_string()) {
        return Err(DocError::InvalidCommentStyle {
            language: ext.to_string(),
            reason: "`extend` forms a cycle".to_string(),
        });
    }

    let config = &flat[ext];
    let base = match config.extend.as_deref().map(|t| t.trim().to_lowercase()) {
        Some(target) => {
            let target = target.as_str();
            if target != DEFAULT_STYLE_KEY && !flat.contains_key(target) {
                return Err(DocError::UnknownStyleExtend {
                    language: ext.to_string(),
                    target: target.to_string(),
                });
            }
            resolve(target, flat, default, visiting)?
        }
        None => default.clone(),
    };

    Ok(overlay(&base, config))
}
