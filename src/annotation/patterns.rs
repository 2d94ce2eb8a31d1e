//! Line grammar shared by the built-in annotations
//!
//! Annotation lines are built from a handful of optional pieces:
//!
//! ```text
//! @arg     {type, type} name [default] - description
//! @markup  (id) {language} [settings] description
//! @todo    {importance} [assignee, assignee] description
//! ```

use regex::Regex;
use std::sync::LazyLock;

const TYPES: &str = r"(?:\{([^}]*)\})?";
const NAME: &str = r"([^\s\-\[\{(][^\s]*)?";
const SPACE: &str = r"\s*";
const VALUE: &str = r"(?:\[([^\]]*)\])?";
const ID: &str = r"(?:\(([^)]*)\))?";
const DESCRIPTION: &str = r"(?:\s*-?\s+)?(.*)";

fn compile(parts: &[&str]) -> Regex {
    let pattern = format!("^{}$", parts.concat());
    Regex::new(&pattern).expect("annotation grammar is a valid pattern")
}

/// `{types} name [value] - description`
pub static ARG: LazyLock<Regex> =
    LazyLock::new(|| compile(&[TYPES, SPACE, NAME, SPACE, VALUE, SPACE, DESCRIPTION]));

/// `{types} - description`
pub static TYPED: LazyLock<Regex> = LazyLock::new(|| compile(&[TYPES, SPACE, DESCRIPTION]));

/// `(id) {language} [settings] - description`
pub static MARKUP: LazyLock<Regex> =
    LazyLock::new(|| compile(&[ID, SPACE, TYPES, SPACE, VALUE, SPACE, DESCRIPTION]));

/// `{types} name - description`
pub static REQUIRES: LazyLock<Regex> =
    LazyLock::new(|| compile(&[TYPES, SPACE, NAME, DESCRIPTION]));

/// `(markup id) rest`
pub static STATE_ID: LazyLock<Regex> = LazyLock::new(|| compile(&[ID, SPACE, "(.*)"]));

/// `{state} [state id] - description`
pub static STATE: LazyLock<Regex> =
    LazyLock::new(|| compile(&[TYPES, SPACE, VALUE, SPACE, DESCRIPTION]));

/// `{importance} [assignees] - description`
pub static TODO: LazyLock<Regex> =
    LazyLock::new(|| compile(&[TYPES, SPACE, VALUE, SPACE, DESCRIPTION]));

/// Capture the first `N` groups of `pattern`, trimmed. Empty groups are `None`.
pub fn fields<const N: usize>(pattern: &Regex, text: &str) -> [Option<String>; N] {
    let captures = pattern.captures(text.trim());
    std::array::from_fn(|i| {
        captures
            .as_ref()
            .and_then(|c| c.get(i + 1))
            .map(|m| m.as_str().trim().to_string())
            .filter(|s| !s.is_empty())
    })
}

/// Split a comma separated list, dropping empty items
pub fn list(text: Option<&str>) -> Vec<String> {
    text.unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

/// Comma separated values from the annotation line and every content line
pub fn multiple(line: &str, contents: &str) -> Vec<String> {
    std::iter::once(line)
        .chain(contents.lines())
        .flat_map(|l| l.split(','))
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

/// Read a flag annotation. An empty line means `true`; anything other than
/// `true`/`false`, or a flag with contents, is not a flag.
pub fn to_boolean(line: &str, contents: &str) -> Option<bool> {
    if !contents.is_empty() {
        return None;
    }
    match line {
        "false" => Some(false),
        "" | "true" => Some(true),
        _ => None,
    }
}

/// Escape text for inclusion in HTML
pub fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
