//! Values produced by annotations and the parsed block that holds them

use crate::types::{BlockKind, LineRange};
use serde::Serialize;
use std::collections::BTreeMap;

/// Parsed value of one annotation
///
/// Serialized without a tag so `@name Foo` becomes `"name": "Foo"` and
/// `@arg` becomes a list of parameter objects.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AnnotationValue {
    Flag(bool),
    Text(String),
    List(Vec<String>),
    Params(Vec<Param>),
    Notes(Vec<Note>),
    Todos(Vec<Todo>),
    Requirements(Vec<Requirement>),
    Throws(Vec<Throw>),
    Returns(Returns),
    Version(VersionInfo),
    Type(TypeInfo),
    Markup(Vec<Markup>),
    States(Vec<StateGroup>),
    ResolvedStates(BTreeMap<String, Vec<ResolvedState>>),
    Code(RawCode),
    BlockInfo(BlockInfo),
}

impl AnnotationValue {
    /// Combine a repeated annotation with its earlier value. Lists are
    /// appended, anything else is replaced by the later value.
    pub fn merge(self, next: AnnotationValue) -> AnnotationValue {
        use AnnotationValue::*;

        fn append<T>(mut first: Vec<T>, next: Vec<T>) -> Vec<T> {
            first.extend(next);
            first
        }

        match (self, next) {
            (List(a), List(b)) => List(append(a, b)),
            (Params(a), Params(b)) => Params(append(a, b)),
            (Notes(a), Notes(b)) => Notes(append(a, b)),
            (Todos(a), Todos(b)) => Todos(append(a, b)),
            (Requirements(a), Requirements(b)) => Requirements(append(a, b)),
            (Throws(a), Throws(b)) => Throws(append(a, b)),
            (Markup(a), Markup(b)) => Markup(append(a, b)),
            (States(a), States(b)) => States(append(a, b)),
            (_, next) => next,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            AnnotationValue::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            AnnotationValue::List(items) => Some(items),
            _ => None,
        }
    }
}

/// `@arg` and `@property`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Param {
    pub types: Vec<String>,
    pub name: String,
    pub value: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Note {
    pub importance: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Todo {
    pub importance: String,
    pub assignees: Vec<String>,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Requirement {
    pub types: Vec<String>,
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Throw {
    pub types: Vec<String>,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Returns {
    pub types: Vec<String>,
    pub description: String,
}

/// `@since`, `@version` and `@deprecated`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VersionInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TypeInfo {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub type_name: Option<String>,
    pub description: String,
}

/// An example written with `@markup`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Markup {
    /// Explicit `(id)`, or the position in the block once resolved
    pub id: Option<String>,
    pub language: String,
    pub settings: BTreeMap<String, String>,
    pub description: String,
    pub raw: String,
    pub escaped: String,
    /// `raw` with every state interpolation removed
    pub raw_stateless: String,
    pub escaped_stateless: String,
    /// Line the annotation starts on
    #[serde(skip)]
    pub start: usize,
}

/// One `@state` annotation: the states it lists and the markup it targets
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StateGroup {
    pub markup_id: Option<String>,
    pub states: Vec<StateEntry>,
    #[serde(skip)]
    pub start: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StateEntry {
    pub id: String,
    pub state: String,
    pub description: String,
}

/// A state group joined with its markup, interpolations filled in
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedState {
    pub states: Vec<StateEntry>,
    pub markup: Option<StateMarkup>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StateMarkup {
    pub id: String,
    pub language: String,
    pub settings: BTreeMap<String, String>,
    pub description: String,
    pub raw: String,
    pub escaped: String,
}

/// `@raw-code`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RawCode {
    pub raw: String,
    pub escaped: String,
}

/// Where a block came from, filled in for every block
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BlockInfo {
    #[serde(rename = "type")]
    pub kind: BlockKind,
    pub comment: LineRange,
    pub code: Option<LineRange>,
    pub file: FileSpan,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileSpan {
    pub path: String,
    pub start: usize,
    pub end: usize,
}

/// A parsed comment block: canonical annotation name to value
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct DocBlock {
    pub annotations: BTreeMap<String, AnnotationValue>,
    /// Lines spanned by the comment
    #[serde(skip)]
    pub range: Option<LineRange>,
}

impl DocBlock {
    pub fn get(&self, name: &str) -> Option<&AnnotationValue> {
        self.annotations.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.annotations.contains_key(name)
    }

    pub fn is_empty(&self) -> bool {
        self.annotations.is_empty()
    }

    pub fn name(&self) -> Option<&str> {
        self.get("name").and_then(AnnotationValue::as_text)
    }

    pub fn description(&self) -> Option<&str> {
        self.get("description").and_then(AnnotationValue::as_text)
    }

    /// First page the block belongs to
    pub fn page(&self) -> Option<&str> {
        self.pages().first().map(String::as_str)
    }

    pub fn pages(&self) -> &[String] {
        self.get("page")
            .and_then(AnnotationValue::as_list)
            .unwrap_or_default()
    }

    pub fn author(&self) -> Option<&str> {
        self.authors().first().map(String::as_str)
    }

    pub fn authors(&self) -> &[String] {
        self.get("author")
            .and_then(AnnotationValue::as_list)
            .unwrap_or_default()
    }

    /// 1-based line the block starts on, for messages
    pub fn start_line(&self) -> Option<usize> {
        self.range.map(|r| r.display_start())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(value: &str) -> AnnotationValue {
        AnnotationValue::Text(value.to_string())
    }

    fn list(values: &[&str]) -> AnnotationValue {
        AnnotationValue::List(values.iter().map(|v| v.to_string()).collect())
    }

    #[test]
    fn test_merge_appends_lists() {
        let merged = list(&["a"]).merge(list(&["b", "c"]));
        assert_eq!(merged, list(&["a", "b", "c"]));
    }

    #[test]
    fn test_merge_scalars_last_wins() {
        assert_eq!(text("first").merge(text("second")), text("second"));
        assert_eq!(
            list(&["a"]).merge(AnnotationValue::Flag(true)),
            AnnotationValue::Flag(true)
        );
    }

    #[test]
    fn test_doc_block_accessors() {
        let mut block = DocBlock::default();
        block.annotations.insert("name".into(), text("Body Block 1"));
        block.annotations.insert("page".into(), list(&["tests/java-file", "other"]));
        block.annotations.insert("author".into(), list(&["Tyler Benton"]));

        assert_eq!(block.name(), Some("Body Block 1"));
        assert_eq!(block.page(), Some("tests/java-file"));
        assert_eq!(block.pages().len(), 2);
        assert_eq!(block.author(), Some("Tyler Benton"));
        assert_eq!(block.description(), None);
    }

    #[test]
    fn test_doc_block_serializes_as_map() {
        let mut block = DocBlock::default();
        block.annotations.insert("name".into(), text("Foo"));
        block.annotations.insert("chainable".into(), AnnotationValue::Flag(false));
        block.range = Some(LineRange::new(1, 3));

        let json = serde_json::to_value(&block).unwrap();
        assert_eq!(json, serde_json::json!({"chainable": false, "name": "Foo"}));
    }
}
