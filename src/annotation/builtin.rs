//! Built-in annotations

use super::patterns::{self, fields, list, multiple, to_boolean};
use super::value::{
    AnnotationValue, Note, Param, RawCode, Requirement, Returns, Throw, Todo, TypeInfo,
    VersionInfo,
};
use super::{Annotation, AnnotationContext, BlockContext, MarkupAnnotation, StatesAnnotation};
use std::sync::Arc;

/// Every annotation that ships with the parser
pub fn builtin_annotations() -> Vec<Arc<dyn Annotation>> {
    vec![
        Arc::new(Access),
        Arc::new(Alias),
        Arc::new(Arg),
        Arc::new(Author),
        Arc::new(BlockInfoAnnotation),
        Arc::new(Chainable),
        Arc::new(Construct),
        Arc::new(Deprecated),
        Arc::new(Description),
        Arc::new(MarkupAnnotation),
        Arc::new(Name),
        Arc::new(NoteAnnotation),
        Arc::new(Page),
        Arc::new(Property),
        Arc::new(RawCodeAnnotation),
        Arc::new(Readonly),
        Arc::new(Requires),
        Arc::new(ReturnsAnnotation),
        Arc::new(Since),
        Arc::new(StatesAnnotation),
        Arc::new(Throws),
        Arc::new(TodoAnnotation),
        Arc::new(TypeAnnotation),
        Arc::new(Version),
    ]
}

/// `@access public|private|protected`, `public` when absent
pub struct Access;

impl Annotation for Access {
    fn name(&self) -> &str {
        "access"
    }

    fn parse(&self, ctx: &mut AnnotationContext<'_>) -> Option<AnnotationValue> {
        let access = match ctx.line.as_str() {
            "private" | "protected" => ctx.line.clone(),
            _ => "public".to_string(),
        };
        Some(AnnotationValue::Text(access))
    }

    fn autofill(&self, _block: &BlockContext<'_>) -> Option<AnnotationValue> {
        Some(AnnotationValue::Text("public".to_string()))
    }
}

/// `@alias name[, name]`
pub struct Alias;

impl Annotation for Alias {
    fn name(&self) -> &str {
        "alias"
    }

    fn parse(&self, ctx: &mut AnnotationContext<'_>) -> Option<AnnotationValue> {
        Some(AnnotationValue::List(multiple(&ctx.line, &ctx.contents)))
    }
}

/// Parse `{types} name [default] - description`
fn param(ctx: &AnnotationContext<'_>) -> Param {
    let [types, name, value, description] = fields::<4>(&patterns::ARG, &ctx.line);
    Param {
        types: list(types.as_deref()),
        name: name.unwrap_or_default(),
        value: value.unwrap_or_default(),
        description: ctx.markdown(description.as_deref()),
    }
}

pub struct Arg;

impl Annotation for Arg {
    fn name(&self) -> &str {
        "arg"
    }

    fn aliases(&self) -> Vec<&str> {
        vec!["argument", "param", "parameter"]
    }

    fn parse(&self, ctx: &mut AnnotationContext<'_>) -> Option<AnnotationValue> {
        Some(AnnotationValue::Params(vec![param(ctx)]))
    }
}

pub struct Property;

impl Annotation for Property {
    fn name(&self) -> &str {
        "property"
    }

    fn aliases(&self) -> Vec<&str> {
        vec!["prop", "key"]
    }

    fn parse(&self, ctx: &mut AnnotationContext<'_>) -> Option<AnnotationValue> {
        Some(AnnotationValue::Params(vec![param(ctx)]))
    }
}

/// `@author name[, name]`, one name per content line also works
pub struct Author;

impl Annotation for Author {
    fn name(&self) -> &str {
        "author"
    }

    fn aliases(&self) -> Vec<&str> {
        vec!["authors"]
    }

    fn parse(&self, ctx: &mut AnnotationContext<'_>) -> Option<AnnotationValue> {
        Some(AnnotationValue::List(multiple(&ctx.line, &ctx.contents)))
    }
}

/// Location of the block in its file. Only ever autofilled.
pub struct BlockInfoAnnotation;

impl Annotation for BlockInfoAnnotation {
    fn name(&self) -> &str {
        "blockinfo"
    }

    fn parse(&self, ctx: &mut AnnotationContext<'_>) -> Option<AnnotationValue> {
        ctx.warn("blockinfo is filled in automatically and can't be written by hand");
        None
    }

    fn autofill(&self, block: &BlockContext<'_>) -> Option<AnnotationValue> {
        Some(AnnotationValue::BlockInfo(block.block_info()))
    }
}

/// `@chainable` / `@chainable false` / `@chainable Parent, Other`
pub struct Chainable;

impl Annotation for Chainable {
    fn name(&self) -> &str {
        "chainable"
    }

    fn aliases(&self) -> Vec<&str> {
        vec!["chain"]
    }

    fn parse(&self, ctx: &mut AnnotationContext<'_>) -> Option<AnnotationValue> {
        Some(flag_or_list(ctx))
    }
}

fn flag_or_list(ctx: &AnnotationContext<'_>) -> AnnotationValue {
    match to_boolean(&ctx.line, &ctx.contents) {
        Some(flag) => AnnotationValue::Flag(flag),
        None => AnnotationValue::List(multiple(&ctx.line, &ctx.contents)),
    }
}

pub struct Construct;

impl Annotation for Construct {
    fn name(&self) -> &str {
        "construct"
    }

    fn aliases(&self) -> Vec<&str> {
        vec!["constructor"]
    }

    fn parse(&self, ctx: &mut AnnotationContext<'_>) -> Option<AnnotationValue> {
        Some(flag_or_text(ctx))
    }
}

pub struct Readonly;

impl Annotation for Readonly {
    fn name(&self) -> &str {
        "readonly"
    }

    fn parse(&self, ctx: &mut AnnotationContext<'_>) -> Option<AnnotationValue> {
        Some(flag_or_text(ctx))
    }
}

fn flag_or_text(ctx: &AnnotationContext<'_>) -> AnnotationValue {
    match to_boolean(&ctx.line, &ctx.contents) {
        Some(flag) => AnnotationValue::Flag(flag),
        None => AnnotationValue::Text(ctx.line.clone()),
    }
}

/// Parse `{version} - description`
fn version_info(ctx: &AnnotationContext<'_>) -> VersionInfo {
    let [version, description] = fields::<2>(&patterns::TYPED, &ctx.line);
    VersionInfo {
        version,
        description: ctx.markdown(description.as_deref()),
    }
}

/// `@deprecated {version} - description`, version defaults to `0`
pub struct Deprecated;

impl Annotation for Deprecated {
    fn name(&self) -> &str {
        "deprecated"
    }

    fn parse(&self, ctx: &mut AnnotationContext<'_>) -> Option<AnnotationValue> {
        let mut info = version_info(ctx);
        info.version.get_or_insert_with(|| "0".to_string());
        Some(AnnotationValue::Version(info))
    }
}

pub struct Since;

impl Annotation for Since {
    fn name(&self) -> &str {
        "since"
    }

    fn parse(&self, ctx: &mut AnnotationContext<'_>) -> Option<AnnotationValue> {
        Some(AnnotationValue::Version(version_info(ctx)))
    }
}

pub struct Version;

impl Annotation for Version {
    fn name(&self) -> &str {
        "version"
    }

    fn parse(&self, ctx: &mut AnnotationContext<'_>) -> Option<AnnotationValue> {
        let info = version_info(ctx);
        if info.version.is_none() {
            ctx.warn("missing version, expected `@version {version} - description`");
        }
        Some(AnnotationValue::Version(info))
    }
}

pub struct Description;

impl Annotation for Description {
    fn name(&self) -> &str {
        "description"
    }

    fn aliases(&self) -> Vec<&str> {
        vec![
            "desc",
            "definition",
            "explanation",
            "writeup",
            "summary",
            "summarization",
        ]
    }

    fn parse(&self, ctx: &mut AnnotationContext<'_>) -> Option<AnnotationValue> {
        Some(AnnotationValue::Text(ctx.markdown(Some(ctx.line.as_str()))))
    }
}

pub struct Name;

impl Annotation for Name {
    fn name(&self) -> &str {
        "name"
    }

    fn aliases(&self) -> Vec<&str> {
        vec!["title", "heading", "header"]
    }
}

pub struct NoteAnnotation;

impl Annotation for NoteAnnotation {
    fn name(&self) -> &str {
        "note"
    }

    fn aliases(&self) -> Vec<&str> {
        vec!["notes"]
    }

    fn parse(&self, ctx: &mut AnnotationContext<'_>) -> Option<AnnotationValue> {
        let [importance, description] = fields::<2>(&patterns::TYPED, &ctx.line);
        Some(AnnotationValue::Notes(vec![Note {
            importance: importance.unwrap_or_else(|| "0".to_string()),
            description: ctx.markdown(description.as_deref()),
        }]))
    }
}

/// `@page path/to/page`, a block can be on several pages
pub struct Page;

impl Annotation for Page {
    fn name(&self) -> &str {
        "page"
    }

    fn aliases(&self) -> Vec<&str> {
        vec!["group"]
    }

    fn parse(&self, ctx: &mut AnnotationContext<'_>) -> Option<AnnotationValue> {
        let pages = multiple(&ctx.line, &ctx.contents);
        if pages.is_empty() {
            ctx.warn("missing page name");
            return None;
        }
        Some(AnnotationValue::List(pages))
    }
}

/// Copy of the code the block documents
pub struct RawCodeAnnotation;

impl Annotation for RawCodeAnnotation {
    fn name(&self) -> &str {
        "raw-code"
    }

    fn parse(&self, ctx: &mut AnnotationContext<'_>) -> Option<AnnotationValue> {
        Some(AnnotationValue::Code(RawCode {
            raw: ctx.block.code.to_string(),
            escaped: patterns::escape(ctx.block.code),
        }))
    }
}

pub struct Requires;

impl Annotation for Requires {
    fn name(&self) -> &str {
        "requires"
    }

    fn aliases(&self) -> Vec<&str> {
        vec!["require"]
    }

    fn parse(&self, ctx: &mut AnnotationContext<'_>) -> Option<AnnotationValue> {
        let [types, name, description] = fields::<3>(&patterns::REQUIRES, &ctx.line);
        Some(AnnotationValue::Requirements(vec![Requirement {
            types: list(types.as_deref()),
            name: name.unwrap_or_default(),
            description: ctx.markdown(description.as_deref()),
        }]))
    }
}

pub struct ReturnsAnnotation;

impl Annotation for ReturnsAnnotation {
    fn name(&self) -> &str {
        "returns"
    }

    fn aliases(&self) -> Vec<&str> {
        vec!["return"]
    }

    fn parse(&self, ctx: &mut AnnotationContext<'_>) -> Option<AnnotationValue> {
        let [types, description] = fields::<2>(&patterns::TYPED, &ctx.line);
        Some(AnnotationValue::Returns(Returns {
            types: list(types.as_deref()),
            description: ctx.markdown(description.as_deref()),
        }))
    }
}

pub struct Throws;

impl Annotation for Throws {
    fn name(&self) -> &str {
        "throws"
    }

    fn aliases(&self) -> Vec<&str> {
        vec!["throw", "exception", "error", "catch"]
    }

    fn parse(&self, ctx: &mut AnnotationContext<'_>) -> Option<AnnotationValue> {
        let [types, description] = fields::<2>(&patterns::TYPED, &ctx.line);
        Some(AnnotationValue::Throws(vec![Throw {
            types: list(types.as_deref()),
            description: ctx.markdown(description.as_deref()),
        }]))
    }
}

pub struct TodoAnnotation;

impl Annotation for TodoAnnotation {
    fn name(&self) -> &str {
        "todo"
    }

    fn parse(&self, ctx: &mut AnnotationContext<'_>) -> Option<AnnotationValue> {
        let [importance, assignees, description] = fields::<3>(&patterns::TODO, &ctx.line);
        Some(AnnotationValue::Todos(vec![Todo {
            importance: importance.unwrap_or_else(|| "0".to_string()),
            assignees: list(assignees.as_deref()),
            description: ctx.markdown(description.as_deref()),
        }]))
    }
}

pub struct TypeAnnotation;

impl Annotation for TypeAnnotation {
    fn name(&self) -> &str {
        "type"
    }

    fn parse(&self, ctx: &mut AnnotationContext<'_>) -> Option<AnnotationValue> {
        let [type_name, description] = fields::<2>(&patterns::TYPED, &ctx.line);
        if type_name.is_none() {
            ctx.warn("missing type, expected `@type {type} - description`");
        }
        Some(AnnotationValue::Type(TypeInfo {
            type_name,
            description: ctx.markdown(description.as_deref()),
        }))
    }
}
