//! `@markup` examples and the `@states` that are applied to them
//!
//! A state group points at a markup example, either by id or by being the
//! first `@markup` after it. State values are substituted into the example
//! wherever it contains `${@state}`, `${@state.description}`,
//! `${@state[hover]}` or `${@state[1].description}`.

use super::patterns::{self, escape, fields, list};
use super::value::{AnnotationValue, Markup, ResolvedState, StateEntry, StateGroup, StateMarkup};
use super::{Annotation, AnnotationContext, ResolveContext};
use regex::{Captures, Regex};
use std::collections::BTreeMap;

/// Key used for state groups that couldn't be linked to any markup
const UNLINKED: &str = "unlinked";

/// Matches `${<prefix>state...}` and `${<prefix>states...}`, capturing what
/// follows the name
fn interpolation(prefix: &str) -> Option<Regex> {
    let pattern = format!(r"\$\{{{}states?([^}}]*)\}}", regex::escape(prefix));
    Regex::new(&pattern).ok()
}

/// Same as [`interpolation`] but also eats the surrounding whitespace
fn stateless(prefix: &str) -> Option<Regex> {
    let pattern = format!(r"\s*\$\{{{}states?[^}}]*\}}\s*", regex::escape(prefix));
    Regex::new(&pattern).ok()
}

pub struct MarkupAnnotation;

impl Annotation for MarkupAnnotation {
    fn name(&self) -> &str {
        "markup"
    }

    fn aliases(&self) -> Vec<&str> {
        vec!["code", "example", "output", "outputs"]
    }

    fn parse(&self, ctx: &mut AnnotationContext<'_>) -> Option<AnnotationValue> {
        let [id, language, settings, description] = fields::<4>(&patterns::MARKUP, &ctx.line);

        let raw = ctx.contents.clone();
        let escaped = escape(&raw);
        let (raw_stateless, escaped_stateless) = match stateless(ctx.block.prefix) {
            Some(pattern) => (
                pattern.replace_all(&raw, "").into_owned(),
                pattern.replace_all(&escaped, "").into_owned(),
            ),
            None => (raw.clone(), escaped.clone()),
        };

        let settings = list(settings.as_deref())
            .into_iter()
            .map(|setting| match setting.split_once('=') {
                Some((key, value)) => (key.trim().to_string(), value.trim().to_string()),
                None => (setting, "true".to_string()),
            })
            .collect();

        Some(AnnotationValue::Markup(vec![Markup {
            id,
            language: language.unwrap_or_else(|| ctx.block.file.file_type.clone()),
            settings,
            description: ctx.block.markdown(&[description.as_deref()]),
            raw,
            escaped,
            raw_stateless,
            escaped_stateless,
            start: ctx.range.start,
        }]))
    }

    fn resolve(
        &self,
        value: &AnnotationValue,
        _ctx: &mut ResolveContext<'_>,
    ) -> Option<AnnotationValue> {
        let AnnotationValue::Markup(items) = value else {
            return None;
        };

        let items = items
            .iter()
            .enumerate()
            .map(|(index, item)| {
                let mut item = item.clone();
                item.id.get_or_insert_with(|| index.to_string());
                item
            })
            .collect();

        Some(AnnotationValue::Markup(items))
    }
}

pub struct StatesAnnotation;

impl Annotation for StatesAnnotation {
    fn name(&self) -> &str {
        "states"
    }

    fn aliases(&self) -> Vec<&str> {
        vec!["state"]
    }

    fn parse(&self, ctx: &mut AnnotationContext<'_>) -> Option<AnnotationValue> {
        let [markup_id, first] = fields::<2>(&patterns::STATE_ID, &ctx.line);

        let states = first
            .iter()
            .map(String::as_str)
            .chain(ctx.contents.lines())
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .enumerate()
            .map(|(index, line)| {
                let [state, id, description] = fields::<3>(&patterns::STATE, line);
                StateEntry {
                    id: id.unwrap_or_else(|| index.to_string()),
                    state: state.unwrap_or_default(),
                    description: ctx.block.markdown(&[description.as_deref()]),
                }
            })
            .collect::<Vec<_>>();

        if states.is_empty() {
            ctx.warn("no states listed, expected `@state {state} - description`");
            return None;
        }

        Some(AnnotationValue::States(vec![StateGroup {
            markup_id,
            states,
            start: ctx.range.start,
        }]))
    }

    fn resolve(
        &self,
        value: &AnnotationValue,
        ctx: &mut ResolveContext<'_>,
    ) -> Option<AnnotationValue> {
        let AnnotationValue::States(groups) = value else {
            return None;
        };

        let parsed = ctx.parsed;
        let examples: Option<&[Markup]> = match parsed.get("markup") {
            Some(AnnotationValue::Markup(items)) => Some(items),
            _ => None,
        };
        let pattern = interpolation(ctx.block.prefix);
        let mut resolved: BTreeMap<String, Vec<ResolvedState>> = BTreeMap::new();

        for group in groups {
            let target = match (examples, &group.markup_id) {
                (None, _) => {
                    ctx.warn(group.start, "there's no @markup in this block to apply states to");
                    None
                }
                (Some(items), Some(id)) => {
                    let found = items.iter().find(|m| m.id.as_deref() == Some(id.as_str()));
                    if found.is_none() {
                        ctx.warn(group.start, format!("there's no @markup with an id of {id}"));
                    }
                    found
                }
                (Some(items), None) => {
                    let found = items.iter().find(|m| m.start > group.start);
                    if found.is_none() {
                        ctx.warn(
                            group.start,
                            format!("there's no @markup after line {}", group.start + 1),
                        );
                    }
                    found
                }
            };

            let key = group
                .markup_id
                .clone()
                .or_else(|| target.and_then(|m| m.id.clone()))
                .unwrap_or_else(|| UNLINKED.to_string());

            let mut missing = Vec::new();
            let markup = target.map(|item| StateMarkup {
                id: item.id.clone().unwrap_or_default(),
                language: item.language.clone(),
                settings: item.settings.clone(),
                description: item.description.clone(),
                raw: apply_states(pattern.as_ref(), &item.raw, &group.states, &mut missing),
                escaped: apply_states(pattern.as_ref(), &item.escaped, &group.states, &mut Vec::new()),
            });
            for reference in missing {
                ctx.warn(group.start, format!("`{reference}` doesn't match any state"));
            }

            resolved.entry(key).or_default().push(ResolvedState {
                states: group.states.clone(),
                markup,
            });
        }

        Some(AnnotationValue::ResolvedStates(resolved))
    }
}

/// Replace every state interpolation in `text`. References that don't
/// match a state are replaced with nothing and collected in `missing`.
fn apply_states(
    pattern: Option<&Regex>,
    text: &str,
    states: &[StateEntry],
    missing: &mut Vec<String>,
) -> String {
    let Some(pattern) = pattern else {
        return text.to_string();
    };

    pattern
        .replace_all(text, |caps: &Captures<'_>| {
            let reference = caps.get(1).map_or("", |m| m.as_str());
            match lookup(reference, states) {
                Some(value) => value,
                None => {
                    if !missing.iter().any(|m| m.as_str() == &caps[0]) {
                        missing.push(caps[0].to_string());
                    }
                    String::new()
                }
            }
        })
        .into_owned()
}

/// Resolve the part after `@state` in an interpolation. A bare field
/// (`.description`) reads the first state; a bracket (`[hover]`) picks a
/// state by id.
fn lookup(reference: &str, states: &[StateEntry]) -> Option<String> {
    fn field(entry: &StateEntry, name: &str) -> Option<String> {
        match name {
            "state" => Some(entry.state.clone()),
            "description" => Some(entry.description.clone()),
            "id" => Some(entry.id.clone()),
            _ => None,
        }
    }

    let by_id = |id: &str| states.iter().find(|entry| entry.id == id);
    let first = states.first()?;
    let segments: Vec<&str> = reference
        .split(['.', '[', ']'])
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();

    match segments.as_slice() {
        [] => Some(first.state.clone()),
        [one] => field(first, one).or_else(|| by_id(one).map(|entry| entry.state.clone())),
        [id, name, ..] => by_id(id).and_then(|entry| field(entry, name)),
    }
}
