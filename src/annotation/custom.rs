//! Annotations defined in the settings file

use super::patterns::{multiple, to_boolean};
use super::{Annotation, AnnotationContext, AnnotationValue};
use crate::config::{CustomAnnotationConfig, CustomAnnotationKind};

/// An annotation declared under `[annotations.<name>]`
#[derive(Debug, Clone)]
pub struct CustomAnnotation {
    name: String,
    kind: CustomAnnotationKind,
    aliases: Vec<String>,
}

impl CustomAnnotation {
    pub fn new(name: impl Into<String>, config: &CustomAnnotationConfig) -> Self {
        Self {
            name: name.into(),
            kind: config.kind,
            aliases: config.aliases.clone(),
        }
    }
}

impl Annotation for CustomAnnotation {
    fn name(&self) -> &str {
        &self.name
    }

    fn aliases(&self) -> Vec<&str> {
        self.aliases.iter().map(String::as_str).collect()
    }

    fn parse(&self, ctx: &mut AnnotationContext<'_>) -> Option<AnnotationValue> {
        match self.kind {
            CustomAnnotationKind::Text => Some(AnnotationValue::Text(
                ctx.markdown(Some(ctx.line.as_str())),
            )),
            CustomAnnotationKind::List => Some(AnnotationValue::List(multiple(
                &ctx.line,
                &ctx.contents,
            ))),
            CustomAnnotationKind::Flag => match to_boolean(&ctx.line, &ctx.contents) {
                Some(flag) => Some(AnnotationValue::Flag(flag)),
                None => {
                    ctx.warn(format!(
                        "expected `true`, `false` or nothing, found `{}`",
                        ctx.line
                    ));
                    None
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{block, file, parse};
    use super::*;

    fn custom(kind: CustomAnnotationKind) -> CustomAnnotation {
        let config = CustomAnnotationConfig {
            kind,
            aliases: vec!["platforms".to_string()],
            filetypes: Vec::new(),
        };
        CustomAnnotation::new("platform", &config)
    }

    #[test]
    fn test_custom_kinds() {
        let file = file();
        let block = block(&file, "");

        let (value, _) = parse(&custom(CustomAnnotationKind::Text), &block, "Web", "Mobile");
        assert_eq!(value, Some(AnnotationValue::Text("Web\nMobile".into())));

        let (value, _) = parse(&custom(CustomAnnotationKind::List), &block, "Web, iOS", "");
        assert_eq!(
            value,
            Some(AnnotationValue::List(vec!["Web".into(), "iOS".into()]))
        );

        let (value, diagnostics) = parse(&custom(CustomAnnotationKind::Flag), &block, "maybe", "");
        assert_eq!(value, None);
        assert_eq!(diagnostics.len(), 1);
    }

    #[test]
    fn test_custom_aliases() {
        let annotation = custom(CustomAnnotationKind::Text);
        assert_eq!(annotation.name(), "platform");
        assert_eq!(annotation.aliases(), vec!["platforms"]);
    }
}
