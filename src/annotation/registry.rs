//! Annotation registry
//!
//! Annotations are registered either for every file type or for a list of
//! file types. Looking up the annotations for a file overlays the file type
//! specific ones on the defaults, so a project can swap out `@markup` for
//! `.scss` files while every other file keeps the built-in one.

use super::{Annotation, CustomAnnotation, builtin_annotations};
use crate::config::Settings;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use thiserror::Error;

/// Scope name used in errors for annotations registered for every file type
const DEFAULT_SCOPE: &str = "default";

/// Registry errors with actionable suggestions
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error(
        "Annotation '{name}' is already registered for {scope} files\nSuggestion: Pick another name or restrict it to other file types with `filetypes`"
    )]
    Duplicate { name: String, scope: String },

    #[error(
        "Alias '{alias}' of '{name}' is already used by '{existing}'\nSuggestion: Remove the alias or rename the annotation"
    )]
    AliasConflict {
        alias: String,
        name: String,
        existing: String,
    },

    #[error("Annotation name '{name}' is invalid: names can't be empty or contain whitespace")]
    InvalidName { name: String },
}

/// The annotations that apply to one file type
#[derive(Clone, Default)]
pub struct AnnotationSet {
    annotations: BTreeMap<String, Arc<dyn Annotation>>,
    aliases: HashMap<String, String>,
}

impl AnnotationSet {
    /// Canonical name for a name or alias written in a comment
    pub fn canonical(&self, written: &str) -> Option<&str> {
        if let Some((name, _)) = self.annotations.get_key_value(written) {
            return Some(name);
        }
        self.aliases.get(written).map(String::as_str)
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn Annotation>> {
        self.annotations.get(name)
    }

    /// Annotations in name order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Arc<dyn Annotation>)> {
        self.annotations
            .iter()
            .map(|(name, annotation)| (name.as_str(), annotation))
    }

    pub fn len(&self) -> usize {
        self.annotations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.annotations.is_empty()
    }
}

impl std::fmt::Debug for AnnotationSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnnotationSet")
            .field("annotations", &self.annotations.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// All registered annotations, by scope
#[derive(Default)]
pub struct AnnotationRegistry {
    defaults: BTreeMap<String, Arc<dyn Annotation>>,
    by_filetype: HashMap<String, BTreeMap<String, Arc<dyn Annotation>>>,
}

impl AnnotationRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding every built-in annotation
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        for annotation in builtin_annotations() {
            // Built-in names and aliases are distinct
            if let Err(e) = registry.register(annotation, &[]) {
                tracing::error!("[annotation] failed to register built-in: {e}");
            }
        }
        registry
    }

    /// Built-ins plus the annotations declared in the settings
    pub fn from_settings(settings: &Settings) -> Result<Self, RegistryError> {
        let mut registry = Self::with_builtins();
        for (name, config) in &settings.annotations {
            let filetypes: Vec<&str> = config.filetypes.iter().map(String::as_str).collect();
            registry.register(Arc::new(CustomAnnotation::new(name, config)), &filetypes)?;
            tracing::debug!("[annotation] registered custom annotation '{name}'");
        }
        Ok(registry)
    }

    /// Register an annotation for `filetypes`, or for every file type when
    /// the list is empty.
    ///
    /// Registering a name for a file type that already exists as a default
    /// overrides the default for that file type only.
    pub fn register(
        &mut self,
        annotation: Arc<dyn Annotation>,
        filetypes: &[&str],
    ) -> Result<(), RegistryError> {
        let name = annotation.name().to_string();
        if name.is_empty() || name.chars().any(char::is_whitespace) {
            return Err(RegistryError::InvalidName { name });
        }

        let scopes: Vec<Option<&str>> = if filetypes.is_empty() {
            vec![None]
        } else {
            filetypes.iter().map(|ft| Some(*ft)).collect()
        };

        for scope in &scopes {
            if self.scope(*scope).is_some_and(|map| map.contains_key(&name)) {
                return Err(RegistryError::Duplicate {
                    name,
                    scope: scope.unwrap_or(DEFAULT_SCOPE).to_string(),
                });
            }
        }
        self.check_aliases(&name, &annotation.aliases())?;

        for scope in scopes {
            let map = match scope {
                None => &mut self.defaults,
                Some(filetype) => self.by_filetype.entry(filetype.to_lowercase()).or_default(),
            };
            map.insert(name.clone(), annotation.clone());
        }
        Ok(())
    }

    fn scope(&self, filetype: Option<&str>) -> Option<&BTreeMap<String, Arc<dyn Annotation>>> {
        match filetype {
            None => Some(&self.defaults),
            Some(filetype) => self.by_filetype.get(&filetype.to_lowercase()),
        }
    }

    fn all(&self) -> impl Iterator<Item = &Arc<dyn Annotation>> {
        self.defaults
            .values()
            .chain(self.by_filetype.values().flat_map(|map| map.values()))
    }

    /// An alias may not shadow any registered name, nor belong to two
    /// different annotations. The new name may not be an existing alias.
    fn check_aliases(&self, name: &str, aliases: &[&str]) -> Result<(), RegistryError> {
        for existing in self.all() {
            let existing_name = existing.name();
            if existing_name == name {
                continue;
            }
            let existing_aliases = existing.aliases();

            if existing_aliases.contains(&name) {
                return Err(RegistryError::AliasConflict {
                    alias: name.to_string(),
                    name: name.to_string(),
                    existing: existing_name.to_string(),
                });
            }
            for alias in aliases {
                if *alias == existing_name || existing_aliases.contains(alias) {
                    return Err(RegistryError::AliasConflict {
                        alias: alias.to_string(),
                        name: name.to_string(),
                        existing: existing_name.to_string(),
                    });
                }
            }
        }
        Ok(())
    }

    /// The annotations that apply to files of `filetype`
    pub fn list(&self, filetype: &str) -> AnnotationSet {
        let mut annotations = self.defaults.clone();
        if let Some(overrides) = self.by_filetype.get(&filetype.to_lowercase()) {
            annotations.extend(overrides.iter().map(|(k, v)| (k.clone(), v.clone())));
        }

        let aliases = annotations
            .iter()
            .flat_map(|(name, annotation)| {
                annotation
                    .aliases()
                    .into_iter()
                    .map(|alias| (alias.to_string(), name.clone()))
                    .collect::<Vec<_>>()
            })
            .collect();

        AnnotationSet {
            annotations,
            aliases,
        }
    }

    /// Every registered name with its aliases and the file types it is
    /// limited to (empty for every file type)
    pub fn describe(&self) -> Vec<(String, Vec<String>, Vec<String>)> {
        let mut rows: BTreeMap<String, (Vec<String>, Vec<String>)> = BTreeMap::new();

        for (name, annotation) in &self.defaults {
            let aliases = annotation.aliases().iter().map(|a| a.to_string()).collect();
            rows.insert(name.clone(), (aliases, Vec::new()));
        }
        for (filetype, map) in &self.by_filetype {
            for (name, annotation) in map {
                let row = rows.entry(name.clone()).or_insert_with(|| {
                    let aliases = annotation.aliases().iter().map(|a| a.to_string()).collect();
                    (aliases, Vec::new())
                });
                row.1.push(filetype.clone());
            }
        }

        rows.into_iter()
            .map(|(name, (aliases, mut filetypes))| {
                filetypes.sort();
                (name, aliases, filetypes)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CustomAnnotationConfig, CustomAnnotationKind};

    fn custom(name: &str, aliases: &[&str]) -> Arc<dyn Annotation> {
        let config = CustomAnnotationConfig {
            kind: CustomAnnotationKind::Text,
            aliases: aliases.iter().map(|a| a.to_string()).collect(),
            filetypes: Vec::new(),
        };
        Arc::new(CustomAnnotation::new(name, &config))
    }

    #[test]
    fn test_builtins_resolve_aliases() {
        let registry = AnnotationRegistry::with_builtins();
        let set = registry.list("java");
        assert_eq!(set.canonical("name"), Some("name"));
        assert_eq!(set.canonical("title"), Some("name"));
        assert_eq!(set.canonical("param"), Some("arg"));
        assert_eq!(set.canonical("desc"), Some("description"));
        assert_eq!(set.canonical("state"), Some("states"));
        assert_eq!(set.canonical("unknown"), None);
        assert_eq!(set.len(), 24);
    }

    #[test]
    fn test_alias_conflicts_are_rejected() {
        let mut registry = AnnotationRegistry::with_builtins();

        let err = registry.register(custom("heading", &[]), &[]).unwrap_err();
        assert!(matches!(err, RegistryError::AliasConflict { .. }));

        let err = registry.register(custom("platform", &["page"]), &[]).unwrap_err();
        assert!(matches!(err, RegistryError::AliasConflict { .. }));

        let err = registry.register(custom("platform", &["desc"]), &[]).unwrap_err();
        assert!(matches!(err, RegistryError::AliasConflict { .. }));

        assert!(registry.register(custom("platform", &["os"]), &[]).is_ok());
    }

    #[test]
    fn test_duplicate_in_same_scope() {
        let mut registry = AnnotationRegistry::with_builtins();
        let err = registry.register(custom("name", &[]), &[]).unwrap_err();
        assert_eq!(
            err,
            RegistryError::Duplicate {
                name: "name".to_string(),
                scope: "default".to_string()
            }
        );
    }

    #[test]
    fn test_filetype_override() {
        let mut registry = AnnotationRegistry::with_builtins();
        registry.register(custom("name", &["title"]), &["scss"]).unwrap();
        registry.register(custom("mixin", &[]), &["scss", "SASS"]).unwrap();

        let scss = registry.list("scss");
        assert!(scss.get("mixin").is_some());
        assert_eq!(scss.canonical("title"), Some("name"));
        assert!(registry.list("sass").get("mixin").is_some());
        assert!(registry.list("java").get("mixin").is_none());

        let rows = registry.describe();
        let mixin = rows.iter().find(|(name, _, _)| name == "mixin").unwrap();
        assert_eq!(mixin.2, vec!["sass", "scss"]);
    }

    #[test]
    fn test_invalid_name() {
        let mut registry = AnnotationRegistry::new();
        let err = registry.register(custom("two words", &[]), &[]).unwrap_err();
        assert!(matches!(err, RegistryError::InvalidName { .. }));
    }

    #[test]
    fn test_from_settings_registers_custom() {
        let mut settings = Settings::default();
        settings.annotations.insert(
            "platform".to_string(),
            CustomAnnotationConfig {
                kind: CustomAnnotationKind::List,
                aliases: vec!["platforms".to_string()],
                filetypes: vec!["js".to_string()],
            },
        );
        let registry = AnnotationRegistry::from_settings(&settings).unwrap();
        assert_eq!(registry.list("js").canonical("platforms"), Some("platform"));
        assert_eq!(registry.list("css").canonical("platforms"), None);
    }
}
