//! Registry mapping step identifiers to step writers.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::builtin::{Concat, CssMin, Uglify, UGLIFY};
use crate::SharedStep;

/// Alternate identifiers accepted for built-in steps (alias -> canonical).
const BUILTIN_ALIASES: &[(&str, &str)] = &[("uglifyjs", UGLIFY)];

/// Registry errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("unknown step \"{0}\"")]
    UnknownStep(String),

    #[error("step \"{0}\" is already registered")]
    DuplicateStep(String),
}

/// Step writers keyed by canonical name, plus an alias table.
#[derive(Debug, Clone)]
pub struct StepRegistry {
    steps: BTreeMap<String, SharedStep>,
    aliases: BTreeMap<String, String>,
}

impl Default for StepRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl StepRegistry {
    /// A registry with no steps at all.
    pub fn empty() -> Self {
        Self {
            steps: BTreeMap::new(),
            aliases: BTreeMap::new(),
        }
    }

    /// The built-in steps (`concat`, `uglify`, `cssmin`) and their aliases.
    pub fn builtin() -> Self {
        let builtins: [SharedStep; 3] = [Arc::new(Concat), Arc::new(Uglify), Arc::new(CssMin)];

        let mut registry = Self::empty();
        for step in builtins {
            registry.steps.insert(step.name().to_string(), step);
        }
        for (alias, canonical) in BUILTIN_ALIASES {
            registry
                .aliases
                .insert((*alias).to_string(), (*canonical).to_string());
        }
        registry
    }

    /// Register a step under its own name.
    pub fn register(&mut self, step: SharedStep) -> Result<(), RegistryError> {
        let name = step.name().to_string();
        if self.steps.contains_key(&name) || self.aliases.contains_key(&name) {
            return Err(RegistryError::DuplicateStep(name));
        }
        self.steps.insert(name, step);
        Ok(())
    }

    /// Make `alias` resolve to the already registered `canonical` step.
    pub fn alias(
        &mut self,
        alias: impl Into<String>,
        canonical: &str,
    ) -> Result<(), RegistryError> {
        let alias = alias.into();
        if !self.steps.contains_key(canonical) {
            return Err(RegistryError::UnknownStep(canonical.to_string()));
        }
        if self.steps.contains_key(&alias) || self.aliases.contains_key(&alias) {
            return Err(RegistryError::DuplicateStep(alias));
        }
        self.aliases.insert(alias, canonical.to_string());
        Ok(())
    }

    /// Canonical name for an identifier, following aliases.
    pub fn canonical_name<'a>(&'a self, id: &'a str) -> Option<&'a str> {
        if self.steps.contains_key(id) {
            return Some(id);
        }
        self.aliases.get(id).map(String::as_str)
    }

    /// Look up a step by canonical name or alias.
    pub fn get(&self, id: &str) -> Result<SharedStep, RegistryError> {
        self.canonical_name(id)
            .and_then(|name| self.steps.get(name))
            .cloned()
            .ok_or_else(|| RegistryError::UnknownStep(id.to_string()))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.canonical_name(id).is_some()
    }

    /// Canonical names, sorted.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.steps.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FnStep, StepWriter};
    use serde_json::json;

    #[test]
    fn test_builtin_steps_present() {
        let registry = StepRegistry::builtin();
        let names: Vec<&str> = registry.names().collect();
        assert_eq!(names, vec!["concat", "cssmin", "uglify"]);
    }

    #[test]
    fn test_uglifyjs_alias_resolves_to_uglify() {
        let registry = StepRegistry::builtin();
        assert_eq!(registry.canonical_name("uglifyjs"), Some("uglify"));
        assert_eq!(registry.get("uglifyjs").unwrap().name(), "uglify");
        assert_eq!(registry.get("uglify").unwrap().name(), "uglify");
    }

    #[test]
    fn test_unknown_step_errors() {
        let registry = StepRegistry::builtin();
        let err = registry.get("sass").unwrap_err();
        assert_eq!(err, RegistryError::UnknownStep("sass".to_string()));
        assert!(err.to_string().contains("sass"));
    }

    #[test]
    fn test_register_custom_step() {
        let mut registry = StepRegistry::builtin();
        registry
            .register(Arc::new(FnStep::new("copy", |_| json!({}))))
            .unwrap();
        assert!(registry.contains("copy"));
        assert_eq!(registry.get("copy").unwrap().name(), "copy");
    }

    #[test]
    fn test_register_duplicate_rejected() {
        let mut registry = StepRegistry::builtin();
        let err = registry
            .register(Arc::new(FnStep::new("concat", |_| json!({}))))
            .unwrap_err();
        assert_eq!(err, RegistryError::DuplicateStep("concat".to_string()));

        let err = registry
            .register(Arc::new(FnStep::new("uglifyjs", |_| json!({}))))
            .unwrap_err();
        assert_eq!(err, RegistryError::DuplicateStep("uglifyjs".to_string()));
    }

    #[test]
    fn test_alias_requires_known_target() {
        let mut registry = StepRegistry::empty();
        assert_eq!(
            registry.alias("min", "uglify"),
            Err(RegistryError::UnknownStep("uglify".to_string()))
        );

        let mut registry = StepRegistry::builtin();
        registry.alias("csso", "cssmin").unwrap();
        assert_eq!(registry.get("csso").unwrap().name(), "cssmin");
    }
}
