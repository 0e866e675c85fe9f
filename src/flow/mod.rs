//! Flow: the ordered step chain applied to each block type.
//!
//! A flow is built once from a [`FlowSpec`], resolving step identifiers
//! against a [`StepRegistry`], and is read-only afterwards.

mod post;

pub use post::{FnPost, OptionsPost, PostProcessor, SharedPost};

use std::collections::HashSet;
use std::sync::Arc;

use asset_steps::{SharedStep, StepRegistry, StepWriter};
use tracing::debug;

use crate::error::ConfigurationError;
use post::BoundPost;

/// One entry of a step chain: a registry identifier or a step object.
#[derive(Debug, Clone)]
pub enum StepRef {
    Id(String),
    Custom(SharedStep),
}

impl StepRef {
    pub fn custom(step: impl StepWriter + 'static) -> Self {
        StepRef::Custom(Arc::new(step))
    }
}

impl From<&str> for StepRef {
    fn from(id: &str) -> Self {
        StepRef::Id(id.to_string())
    }
}

impl From<String> for StepRef {
    fn from(id: String) -> Self {
        StepRef::Id(id)
    }
}

impl From<SharedStep> for StepRef {
    fn from(step: SharedStep) -> Self {
        StepRef::Custom(step)
    }
}

/// Declarative flow description: step chains and post-processors per block
/// type, in declaration order.
#[derive(Debug, Clone, Default)]
pub struct FlowSpec {
    steps: Vec<(String, Vec<StepRef>)>,
    post: Vec<(String, SharedPost)>,
}

impl FlowSpec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the chain for a block type. Redeclaring a type replaces its chain
    /// but keeps its original position.
    pub fn steps<I, S>(mut self, block_type: impl Into<String>, steps: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<StepRef>,
    {
        let block_type = block_type.into();
        let chain: Vec<StepRef> = steps.into_iter().map(Into::into).collect();
        match self.steps.iter_mut().find(|(t, _)| *t == block_type) {
            Some((_, existing)) => *existing = chain,
            None => self.steps.push((block_type, chain)),
        }
        self
    }

    /// Register a post-processor for a block type.
    pub fn post(self, block_type: impl Into<String>, processor: impl PostProcessor + 'static) -> Self {
        self.post_shared(block_type, Arc::new(processor))
    }

    pub fn post_shared(mut self, block_type: impl Into<String>, processor: SharedPost) -> Self {
        self.post.push((block_type.into(), processor));
        self
    }
}

/// Resolved step chains per block type.
#[derive(Debug, Clone, Default)]
pub struct Flow {
    chains: Vec<(String, Vec<SharedStep>)>,
    post: Vec<(String, BoundPost)>,
}

impl Flow {
    /// Build a flow against the built-in step registry.
    pub fn new(spec: FlowSpec) -> Result<Self, ConfigurationError> {
        Self::with_registry(spec, &StepRegistry::builtin())
    }

    /// Build a flow against a caller-supplied registry.
    pub fn with_registry(
        spec: FlowSpec,
        registry: &StepRegistry,
    ) -> Result<Self, ConfigurationError> {
        let mut chains = Vec::with_capacity(spec.steps.len());

        for (block_type, refs) in spec.steps {
            let mut chain = Vec::with_capacity(refs.len());
            for step_ref in refs {
                let step = match step_ref {
                    StepRef::Id(id) => registry.get(&id)?,
                    StepRef::Custom(step) => {
                        if step.name().trim().is_empty() {
                            return Err(ConfigurationError::InvalidStep {
                                block_type,
                                reason: "custom step has an empty name".to_string(),
                            });
                        }
                        step
                    }
                };
                chain.push(step);
            }
            debug!(
                block_type = %block_type,
                steps = ?chain.iter().map(|s| s.name()).collect::<Vec<_>>(),
                "resolved step chain"
            );
            chains.push((block_type, chain));
        }

        let post = spec
            .post
            .into_iter()
            .map(|(block_type, processor)| {
                let step = registry
                    .canonical_name(processor.step())
                    .unwrap_or(processor.step())
                    .to_string();
                (block_type, BoundPost { step, processor })
            })
            .collect();

        Ok(Self { chains, post })
    }

    /// Block types in declaration order.
    pub fn block_types(&self) -> impl Iterator<Item = &str> {
        self.chains.iter().map(|(t, _)| t.as_str())
    }

    /// The ordered chain for a block type; empty when the type is not
    /// configured.
    pub fn steps_for(&self, block_type: &str) -> &[SharedStep] {
        self.chains
            .iter()
            .find(|(t, _)| t == block_type)
            .map(|(_, chain)| chain.as_slice())
            .unwrap_or(&[])
    }

    /// Every step used by any block type, de-duplicated by name. The first
    /// occurrence wins and first-seen order is kept.
    pub fn all_step_writers(&self) -> Vec<SharedStep> {
        let mut seen = HashSet::new();
        self.chains
            .iter()
            .flat_map(|(_, chain)| chain.iter())
            .filter(|step| seen.insert(step.name().to_string()))
            .cloned()
            .collect()
    }

    /// Post-processors registered for `block_type` that follow `step`.
    pub fn post_processors<'a>(
        &'a self,
        block_type: &'a str,
        step: &'a str,
    ) -> impl Iterator<Item = &'a SharedPost> + 'a {
        self.post
            .iter()
            .filter(move |(t, bound)| t == block_type && bound.step == step)
            .map(|(_, bound)| &bound.processor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use asset_steps::{FnStep, RegistryError};
    use serde_json::json;

    fn names(steps: &[SharedStep]) -> Vec<String> {
        steps.iter().map(|s| s.name().to_string()).collect()
    }

    #[test]
    fn test_steps_for_resolves_aliases() {
        let flow = Flow::new(FlowSpec::new().steps("js", ["concat", "uglifyjs"])).unwrap();
        assert_eq!(names(flow.steps_for("js")), vec!["concat", "uglify"]);
    }

    #[test]
    fn test_custom_step_objects_are_accepted() {
        let copy = FnStep::new("copy", |_| json!({}));
        let flow = Flow::new(FlowSpec::new().steps(
            "js",
            vec![
                StepRef::from("concat"),
                StepRef::from("uglifyjs"),
                StepRef::custom(copy),
            ],
        ))
        .unwrap();
        assert_eq!(names(flow.steps_for("js")), vec!["concat", "uglify", "copy"]);
    }

    #[test]
    fn test_unknown_step_fails_construction() {
        let err = Flow::new(FlowSpec::new().steps("js", ["concat", "closure"])).unwrap_err();
        assert_eq!(
            err,
            ConfigurationError::Registry(RegistryError::UnknownStep("closure".to_string()))
        );
    }

    #[test]
    fn test_custom_step_with_empty_name_rejected() {
        let nameless = FnStep::new("  ", |_| json!({}));
        let err = Flow::new(FlowSpec::new().steps("js", vec![StepRef::custom(nameless)]))
            .unwrap_err();
        assert!(matches!(err, ConfigurationError::InvalidStep { .. }));
    }

    #[test]
    fn test_unconfigured_type_is_empty() {
        let flow = Flow::new(FlowSpec::new().steps("js", ["concat"])).unwrap();
        assert!(flow.steps_for("css").is_empty());
    }

    #[test]
    fn test_all_step_writers_dedupes_in_first_seen_order() {
        let flow = Flow::new(
            FlowSpec::new()
                .steps("js", ["concat", "uglifyjs"])
                .steps("css", ["concat", "cssmin"]),
        )
        .unwrap();
        assert_eq!(names(&flow.all_step_writers()), vec!["concat", "uglify", "cssmin"]);
    }

    #[test]
    fn test_all_step_writers_follows_declaration_order() {
        let flow = Flow::new(
            FlowSpec::new()
                .steps("css", ["cssmin"])
                .steps("js", ["concat", "uglify"]),
        )
        .unwrap();
        assert_eq!(names(&flow.all_step_writers()), vec!["cssmin", "concat", "uglify"]);
        assert_eq!(flow.block_types().collect::<Vec<_>>(), vec!["css", "js"]);
    }

    #[test]
    fn test_redeclared_type_replaces_chain_in_place() {
        let flow = Flow::new(
            FlowSpec::new()
                .steps("js", ["concat"])
                .steps("css", ["cssmin"])
                .steps("js", ["uglify"]),
        )
        .unwrap();
        assert_eq!(flow.block_types().collect::<Vec<_>>(), vec!["js", "css"]);
        assert_eq!(names(flow.steps_for("js")), vec!["uglify"]);
    }

    #[test]
    fn test_post_processor_step_is_canonicalized() {
        let flow = Flow::new(
            FlowSpec::new()
                .steps("js", ["concat", "uglifyjs"])
                .post("js", OptionsPost::new("uglifyjs", json!({"mangle": false}))),
        )
        .unwrap();
        assert_eq!(flow.post_processors("js", "uglify").count(), 1);
        assert_eq!(flow.post_processors("js", "concat").count(), 0);
        assert_eq!(flow.post_processors("css", "uglify").count(), 0);
    }
}
