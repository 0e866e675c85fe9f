//! Step writers for asset-flow.
//!
//! A step writer describes the configuration fragment one build step needs
//! for a given input/output file mapping. It never runs the step itself; the
//! fragment is consumed by whatever build tool executes the pipeline.

mod builtin;
mod custom;
mod mapping;
mod registry;

pub use builtin::{files_fragment, Concat, CssMin, Uglify};
pub use custom::{FilesStep, FnStep};
pub use mapping::{FileMapping, OutputMode};
pub use registry::{RegistryError, StepRegistry};

use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// A named step that turns a file mapping into a configuration fragment.
///
/// Implementations must be stateless: the same mapping always yields the same
/// fragment. Built-in steps and caller-supplied steps are interchangeable.
pub trait StepWriter: fmt::Debug + Send + Sync {
    /// Canonical name, used as the key in the generated configuration.
    fn name(&self) -> &str;

    /// Build the fragment for one input/output mapping.
    fn create_config(&self, mapping: &FileMapping) -> Value;

    /// How this step lays out its outputs when another step follows it.
    fn output_mode(&self) -> OutputMode {
        OutputMode::Merged
    }
}

/// Shared handle to a step writer.
pub type SharedStep = Arc<dyn StepWriter>;
