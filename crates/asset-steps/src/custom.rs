//! Caller-defined step writers.

use serde_json::Value;
use std::fmt;

use crate::builtin::files_fragment;
use crate::{FileMapping, OutputMode, StepWriter};

/// A step backed by a closure.
///
/// ```
/// use asset_steps::{FnStep, StepWriter};
/// use serde_json::json;
///
/// let copy = FnStep::new("copy", |_| json!({}));
/// assert_eq!(copy.name(), "copy");
/// ```
pub struct FnStep {
    name: String,
    mode: OutputMode,
    build: Box<dyn Fn(&FileMapping) -> Value + Send + Sync>,
}

impl FnStep {
    pub fn new<F>(name: impl Into<String>, build: F) -> Self
    where
        F: Fn(&FileMapping) -> Value + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            mode: OutputMode::Merged,
            build: Box::new(build),
        }
    }

    /// Set the output layout used when the step is not last in a chain.
    pub fn with_output_mode(mut self, mode: OutputMode) -> Self {
        self.mode = mode;
        self
    }
}

impl fmt::Debug for FnStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnStep")
            .field("name", &self.name)
            .field("mode", &self.mode)
            .finish_non_exhaustive()
    }
}

impl StepWriter for FnStep {
    fn name(&self) -> &str {
        &self.name
    }

    fn create_config(&self, mapping: &FileMapping) -> Value {
        (self.build)(mapping)
    }

    fn output_mode(&self) -> OutputMode {
        self.mode
    }
}

/// A named step emitting the standard `files` fragment.
///
/// Used for steps declared inline in project files, where no code is
/// available to build a custom fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilesStep {
    name: String,
    mode: OutputMode,
}

impl FilesStep {
    pub fn new(name: impl Into<String>, mode: OutputMode) -> Self {
        Self {
            name: name.into(),
            mode,
        }
    }
}

impl StepWriter for FilesStep {
    fn name(&self) -> &str {
        &self.name
    }

    fn create_config(&self, mapping: &FileMapping) -> Value {
        files_fragment(mapping)
    }

    fn output_mode(&self) -> OutputMode {
        self.mode
    }
}
