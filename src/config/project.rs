//! Project file (`asset-flow.toml`)
//!
//! ```toml
//! [paths]
//! root = ["app", "vendor"]   # or: input = "app"
//! dest = "dist"
//! staging = ".tmp"
//!
//! [behavior]
//! warn_missing = true
//!
//! [steps]
//! js = ["concat", "uglifyjs"]
//! css = ["concat", { name = "autoprefix", per_source = true }, "cssmin"]
//!
//! [[post.js]]
//! step = "uglify"
//! options = { mangle = false }
//! ```
//!
//! Block types keep the order in which they appear in the file.

use serde::Deserialize;
use serde_json::Value;
use std::fs;
use std::io;
use std::path::Path;
use std::sync::Arc;

use asset_steps::{FilesStep, OutputMode, StepRegistry};

use crate::error::ConfigurationError;
use crate::flow::{Flow, FlowSpec, OptionsPost, StepRef};
use crate::writer::{BehaviorOptions, ConfigWriter, PathOptions};

/// File name looked up when no project file is given.
pub const DEFAULT_PROJECT_FILE: &str = "asset-flow.toml";

/// Error types for project file operations
#[derive(Debug, thiserror::Error)]
pub enum ProjectError {
    #[error("Failed to read project file: {0}")]
    IoError(#[from] io::Error),

    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Invalid entry: {0}")]
    InvalidEntry(String),

    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
}

/// `[behavior]` table
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct BehaviorConfig {
    /// Fail on sources that cannot be found (default: false)
    #[serde(default)]
    pub warn_missing: bool,
}

/// Project configuration from asset-flow.toml
#[derive(Debug, Clone, Deserialize)]
pub struct ProjectConfig {
    pub paths: PathOptions,

    #[serde(default)]
    pub behavior: BehaviorConfig,

    /// Block type -> step chain
    #[serde(default)]
    pub steps: toml::Table,

    /// Block type -> post-processor entries
    #[serde(default)]
    pub post: toml::Table,
}

/// One element of a `[steps]` chain.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum StepEntry {
    Id(String),
    Inline {
        name: String,
        #[serde(default)]
        per_source: bool,
    },
}

/// One `[[post.<type>]]` entry.
#[derive(Debug, Clone, Deserialize)]
struct PostEntry {
    step: String,
    #[serde(default)]
    options: Option<toml::Value>,
}

impl ProjectConfig {
    /// Load and parse a project file
    pub fn from_file(path: &Path) -> Result<Self, ProjectError> {
        let contents = fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse a project file from a TOML string
    pub fn parse(s: &str) -> Result<Self, ProjectError> {
        let config: ProjectConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate paths and the shape of every step and post entry.
    pub fn validate(&self) -> Result<(), ProjectError> {
        self.paths.validate()?;
        self.flow_spec()?;
        Ok(())
    }

    /// Declarative flow described by `[steps]` and `[post]`.
    pub fn flow_spec(&self) -> Result<FlowSpec, ProjectError> {
        let mut spec = FlowSpec::new();

        for (block_type, chain) in &self.steps {
            let entries = chain.clone().try_into::<Vec<StepEntry>>().map_err(|e| {
                ProjectError::InvalidEntry(format!("steps.{}: {}", block_type, e))
            })?;
            let refs: Vec<StepRef> = entries
                .into_iter()
                .map(|entry| match entry {
                    StepEntry::Id(id) => StepRef::Id(id),
                    StepEntry::Inline { name, per_source } => {
                        let mode = if per_source {
                            OutputMode::PerSource
                        } else {
                            OutputMode::Merged
                        };
                        StepRef::Custom(Arc::new(FilesStep::new(name, mode)))
                    }
                })
                .collect();
            spec = spec.steps(block_type.clone(), refs);
        }

        for (block_type, entries) in &self.post {
            let entries = entries.clone().try_into::<Vec<PostEntry>>().map_err(|e| {
                ProjectError::InvalidEntry(format!("post.{}: {}", block_type, e))
            })?;
            for entry in entries {
                let options = entry.options.map(toml_to_json).unwrap_or(Value::Null);
                if !options.is_object() && !options.is_null() {
                    return Err(ProjectError::InvalidEntry(format!(
                        "post.{}: options for step '{}' must be a table",
                        block_type, entry.step
                    )));
                }
                spec = spec.post(block_type.clone(), OptionsPost::new(entry.step, options));
            }
        }

        Ok(spec)
    }

    /// Build the flow against the built-in registry.
    pub fn flow(&self) -> Result<Flow, ProjectError> {
        self.flow_with_registry(&StepRegistry::builtin())
    }

    pub fn flow_with_registry(&self, registry: &StepRegistry) -> Result<Flow, ProjectError> {
        Ok(Flow::with_registry(self.flow_spec()?, registry)?)
    }

    pub fn behavior_options(&self) -> BehaviorOptions {
        BehaviorOptions::default().warn_missing(self.behavior.warn_missing)
    }

    /// Writer for this project, using the built-in registry.
    pub fn config_writer(&self) -> Result<ConfigWriter, ProjectError> {
        Ok(ConfigWriter::new(
            self.flow()?,
            self.paths.clone(),
            self.behavior_options(),
        )?)
    }
}

/// Convert TOML Value to JSON Value
fn toml_to_json(toml: toml::Value) -> Value {
    match toml {
        toml::Value::String(s) => Value::String(s),
        toml::Value::Integer(i) => Value::Number(i.into()),
        toml::Value::Float(f) => serde_json::Number::from_f64(f)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        toml::Value::Boolean(b) => Value::Bool(b),
        toml::Value::Datetime(dt) => Value::String(dt.to_string()),
        toml::Value::Array(arr) => Value::Array(arr.into_iter().map(toml_to_json).collect()),
        toml::Value::Table(table) => {
            Value::Object(table.into_iter().map(|(k, v)| (k, toml_to_json(v))).collect())
        }
    }
}
