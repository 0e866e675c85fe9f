//! asset-flow - compile asset blocks into build-step configuration
//!
//! A parsed document declares asset blocks: groups of source references that
//! end up in one output file, tagged with a block type such as `js` or
//! `css`. This crate turns those blocks into the configuration a build tool
//! needs to run a chain of steps (concatenate, minify, ...) over them. It
//! never runs the steps itself.
//!
//! - [`flow`]: per block type step chains, resolved against the step registry
//!   from the `asset-steps` crate.
//! - [`resolve`]: maps source references to files across search roots.
//! - [`writer`]: folds resolved sources through a chain and merges the
//!   fragments into an output configuration.
//! - [`config`]: merge policies and the `asset-flow.toml` project file.

pub mod config;
pub mod error;
pub mod flow;
pub mod logging;
pub mod model;
pub mod resolve;
pub mod writer;

pub use asset_steps::{
    FileMapping, FnStep, OutputMode, RegistryError, SharedStep, StepRegistry, StepWriter,
};
pub use config::{OutputConfig, ProjectConfig, ProjectError};
pub use error::{ConfigurationError, ResolveError};
pub use flow::{Flow, FlowSpec, FnPost, OptionsPost, PostProcessor, StepRef};
pub use model::{Block, File, InputError};
pub use resolve::{HookOutcome, ResolveHook, SourceQuery, SourceResolver};
pub use writer::{BehaviorOptions, ConfigWriter, PathOptions, Roots};
