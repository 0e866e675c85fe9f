//! Configuration
//!
//! - [`merge`]: JSON merge policies for step fragments and existing configs.
//! - [`project`]: the `asset-flow.toml` project file (paths, behavior, step
//!   chains, post-processors).

mod merge;
mod project;

pub use merge::{
    deep_merge, merge_fragment, merge_layers, write_generated, OutputConfig, FILES_KEY,
    GENERATED_KEY,
};
pub use project::{BehaviorConfig, ProjectConfig, ProjectError, DEFAULT_PROJECT_FILE};
