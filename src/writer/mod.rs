//! ConfigWriter: compiles a file's blocks into step configuration.
//!
//! For each block the writer resolves the sources, then folds them through
//! the block type's step chain. Every step but the last writes under the
//! staging directory, so the next step can pick its output up; the last step
//! writes to the destination directory.
//!
//! Fragments accumulate per step in a fresh `generated` mapping. Only once
//! every block has been processed is that mapping written into the caller's
//! configuration, so a resolution failure never leaves a partial result.

pub mod staging;

use std::fmt;
use std::path::PathBuf;

use asset_steps::{FileMapping, OutputMode, SharedStep};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::config::{merge_fragment, write_generated, OutputConfig};
use crate::error::{ConfigurationError, ResolveError};
use crate::flow::Flow;
use crate::model::{Block, File};
use crate::resolve::{ResolveHook, SourceResolver};

/// One root directory or an ordered list of them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Roots {
    One(PathBuf),
    Many(Vec<PathBuf>),
}

impl Roots {
    pub fn to_vec(&self) -> Vec<PathBuf> {
        match self {
            Roots::One(root) => vec![root.clone()],
            Roots::Many(roots) => roots.clone(),
        }
    }
}

/// Directory layout of a writer.
///
/// `input` is shorthand for a single-element `root`; at most one of the two
/// may be set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input: Option<PathBuf>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root: Option<Roots>,

    /// Final destination directory.
    pub dest: PathBuf,

    /// Directory under which intermediate step outputs are staged.
    pub staging: PathBuf,
}

impl PathOptions {
    /// Single input directory.
    pub fn with_input(
        input: impl Into<PathBuf>,
        dest: impl Into<PathBuf>,
        staging: impl Into<PathBuf>,
    ) -> Self {
        Self {
            input: Some(input.into()),
            root: None,
            dest: dest.into(),
            staging: staging.into(),
        }
    }

    /// Ordered search roots.
    pub fn with_roots<I, P>(roots: I, dest: impl Into<PathBuf>, staging: impl Into<PathBuf>) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self {
            input: None,
            root: Some(Roots::Many(roots.into_iter().map(Into::into).collect())),
            dest: dest.into(),
            staging: staging.into(),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.input.is_some() && self.root.is_some() {
            return Err(ConfigurationError::ConflictingRoots);
        }
        if self.dest.as_os_str().is_empty() {
            return Err(ConfigurationError::EmptyDirectory("dest"));
        }
        if self.staging.as_os_str().is_empty() {
            return Err(ConfigurationError::EmptyDirectory("staging"));
        }
        Ok(())
    }

    /// Configured search roots, in order.
    pub fn roots(&self) -> Vec<PathBuf> {
        match (&self.input, &self.root) {
            (Some(input), _) => vec![input.clone()],
            (None, Some(roots)) => roots.to_vec(),
            (None, None) => Vec::new(),
        }
    }
}

/// Resolution behavior of a writer.
#[derive(Clone, Default)]
pub struct BehaviorOptions {
    /// Fail on sources that cannot be found.
    pub warn_missing: bool,

    /// Hook consulted before the normal root search.
    pub resolve_source: Option<ResolveHook>,
}

impl fmt::Debug for BehaviorOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BehaviorOptions")
            .field("warn_missing", &self.warn_missing)
            .field("resolve_source", &self.resolve_source.is_some())
            .finish()
    }
}

impl BehaviorOptions {
    pub fn warn_missing(mut self, warn_missing: bool) -> Self {
        self.warn_missing = warn_missing;
        self
    }

    pub fn resolve_source(mut self, hook: ResolveHook) -> Self {
        self.resolve_source = Some(hook);
        self
    }
}

/// Compiles blocks into step configuration.
#[derive(Debug, Clone)]
pub struct ConfigWriter {
    flow: Flow,
    dest: PathBuf,
    staging: PathBuf,
    resolver: SourceResolver,
}

/// Per-step `generated` mappings being built, in first-touched order.
type Generated = Vec<(String, Map<String, Value>)>;

impl ConfigWriter {
    pub fn new(
        flow: Flow,
        paths: PathOptions,
        behavior: BehaviorOptions,
    ) -> Result<Self, ConfigurationError> {
        paths.validate()?;
        let resolver = SourceResolver::new(paths.roots())
            .warn_missing(behavior.warn_missing)
            .with_hook(behavior.resolve_source);
        Ok(Self {
            flow,
            dest: paths.dest,
            staging: paths.staging,
            resolver,
        })
    }

    pub fn flow(&self) -> &Flow {
        &self.flow
    }

    pub fn resolver(&self) -> &SourceResolver {
        &self.resolver
    }

    /// The chain for `block_type`, or every step of the flow when `None`.
    pub fn step_writers(&self, block_type: Option<&str>) -> Vec<SharedStep> {
        match block_type {
            Some(block_type) => self.flow.steps_for(block_type).to_vec(),
            None => self.flow.all_step_writers(),
        }
    }

    /// Compile `file` into a new configuration.
    pub fn process(&self, file: &File) -> Result<OutputConfig, ResolveError> {
        let mut config = OutputConfig::new();
        self.process_into(file, &mut config)?;
        Ok(config)
    }

    /// Compile `file` into an existing configuration.
    ///
    /// Each touched step's `generated` key is replaced; everything else in
    /// `config` is preserved. On error `config` is left unchanged.
    pub fn process_into(&self, file: &File, config: &mut OutputConfig) -> Result<(), ResolveError> {
        self.process_all(std::slice::from_ref(file), config)
    }

    /// Compile several files into one fresh `generated` set per step.
    pub fn process_all(&self, files: &[File], config: &mut OutputConfig) -> Result<(), ResolveError> {
        let mut generated = Generated::new();
        for file in files {
            self.generate_file(file, &mut generated)?;
        }
        write_generated(
            config,
            generated
                .into_iter()
                .map(|(step, map)| (step, Value::Object(map)))
                .collect(),
        );
        Ok(())
    }

    fn generate_file(&self, file: &File, generated: &mut Generated) -> Result<(), ResolveError> {
        debug!(file = %file.path.display(), blocks = file.blocks.len(), "processing file");
        for block in &file.blocks {
            let sources = block
                .src
                .iter()
                .map(|reference| {
                    self.resolver
                        .resolve(reference, file, block)
                        .map(|path| staging::display(&path))
                })
                .collect::<Result<Vec<_>, _>>()?;
            self.generate_block(block, sources, generated);
        }
        Ok(())
    }

    fn generate_block(&self, block: &Block, sources: Vec<String>, generated: &mut Generated) {
        let chain = self.flow.steps_for(&block.kind);
        if chain.is_empty() {
            debug!(block_type = %block.kind, dest = %block.dest, "no steps for block type");
            return;
        }

        let mut inputs = sources;
        for (index, step) in chain.iter().enumerate() {
            let last = index + 1 == chain.len();
            let mappings = self.mappings_for(step, block, &inputs, last);
            let step_generated = generated_for(generated, step.name());

            for mapping in &mappings {
                match step.create_config(mapping) {
                    Value::Object(fragment) => merge_fragment(step_generated, fragment),
                    Value::Null => {}
                    other => warn!(
                        step = step.name(),
                        fragment = %other,
                        "ignoring non-object fragment"
                    ),
                }
            }
            for post in self.flow.post_processors(&block.kind, step.name()) {
                post.apply(step_generated, block);
            }

            debug!(
                step = step.name(),
                dest = %block.dest,
                outputs = mappings.len(),
                last,
                "step configured"
            );
            inputs = mappings.into_iter().map(|m| m.dest).collect();
        }
    }

    /// Input/output mappings for one step of a block's chain.
    fn mappings_for(
        &self,
        step: &SharedStep,
        block: &Block,
        inputs: &[String],
        last: bool,
    ) -> Vec<FileMapping> {
        if last {
            return vec![FileMapping::new(
                inputs.to_vec(),
                staging::final_path(&self.dest, &block.dest),
            )];
        }
        match step.output_mode() {
            OutputMode::Merged => vec![FileMapping::new(
                inputs.to_vec(),
                staging::staged_path(&self.staging, step.name(), &block.dest),
            )],
            OutputMode::PerSource => inputs
                .iter()
                .map(|input| {
                    FileMapping::new(
                        vec![input.clone()],
                        staging::staged_source_path(&self.staging, step.name(), input),
                    )
                })
                .collect(),
        }
    }
}

fn generated_for<'a>(generated: &'a mut Generated, step: &str) -> &'a mut Map<String, Value> {
    let index = match generated.iter().position(|(name, _)| name == step) {
        Some(index) => index,
        None => {
            generated.push((step.to_string(), Map::new()));
            generated.len() - 1
        }
    };
    &mut generated[index].1
}
