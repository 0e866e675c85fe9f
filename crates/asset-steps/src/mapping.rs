//! Input/output mapping handed to step writers.

use serde::{Deserialize, Serialize};

/// Resolved sources and destination for one invocation of a step writer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileMapping {
    /// Input paths, in order.
    pub src: Vec<String>,

    /// Output path.
    pub dest: String,
}

impl FileMapping {
    pub fn new(src: Vec<String>, dest: impl Into<String>) -> Self {
        Self {
            src,
            dest: dest.into(),
        }
    }
}

/// Output layout of a step that is not the last one in its chain.
///
/// The last step of a chain always writes a single file at the block's final
/// destination, whatever its mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputMode {
    /// All inputs are combined into one staged output.
    #[default]
    Merged,
    /// Each input produces its own staged output, keeping its file name.
    PerSource,
}
