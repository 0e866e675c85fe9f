//! Parsed input: files and the asset blocks they declare.
//!
//! Producing these from HTML or templates is the job of an external parser;
//! this crate only consumes them.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// A group of source references sharing one output and one block type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    /// Block type (e.g. "js", "css"), selects the step chain.
    #[serde(rename = "type")]
    pub kind: String,

    /// Logical output path, relative to the destination directory.
    pub dest: String,

    /// Raw source references, in order.
    #[serde(default)]
    pub src: Vec<String>,
}

impl Block {
    pub fn new<I, S>(kind: impl Into<String>, dest: impl Into<String>, src: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            kind: kind.into(),
            dest: dest.into(),
            src: src.into_iter().map(Into::into).collect(),
        }
    }
}

/// A parsed document and its blocks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct File {
    /// Path of the document.
    pub path: PathBuf,

    /// Directory the document lives in. Searched after the configured roots.
    /// Defaults to the parent of `path`.
    #[serde(default)]
    pub dir: PathBuf,

    #[serde(default)]
    pub blocks: Vec<Block>,
}

/// Errors loading a file description
#[derive(Debug, thiserror::Error)]
pub enum InputError {
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl File {
    pub fn new(path: impl Into<PathBuf>, dir: impl Into<PathBuf>, blocks: Vec<Block>) -> Self {
        Self {
            path: path.into(),
            dir: dir.into(),
            blocks,
        }
    }

    /// Build a file whose directory is the parent of `path`.
    pub fn at(path: impl Into<PathBuf>, blocks: Vec<Block>) -> Self {
        let path = path.into();
        let dir = parent_dir(&path);
        Self { path, dir, blocks }
    }

    /// Load a JSON file description (`{ path, dir?, blocks }`).
    pub fn from_json_file(path: &Path) -> Result<Self, InputError> {
        let contents = fs::read_to_string(path).map_err(|source| InputError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut file: File =
            serde_json::from_str(&contents).map_err(|source| InputError::Json {
                path: path.to_path_buf(),
                source,
            })?;
        if file.dir.as_os_str().is_empty() {
            file.dir = parent_dir(&file.path);
        }
        Ok(file)
    }

    /// File name of the document, as handed to resolution hooks.
    pub fn base_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

fn parent_dir(path: &Path) -> PathBuf {
    path.parent().map(Path::to_path_buf).unwrap_or_default()
}
