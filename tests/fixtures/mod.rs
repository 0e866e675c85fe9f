//! Shared fixtures for writer and project tests.
//!
//! - Block/file builders mirroring what a document parser produces
//! - A scratch directory with helpers to place source files under roots
//! - Paths to the sample project under `tests/fixtures/project`

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use asset_flow::{Block, File};
use serde_json::Value;
use tempfile::TempDir;

/// Path to the sample project directory
pub fn project_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/project")
}

/// One js block with three sources
pub fn blocks() -> Vec<Block> {
    vec![Block::new(
        "js",
        "scripts/site.js",
        ["foo.js", "bar.js", "baz.js"],
    )]
}

/// A file named `name` living in `dir`
pub fn create_file(name: &str, dir: impl AsRef<Path>, blocks: Vec<Block>) -> File {
    let dir = dir.as_ref();
    File::new(dir.join(name), dir, blocks)
}

/// Render a path the way the writer emits it
pub fn p(path: impl AsRef<Path>) -> String {
    path.as_ref().to_string_lossy().into_owned()
}

/// Load a JSON fixture
pub fn load_json(path: &Path) -> Value {
    let contents = fs::read_to_string(path)
        .unwrap_or_else(|e| panic!("read {}: {}", path.display(), e));
    serde_json::from_str(&contents).unwrap_or_else(|e| panic!("parse {}: {}", path.display(), e))
}

/// Temporary directory for on-disk source roots
pub struct Scratch {
    dir: TempDir,
}

impl Scratch {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("tempdir"),
        }
    }

    /// Absolute path of `rel` inside the scratch directory
    pub fn path(&self, rel: &str) -> PathBuf {
        self.dir.path().join(rel)
    }

    pub fn mkdir(&self, rel: &str) -> PathBuf {
        let path = self.path(rel);
        fs::create_dir_all(&path).expect("create dir");
        path
    }

    /// Create `rel` with some content, creating parents as needed
    pub fn write(&self, rel: &str) -> PathBuf {
        let path = self.path(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create parent");
        }
        fs::write(&path, "var a=1;").expect("write file");
        path
    }
}
