//! Source resolution
//!
//! Maps a raw source reference from a block onto a file on disk by searching
//! an ordered list of roots. A caller-supplied hook may override, cancel or
//! defer the search for each reference.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, trace};

use crate::error::ResolveError;
use crate::model::{Block, File};
use crate::writer::staging::normalize;

/// Arguments handed to a resolution hook, one call per source reference.
#[derive(Debug, Clone, Copy)]
pub struct SourceQuery<'a> {
    /// The reference as written in the block.
    pub reference: &'a str,
    /// Directory of the file declaring the block.
    pub file_dir: &'a Path,
    /// File name of the file declaring the block.
    pub file_base: &'a str,
    /// Destination of the block.
    pub block_dest: &'a str,
    /// Search roots, in the order they will be tried.
    pub roots: &'a [PathBuf],
}

/// What a resolution hook decided for one reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HookOutcome {
    /// Use this exact path. It must exist.
    Override(PathBuf),
    /// Do not search; the reference is unresolved.
    Cancel,
    /// Fall through to the normal root search.
    Defer,
}

/// User-supplied resolution hook.
pub type ResolveHook = Arc<dyn Fn(&SourceQuery<'_>) -> HookOutcome + Send + Sync>;

/// Resolves source references against configured roots.
#[derive(Clone)]
pub struct SourceResolver {
    roots: Vec<PathBuf>,
    warn_missing: bool,
    hook: Option<ResolveHook>,
}

impl fmt::Debug for SourceResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SourceResolver")
            .field("roots", &self.roots)
            .field("warn_missing", &self.warn_missing)
            .field("hook", &self.hook.is_some())
            .finish()
    }
}

impl SourceResolver {
    pub fn new(roots: Vec<PathBuf>) -> Self {
        Self {
            roots,
            warn_missing: false,
            hook: None,
        }
    }

    /// Fail on references that cannot be found instead of passing them
    /// through.
    pub fn warn_missing(mut self, warn_missing: bool) -> Self {
        self.warn_missing = warn_missing;
        self
    }

    pub fn with_hook(mut self, hook: Option<ResolveHook>) -> Self {
        self.hook = hook;
        self
    }

    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }

    /// Roots searched for references declared in a file living in
    /// `file_dir`: the configured roots, then the file's own directory.
    pub fn search_roots(&self, file_dir: &Path) -> Vec<PathBuf> {
        let mut roots = self.roots.clone();
        roots.push(file_dir.to_path_buf());
        roots
    }

    /// Resolve one reference of `block`, declared in `file`.
    pub fn resolve(
        &self,
        reference: &str,
        file: &File,
        block: &Block,
    ) -> Result<PathBuf, ResolveError> {
        let roots = self.search_roots(&file.dir);

        if let Some(hook) = &self.hook {
            let file_base = file.base_name();
            let query = SourceQuery {
                reference,
                file_dir: &file.dir,
                file_base: &file_base,
                block_dest: &block.dest,
                roots: &roots,
            };
            match hook(&query) {
                HookOutcome::Override(path) => {
                    if !path.exists() {
                        return Err(ResolveError::InvalidOverridePath { path });
                    }
                    debug!(reference, path = %path.display(), "source overridden by hook");
                    return Ok(path);
                }
                HookOutcome::Cancel => {
                    debug!(reference, "source search cancelled by hook");
                    return Err(unresolved(reference, file));
                }
                HookOutcome::Defer => {}
            }
        }

        let relative = strip_root(reference);
        for root in &roots {
            let candidate = normalize(&root.join(relative));
            trace!(reference, candidate = %candidate.display(), "probing");
            if candidate.exists() {
                return Ok(candidate);
            }
        }

        if self.warn_missing {
            return Err(unresolved(reference, file));
        }

        // Unresolved references pass through under the first root.
        let fallback = roots
            .first()
            .map(|root| normalize(&root.join(relative)))
            .unwrap_or_else(|| PathBuf::from(relative));
        debug!(reference, path = %fallback.display(), "source not found, passing through");
        Ok(fallback)
    }
}

fn unresolved(reference: &str, file: &File) -> ResolveError {
    ResolveError::UnresolvedSource {
        reference: reference.to_string(),
        file: file.path.clone(),
    }
}

/// Root-relative references (`/scripts/a.js`) are searched under each root.
fn strip_root(reference: &str) -> &str {
    reference.trim_start_matches(['/', '\\'])
}
