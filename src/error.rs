//! Error types shared across the crate.

use std::path::PathBuf;

use asset_steps::RegistryError;

/// Malformed flow or writer construction input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigurationError {
    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error("invalid step for block type \"{block_type}\": {reason}")]
    InvalidStep { block_type: String, reason: String },

    #[error("cannot specify both 'input' and 'root'")]
    ConflictingRoots,

    #[error("'{0}' directory must not be empty")]
    EmptyDirectory(&'static str),
}

/// Source resolution failures. Any of these aborts the whole `process` call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    #[error("can't resolve source reference \"{reference}\" (in {})", file.display())]
    UnresolvedSource { reference: String, file: PathBuf },

    #[error("resolveSource hook returned non-existent path \"{}\"", path.display())]
    InvalidOverridePath { path: PathBuf },
}
