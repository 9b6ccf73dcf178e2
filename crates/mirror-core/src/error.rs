//! Error types for mirror-core

use std::path::PathBuf;

/// Result type for mirror-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that abort a run
///
/// Failures tied to a single file never surface here; they are collected in
/// the [`SyncReport`](crate::SyncReport) instead.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A required root directory was not configured
    #[error("{which} directory must be specified")]
    MissingRoot { which: &'static str },

    /// The source root does not exist or cannot be resolved
    #[error("Source directory not found: {path}")]
    SourceNotFound {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Walking the source tree failed
    #[error("Traversal failed under {root}: {source}")]
    Traversal {
        root: PathBuf,
        #[source]
        source: mirror_fs::Error,
    },

    /// Filesystem error from mirror-fs
    #[error(transparent)]
    Fs(#[from] mirror_fs::Error),
}
