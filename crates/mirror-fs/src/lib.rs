//! Filesystem layer for media-mirror
//!
//! Provides normalized relative paths, atomic locked writes, byte copies,
//! recursive file walking and format-agnostic config loading.

pub mod config;
pub mod error;
pub mod io;
pub mod path;
pub mod walk;

pub use config::ConfigStore;
pub use error::{Error, Result};
pub use path::NormalizedPath;
pub use walk::{WalkEntry, walk_files};
