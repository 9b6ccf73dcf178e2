//! Recursive file walking
//!
//! Yields regular files beneath a root in file-name order. Directories are
//! descended into but never yielded.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use walkdir::{DirEntry, WalkDir};

use crate::{Error, Result};

/// A file found while walking a tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalkEntry {
    /// Absolute path of the file
    pub path: PathBuf,
    /// Size in bytes
    pub size: u64,
    /// Last modification time
    pub modified: SystemTime,
}

/// Walk every file under `root`.
///
/// Symlinks are not followed while descending. A symlinked file reports the
/// metadata of its target; a dangling symlink reports its own metadata so it
/// can still be classified or removed. Errors reading a directory are yielded
/// in place of that directory's entries.
pub fn walk_files(root: &Path) -> impl Iterator<Item = Result<WalkEntry>> + use<> {
    WalkDir::new(root)
        .min_depth(1)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) if entry.file_type().is_dir() => None,
            Ok(entry) => stat(entry).transpose(),
            Err(e) => Some(Err(Error::from(e))),
        })
}

/// Stat a walked entry, following a symlink to its target when it resolves.
///
/// A symlink that resolves to a directory is not a file and yields `None`.
fn stat(entry: DirEntry) -> Result<Option<WalkEntry>> {
    let metadata = if entry.path_is_symlink() {
        match fs::metadata(entry.path()) {
            Ok(target) if target.is_dir() => return Ok(None),
            Ok(target) => target,
            Err(e) => {
                tracing::debug!(
                    path = %entry.path().display(),
                    error = %e,
                    "Symlink target unreadable, using link metadata"
                );
                entry.metadata()?
            }
        }
    } else {
        entry.metadata()?
    };
    let path = entry.into_path();
    let modified = metadata.modified().map_err(|e| Error::io(&path, e))?;
    Ok(Some(WalkEntry {
        size: metadata.len(),
        modified,
        path,
    }))
}
