//! Sync record store
//!
//! The record set maps each source file to the target it produced and the
//! source state it was produced from. A run reads the previous set, builds a
//! fresh one as it goes, and replaces the stored set with the fresh one at
//! the end. The previous set is never edited.

mod entry;

pub use entry::SyncRecordEntry;

use std::collections::HashSet;
use std::path::Path;

use mirror_fs::{ConfigStore, Error as FsError};
use serde::{Deserialize, Serialize};

use crate::Result;

/// File name of the record set inside the target root
pub const RECORD_FILE_NAME: &str = ".syncdb.json";

/// Ordered collection of record entries for one target directory.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncRecordSet {
    entries: Vec<SyncRecordEntry>,
}

impl SyncRecordSet {
    /// Create a new empty record set
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a record set, degrading to an empty set on any failure.
    ///
    /// A missing file is the normal first-run case. An unreadable or corrupt
    /// file only costs a full reprocess, so it is logged and never fatal.
    pub fn load(path: &Path) -> Self {
        match Self::try_load(path) {
            Ok(set) => set,
            Err(crate::Error::Fs(FsError::Io { source, .. }))
                if source.kind() == std::io::ErrorKind::NotFound =>
            {
                tracing::debug!(path = %path.display(), "No sync record yet");
                Self::new()
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Ignoring unreadable sync record");
                Self::new()
            }
        }
    }

    /// Load a record set, reporting every failure.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, locked, or parsed.
    pub fn try_load(path: &Path) -> Result<Self> {
        Ok(ConfigStore::new().load(path)?)
    }

    /// Save the record set, fully replacing the file at `path`.
    ///
    /// Written atomically under an exclusive lock.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written or locked.
    pub fn save(&self, path: &Path) -> Result<()> {
        Ok(ConfigStore::new().save(path, self)?)
    }

    /// All entries in insertion order
    pub fn entries(&self) -> &[SyncRecordEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Append an entry
    pub fn push(&mut self, entry: SyncRecordEntry) {
        self.entries.push(entry);
    }

    /// Find the entry for a source path.
    ///
    /// Should duplicates exist, the first one wins.
    pub fn find(&self, source_path: &str) -> Option<&SyncRecordEntry> {
        self.entries.iter().find(|e| e.source_path == source_path)
    }

    /// Target paths that this record set accounts for
    pub fn target_paths(&self) -> HashSet<&str> {
        self.entries.iter().map(|e| e.target_path.as_str()).collect()
    }
}
