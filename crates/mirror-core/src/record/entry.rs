//! A single row of the sync record

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// What one source file produced during a run.
///
/// Field names are part of the on-disk format and serialize in camelCase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncRecordEntry {
    /// Path relative to the source root, `/`-separated
    pub source_path: String,
    /// Path relative to the target root, `/`-separated
    pub target_path: String,
    /// Source size in bytes when processed
    pub size: u64,
    /// Source modification time when processed
    pub mod_time: DateTime<Utc>,
    /// Unsubstituted command template, empty when copied verbatim
    pub command: String,
}
