//! Incremental reconciliation engine for media-mirror
//!
//! Mirrors a source tree of media files into a target tree, optionally
//! passing each file through an external command, and remembers enough about
//! every file to skip it next time when nothing changed.
//!
//! - **Command templates**: split a template into argv once, then substitute
//!   `$INPUT` / `$OUTPUT` per file
//! - **Sync record**: the persisted source-to-target table of the last run
//! - **Classification**: audio / image / neither by extension, plus
//!   include/exclude regex filtering
//! - **SyncEngine**: walk, decide, copy or transform, record, persist, and
//!   optionally delete orphaned target files
//!
//! # Architecture
//!
//! ```text
//!        mirror-cli
//!            |
//!       mirror-core
//!            |
//!        mirror-fs
//! ```
//!
//! # Example
//!
//! ```no_run
//! use mirror_core::{MirrorConfig, SyncEngine};
//!
//! fn example() -> mirror_core::Result<()> {
//!     let mut config = MirrorConfig::new("/music", "/media/player/Music");
//!     config.audio.command = "ffmpeg -y -i $INPUT -c:a libopus $OUTPUT".into();
//!     config.delete_removed = true;
//!
//!     let report = SyncEngine::new(&config)?.sync()?;
//!     assert!(report.success);
//!     Ok(())
//! }
//! ```

pub mod classify;
pub mod command;
pub mod config;
pub mod error;
pub mod record;
pub mod sync;

pub use classify::{Classifier, MediaClass, PathFilter};
pub use command::{CommandOutput, CommandRunner, CommandTemplate, SystemRunner, split_command};
pub use config::{ConfigLayer, MediaProfile, MirrorConfig, ProfileLayer};
pub use error::{Error, Result};
pub use record::{RECORD_FILE_NAME, SyncRecordEntry, SyncRecordSet};
pub use sync::{
    ActionKind, FileFailure, ProcessReason, ProcessingDecision, SourceState, SyncAction,
    SyncEngine, SyncOptions, SyncReport, needs_processing,
};
