//! Change detection
//!
//! Whether a source file must be (re)processed is a pure function of its
//! previous record entry, its current state, the command that would be used
//! now, and whether the expected target is on disk.

use chrono::{DateTime, Utc};
use mirror_fs::WalkEntry;

use crate::record::SyncRecordEntry;

/// Size and modification time of a source file as seen this run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceState {
    pub size: u64,
    pub mod_time: DateTime<Utc>,
}

impl From<&WalkEntry> for SourceState {
    fn from(entry: &WalkEntry) -> Self {
        Self {
            size: entry.size,
            mod_time: DateTime::<Utc>::from(entry.modified),
        }
    }
}

/// Why a file has to be processed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessReason {
    /// No previous entry for this source path
    New,
    SizeChanged,
    ModTimeChanged,
    CommandChanged,
    TargetMissing,
}

impl std::fmt::Display for ProcessReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let reason = match self {
            Self::New => "new file",
            Self::SizeChanged => "size changed",
            Self::ModTimeChanged => "modification time changed",
            Self::CommandChanged => "command changed",
            Self::TargetMissing => "target missing",
        };
        f.write_str(reason)
    }
}

/// Outcome of change detection for one file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessingDecision {
    Skip,
    Process(ProcessReason),
}

impl ProcessingDecision {
    pub fn needs_processing(self) -> bool {
        matches!(self, Self::Process(_))
    }
}

/// Decide whether a source file needs processing.
///
/// The first reason found is reported; any one of them is sufficient.
pub fn decide(
    previous: Option<&SyncRecordEntry>,
    current: &SourceState,
    command: &str,
    target_exists: bool,
) -> ProcessingDecision {
    let Some(previous) = previous else {
        return ProcessingDecision::Process(ProcessReason::New);
    };

    let reason = if previous.size != current.size {
        ProcessReason::SizeChanged
    } else if previous.mod_time != current.mod_time {
        ProcessReason::ModTimeChanged
    } else if previous.command != command {
        ProcessReason::CommandChanged
    } else if !target_exists {
        ProcessReason::TargetMissing
    } else {
        return ProcessingDecision::Skip;
    };

    ProcessingDecision::Process(reason)
}

/// Boolean form of [`decide`].
pub fn needs_processing(
    previous: Option<&SyncRecordEntry>,
    current: &SourceState,
    command: &str,
    target_exists: bool,
) -> bool {
    decide(previous, current, command, target_exists).needs_processing()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    const CMD: &str = "ffmpeg -i $INPUT $OUTPUT";

    fn state() -> SourceState {
        SourceState {
            size: 10,
            mod_time: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        }
    }

    fn recorded() -> SyncRecordEntry {
        SyncRecordEntry {
            source_path: "song.mp3".into(),
            target_path: "song.opus".into(),
            size: 10,
            mod_time: state().mod_time,
            command: CMD.into(),
        }
    }

    #[test]
    fn unchanged_file_is_skipped() {
        assert_eq!(
            decide(Some(&recorded()), &state(), CMD, true),
            ProcessingDecision::Skip
        );
    }

    #[test]
    fn no_previous_entry_is_new() {
        assert_eq!(
            decide(None, &state(), CMD, true),
            ProcessingDecision::Process(ProcessReason::New)
        );
    }

    #[test]
    fn each_change_forces_processing_on_its_own() {
        let prev = recorded();

        let mut bigger = state();
        bigger.size = 11;
        assert_eq!(
            decide(Some(&prev), &bigger, CMD, true),
            ProcessingDecision::Process(ProcessReason::SizeChanged)
        );

        let mut touched = state();
        touched.mod_time = touched.mod_time + chrono::Duration::nanoseconds(1);
        assert_eq!(
            decide(Some(&prev), &touched, CMD, true),
            ProcessingDecision::Process(ProcessReason::ModTimeChanged)
        );

        assert_eq!(
            decide(Some(&prev), &state(), "ffmpeg -i $INPUT -b:a 96k $OUTPUT", true),
            ProcessingDecision::Process(ProcessReason::CommandChanged)
        );

        assert_eq!(
            decide(Some(&prev), &state(), CMD, false),
            ProcessingDecision::Process(ProcessReason::TargetMissing)
        );
    }

    #[test]
    fn switching_to_copy_is_a_command_change() {
        assert!(needs_processing(Some(&recorded()), &state(), "", true));
    }
}
