//! Run report types
//!
//! A [`SyncReport`] collects what a run did to each file and every per-file
//! failure, so one bad file never hides the rest of the run.

use serde::{Deserialize, Serialize};

/// What happened to one file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    /// Up to date, nothing done
    Skipped,
    /// Copied byte for byte
    Copied,
    /// Produced by running the configured command
    Transcoded,
    /// Removed from the target because nothing produces it anymore
    Deleted,
}

impl std::fmt::Display for ActionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let verb = match self {
            Self::Skipped => "skip",
            Self::Copied => "copy",
            Self::Transcoded => "transcode",
            Self::Deleted => "delete",
        };
        f.write_str(verb)
    }
}

/// One action taken (or, in a dry run, planned) during a run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncAction {
    pub kind: ActionKind,
    /// Source-relative path, or target-relative for deletions
    pub path: String,
}

/// A failure tied to one file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileFailure {
    /// Source-relative path, or target-relative for deletions
    pub path: String,
    /// Human-readable description
    pub message: String,
    /// The argv that was run, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command: Option<Vec<String>>,
    /// Combined stdout/stderr of the command, if it ran
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
}

impl FileFailure {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
            command: None,
            output: None,
        }
    }

    pub fn with_command(mut self, argv: Vec<String>) -> Self {
        self.command = Some(argv);
        self
    }

    pub fn with_output(mut self, output: String) -> Self {
        self.output = Some(output);
        self
    }
}

/// Report from a sync run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncReport {
    /// True when no file failed and the record was saved
    pub success: bool,
    /// Whether this was a dry run (nothing was written)
    pub dry_run: bool,
    /// Actions taken, in traversal order
    pub actions: Vec<SyncAction>,
    /// Failures that make the run unsuccessful
    pub errors: Vec<FileFailure>,
    /// Failures reported during cleanup that do not affect success
    pub warnings: Vec<FileFailure>,
}

impl SyncReport {
    pub fn new(dry_run: bool) -> Self {
        Self {
            success: true,
            dry_run,
            ..Self::default()
        }
    }

    pub fn record(&mut self, kind: ActionKind, path: impl Into<String>) {
        self.actions.push(SyncAction {
            kind,
            path: path.into(),
        });
    }

    pub fn fail(&mut self, failure: FileFailure) {
        self.success = false;
        self.errors.push(failure);
    }

    pub fn warn(&mut self, failure: FileFailure) {
        self.warnings.push(failure);
    }

    /// Number of actions of the given kind
    pub fn count(&self, kind: ActionKind) -> usize {
        self.actions.iter().filter(|a| a.kind == kind).count()
    }

    /// Paths of actions of the given kind
    pub fn paths(&self, kind: ActionKind) -> Vec<&str> {
        self.actions
            .iter()
            .filter(|a| a.kind == kind)
            .map(|a| a.path.as_str())
            .collect()
    }
}
