//! Incremental reconciliation
//!
//! This module provides:
//! - **decision**: the change-detection predicate
//! - **engine**: the `SyncEngine` that runs one reconciliation
//! - **report**: what a run did and what failed

mod decision;
mod engine;
mod report;

pub use decision::{ProcessReason, ProcessingDecision, SourceState, decide, needs_processing};
pub use engine::{SyncEngine, SyncOptions};
pub use report::{ActionKind, FileFailure, SyncAction, SyncReport};
