//! Command templates and the process-execution seam
//!
//! - **template**: split a template into argv and substitute placeholders
//! - **runner**: run an argv to completion and capture its output

mod runner;
mod template;

pub use runner::{CommandOutput, CommandRunner, SystemRunner};
pub use template::{
    CommandTemplate, INPUT_PLACEHOLDER, OUTPUT_PLACEHOLDER, split_command, substitute,
};
