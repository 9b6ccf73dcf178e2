//! Command implementations for mirror-cli

pub mod records;
pub mod sync;

pub use records::run_records;
pub use sync::run_sync;
