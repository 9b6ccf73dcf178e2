//! Shared test utilities for the media-mirror workspace.
//!
//! Dev-dependency only, never published.
//!
//! # Modules
//!
//! - [`tree`]: [`TestTree`], a temporary source/target pair

pub mod tree;

pub use tree::TestTree;
