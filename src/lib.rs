//! Sweepr - orphaned session transcript cleanup
//!
//! Sweepr scans an agent sessions directory, flags transcripts that are stale
//! or have no live process in the session registry, archives a preview of
//! each, then deletes them and leaves a marker behind.

pub mod archive;
pub mod clock;
pub mod config;
pub mod confirm;
pub mod domain;
pub mod error;
pub mod janitor;
pub mod registry;
pub mod scanner;

pub use error::{Result, SweeprError};
