//! Domain types for Sweepr
//!
//! - SessionRecord: one scanned transcript and why it may be orphaned
//! - RunStats: counters for a single cleanup run
//! - ArchiveOutcome / Confirmation / RunPhase: explicit results the
//!   orchestrator branches on

pub mod outcome;
pub mod session;
pub mod stats;

pub use outcome::{ArchiveOutcome, Confirmation, RunPhase};
pub use session::{OrphanReason, SessionRecord};
pub use stats::RunStats;
