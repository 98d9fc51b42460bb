//! Run statistics

use serde::{Deserialize, Serialize};

/// Counters accumulated over one cleanup run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunStats {
    /// Session files examined.
    pub scanned: usize,

    /// Sessions classified as orphaned.
    pub orphaned: usize,

    /// Sessions whose content was written to the archive store.
    pub archived: usize,

    /// Session files removed.
    pub deleted: usize,

    /// Records that failed archival or deletion.
    pub failed: usize,

    /// Sum of the sizes of removed files.
    pub space_reclaimed_bytes: u64,
}

impl RunStats {
    /// Record a removed file of `bytes` size.
    pub fn record_deleted(&mut self, bytes: u64) {
        self.deleted += 1;
        self.space_reclaimed_bytes += bytes;
    }

    pub fn record_failed(&mut self) {
        self.failed += 1;
    }

    /// True when nothing failed during processing.
    pub fn is_clean(&self) -> bool {
        self.failed == 0
    }

    /// Process exit status for automation callers.
    pub fn exit_code(&self) -> i32 {
        if self.is_clean() { 0 } else { 1 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_zero() {
        let stats = RunStats::default();
        assert_eq!(stats.scanned, 0);
        assert_eq!(stats.space_reclaimed_bytes, 0);
        assert!(stats.is_clean());
        assert_eq!(stats.exit_code(), 0);
    }

    #[test]
    fn test_record_deleted_accumulates_bytes() {
        let mut stats = RunStats::default();
        stats.record_deleted(100);
        stats.record_deleted(23);
        assert_eq!(stats.deleted, 2);
        assert_eq!(stats.space_reclaimed_bytes, 123);
    }

    #[test]
    fn test_failure_sets_exit_code() {
        let mut stats = RunStats::default();
        stats.record_failed();
        assert!(!stats.is_clean());
        assert_eq!(stats.exit_code(), 1);
    }

    #[test]
    fn test_serializes_with_snake_case_keys() {
        let stats = RunStats {
            scanned: 2,
            orphaned: 1,
            archived: 1,
            deleted: 1,
            failed: 0,
            space_reclaimed_bytes: 512,
        };
        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(json["scanned"], 2);
        assert_eq!(json["space_reclaimed_bytes"], 512);
    }
}
