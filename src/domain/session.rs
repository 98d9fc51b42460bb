//! Session record and orphan reasons
//!
//! A SessionRecord describes one transcript file found during a scan. Whether it
//! is orphaned is derived from the reasons recorded against it, so the flag and
//! the reasons can never disagree.

use chrono::{DateTime, Utc};
use std::fmt;
use std::path::{Path, PathBuf};

/// Why a session was judged safe to remove
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrphanReason {
    /// Last modified before the retention cutoff
    OlderThan { days: u32 },
    /// No registry entry updated within the liveness window
    NoActiveProcess,
}

impl fmt::Display for OrphanReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrphanReason::OlderThan { days } => write!(f, "older than {} days", days),
            OrphanReason::NoActiveProcess => write!(f, "no active process"),
        }
    }
}

/// One candidate session file and its classification
#[derive(Debug, Clone)]
pub struct SessionRecord {
    /// Identifier derived from the file stem
    pub id: String,

    /// File name including extension
    pub file_name: String,

    /// Full path to the transcript
    pub path: PathBuf,

    /// Size on disk at scan time
    pub size_bytes: u64,

    /// Last-modified time
    pub modified: DateTime<Utc>,

    reasons: Vec<OrphanReason>,
}

impl SessionRecord {
    /// Build an unclassified record for `path`.
    pub fn new(path: &Path, size_bytes: u64, modified: DateTime<Utc>) -> Self {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let id = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();

        Self {
            id,
            file_name,
            path: path.to_path_buf(),
            size_bytes,
            modified,
            reasons: Vec::new(),
        }
    }

    /// Record a reason this session is orphaned.
    pub fn flag(&mut self, reason: OrphanReason) {
        self.reasons.push(reason);
    }

    /// Drop every recorded reason, marking the session active.
    pub fn clear(&mut self) {
        self.reasons.clear();
    }

    pub fn is_orphaned(&self) -> bool {
        !self.reasons.is_empty()
    }

    pub fn reasons(&self) -> &[OrphanReason] {
        &self.reasons
    }

    /// Reasons joined for display, e.g. "older than 3 days, no active process"
    pub fn reason_summary(&self) -> String {
        self.reasons.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> SessionRecord {
        SessionRecord::new(Path::new("/tmp/sessions/abc-123.jsonl"), 42, Utc::now())
    }

    #[test]
    fn test_new_derives_identity_from_path() {
        let r = record();
        assert_eq!(r.id, "abc-123");
        assert_eq!(r.file_name, "abc-123.jsonl");
        assert_eq!(r.size_bytes, 42);
        assert!(!r.is_orphaned());
    }

    #[test]
    fn test_flag_marks_orphaned() {
        let mut r = record();
        r.flag(OrphanReason::NoActiveProcess);
        assert!(r.is_orphaned());
        assert_eq!(r.reasons(), &[OrphanReason::NoActiveProcess]);
    }

    #[test]
    fn test_clear_restores_active() {
        let mut r = record();
        r.flag(OrphanReason::OlderThan { days: 3 });
        r.flag(OrphanReason::NoActiveProcess);
        r.clear();
        assert!(!r.is_orphaned());
        assert!(r.reasons().is_empty());
    }

    #[test]
    fn test_reason_display() {
        assert_eq!(OrphanReason::OlderThan { days: 7 }.to_string(), "older than 7 days");
        assert_eq!(OrphanReason::NoActiveProcess.to_string(), "no active process");
    }

    #[test]
    fn test_reason_summary_preserves_order() {
        let mut r = record();
        r.flag(OrphanReason::OlderThan { days: 3 });
        r.flag(OrphanReason::NoActiveProcess);
        assert_eq!(r.reason_summary(), "older than 3 days, no active process");
    }
}
