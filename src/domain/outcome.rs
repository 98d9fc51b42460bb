//! Outcome types for archival, confirmation, and whole runs.

use std::fmt;
use std::path::PathBuf;

/// Result of archiving one session file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArchiveOutcome {
    /// Preview written to the archive store at this path
    Archived(PathBuf),
    /// Content was blank, nothing worth saving
    Skipped,
    /// Archival failed; the session must not be deleted
    Failed(String),
}

impl ArchiveOutcome {
    /// True when deletion may proceed.
    pub fn is_success(&self) -> bool {
        !matches!(self, ArchiveOutcome::Failed(_))
    }
}

impl fmt::Display for ArchiveOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArchiveOutcome::Archived(path) => write!(f, "archived to {}", path.display()),
            ArchiveOutcome::Skipped => write!(f, "nothing to archive"),
            ArchiveOutcome::Failed(reason) => write!(f, "{}", reason),
        }
    }
}

/// Answer to the destructive-action prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    Accepted,
    Declined,
    /// No input could be read (closed or non-interactive stdin)
    NoInput,
}

impl Confirmation {
    /// Whether the run should continue.
    ///
    /// NoInput counts as consent so unattended runs are not blocked.
    pub fn proceeds(&self) -> bool {
        !matches!(self, Confirmation::Declined)
    }
}

/// Terminal phase a run reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunPhase {
    /// No orphaned sessions were found
    EmptyExit,
    /// Preview mode listed orphans without touching them
    DryRunExit,
    /// Operator declined the confirmation prompt
    Cancelled,
    /// Orphans were processed and summarized
    Done,
}
