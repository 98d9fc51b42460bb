//! Cleanup orchestration.
//!
//! A run moves through these phases:
//! 1. Scan the sessions directory and keep the orphaned records
//! 2. Stop early when there is nothing to do, or when previewing
//! 3. Ask for confirmation unless forced
//! 4. For each orphan, oldest first: archive, delete, leave a marker
//! 5. Summarize
//!
//! Every orphan is processed independently. A failure on one record is
//! counted and logged, and the run moves on to the next.

use std::fs::{self, File};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use log::{error, info, warn};

use crate::archive::Archiver;
use crate::clock::marker_stamp;
use crate::confirm::Confirmer;
use crate::domain::{Confirmation, RunPhase, RunStats, SessionRecord};
use crate::error::{Result, SweeprError};
use crate::scanner::{DELETED_MARKER, SessionScanner};

const RULE: &str = "============================================================";

/// Behavior switches for a cleanup run.
#[derive(Debug, Clone)]
pub struct JanitorOptions {
    /// Actually delete. When false the run only previews.
    pub execute: bool,

    /// Archive each session before deleting it.
    pub archive: bool,

    /// Skip the confirmation prompt.
    pub force: bool,
}

impl Default for JanitorOptions {
    fn default() -> Self {
        Self {
            execute: false,
            archive: true,
            force: false,
        }
    }
}

impl JanitorOptions {
    /// Enable or disable destructive mode.
    pub fn with_execute(mut self, execute: bool) -> Self {
        self.execute = execute;
        self
    }

    /// Enable or disable archive-before-delete.
    pub fn with_archive(mut self, archive: bool) -> Self {
        self.archive = archive;
        self
    }

    /// Enable or disable the confirmation bypass.
    pub fn with_force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }
}

/// What a run did.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub stats: RunStats,

    /// Phase the run finished in.
    pub phase: RunPhase,

    /// Orphaned records the run considered, oldest first.
    pub orphaned: Vec<SessionRecord>,
}

impl RunReport {
    pub fn exit_code(&self) -> i32 {
        self.stats.exit_code()
    }
}

/// Drives a single scan, archive, and delete pass.
pub struct Janitor<A, C> {
    scanner: SessionScanner,
    archiver: A,
    confirmer: C,
    options: JanitorOptions,
}

impl<A: Archiver, C: Confirmer> Janitor<A, C> {
    pub fn new(scanner: SessionScanner, archiver: A, confirmer: C, options: JanitorOptions) -> Self {
        Self {
            scanner,
            archiver,
            confirmer,
            options,
        }
    }

    pub fn archiver(&self) -> &A {
        &self.archiver
    }

    pub fn confirmer(&self) -> &C {
        &self.confirmer
    }

    /// Execute one cleanup run relative to `now`.
    pub fn run(&mut self, now: DateTime<Utc>) -> RunReport {
        info!("{}", RULE);
        info!("Sweepr - Starting Cleanup Run");
        info!("Mode: {}", if self.options.execute { "LIVE" } else { "DRY-RUN" });
        info!("Archive: {}", if self.options.archive { "Enabled" } else { "Disabled" });
        info!("{}", RULE);

        let records = self.scanner.scan(now);
        let mut stats = RunStats {
            scanned: records.len(),
            ..Default::default()
        };

        let orphaned: Vec<SessionRecord> = records.into_iter().filter(SessionRecord::is_orphaned).collect();
        stats.orphaned = orphaned.len();

        info!("Scanned: {} sessions", stats.scanned);
        info!("Orphaned: {} sessions", stats.orphaned);

        if orphaned.is_empty() {
            info!("No orphaned sessions found. Nothing to do.");
            return RunReport {
                stats,
                phase: RunPhase::EmptyExit,
                orphaned,
            };
        }

        list_orphans(&orphaned);

        if !self.options.execute {
            info!("[DRY-RUN] No changes made. Use --clean to execute.");
            return RunReport {
                stats,
                phase: RunPhase::DryRunExit,
                orphaned,
            };
        }

        if !self.options.force {
            let answer = self.confirmer.confirm(orphaned.len());
            if !answer.proceeds() {
                info!("Cleanup cancelled by user.");
                return RunReport {
                    stats,
                    phase: RunPhase::Cancelled,
                    orphaned,
                };
            }
            if answer == Confirmation::NoInput {
                warn!("Non-interactive mode, proceeding without confirmation");
            }
        }

        for record in &orphaned {
            self.process(record, &mut stats);
        }

        log_summary(&stats);

        RunReport {
            stats,
            phase: RunPhase::Done,
            orphaned,
        }
    }

    /// Archive (when enabled) and delete one orphaned session.
    fn process(&mut self, record: &SessionRecord, stats: &mut RunStats) {
        if self.options.archive {
            let outcome = self.archiver.archive_one(&record.path);
            if !outcome.is_success() {
                warn!("Archive failed for {} ({}), skipping deletion", record.file_name, outcome);
                stats.record_failed();
                return;
            }
            // Blank transcripts count as handled even though nothing is written
            stats.archived += 1;
        }

        let size = match delete_session(&record.path) {
            Ok(size) => size,
            Err(e) => {
                error!("Failed to process {}: {}", record.path.display(), e);
                stats.record_failed();
                return;
            }
        };
        stats.record_deleted(size);
        info!("Deleted: {}", record.file_name);

        if let Err(e) = write_marker(&record.path, Utc::now()) {
            error!("Failed to write deletion marker for {}: {}", record.file_name, e);
            stats.record_failed();
        }
    }
}

fn list_orphans(orphaned: &[SessionRecord]) {
    for record in orphaned {
        info!("  - {} ({} bytes)", record.file_name, record.size_bytes);
        info!("    Modified: {}", record.modified.format("%Y-%m-%d %H:%M:%S"));
        info!("    Reasons: {}", record.reason_summary());
    }
}

fn log_summary(stats: &RunStats) {
    info!("{}", RULE);
    info!("Cleanup Summary");
    info!("{}", RULE);
    info!("Sessions scanned: {}", stats.scanned);
    info!("Orphaned found: {}", stats.orphaned);
    info!("Archived: {}", stats.archived);
    info!("Deleted: {}", stats.deleted);
    info!("Failed: {}", stats.failed);
    info!("Space reclaimed: {} bytes", stats.space_reclaimed_bytes);
    info!("{}", RULE);
}

/// Remove a session file, returning the size it occupied.
pub fn delete_session(path: &Path) -> Result<u64> {
    let size = fs::metadata(path)?.len();
    fs::remove_file(path)?;
    Ok(size)
}

/// Leave an empty `<name>.deleted.<timestamp>` file beside a removed session.
pub fn write_marker(path: &Path, at: DateTime<Utc>) -> Result<PathBuf> {
    let name = path
        .file_name()
        .ok_or_else(|| SweeprError::Io(std::io::Error::other(format!("no file name in {}", path.display()))))?;
    let marker_name = format!("{}{}{}", name.to_string_lossy(), DELETED_MARKER, marker_stamp(at));
    let marker = path.with_file_name(marker_name);
    File::create(&marker)?;
    Ok(marker)
}
