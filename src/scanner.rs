//! Session scanner.
//!
//! Enumerates transcript files, reads their metadata, and classifies each one:
//! - **Age rule**: modified before `now - retention` is orphaned
//! - **Liveness rule**: no fresh registry entry is orphaned
//!
//! A fresh registry entry overrides the age rule, so a long-running session is
//! never swept while its process is alive.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Duration, Utc};
use log::{debug, error, warn};

use crate::config::default_sessions_dir;
use crate::domain::{OrphanReason, SessionRecord};
use crate::error::{Result, SweeprError};
use crate::registry::Registry;

/// Extension shared by all session transcripts.
pub const SESSION_EXTENSION: &str = "jsonl";

/// Infix carried by deletion markers.
pub const DELETED_MARKER: &str = ".deleted.";

/// Configuration for a session scan.
#[derive(Debug, Clone)]
pub struct ScannerConfig {
    /// Directory holding the transcripts.
    pub sessions_dir: PathBuf,

    /// Sessions untouched for longer than this many days are orphaned.
    pub retention_days: u32,

    /// How recently a registry entry must have been updated to count as live.
    pub liveness_window: Duration,

    /// Consult the registry at all. Disabled means age rule only.
    pub liveness_check: bool,

    /// Registry file name inside `sessions_dir`.
    pub registry_file: String,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            sessions_dir: default_sessions_dir(),
            retention_days: 3,
            liveness_window: Duration::hours(1),
            liveness_check: true,
            registry_file: "sessions.json".to_string(),
        }
    }
}

impl ScannerConfig {
    /// Create a new config scanning the given directory.
    pub fn new(sessions_dir: impl Into<PathBuf>) -> Self {
        Self {
            sessions_dir: sessions_dir.into(),
            ..Default::default()
        }
    }

    /// Set the retention period.
    pub fn with_retention_days(mut self, days: u32) -> Self {
        self.retention_days = days;
        self
    }

    /// Set the liveness window.
    pub fn with_liveness_window(mut self, window: Duration) -> Self {
        self.liveness_window = window;
        self
    }

    /// Enable or disable the registry lookup.
    pub fn with_liveness_check(mut self, enabled: bool) -> Self {
        self.liveness_check = enabled;
        self
    }

    /// Set the registry file name.
    pub fn with_registry_file(mut self, name: impl Into<String>) -> Self {
        self.registry_file = name.into();
        self
    }

    pub fn registry_path(&self) -> PathBuf {
        self.sessions_dir.join(&self.registry_file)
    }

    /// Oldest modification time that survives the age rule.
    ///
    /// `None` when the retention period reaches past the representable range,
    /// in which case the age rule never fires.
    pub fn cutoff(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        Duration::try_days(i64::from(self.retention_days)).and_then(|retention| now.checked_sub_signed(retention))
    }
}

/// Whether `path` names a session transcript that has not been swept.
pub fn is_candidate(path: &Path) -> bool {
    let Some(name) = path.file_name().map(|n| n.to_string_lossy()) else {
        return false;
    };

    !name.contains(DELETED_MARKER) && path.extension().is_some_and(|ext| ext == SESSION_EXTENSION)
}

/// Scans a sessions directory and classifies what it finds.
pub struct SessionScanner {
    config: ScannerConfig,
}

impl SessionScanner {
    pub fn new(config: ScannerConfig) -> Self {
        Self { config }
    }

    /// Scan the directory, returning records ordered by modification time.
    ///
    /// Never fails: a missing directory yields no records and unreadable files
    /// are logged and left out.
    pub fn scan(&self, now: DateTime<Utc>) -> Vec<SessionRecord> {
        let dir = &self.config.sessions_dir;
        if !dir.is_dir() {
            error!("Sessions directory not found: {}", dir.display());
            return Vec::new();
        }

        let paths = match self.candidates() {
            Ok(paths) => paths,
            Err(e) => {
                error!("Failed to list {}: {}", dir.display(), e);
                return Vec::new();
            }
        };

        let registry = if self.config.liveness_check {
            Registry::load(&self.config.registry_path())
        } else {
            Registry::default()
        };

        let mut records = Vec::with_capacity(paths.len());
        for path in paths {
            match inspect(&path) {
                Ok(mut record) => {
                    self.classify(&mut record, &registry, now);
                    records.push(record);
                }
                Err(e) => warn!("Error analyzing {}: {}", path.display(), e),
            }
        }

        records.sort_by(|a, b| a.modified.cmp(&b.modified).then_with(|| a.file_name.cmp(&b.file_name)));
        debug!("Scanned {} sessions in {}", records.len(), dir.display());
        records
    }

    fn candidates(&self) -> Result<Vec<PathBuf>> {
        let escaped = glob::Pattern::escape(&self.config.sessions_dir.to_string_lossy());
        let pattern = Path::new(&escaped).join(format!("*.{}", SESSION_EXTENSION));

        let mut paths = Vec::new();
        for entry in glob::glob(&pattern.to_string_lossy())? {
            match entry {
                Ok(path) if is_candidate(&path) => paths.push(path),
                Ok(path) => debug!("Skipping marker {}", path.display()),
                Err(e) => warn!("Error reading {}: {}", e.path().display(), e.error()),
            }
        }
        Ok(paths)
    }

    /// Apply the age and liveness rules to `record`.
    pub fn classify(&self, record: &mut SessionRecord, registry: &Registry, now: DateTime<Utc>) {
        if self.config.cutoff(now).is_some_and(|cutoff| record.modified < cutoff) {
            record.flag(OrphanReason::OlderThan {
                days: self.config.retention_days,
            });
        }

        if !self.config.liveness_check {
            return;
        }

        if registry.is_active(&record.id, now, self.config.liveness_window) {
            debug!("Session {} has an active process", record.id);
            record.clear();
        } else {
            record.flag(OrphanReason::NoActiveProcess);
        }
    }
}

fn inspect(path: &Path) -> Result<SessionRecord> {
    let metadata = fs::metadata(path)?;
    if !metadata.is_file() {
        return Err(SweeprError::Io(std::io::Error::other("not a regular file")));
    }

    let modified: DateTime<Utc> = metadata.modified()?.into();
    Ok(SessionRecord::new(path, metadata.len(), modified))
}
