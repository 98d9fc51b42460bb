//! Transcript archival.
//!
//! Before a session is deleted its content is preserved as an `ArchiveEntry`
//! in an append-only store. Only a bounded preview is kept, not the whole
//! transcript. The local store writes one pretty-printed JSON file per entry.

use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use log::{error, info, warn};
use serde::{Deserialize, Serialize};

use crate::clock::archive_stamp;
use crate::config::default_archive_dir;
use crate::domain::ArchiveOutcome;
use crate::error::{Result, SweeprError};

/// Default preview length in characters.
pub const DEFAULT_PREVIEW_CHARS: usize = 1000;

const MAX_NAME_ATTEMPTS: u32 = 1000;

/// Anything that can preserve a session before it is removed.
///
/// Implementations report failure through `ArchiveOutcome::Failed`; they must
/// not panic or propagate errors.
pub trait Archiver {
    fn archive_one(&mut self, path: &Path) -> ArchiveOutcome;
}

/// A record written to the archive store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchiveEntry {
    pub session_id: String,
    pub archived_at: DateTime<Utc>,
    pub original_path: String,
    pub content_preview: String,
}

impl ArchiveEntry {
    /// Build an entry from a transcript, keeping at most `preview_chars` characters.
    pub fn new(path: &Path, content: &str, preview_chars: usize, archived_at: DateTime<Utc>) -> Self {
        Self {
            session_id: session_id(path),
            archived_at,
            original_path: path.display().to_string(),
            content_preview: content.chars().take(preview_chars).collect(),
        }
    }
}

fn session_id(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Configuration for the local archive store.
#[derive(Debug, Clone)]
pub struct ArchiveConfig {
    /// Directory receiving archive records.
    pub dir: PathBuf,

    /// Maximum characters of content kept per record.
    pub preview_chars: usize,
}

impl Default for ArchiveConfig {
    fn default() -> Self {
        Self {
            dir: default_archive_dir(),
            preview_chars: DEFAULT_PREVIEW_CHARS,
        }
    }
}

impl ArchiveConfig {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            ..Default::default()
        }
    }

    pub fn with_preview_chars(mut self, chars: usize) -> Self {
        self.preview_chars = chars;
        self
    }
}

/// Archives previews into a local directory of JSON files.
pub struct LocalArchiver {
    config: ArchiveConfig,
    archived_count: usize,
    failed_count: usize,
}

impl LocalArchiver {
    pub fn new(config: ArchiveConfig) -> Self {
        Self {
            config,
            archived_count: 0,
            failed_count: 0,
        }
    }

    /// Entries written by this archiver.
    pub fn archived_count(&self) -> usize {
        self.archived_count
    }

    /// Archival attempts that failed.
    pub fn failed_count(&self) -> usize {
        self.failed_count
    }

    fn try_archive(&self, path: &Path) -> Result<ArchiveOutcome> {
        let bytes = fs::read(path)?;
        let content = String::from_utf8_lossy(&bytes);

        if content.trim().is_empty() {
            info!("Empty transcript, skipping: {}", path.display());
            return Ok(ArchiveOutcome::Skipped);
        }

        let now = Utc::now();
        let entry = ArchiveEntry::new(path, &content, self.config.preview_chars, now);
        let target = self.write_entry(&entry, now)?;

        info!(
            "Archived: {} -> {}",
            path.file_name().map(|n| n.to_string_lossy()).unwrap_or_default(),
            target.display()
        );
        Ok(ArchiveOutcome::Archived(target))
    }

    /// Write `entry` under a name no earlier entry holds.
    fn write_entry(&self, entry: &ArchiveEntry, at: DateTime<Utc>) -> Result<PathBuf> {
        fs::create_dir_all(&self.config.dir)?;

        let base = format!("{}_{}", entry.session_id, archive_stamp(at));
        for attempt in 0..MAX_NAME_ATTEMPTS {
            let name = if attempt == 0 {
                format!("{}.json", base)
            } else {
                format!("{}-{}.json", base, attempt)
            };
            let target = self.config.dir.join(name);

            let mut file = match OpenOptions::new().write(true).create_new(true).open(&target) {
                Ok(file) => file,
                Err(e) if e.kind() == ErrorKind::AlreadyExists => continue,
                Err(e) => return Err(e.into()),
            };

            serde_json::to_writer_pretty(&mut file, entry)?;
            file.write_all(b"\n")?;
            return Ok(target);
        }

        Err(SweeprError::Archive(format!("no free archive name for {}", base)))
    }
}

impl Archiver for LocalArchiver {
    fn archive_one(&mut self, path: &Path) -> ArchiveOutcome {
        if !path.exists() {
            warn!("Session file not found: {}", path.display());
            self.failed_count += 1;
            return ArchiveOutcome::Failed(format!("session file not found: {}", path.display()));
        }

        match self.try_archive(path) {
            Ok(outcome) => {
                if matches!(outcome, ArchiveOutcome::Archived(_)) {
                    self.archived_count += 1;
                }
                outcome
            }
            Err(e) => {
                error!("Failed to archive {}: {}", path.display(), e);
                self.failed_count += 1;
                ArchiveOutcome::Failed(e.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn setup() -> (TempDir, LocalArchiver) {
        let temp = TempDir::new().unwrap();
        let archiver = LocalArchiver::new(ArchiveConfig::new(temp.path().join("archive")));
        (temp, archiver)
    }

    fn archive_files(dir: &Path) -> Vec<PathBuf> {
        let mut files: Vec<_> = fs::read_dir(dir).unwrap().map(|e| e.unwrap().path()).collect();
        files.sort();
        files
    }

    #[test]
    fn test_archive_config_default() {
        let config = ArchiveConfig::default();
        assert_eq!(config.preview_chars, 1000);
        assert!(config.dir.ends_with("swarm-janitor"));
    }

    #[test]
    fn test_entry_truncates_preview() {
        let content = "x".repeat(1500);
        let entry = ArchiveEntry::new(Path::new("/s/abc.jsonl"), &content, 1000, Utc::now());
        assert_eq!(entry.session_id, "abc");
        assert_eq!(entry.content_preview.chars().count(), 1000);
        assert_eq!(entry.original_path, "/s/abc.jsonl");
    }

    #[test]
    fn test_entry_truncates_on_char_boundary() {
        let content = "é".repeat(20);
        let entry = ArchiveEntry::new(Path::new("a.jsonl"), &content, 5, Utc::now());
        assert_eq!(entry.content_preview, "ééééé");
    }

    #[test]
    fn test_archive_writes_entry() {
        let (temp, mut archiver) = setup();
        let session = temp.path().join("abc.jsonl");
        fs::write(&session, "{\"role\":\"user\"}\n").unwrap();

        let outcome = archiver.archive_one(&session);

        let ArchiveOutcome::Archived(target) = outcome else {
            panic!("expected archived outcome");
        };
        let entry: ArchiveEntry = serde_json::from_str(&fs::read_to_string(&target).unwrap()).unwrap();
        assert_eq!(entry.session_id, "abc");
        assert_eq!(entry.content_preview, "{\"role\":\"user\"}\n");
        assert_eq!(entry.original_path, session.display().to_string());
        assert!(target.file_name().unwrap().to_string_lossy().starts_with("abc_"));
        assert_eq!(archiver.archived_count(), 1);
        assert_eq!(archiver.failed_count(), 0);
    }

    #[test]
    fn test_archive_keeps_session_file() {
        let (temp, mut archiver) = setup();
        let session = temp.path().join("abc.jsonl");
        fs::write(&session, "data").unwrap();

        archiver.archive_one(&session);

        assert!(session.exists());
    }

    #[test]
    fn test_blank_content_is_skipped() {
        let (temp, mut archiver) = setup();
        let session = temp.path().join("blank.jsonl");
        fs::write(&session, "  \n\t\n").unwrap();

        let outcome = archiver.archive_one(&session);

        assert_eq!(outcome, ArchiveOutcome::Skipped);
        assert!(outcome.is_success());
        assert!(!temp.path().join("archive").exists());
        assert_eq!(archiver.archived_count(), 0);
        assert_eq!(archiver.failed_count(), 0);
    }

    #[test]
    fn test_invalid_utf8_is_tolerated() {
        let (temp, mut archiver) = setup();
        let session = temp.path().join("bin.jsonl");
        fs::write(&session, [b'o', b'k', 0xff, 0xfe, b'!']).unwrap();

        let outcome = archiver.archive_one(&session);

        let ArchiveOutcome::Archived(target) = outcome else {
            panic!("expected archived");
        };
        let entry: ArchiveEntry = serde_json::from_str(&fs::read_to_string(target).unwrap()).unwrap();
        assert!(entry.content_preview.starts_with("ok"));
        assert!(entry.content_preview.ends_with('!'));
    }

    #[test]
    fn test_missing_file_fails() {
        let (temp, mut archiver) = setup();

        let outcome = archiver.archive_one(&temp.path().join("gone.jsonl"));

        assert!(matches!(outcome, ArchiveOutcome::Failed(_)));
        assert_eq!(archiver.failed_count(), 1);
    }

    #[test]
    fn test_unwritable_store_fails() {
        let temp = TempDir::new().unwrap();
        let blocker = temp.path().join("blocker");
        fs::write(&blocker, "not a directory").unwrap();
        let mut archiver = LocalArchiver::new(ArchiveConfig::new(blocker.join("archive")));
        let session = temp.path().join("abc.jsonl");
        fs::write(&session, "data").unwrap();

        let outcome = archiver.archive_one(&session);

        assert!(matches!(outcome, ArchiveOutcome::Failed(_)));
        assert_eq!(archiver.failed_count(), 1);
    }

    #[test]
    fn test_repeated_archives_never_overwrite() {
        let (temp, archiver) = setup();
        let entry = ArchiveEntry::new(Path::new("/s/abc.jsonl"), "data", 1000, Utc::now());
        let at = Utc::now();

        let first = archiver.write_entry(&entry, at).unwrap();
        let second = archiver.write_entry(&entry, at).unwrap();

        assert_ne!(first, second);
        assert_eq!(archive_files(&temp.path().join("archive")).len(), 2);
        assert!(second.to_string_lossy().ends_with("-1.json"));
    }
}
