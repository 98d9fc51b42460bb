//! Live-session registry.
//!
//! The agent runtime keeps a `sessions.json` status file next to the
//! transcripts:
//!
//! ```json
//! { "sessions": { "<key>": { "sessionId": "...", "updatedAt": 1738300800123 } } }
//! ```
//!
//! Only `sessionId` and `updatedAt` are read. A missing or unparseable file
//! yields an empty registry, so every session reads as having no process.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use chrono::{DateTime, Duration, Utc};
use log::{debug, warn};
use serde::{Deserialize, Deserializer};

use crate::clock::from_epoch_ms;
use crate::error::Result;

/// One tracked session as recorded by the agent runtime.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RegistryEntry {
    pub session_id: String,
    /// Last update, epoch milliseconds
    #[serde(deserialize_with = "epoch_ms")]
    pub updated_at: i64,
}

/// Accept integer or float epoch milliseconds; `null` reads as unset.
fn epoch_ms<'de, D>(deserializer: D) -> std::result::Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let number = Option::<serde_json::Number>::deserialize(deserializer)?;
    Ok(number
        .and_then(|n| n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)))
        .unwrap_or(0))
}

impl RegistryEntry {
    /// Whether this entry was updated within `window` of `now`.
    pub fn is_fresh(&self, now: DateTime<Utc>, window: Duration) -> bool {
        if self.updated_at <= 0 {
            return false;
        }
        match from_epoch_ms(self.updated_at) {
            Some(updated) => now - updated < window,
            None => false,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct RegistryFile {
    #[serde(default)]
    sessions: BTreeMap<String, serde_json::Value>,
}

/// Snapshot of the registry taken at scan time.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    entries: BTreeMap<String, RegistryEntry>,
}

impl Registry {
    /// Load the registry at `path`, degrading to empty on any problem.
    pub fn load(path: &Path) -> Self {
        if !path.exists() {
            debug!("No registry at {}, treating all sessions as inactive", path.display());
            return Self::default();
        }

        match Self::read(path) {
            Ok(registry) => {
                debug!("Loaded {} registry entries from {}", registry.len(), path.display());
                registry
            }
            Err(e) => {
                warn!("Error reading registry {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    fn read(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parse registry JSON. Individual malformed entries are skipped.
    pub fn parse(content: &str) -> Result<Self> {
        let file: RegistryFile = serde_json::from_str(content)?;

        let mut entries = BTreeMap::new();
        for (key, value) in file.sessions {
            match serde_json::from_value::<RegistryEntry>(value) {
                Ok(entry) => {
                    entries.insert(key, entry);
                }
                Err(e) => debug!("Skipping registry entry {}: {}", key, e),
            }
        }

        Ok(Self { entries })
    }

    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (String, RegistryEntry)>,
    {
        Self {
            entries: entries.into_iter().collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether a session related to `session_id` was updated within `window`.
    ///
    /// An entry is related when its key or its `sessionId` contains the
    /// identifier. Empty identifiers match nothing.
    pub fn is_active(&self, session_id: &str, now: DateTime<Utc>, window: Duration) -> bool {
        if session_id.is_empty() {
            return false;
        }

        self.entries.iter().any(|(key, entry)| {
            (key.contains(session_id) || entry.session_id.contains(session_id)) && entry.is_fresh(now, window)
        })
    }
}
