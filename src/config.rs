use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::archive::{ArchiveConfig, DEFAULT_PREVIEW_CHARS};
use crate::error::{Result, SweeprError};
use crate::scanner::ScannerConfig;

const PROJECT_NAME: &str = env!("CARGO_PKG_NAME");

fn home_dir() -> PathBuf {
    dirs::home_dir().unwrap_or_else(|| PathBuf::from("."))
}

/// Where the agent runtime keeps session transcripts.
pub fn default_sessions_dir() -> PathBuf {
    home_dir().join(".openclaw").join("agents").join("main").join("sessions")
}

/// Where archive records are written when no directory is configured.
pub fn default_archive_dir() -> PathBuf {
    home_dir().join(".openclaw").join("archives").join("swarm-janitor")
}

/// Expand a leading `~` to the home directory.
pub fn expand_tilde(path: &Path) -> PathBuf {
    match path.strip_prefix("~") {
        Ok(rest) => home_dir().join(rest),
        Err(_) => path.to_path_buf(),
    }
}

/// Resolved configuration plus anything worth reporting once logging is up.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: Config,

    /// File the config came from, `None` for built-in defaults.
    pub source: Option<PathBuf>,

    /// Config files that existed but could not be used.
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub log_level: Option<String>,
    pub sessions_dir: PathBuf,
    pub retention_days: u32,
    pub liveness_window_secs: u64,
    pub liveness_check: bool,
    pub registry_file: String,
    pub archive: ArchiveSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ArchiveSettings {
    pub enabled: bool,
    pub dir: PathBuf,
    pub preview_chars: usize,
}

impl Default for ArchiveSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            dir: default_archive_dir(),
            preview_chars: DEFAULT_PREVIEW_CHARS,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: Some("info".to_string()),
            sessions_dir: default_sessions_dir(),
            retention_days: 3,
            liveness_window_secs: 3600,
            liveness_check: true,
            registry_file: "sessions.json".to_string(),
            archive: ArchiveSettings::default(),
        }
    }
}

impl Config {
    /// Load configuration with fallback chain
    ///
    /// Runs before logging is set up, so problems with fallback files are
    /// returned as warnings rather than logged here.
    pub fn load(config_path: Option<&PathBuf>) -> Result<LoadedConfig> {
        // If explicit config path provided, it must load
        if let Some(path) = config_path {
            let config = Self::load_from_file(path)
                .map_err(|e| SweeprError::Config(format!("Failed to load config from {}: {}", path.display(), e)))?;
            return Ok(LoadedConfig {
                config,
                source: Some(path.clone()),
                warnings: Vec::new(),
            });
        }

        let mut candidates = Vec::new();

        // Primary location: ~/.config/<project>/<project>.yml
        if let Some(config_dir) = dirs::config_dir() {
            candidates.push(config_dir.join(PROJECT_NAME).join(format!("{}.yml", PROJECT_NAME)));
        }

        // Fallback location: ./<project>.yml
        candidates.push(PathBuf::from(format!("{}.yml", PROJECT_NAME)));

        Ok(Self::load_first(&candidates))
    }

    /// Load the first candidate that exists and parses, else defaults.
    pub fn load_first(candidates: &[PathBuf]) -> LoadedConfig {
        let mut warnings = Vec::new();

        for path in candidates.iter().filter(|p| p.exists()) {
            match Self::load_from_file(path) {
                Ok(config) => {
                    return LoadedConfig {
                        config,
                        source: Some(path.clone()),
                        warnings,
                    };
                }
                Err(e) => warnings.push(format!("Failed to load config from {}: {}", path.display(), e)),
            }
        }

        LoadedConfig {
            config: Self::default(),
            source: None,
            warnings,
        }
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path)?;
        Self::from_yaml(&content)
    }

    /// Parse and validate a YAML document.
    pub fn from_yaml(content: &str) -> Result<Self> {
        let mut config: Self = serde_yaml::from_str(content)?;
        config.sessions_dir = expand_tilde(&config.sessions_dir);
        config.archive.dir = expand_tilde(&config.archive.dir);
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.liveness_window().is_none() {
            return Err(SweeprError::Config(format!(
                "liveness_window_secs out of range: {}",
                self.liveness_window_secs
            )));
        }
        if self.scanner_config().cutoff(Utc::now()).is_none() {
            return Err(SweeprError::Config(format!("retention_days out of range: {}", self.retention_days)));
        }
        if self.registry_file.trim().is_empty() {
            return Err(SweeprError::Config("registry_file must not be empty".to_string()));
        }
        Ok(())
    }

    pub fn liveness_window(&self) -> Option<Duration> {
        i64::try_from(self.liveness_window_secs).ok().and_then(Duration::try_seconds)
    }

    /// Scanner settings derived from this config.
    pub fn scanner_config(&self) -> ScannerConfig {
        let mut scanner = ScannerConfig::new(&self.sessions_dir)
            .with_retention_days(self.retention_days)
            .with_liveness_check(self.liveness_check)
            .with_registry_file(&self.registry_file);
        if let Some(window) = self.liveness_window() {
            scanner = scanner.with_liveness_window(window);
        }
        scanner
    }

    /// Archive store settings derived from this config.
    pub fn archive_config(&self) -> ArchiveConfig {
        ArchiveConfig::new(&self.archive.dir).with_preview_chars(self.archive.preview_chars)
    }
}
