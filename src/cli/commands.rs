//! CLI definition using clap.
//!
//! A single command: preview by default, `--clean` to delete.

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use sweepr::config::{Config, expand_tilde};
use sweepr::janitor::JanitorOptions;

const EXAMPLES: &str = "\
Examples:
  # Preview what would be cleaned
  sweepr --dry-run

  # Archive and clean sessions older than 3 days
  sweepr --clean

  # Clean with custom retention period
  sweepr --clean --retention-days 7

  # Force cleanup without confirmation
  sweepr --clean --force";

/// Sweepr - clean up orphaned agent session transcripts
#[derive(Parser, Debug)]
#[command(name = "sweepr")]
#[command(author, version, about, long_about = None, after_help = EXAMPLES)]
pub struct Cli {
    /// Optional config file path
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Sessions directory (default: ~/.openclaw/agents/main/sessions)
    #[arg(long)]
    pub sessions_dir: Option<PathBuf>,

    /// Delete sessions older than N days (default: 3)
    #[arg(long)]
    pub retention_days: Option<u32>,

    /// Preview changes without executing (the default)
    #[arg(long, conflicts_with = "clean")]
    pub dry_run: bool,

    /// Execute cleanup (required to actually delete files)
    #[arg(long)]
    pub clean: bool,

    /// Skip archiving (not recommended)
    #[arg(long)]
    pub no_archive: bool,

    /// Directory receiving archive records
    #[arg(long)]
    pub archive_dir: Option<PathBuf>,

    /// Judge sessions by age only, ignoring the session registry
    #[arg(long)]
    pub age_only: bool,

    /// Skip confirmation prompts
    #[arg(long)]
    pub force: bool,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub output: OutputFormat,
}

/// How the final statistics are reported
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl Cli {
    /// Check if verbose mode is enabled
    pub fn is_verbose(&self) -> bool {
        self.verbose
    }

    /// Fold command-line overrides into a loaded config.
    pub fn apply(&self, config: &mut Config) {
        if let Some(dir) = &self.sessions_dir {
            config.sessions_dir = expand_tilde(dir);
        }
        if let Some(days) = self.retention_days {
            config.retention_days = days;
        }
        if self.no_archive {
            config.archive.enabled = false;
        }
        if let Some(dir) = &self.archive_dir {
            config.archive.dir = expand_tilde(dir);
        }
        if self.age_only {
            config.liveness_check = false;
        }
    }

    /// Run options. `env_force` carries the out-of-band force signal.
    pub fn janitor_options(&self, config: &Config, env_force: bool) -> JanitorOptions {
        JanitorOptions::default()
            .with_execute(self.clean)
            .with_archive(config.archive.enabled)
            .with_force(self.force || env_force)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_no_args() {
        let cli = Cli::try_parse_from(["sweepr"]).unwrap();
        assert!(!cli.clean);
        assert!(!cli.force);
        assert!(!cli.verbose);
        assert!(cli.config.is_none());
        assert_eq!(cli.output, OutputFormat::Text);
    }

    #[test]
    fn test_cli_verbose_flag() {
        let cli = Cli::try_parse_from(["sweepr", "-v"]).unwrap();
        assert!(cli.is_verbose());
    }

    #[test]
    fn test_cli_config_option() {
        let cli = Cli::try_parse_from(["sweepr", "-c", "/path/to/sweepr.yml"]).unwrap();
        assert_eq!(cli.config.as_ref(), Some(&PathBuf::from("/path/to/sweepr.yml")));
    }

    #[test]
    fn test_cli_output_json() {
        let cli = Cli::try_parse_from(["sweepr", "--output", "json"]).unwrap();
        assert_eq!(cli.output, OutputFormat::Json);
    }

    #[test]
    fn test_cli_rejects_unknown_output() {
        assert!(Cli::try_parse_from(["sweepr", "--output", "xml"]).is_err());
    }

    #[test]
    fn test_cli_dry_run_conflicts_with_clean() {
        assert!(Cli::try_parse_from(["sweepr", "--dry-run", "--clean"]).is_err());
    }

    #[test]
    fn test_default_options_are_preview_with_archive() {
        let cli = Cli::try_parse_from(["sweepr"]).unwrap();
        let options = cli.janitor_options(&Config::default(), false);
        assert!(!options.execute);
        assert!(options.archive);
        assert!(!options.force);
    }

    #[test]
    fn test_clean_no_archive_force() {
        let cli = Cli::try_parse_from(["sweepr", "--clean", "--no-archive", "--force"]).unwrap();
        let mut config = Config::default();
        cli.apply(&mut config);
        let options = cli.janitor_options(&config, false);
        assert!(options.execute);
        assert!(!options.archive);
        assert!(options.force);
    }

    #[test]
    fn test_env_force_sets_force() {
        let cli = Cli::try_parse_from(["sweepr", "--clean"]).unwrap();
        let options = cli.janitor_options(&Config::default(), true);
        assert!(options.force);
    }

    #[test]
    fn test_apply_overrides() {
        let cli = Cli::try_parse_from([
            "sweepr",
            "--sessions-dir",
            "/data/sessions",
            "--retention-days",
            "7",
            "--archive-dir",
            "/data/archive",
            "--age-only",
        ])
        .unwrap();
        let mut config = Config::default();
        cli.apply(&mut config);
        assert_eq!(config.sessions_dir, PathBuf::from("/data/sessions"));
        assert_eq!(config.retention_days, 7);
        assert_eq!(config.archive.dir, PathBuf::from("/data/archive"));
        assert!(!config.liveness_check);
        assert!(config.archive.enabled);
    }
}
