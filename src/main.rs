use chrono::Utc;
use clap::Parser;
use colored::*;
use eyre::{Context, Result};
use log::{LevelFilter, info, warn};
use std::process::ExitCode;

mod cli;

use cli::{Cli, OutputFormat};
use sweepr::archive::LocalArchiver;
use sweepr::config::Config;
use sweepr::confirm::PromptConfirmer;
use sweepr::domain::RunPhase;
use sweepr::janitor::{Janitor, RunReport};
use sweepr::scanner::SessionScanner;

/// Set to any non-empty value to skip the confirmation prompt.
const FORCE_ENV: &str = "SWEEPR_FORCE";

fn setup_logging(cli: &Cli, config: &Config) -> Result<()> {
    let level = if cli.is_verbose() {
        LevelFilter::Debug
    } else {
        config
            .log_level
            .as_deref()
            .and_then(|l| l.parse().ok())
            .unwrap_or(LevelFilter::Info)
    };

    // RUST_LOG still wins over the configured level
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .target(env_logger::Target::Stderr)
        .try_init()
        .context("Failed to initialize logger")?;

    Ok(())
}

fn env_force() -> bool {
    std::env::var_os(FORCE_ENV).is_some_and(|v| !v.is_empty())
}

fn print_summary(report: &RunReport) {
    let stats = &report.stats;

    match report.phase {
        RunPhase::EmptyExit => println!("{}", "No orphaned sessions found.".green()),
        RunPhase::DryRunExit => {
            println!("{} {} orphaned sessions", "Dry run:".yellow(), stats.orphaned);
            for record in &report.orphaned {
                println!(
                    "  {} ({} bytes, modified {}) - {}",
                    record.file_name.cyan(),
                    record.size_bytes,
                    record.modified.format("%Y-%m-%d %H:%M:%S"),
                    record.reason_summary()
                );
            }
            println!("No changes made. Use {} to execute.", "--clean".bold());
        }
        RunPhase::Cancelled => println!("{}", "Cleanup cancelled.".yellow()),
        RunPhase::Done => {
            println!("{}", "Cleanup Summary".bold());
            println!("  Sessions scanned: {}", stats.scanned);
            println!("  Orphaned found:   {}", stats.orphaned);
            println!("  Archived:         {}", stats.archived);
            println!("  Deleted:          {}", stats.deleted.to_string().green());
            let failed = if stats.failed > 0 {
                stats.failed.to_string().red()
            } else {
                stats.failed.to_string().normal()
            };
            println!("  Failed:           {}", failed);
            println!("  Space reclaimed:  {} bytes", stats.space_reclaimed_bytes);
        }
    }
}

fn main() -> Result<ExitCode> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Load configuration, then layer the flags on top
    let loaded = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;
    let mut config = loaded.config;
    cli.apply(&mut config);

    setup_logging(&cli, &config).context("Failed to setup logging")?;
    for warning in &loaded.warnings {
        warn!("{}", warning);
    }
    match &loaded.source {
        Some(path) => info!("Loaded config from: {}", path.display()),
        None => info!("No config file found, using defaults"),
    }

    config.validate().context("Invalid configuration")?;
    info!("Sessions directory: {}", config.sessions_dir.display());

    let options = cli.janitor_options(&config, env_force());
    let scanner = SessionScanner::new(config.scanner_config());
    let archiver = LocalArchiver::new(config.archive_config());
    let mut janitor = Janitor::new(scanner, archiver, PromptConfirmer::stdio(), options);

    let report = janitor.run(Utc::now());

    match cli.output {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&report.stats).context("Failed to serialize stats")?;
            println!("{}", json);
        }
        OutputFormat::Text => print_summary(&report),
    }

    Ok(ExitCode::from(report.exit_code() as u8))
}
