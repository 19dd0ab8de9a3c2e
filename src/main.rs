//! Main application entry point (CLI binary).
//!
//! This is a thin wrapper around the `domain_snap` library that handles:
//! - Command-line argument parsing
//! - Logger initialization
//! - Options-file loading and override merging
//! - User-facing output formatting
//!
//! All core functionality is implemented in the library crate.

use anyhow::{Context, Result};
use clap::Parser;
use std::process;

use domain_snap::initialization::init_logger_with;
use domain_snap::{run_from_file, Config, Opt, Overrides};

#[tokio::main]
async fn main() -> Result<()> {
    let opt = Opt::parse();

    let log_level = opt.log_level.clone();
    let log_format = opt.log_format.clone();
    init_logger_with(log_level.into(), log_format).context("Failed to initialize logger")?;

    // Defaults < options file < explicit CLI flags
    let file_overrides = match &opt.options {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read options file {}", path.display()))?;
            serde_json::from_str::<Overrides>(&raw)
                .with_context(|| format!("Failed to parse options file {}", path.display()))?
        }
        None => Overrides::default(),
    };
    let config = opt
        .cli_overrides()
        .over(file_overrides)
        .merged_over(Config::default());

    match run_from_file(&opt.file, config).await {
        Ok(summary) => {
            let total = summary.results.len();
            println!(
                "Processed {} URL{} ({} succeeded, {} failed)",
                total,
                if total == 1 { "" } else { "s" },
                summary.success,
                summary.failed
            );
            Ok(())
        }
        Err(e) => {
            eprintln!("domain_snap error: {:#}", e);
            process::exit(1);
        }
    }
}
