//! Agrion farm diary writer
//!
//! Main entry point: loads the configuration, sets up the diary log and
//! drives the week loop against a running Chrome.

mod cli;
mod cmd_run;
mod logging;

use std::path::Path;

use anyhow::Context;
use chrono::NaiveDate;
use clap::Parser;

use diary_config::{ConfigLoader, ConfigValidator, DiaryConfig, ValidationWarning};

use crate::cli::{Cli, Commands};

/// Load the config, apply date overrides and validate the result.
fn load_config(
    path: &Path,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> anyhow::Result<(DiaryConfig, Vec<ValidationWarning>)> {
    let mut config = ConfigLoader::load(path)
        .with_context(|| format!("Failed to load config from {}", path.display()))?;
    if let Some(start) = start {
        config = config.with_start_date(start);
    }
    if let Some(end) = end {
        config = config.with_end_date(end);
    }

    let warnings = ConfigValidator::validate(&config)?
        .into_result()
        .context("Invalid configuration")?;
    Ok((config, warnings))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // A missing .env is fine; variables may come from the shell.
    let _ = dotenvy::from_path(&cli.env_file);

    match cli.command.unwrap_or_default() {
        Commands::Run { start, end } => {
            let (config, warnings) = load_config(&cli.config, start, end)?;
            cmd_run::run(config, warnings, None).await
        }
        Commands::Once { date } => {
            let (config, warnings) = load_config(&cli.config, None, None)?;
            cmd_run::run(config, warnings, Some(date)).await
        }
        Commands::Plan { start, end } => {
            let (config, _) = load_config(&cli.config, start, end)?;
            cmd_run::plan(&config);
            Ok(())
        }
    }
}
