//! CLI definitions for the diary writer.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};

/// Weekly farm diary writer for the Agrion portal.
#[derive(Parser)]
#[command(name = "agrion-diary")]
#[command(about = "Writes weekly farm diary entries through a running Chrome")]
#[command(version)]
pub(crate) struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "config/default.toml", global = true)]
    pub config: PathBuf,

    /// Environment file loaded before the configuration
    #[arg(long, default_value = ".env", global = true)]
    pub env_file: PathBuf,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Write every week of the configured range (default)
    Run {
        /// Override the first date (YYYY-MM-DD)
        #[arg(long)]
        start: Option<NaiveDate>,

        /// Override the last date (YYYY-MM-DD)
        #[arg(long)]
        end: Option<NaiveDate>,
    },

    /// Write a single week starting on the given date
    Once {
        /// First day of the week (YYYY-MM-DD)
        #[arg(long)]
        date: NaiveDate,
    },

    /// Print the weeks a run would write, without opening a browser
    Plan {
        /// Override the first date (YYYY-MM-DD)
        #[arg(long)]
        start: Option<NaiveDate>,

        /// Override the last date (YYYY-MM-DD)
        #[arg(long)]
        end: Option<NaiveDate>,
    },
}

impl Default for Commands {
    fn default() -> Self {
        Self::Run {
            start: None,
            end: None,
        }
    }
}
