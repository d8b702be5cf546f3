//! CLI argument definitions.

use clap::{Parser, Subcommand, ValueEnum};

use crate::commands::{CleanArgs, InferArgs, LookbackArgs, MeltArgs, RollArgs};

/// Tenor rolling and date cleaning for market-data files
#[derive(Parser)]
#[command(name = "mdates")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, default_value = "text", global = true)]
    pub format: OutputFormat,

    /// Log filter used when RUST_LOG is not set
    #[arg(long, default_value = "warn", global = true)]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Roll dates forward (or back) by a tenor
    Roll(RollArgs),

    /// Look back a tenor and snap onto the dates of a CSV column
    Lookback(LookbackArgs),

    /// Infer the parse pattern shared by some textual dates
    Infer(InferArgs),

    /// Clean every date column of a CSV
    Clean(CleanArgs),

    /// Melt a Bloomberg Date/PX_LAST export into long rows
    Melt(MeltArgs),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Plain text; CSV for table output
    #[default]
    Text,
    /// JSON
    Json,
}
