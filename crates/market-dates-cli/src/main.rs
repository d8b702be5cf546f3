//! mdates: tenor rolling and market-data CSV date cleaning.
//!
//! # Usage
//!
//! ```bash
//! # Roll dates by a tenor
//! mdates roll 3M 2021-01-31 2021-02-15
//!
//! # Elapsed days of a reverse roll
//! mdates roll 6M 2018-11-23 --reverse --days
//!
//! # Infer the layout of some textual dates
//! mdates infer 31/01/2019 01/02/2019
//!
//! # Clean the date columns of a CSV
//! mdates clean prices.csv > prices-clean.csv
//!
//! # Melt a Bloomberg export into product,date,price rows
//! mdates melt bbg-export.csv
//! ```

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;
mod io;

use cli::{Cli, Commands};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so stdout stays machine-readable.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let format = cli.format;
    match cli.command {
        Commands::Roll(args) => commands::roll::execute(args, format)?,
        Commands::Lookback(args) => commands::lookback::execute(args, format)?,
        Commands::Infer(args) => commands::infer::execute(args, format)?,
        Commands::Clean(args) => commands::clean::execute(args, format)?,
        Commands::Melt(args) => commands::melt::execute(args, format)?,
    }

    Ok(())
}
