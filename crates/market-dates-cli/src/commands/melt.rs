//! Melt command implementation.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use market_dates::{clean_bbg_sheet, melt_bbg_sheet};

use crate::cli::OutputFormat;
use crate::io::{read_csv, write_csv, write_json};

/// Arguments for the melt command.
#[derive(Args, Debug)]
pub struct MeltArgs {
    /// Bloomberg export CSV without headers (`-` or absent for stdin)
    pub input: Option<PathBuf>,

    /// The sheet holds a single security in its first two columns
    #[arg(short, long)]
    pub single: bool,
}

pub fn execute(args: MeltArgs, format: OutputFormat) -> Result<()> {
    let csv = read_csv(args.input.as_ref(), false)?;
    let rows = if args.single {
        clean_bbg_sheet(&csv.rows)
    } else {
        melt_bbg_sheet(&csv.rows)
    }
    .context("cannot read Bloomberg sheet")?;
    tracing::info!(rows = rows.len(), "melted sheet");

    match format {
        OutputFormat::Text => write_csv(
            ["product", "date", "price"],
            rows.iter()
                .map(|r| vec![r.product.clone(), r.date.to_string(), r.price.to_string()]),
        )?,
        OutputFormat::Json => write_json(&rows)?,
    }
    Ok(())
}
