//! Clean command implementation.

use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use clap::Args;
use serde_json::{Map, Value};

use market_dates::{clean_date_columns, CleanOptions, Table};

use crate::cli::OutputFormat;
use crate::io::{read_csv, write_csv, write_json};

/// Arguments for the clean command.
#[derive(Args, Debug)]
pub struct CleanArgs {
    /// Input CSV with a header row (`-` or absent for stdin)
    pub input: Option<PathBuf>,

    /// Columns whose header contains this text are cleaned
    #[arg(short, long, default_value = "date")]
    pub keyword: String,
}

pub fn execute(args: CleanArgs, format: OutputFormat) -> Result<()> {
    let csv = read_csv(args.input.as_ref(), true)?;
    let headers = csv
        .headers
        .ok_or_else(|| anyhow!("input has no header row"))?;
    let table = Table::from_rows(headers, &csv.rows)?;

    let options = CleanOptions {
        header_keyword: args.keyword,
    };
    let cleaned = clean_date_columns(&table, &options).context("cannot clean date columns")?;

    match format {
        OutputFormat::Text => write_csv(
            cleaned.headers(),
            (0..cleaned.row_count()).map(|i| {
                cleaned
                    .columns()
                    .iter()
                    .map(|c| c.cells[i].to_string())
                    .collect()
            }),
        )?,
        OutputFormat::Json => {
            let records: Vec<Map<String, Value>> = (0..cleaned.row_count())
                .map(|i| {
                    cleaned
                        .columns()
                        .iter()
                        .map(|c| -> Result<(String, Value)> {
                            Ok((c.name.clone(), serde_json::to_value(&c.cells[i])?))
                        })
                        .collect::<Result<Map<String, Value>>>()
                })
                .collect::<Result<_>>()?;
            write_json(&records)?;
        }
    }
    Ok(())
}
