//! Lookback command implementation.

use std::collections::BTreeSet;
use std::path::PathBuf;

use anyhow::{anyhow, bail, Context, Result};
use clap::Args;
use serde_json::json;

use market_dates::{previous_date, resolve_dates, CivilDate, ResolvedColumn};

use crate::cli::OutputFormat;
use crate::commands::parse_date;
use crate::io::{read_csv, write_json};

/// Arguments for the lookback command.
#[derive(Args, Debug)]
pub struct LookbackArgs {
    /// Tenor to look back, e.g. 6M
    pub tenor: String,

    /// Date to look back from (YYYY-MM-DD)
    pub date: String,

    /// CSV file whose date column forms the index (`-` for stdin)
    #[arg(short, long)]
    pub index: PathBuf,

    /// Name of the date column in the index file
    #[arg(short, long, default_value = "date")]
    pub column: String,
}

pub fn execute(args: LookbackArgs, format: OutputFormat) -> Result<()> {
    let date = parse_date(&args.date)?;
    let index = load_index(&args.index, &args.column)?;
    let found = previous_date(&index, date, &args.tenor)
        .with_context(|| format!("cannot look back '{}' from {date}", args.tenor))?;

    match format {
        OutputFormat::Text => println!("{found}"),
        OutputFormat::Json => write_json(&json!({
            "date": date,
            "tenor": args.tenor,
            "previous": found,
            "indexed": index.contains(&found),
        }))?,
    }
    Ok(())
}

fn load_index(path: &PathBuf, column: &str) -> Result<BTreeSet<CivilDate>> {
    let csv = read_csv(Some(path), true)?;
    let headers = csv.headers.unwrap_or_default();
    let position = headers
        .iter()
        .position(|h| h.eq_ignore_ascii_case(column))
        .ok_or_else(|| anyhow!("no column '{column}' in {}", path.display()))?;

    let values: Vec<String> = csv
        .rows
        .into_iter()
        .filter_map(|mut row| row.get_mut(position).and_then(Option::take))
        .collect();
    match resolve_dates(&values)? {
        ResolvedColumn::Dates(dates) => Ok(dates.into_iter().collect()),
        _ => bail!("column '{column}' in {} does not hold dates", path.display()),
    }
}
