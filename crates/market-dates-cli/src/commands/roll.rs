//! Roll command implementation.

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;

use market_dates::{apply_tenor_batch, CivilDate, TenorOptions, TenorValue};

use crate::cli::OutputFormat;
use crate::commands::parse_date;
use crate::io::write_json;

/// Arguments for the roll command.
#[derive(Args, Debug)]
pub struct RollArgs {
    /// Tenor code: 1D, 2W, 3M, 1Y, spot, ON, O/N, SN, S/N
    pub tenor: String,

    /// Base dates (YYYY-MM-DD)
    #[arg(required = true)]
    pub dates: Vec<String>,

    /// Subtract the tenor instead of adding it
    #[arg(short, long)]
    pub reverse: bool,

    /// Print elapsed days instead of dates
    #[arg(short, long)]
    pub days: bool,
}

#[derive(Serialize)]
struct Rolled {
    date: CivilDate,
    result: TenorValue,
}

pub fn execute(args: RollArgs, format: OutputFormat) -> Result<()> {
    let dates = args
        .dates
        .iter()
        .map(|d| parse_date(d))
        .collect::<Result<Vec<_>>>()?;
    let options = TenorOptions {
        reverse: args.reverse,
        as_day_count: args.days,
    };
    let values = apply_tenor_batch(&dates, &args.tenor, &options)
        .with_context(|| format!("cannot apply tenor '{}'", args.tenor))?;

    match format {
        OutputFormat::Text => {
            for (date, value) in dates.iter().zip(&values) {
                println!("{date}\t{value}");
            }
        }
        OutputFormat::Json => {
            let rolled: Vec<Rolled> = dates
                .into_iter()
                .zip(values)
                .map(|(date, result)| Rolled { date, result })
                .collect();
            write_json(&rolled)?;
        }
    }
    Ok(())
}
