//! Infer command implementation.

use anyhow::Result;
use clap::Args;
use serde_json::json;

use market_dates::infer_layout;

use crate::cli::OutputFormat;
use crate::io::write_json;

/// Arguments for the infer command.
#[derive(Args, Debug)]
pub struct InferArgs {
    /// Textual dates sharing one layout, e.g. 31/01/2019 01/02/2019
    #[arg(required = true)]
    pub values: Vec<String>,
}

pub fn execute(args: InferArgs, format: OutputFormat) -> Result<()> {
    let layout = infer_layout(&args.values)?;
    match format {
        OutputFormat::Text => match layout {
            Some(layout) => println!("{layout}"),
            None => println!("unresolved"),
        },
        OutputFormat::Json => write_json(&json!({
            "pattern": layout.map(|l| l.pattern()),
            "layout": layout,
        }))?,
    }
    Ok(())
}
