//! CSV input and output.

use std::fs::File;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;

/// Raw CSV content: optional header row plus rows of optional cells.
pub struct RawCsv {
    pub headers: Option<Vec<String>>,
    pub rows: Vec<Vec<Option<String>>>,
}

/// Open a file, or stdin when the path is absent or `-`.
fn open_input(path: Option<&Path>) -> Result<Box<dyn Read>> {
    match path {
        Some(p) if p != Path::new("-") => {
            let file = File::open(p).with_context(|| format!("cannot open {}", p.display()))?;
            Ok(Box::new(file))
        }
        _ => Ok(Box::new(io::stdin().lock())),
    }
}

/// Read a whole CSV; blank cells become `None`. Rows may be ragged.
pub fn read_csv(path: Option<&PathBuf>, has_headers: bool) -> Result<RawCsv> {
    let source = path.map_or_else(|| "stdin".to_string(), |p| p.display().to_string());
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(has_headers)
        .flexible(true)
        .from_reader(open_input(path.map(PathBuf::as_path))?);

    let headers = if has_headers {
        let record = reader
            .headers()
            .with_context(|| format!("cannot read CSV header from {source}"))?;
        Some(record.iter().map(|h| h.trim().to_string()).collect())
    } else {
        None
    };

    let mut rows = Vec::new();
    for (i, record) in reader.records().enumerate() {
        let record = record.with_context(|| format!("bad CSV record {} in {source}", i + 1))?;
        rows.push(
            record
                .iter()
                .map(|cell| {
                    let cell = cell.trim();
                    (!cell.is_empty()).then(|| cell.to_string())
                })
                .collect(),
        );
    }
    tracing::debug!(rows = rows.len(), source = %source, "read CSV");

    Ok(RawCsv { headers, rows })
}

/// Write a header and string rows as CSV to stdout.
pub fn write_csv<H, R>(headers: H, rows: R) -> Result<()>
where
    H: IntoIterator,
    H::Item: AsRef<[u8]>,
    R: IntoIterator<Item = Vec<String>>,
{
    let mut writer = csv::Writer::from_writer(io::stdout().lock());
    writer.write_record(headers)?;
    for row in rows {
        writer.write_record(&row)?;
    }
    writer.flush()?;
    Ok(())
}

/// Pretty-print a value as JSON to stdout.
pub fn write_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let mut out = io::stdout().lock();
    serde_json::to_writer_pretty(&mut out, value)?;
    writeln!(out)?;
    Ok(())
}
