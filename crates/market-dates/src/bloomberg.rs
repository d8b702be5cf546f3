//! Bloomberg price-history sheets.
//!
//! A Bloomberg export places one security per pair of columns:
//!
//! ```text
//! TICKER A  |          | TICKER B  |
//! Date      | PX_LAST  | Date      | PX_LAST
//! 31/01/2019| 101.5    | 43496     | 99.1
//! ```
//!
//! Dates are usually text, but rows pasted from a spreadsheet can carry the
//! raw day serial instead. [`melt_bbg_sheet`] turns the grid into one long
//! list of `(product, date, price)` rows with both kinds of date repaired.

use log::{debug, warn};
use serde::Serialize;

use crate::civil::CivilDate;
use crate::error::{DateError, Result};
use crate::format::{resolve_dates, ResolvedColumn};

pub const DATE_HEADER: &str = "Date";
pub const PRICE_FIELD: &str = "PX_LAST";

/// Length of a fully written textual date such as `31/01/2019`.
const TEXT_DATE_LEN: usize = 10;

/// One observation of the long (melted) table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MeltedRow {
    pub product: String,
    pub date: CivilDate,
    pub price: f64,
}

/// Clean a single-security sheet: ticker in the first cell, data from the
/// third row in the first two columns.
///
/// # Errors
///
/// Returns [`DateError::Sheet`] if the ticker is missing or a date or price
/// cannot be read.
pub fn clean_bbg_sheet<R>(grid: &[R]) -> Result<Vec<MeltedRow>>
where
    R: AsRef<[Option<String>]>,
{
    let grid: Vec<Vec<Option<&str>>> = grid.iter().map(|row| borrow_row(row.as_ref())).collect();
    let product = cell(&grid, 0, 0)
        .ok_or_else(|| DateError::Sheet("missing ticker in the first cell".to_string()))?;
    match cell(&grid, 1, 1) {
        Some(field) if field.eq_ignore_ascii_case(PRICE_FIELD) => {}
        other => warn!(
            "sheet field for {product} is {:?}, not {PRICE_FIELD}",
            other.unwrap_or("")
        ),
    }

    let mut rows = Vec::new();
    melt_block(&grid, 0, product, &mut rows)?;
    Ok(rows)
}

/// Melt a multi-security sheet into long `(product, date, price)` rows.
///
/// Entirely empty columns are dropped first. The second row must repeat
/// `Date | PX_LAST` for every security. Rows missing either value are
/// skipped.
///
/// # Errors
///
/// Returns [`DateError::Sheet`] if the header row is wrong, the column count
/// is odd, or a date or price cannot be read.
pub fn melt_bbg_sheet<R>(grid: &[R]) -> Result<Vec<MeltedRow>>
where
    R: AsRef<[Option<String>]>,
{
    let grid = drop_empty_columns(grid);
    if grid.len() < 2 {
        return Err(DateError::Sheet(
            "expected a ticker row and a header row".to_string(),
        ));
    }

    let width = grid[1].len();
    if width % 2 != 0 {
        return Err(DateError::Sheet(format!(
            "expected Date/{PRICE_FIELD} column pairs, found {width} columns"
        )));
    }
    for col in (0..width).step_by(2) {
        let date = cell(&grid, 1, col).unwrap_or("");
        let field = cell(&grid, 1, col + 1).unwrap_or("");
        if !date.eq_ignore_ascii_case(DATE_HEADER) || !field.eq_ignore_ascii_case(PRICE_FIELD) {
            return Err(DateError::Sheet(format!(
                "expected columns [{DATE_HEADER}, {PRICE_FIELD}] at column {}, found [{date}, {field}]",
                col + 1
            )));
        }
    }

    let mut rows = Vec::with_capacity((grid.len() - 2) * width / 2);
    for col in (0..width).step_by(2) {
        let product = cell(&grid, 0, col).ok_or_else(|| {
            DateError::Sheet(format!("missing ticker above column {}", col + 1))
        })?;
        melt_block(&grid, col, product, &mut rows)?;
    }
    Ok(rows)
}

fn borrow_row(row: &[Option<String>]) -> Vec<Option<&str>> {
    row.iter()
        .map(|c| c.as_deref().map(str::trim).filter(|t| !t.is_empty()))
        .collect()
}

fn cell<'a>(grid: &[Vec<Option<&'a str>>], row: usize, col: usize) -> Option<&'a str> {
    grid.get(row)?.get(col).copied().flatten()
}

/// Borrow the grid keeping only columns with at least one value.
fn drop_empty_columns<R>(grid: &[R]) -> Vec<Vec<Option<&str>>>
where
    R: AsRef<[Option<String>]>,
{
    let rows: Vec<Vec<Option<&str>>> = grid.iter().map(|row| borrow_row(row.as_ref())).collect();
    let width = rows.iter().map(Vec::len).max().unwrap_or(0);
    let keep: Vec<usize> = (0..width)
        .filter(|&col| rows.iter().any(|row| row.get(col).copied().flatten().is_some()))
        .collect();
    rows.iter()
        .map(|row| keep.iter().map(|&col| row.get(col).copied().flatten()).collect())
        .collect()
}

/// Append the rows of the `(col, col + 1)` date/price pair to `out`.
fn melt_block(
    grid: &[Vec<Option<&str>>],
    col: usize,
    product: &str,
    out: &mut Vec<MeltedRow>,
) -> Result<()> {
    let pairs: Vec<(&str, &str)> = (2..grid.len())
        .filter_map(|row| Some((cell(grid, row, col)?, cell(grid, row, col + 1)?)))
        .collect();

    // Text dates share one inferred layout; serials convert one by one.
    let texts: Vec<&str> = pairs
        .iter()
        .map(|(date, _)| *date)
        .filter(|date| date.chars().count() == TEXT_DATE_LEN)
        .collect();
    let mut text_dates = match resolve_dates(&texts)? {
        ResolvedColumn::Dates(dates) => dates.into_iter(),
        _ => {
            return Err(DateError::Sheet(format!(
                "cannot infer a date layout for {product} (first date: '{}')",
                texts.first().copied().unwrap_or("")
            )))
        }
    };

    for (date_text, price_text) in &pairs {
        let date = if date_text.chars().count() == TEXT_DATE_LEN {
            text_dates.next().ok_or_else(|| {
                DateError::Sheet(format!("date '{date_text}' for {product} was not resolved"))
            })?
        } else {
            excel_serial_date(date_text, product)?
        };
        let price = price_text.parse::<f64>().map_err(|_| {
            DateError::Sheet(format!("price '{price_text}' for {product} is not a number"))
        })?;
        out.push(MeltedRow {
            product: product.to_string(),
            date,
            price,
        });
    }
    debug!("melted {} rows for {product}", pairs.len());
    Ok(())
}

fn excel_serial_date(text: &str, product: &str) -> Result<CivilDate> {
    let serial = text
        .parse::<f64>()
        .ok()
        .filter(|s| s.is_finite() && s.fract() == 0.0)
        .ok_or_else(|| {
            DateError::Sheet(format!(
                "date '{text}' for {product} is neither a date nor a spreadsheet serial"
            ))
        })?;
    CivilDate::from_excel_serial(serial as i64)
}
