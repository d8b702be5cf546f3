//! Date-column cleaning for in-memory tables.
//!
//! A [`Table`] is a list of named columns of [`Cell`]s, typically built from
//! a CSV read elsewhere. [`clean_date_columns`] rewrites every column whose
//! header mentions "date": integer codes become [`Cell::Integer`], textual
//! dates become [`Cell::Date`], and anything ambiguous is left as it was.

use std::fmt;

use log::debug;
use serde::Serialize;

use crate::civil::CivilDate;
use crate::error::{DateError, Result};
use crate::format::{coerce_integers, resolve_dates, ResolvedColumn};

/// One table value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Cell {
    Empty,
    Text(String),
    Integer(i64),
    Date(CivilDate),
}

impl Cell {
    /// Missing or blank text is [`Cell::Empty`].
    pub fn from_raw(raw: Option<&str>) -> Self {
        match raw {
            Some(text) if !text.trim().is_empty() => Cell::Text(text.to_string()),
            _ => Cell::Empty,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Empty => Ok(()),
            Cell::Text(text) => f.write_str(text),
            Cell::Integer(n) => write!(f, "{n}"),
            Cell::Date(date) => write!(f, "{date}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Column {
    pub name: String,
    pub cells: Vec<Cell>,
}

/// Named columns of equal length.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Table {
    columns: Vec<Column>,
}

impl Table {
    /// Build a table from a header row and raw text rows.
    ///
    /// Short rows are padded with [`Cell::Empty`].
    ///
    /// # Errors
    ///
    /// Returns [`DateError::Sheet`] if a row has more cells than headers.
    pub fn from_rows<R>(headers: Vec<String>, rows: &[R]) -> Result<Self>
    where
        R: AsRef<[Option<String>]>,
    {
        let mut columns: Vec<Column> = headers
            .into_iter()
            .map(|name| Column {
                name,
                cells: Vec::with_capacity(rows.len()),
            })
            .collect();

        for (i, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            if row.len() > columns.len() {
                return Err(DateError::Sheet(format!(
                    "row {} has {} cells but the table has {} columns",
                    i + 1,
                    row.len(),
                    columns.len()
                )));
            }
            for (j, column) in columns.iter_mut().enumerate() {
                let raw = row.get(j).and_then(|cell| cell.as_deref());
                column.cells.push(Cell::from_raw(raw));
            }
        }

        Ok(Table { columns })
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn headers(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn row_count(&self) -> usize {
        self.columns.first().map_or(0, |c| c.cells.len())
    }

    /// Row `i` as references into each column.
    pub fn row(&self, i: usize) -> Option<Vec<&Cell>> {
        self.columns.iter().map(|c| c.cells.get(i)).collect()
    }
}

/// Options for [`clean_date_columns`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanOptions {
    /// Columns whose header contains this (case-insensitive) are cleaned.
    pub header_keyword: String,
}

impl Default for CleanOptions {
    fn default() -> Self {
        CleanOptions {
            header_keyword: "date".to_string(),
        }
    }
}

/// Clean every date-named column of `table`, returning a new table.
///
/// For each selected column:
///
/// - all-empty columns, columns already holding typed values, and columns
///   whose values all start with a letter are left alone;
/// - columns of integers become [`Cell::Integer`];
/// - otherwise the layout is inferred with [`resolve_dates`] and the values
///   become [`Cell::Date`]; ambiguous columns are left alone.
///
/// # Errors
///
/// Propagates [`DateError::Format`] from layout inference.
pub fn clean_date_columns(table: &Table, options: &CleanOptions) -> Result<Table> {
    let keyword = options.header_keyword.to_lowercase();
    let columns = table
        .columns
        .iter()
        .map(|column| {
            if column.name.to_lowercase().contains(&keyword) {
                clean_column(column)
            } else {
                Ok(column.clone())
            }
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(Table { columns })
}

fn clean_column(column: &Column) -> Result<Column> {
    let mut texts: Vec<(usize, &str)> = Vec::with_capacity(column.cells.len());
    for (i, cell) in column.cells.iter().enumerate() {
        match cell {
            Cell::Empty => {}
            Cell::Text(text) => texts.push((i, text.trim())),
            Cell::Integer(_) | Cell::Date(_) => return Ok(column.clone()),
        }
    }

    if texts.is_empty()
        || texts
            .iter()
            .all(|(_, t)| t.starts_with(|c: char| c.is_ascii_alphabetic()))
    {
        return Ok(column.clone());
    }

    let values: Vec<&str> = texts.iter().map(|(_, t)| *t).collect();
    let replacements: Vec<Cell> = if let Some(integers) = coerce_integers(&values) {
        integers.into_iter().map(Cell::Integer).collect()
    } else {
        match resolve_dates(&values)? {
            ResolvedColumn::Dates(dates) => dates.into_iter().map(Cell::Date).collect(),
            ResolvedColumn::Integers(integers) => integers.into_iter().map(Cell::Integer).collect(),
            ResolvedColumn::Unparsed(_) => return Ok(column.clone()),
        }
    };
    debug!("cleaned column '{}' ({} values)", column.name, replacements.len());

    let mut cells = column.cells.clone();
    for ((i, _), cell) in texts.iter().zip(replacements) {
        cells[*i] = cell;
    }
    Ok(Column {
        name: column.name.clone(),
        cells,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> CivilDate {
        CivilDate::from_ymd(y, m, d).unwrap()
    }

    fn raw(cells: &[&str]) -> Vec<Option<String>> {
        cells
            .iter()
            .map(|c| if c.is_empty() { None } else { Some(c.to_string()) })
            .collect()
    }

    fn table(headers: &[&str], rows: &[&[&str]]) -> Table {
        let rows: Vec<Vec<Option<String>>> = rows.iter().map(|r| raw(r)).collect();
        Table::from_rows(headers.iter().map(|h| h.to_string()).collect(), &rows).unwrap()
    }

    fn cells<'a>(t: &'a Table, name: &str) -> &'a [Cell] {
        &t.column(name).unwrap().cells
    }

    #[test]
    fn test_cleans_only_date_headers() {
        let t = table(
            &["Trade Date", "Price", "Note"],
            &[&["31/01/2019", "101.5", "a"], &["01/02/2019", "102.0", "b"]],
        );
        let cleaned = clean_date_columns(&t, &CleanOptions::default()).unwrap();
        assert_eq!(
            cells(&cleaned, "Trade Date"),
            &[Cell::Date(date(2019, 1, 31)), Cell::Date(date(2019, 2, 1))]
        );
        assert_eq!(cells(&cleaned, "Price"), cells(&t, "Price"));
        assert_eq!(cells(&cleaned, "Note"), cells(&t, "Note"));
    }

    #[test]
    fn test_integer_codes_become_integers() {
        let t = table(&["DATE_ID"], &[&["43831"], &["43832"]]);
        let cleaned = clean_date_columns(&t, &CleanOptions::default()).unwrap();
        assert_eq!(
            cells(&cleaned, "DATE_ID"),
            &[Cell::Integer(43_831), Cell::Integer(43_832)]
        );
    }

    #[test]
    fn test_empty_cells_stay_empty() {
        let t = table(&["date"], &[&["2019-01-31"], &[""], &["2019-02-01"]]);
        let cleaned = clean_date_columns(&t, &CleanOptions::default()).unwrap();
        assert_eq!(
            cells(&cleaned, "date"),
            &[
                Cell::Date(date(2019, 1, 31)),
                Cell::Empty,
                Cell::Date(date(2019, 2, 1))
            ]
        );
    }

    #[test]
    fn test_skips_null_and_label_columns() {
        let t = table(
            &["start date", "date label"],
            &[&["", "Monthly"], &["", "Quarterly"]],
        );
        let cleaned = clean_date_columns(&t, &CleanOptions::default()).unwrap();
        assert_eq!(cleaned, t);
    }

    #[test]
    fn test_ambiguous_column_passes_through() {
        let t = table(&["Date"], &[&["01/02/03"], &["04/05/06"]]);
        let cleaned = clean_date_columns(&t, &CleanOptions::default()).unwrap();
        assert_eq!(cleaned, t);
    }

    #[test]
    fn test_mixed_separators_error() {
        let t = table(&["Date"], &[&["31/01/2019"], &["2019-02-01"]]);
        assert!(matches!(
            clean_date_columns(&t, &CleanOptions::default()),
            Err(DateError::Format(_))
        ));
    }

    #[test]
    fn test_custom_keyword_and_input_untouched() {
        let t = table(&["Maturity"], &[&["2030-06-15"]]);
        let before = t.clone();
        let options = CleanOptions {
            header_keyword: "MATUR".to_string(),
        };
        let cleaned = clean_date_columns(&t, &options).unwrap();
        assert_eq!(t, before);
        assert_eq!(cells(&cleaned, "Maturity"), &[Cell::Date(date(2030, 6, 15))]);
    }

    #[test]
    fn test_from_rows_pads_and_rejects() {
        let t = table(&["a", "b"], &[&["1"], &["2", "3"]]);
        assert_eq!(t.row_count(), 2);
        assert_eq!(t.row(0).unwrap(), vec![&Cell::Text("1".into()), &Cell::Empty]);
        assert!(t.row(2).is_none());

        let rows = vec![raw(&["1", "2", "3"])];
        assert!(matches!(
            Table::from_rows(vec!["a".to_string()], &rows),
            Err(DateError::Sheet(_))
        ));
    }

    #[test]
    fn test_cell_display() {
        assert_eq!(Cell::Date(date(2019, 2, 1)).to_string(), "2019-02-01");
        assert_eq!(Cell::Integer(7).to_string(), "7");
        assert_eq!(Cell::Empty.to_string(), "");
    }
}
