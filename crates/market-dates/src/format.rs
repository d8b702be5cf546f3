//! Date-format inference for columns of textual dates.
//!
//! A column such as `["31/01/2019", "01/02/2019"]` carries no explicit
//! format. [`infer_layout`] looks at every distinct value at once to decide
//! the separator, which slot holds the year, month and day, whether the year
//! has two or four digits, and whether the month is a number or an
//! abbreviated name. [`resolve_dates`] then parses the whole column with that
//! single layout.
//!
//! Columns that are really integer codes (spreadsheet serials, identifiers)
//! come back as [`ResolvedColumn::Integers`]; columns with no usable layout
//! pass through untouched as [`ResolvedColumn::Unparsed`].

use std::collections::{HashMap, HashSet};
use std::fmt;

use chrono::NaiveDate;
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::civil::CivilDate;
use crate::error::{DateError, Result};

// ── Layout ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Separator {
    Slash,
    Dash,
}

impl Separator {
    pub fn as_char(self) -> char {
        match self {
            Separator::Slash => '/',
            Separator::Dash => '-',
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Slot {
    Year,
    Month,
    Day,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum YearWidth {
    /// `%Y`
    Four,
    /// `%y`
    Two,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MonthStyle {
    /// `%m`
    Numeric,
    /// `%b`, e.g. `Jan`.
    Abbreviated,
}

/// A single parse layout shared by every value of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateLayout {
    pub separator: Separator,
    /// Which field sits in each of the three positions.
    pub order: [Slot; 3],
    pub year: YearWidth,
    pub month: MonthStyle,
}

impl DateLayout {
    /// The chrono `strftime` pattern for this layout, e.g. `%d/%m/%Y`.
    pub fn pattern(&self) -> String {
        let sep = self.separator.as_char().to_string();
        self.order
            .iter()
            .map(|slot| match slot {
                Slot::Year => match self.year {
                    YearWidth::Four => "%Y",
                    YearWidth::Two => "%y",
                },
                Slot::Month => match self.month {
                    MonthStyle::Numeric => "%m",
                    MonthStyle::Abbreviated => "%b",
                },
                Slot::Day => "%d",
            })
            .collect::<Vec<_>>()
            .join(&sep)
    }

    /// Parse one value with this layout.
    ///
    /// # Errors
    ///
    /// Returns [`DateError::Parse`] if the value does not match the layout.
    pub fn parse(&self, value: &str) -> Result<CivilDate> {
        let pattern = self.pattern();
        NaiveDate::parse_from_str(value.trim(), &pattern)
            .map(CivilDate::from)
            .map_err(|e| DateError::Parse(format!("'{}' as {}: {}", value.trim(), pattern, e)))
    }
}

impl fmt::Display for DateLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.pattern())
    }
}

// ── resolve_dates ───────────────────────────────────────────────────────────

/// The outcome of resolving a text column.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "values", rename_all = "snake_case")]
pub enum ResolvedColumn {
    /// Every value parsed with one inferred layout.
    Dates(Vec<CivilDate>),
    /// Every value is a plain integer; not treated as dates.
    Integers(Vec<i64>),
    /// No usable layout; the input is returned unchanged.
    Unparsed(Vec<String>),
}

/// Resolve a column of textual dates into civil dates.
///
/// # Errors
///
/// Returns [`DateError::Format`] when the column mixes `/` and `-`
/// separators or when the year sits between the other two fields.
/// Ambiguous columns are not errors: they come back as
/// [`ResolvedColumn::Unparsed`].
///
/// # Examples
///
/// ```
/// use market_dates::{resolve_dates, CivilDate, ResolvedColumn};
///
/// let resolved = resolve_dates(&["31/01/2019", "01/02/2019"]).unwrap();
/// assert_eq!(
///     resolved,
///     ResolvedColumn::Dates(vec![
///         CivilDate::from_ymd(2019, 1, 31).unwrap(),
///         CivilDate::from_ymd(2019, 2, 1).unwrap(),
///     ])
/// );
/// ```
pub fn resolve_dates<S: AsRef<str>>(column: &[S]) -> Result<ResolvedColumn> {
    let values: Vec<&str> = column.iter().map(|v| v.as_ref().trim()).collect();
    if values.is_empty() {
        return Ok(ResolvedColumn::Dates(Vec::new()));
    }

    if let Some(integers) = coerce_integers(&values) {
        return Ok(ResolvedColumn::Integers(integers));
    }

    // Repeated dates are common; infer and parse once per distinct value.
    let distinct = distinct_values(&values);
    let unparsed =
        || ResolvedColumn::Unparsed(column.iter().map(|v| v.as_ref().to_string()).collect());

    let Some(layout) = infer_layout(&distinct)? else {
        warn!(
            "no date layout fits {} distinct values (first: '{}'); leaving column unparsed",
            distinct.len(),
            distinct[0]
        );
        return Ok(unparsed());
    };
    debug!("inferred date layout {layout} from {} distinct values", distinct.len());

    let mut lookup: HashMap<&str, CivilDate> = HashMap::with_capacity(distinct.len());
    for value in &distinct {
        match layout.parse(value) {
            Ok(date) => {
                lookup.insert(*value, date);
            }
            Err(e) => {
                warn!("{e}; leaving column unparsed");
                return Ok(unparsed());
            }
        }
    }

    Ok(ResolvedColumn::Dates(values.iter().map(|v| lookup[v]).collect()))
}

/// Parse every value as an `i64`, or `None` if any value is not an integer.
pub fn coerce_integers<S: AsRef<str>>(values: &[S]) -> Option<Vec<i64>> {
    values
        .iter()
        .map(|v| v.as_ref().trim().parse::<i64>().ok())
        .collect()
}

fn distinct_values<'a>(values: &[&'a str]) -> Vec<&'a str> {
    let mut seen = HashSet::with_capacity(values.len());
    values.iter().copied().filter(|v| seen.insert(*v)).collect()
}

// ── infer_layout ────────────────────────────────────────────────────────────

/// Tokens of one value split on the column separator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tokens {
    Numeric([i64; 3]),
    /// At least one token is not an integer; only the month may be textual.
    /// Holds the last token when it is an integer.
    AbbreviatedMonth { year: Option<i64> },
}

/// What the values of one token position could be.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SlotClass {
    Year(YearWidth),
    MonthOrDay,
    Day,
    Unknown,
}

/// Infer the single layout shared by `values`.
///
/// Returns `Ok(None)` when no layout can be deduced (no year column, values
/// without three fields, unreadable tokens).
///
/// # Errors
///
/// Returns [`DateError::Format`] for mixed separators or a year found between
/// the other two fields.
pub fn infer_layout<S: AsRef<str>>(values: &[S]) -> Result<Option<DateLayout>> {
    let values: Vec<&str> = values.iter().map(|v| v.as_ref().trim()).collect();
    if values.is_empty() {
        return Ok(None);
    }

    let separator = detect_separator(&values)?;

    let mut tokens = Vec::with_capacity(values.len());
    for value in &values {
        match classify_tokens(value, separator) {
            Some(t) => tokens.push(t),
            None => return Ok(None),
        }
    }

    if tokens
        .iter()
        .any(|t| matches!(t, Tokens::AbbreviatedMonth { .. }))
    {
        return Ok(abbreviated_layout(&tokens, separator));
    }

    let rows: Vec<[i64; 3]> = tokens
        .iter()
        .filter_map(|t| match t {
            Tokens::Numeric(row) => Some(*row),
            Tokens::AbbreviatedMonth { .. } => None,
        })
        .collect();
    numeric_layout(&rows, separator, values[0])
}

fn detect_separator(values: &[&str]) -> Result<Separator> {
    let dashed = values.iter().find(|v| v.contains('-'));
    let slashed = values.iter().find(|v| v.contains('/'));
    match (dashed, slashed) {
        (Some(d), Some(s)) => Err(DateError::Format(format!(
            "mixed date separators: '{d}' and '{s}'"
        ))),
        (Some(_), None) => Ok(Separator::Dash),
        _ => Ok(Separator::Slash),
    }
}

fn classify_tokens(value: &str, separator: Separator) -> Option<Tokens> {
    let parts: Vec<&str> = value.split(separator.as_char()).map(str::trim).collect();
    let [a, b, c] = parts.as_slice() else {
        return None;
    };
    match (a.parse::<i64>(), b.parse::<i64>(), c.parse::<i64>()) {
        (Ok(a), Ok(b), Ok(c)) => Some(Tokens::Numeric([a, b, c])),
        (_, _, year) => Some(Tokens::AbbreviatedMonth { year: year.ok() }),
    }
}

/// `day, month-name, year`; the only layout with a textual month.
fn abbreviated_layout(tokens: &[Tokens], separator: Separator) -> Option<DateLayout> {
    let years: Option<Vec<i64>> = tokens
        .iter()
        .map(|t| match t {
            Tokens::Numeric([_, _, year]) => Some(*year),
            Tokens::AbbreviatedMonth { year } => *year,
        })
        .collect();
    let year = if years?.iter().all(|y| *y > 1000) {
        YearWidth::Four
    } else {
        YearWidth::Two
    };
    Some(DateLayout {
        separator,
        order: [Slot::Day, Slot::Month, Slot::Year],
        year,
        month: MonthStyle::Abbreviated,
    })
}

fn classify_slot(values: impl Iterator<Item = i64> + Clone) -> SlotClass {
    let all = |f: fn(i64) -> bool| values.clone().all(f);
    if all(|v| v > 1000) {
        SlotClass::Year(YearWidth::Four)
    } else if all(|v| (1..=12).contains(&v)) {
        SlotClass::MonthOrDay
    } else if all(|v| (1..=31).contains(&v)) {
        SlotClass::Day
    } else if all(|v| (0..=99).contains(&v)) {
        SlotClass::Year(YearWidth::Two)
    } else {
        SlotClass::Unknown
    }
}

fn numeric_layout(
    rows: &[[i64; 3]],
    separator: Separator,
    sample: &str,
) -> Result<Option<DateLayout>> {
    let classes: [SlotClass; 3] =
        std::array::from_fn(|i| classify_slot(rows.iter().map(move |row| row[i])));

    let years: Vec<(usize, YearWidth)> = classes
        .iter()
        .enumerate()
        .filter_map(|(i, c)| match c {
            SlotClass::Year(width) => Some((i, *width)),
            _ => None,
        })
        .collect();
    let [(year_at, year)] = years.as_slice() else {
        return Ok(None);
    };

    let (first, second) = match *year_at {
        0 => (1, 2),
        2 => (0, 1),
        _ => {
            return Err(DateError::Format(format!(
                "year in the middle of date separators: '{sample}'"
            )))
        }
    };

    let (first_slot, second_slot) = match (classes[first], classes[second]) {
        (SlotClass::MonthOrDay, SlotClass::Day) => (Slot::Month, Slot::Day),
        (SlotClass::Day, SlotClass::MonthOrDay) => (Slot::Day, Slot::Month),
        (SlotClass::Unknown, _) | (_, SlotClass::Unknown) => return Ok(None),
        // Both fields fit a month: year-first reads Y/M/D, year-last D/M/Y.
        _ if *year_at == 0 => (Slot::Month, Slot::Day),
        _ => (Slot::Day, Slot::Month),
    };

    let mut order = [Slot::Year; 3];
    order[first] = first_slot;
    order[second] = second_slot;

    Ok(Some(DateLayout {
        separator,
        order,
        year: *year,
        month: MonthStyle::Numeric,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> CivilDate {
        CivilDate::from_ymd(y, m, d).unwrap()
    }

    fn pattern(values: &[&str]) -> Option<String> {
        infer_layout(values).unwrap().map(|l| l.pattern())
    }

    // ── infer_layout tests ──────────────────────────────────────────────

    #[test]
    fn test_day_first_slash() {
        assert_eq!(pattern(&["31/01/2019", "01/02/2019"]).as_deref(), Some("%d/%m/%Y"));
    }

    #[test]
    fn test_month_first_slash() {
        assert_eq!(pattern(&["01/31/2019", "02/01/2019"]).as_deref(), Some("%m/%d/%Y"));
    }

    #[test]
    fn test_year_first_dash() {
        assert_eq!(pattern(&["2019-01-31", "2019-02-01"]).as_deref(), Some("%Y-%m-%d"));
    }

    #[test]
    fn test_year_first_day_before_month() {
        assert_eq!(pattern(&["2019/31/01", "2019/15/02"]).as_deref(), Some("%Y/%d/%m"));
    }

    #[test]
    fn test_ambiguous_defaults() {
        // Neither field exceeds 12: year-last reads day-first.
        assert_eq!(pattern(&["01/02/2019", "03/04/2019"]).as_deref(), Some("%d/%m/%Y"));
        assert_eq!(pattern(&["2019-01-02", "2019-03-04"]).as_deref(), Some("%Y-%m-%d"));
    }

    #[test]
    fn test_two_digit_year() {
        assert_eq!(pattern(&["31/12/99", "01/01/98"]).as_deref(), Some("%d/%m/%y"));
    }

    #[test]
    fn test_abbreviated_month() {
        assert_eq!(pattern(&["31-Jan-2019", "01-Feb-2019"]).as_deref(), Some("%d-%b-%Y"));
        assert_eq!(pattern(&["31 Jan 19"]), None);
        assert_eq!(pattern(&["31/Jan/19", "1/Feb/19"]).as_deref(), Some("%d/%b/%y"));
    }

    #[test]
    fn test_abbreviated_month_without_numeric_year() {
        assert_eq!(pattern(&["31-Jan-xx"]), None);
    }

    #[test]
    fn test_year_in_middle_is_format_error() {
        let err = infer_layout(&["01/2019/02", "03/2019/04"]).unwrap_err();
        assert!(matches!(err, DateError::Format(ref m) if m.contains("middle")));
    }

    #[test]
    fn test_mixed_separators_is_format_error() {
        let err = infer_layout(&["31/01/2019", "2019-02-01"]).unwrap_err();
        assert!(matches!(err, DateError::Format(ref m) if m.contains("mixed")));
    }

    #[test]
    fn test_no_year_is_unresolved() {
        assert_eq!(pattern(&["01/02/03", "04/05/06"]), None);
        assert_eq!(pattern(&["2019"]), None);
        assert_eq!(pattern(&[]), None);
    }

    #[test]
    fn test_layout_serializes() {
        let layout = infer_layout(&["2019-01-31"]).unwrap().unwrap();
        let json = serde_json::to_value(layout).unwrap();
        assert_eq!(json["separator"], "Dash");
        assert_eq!(json["order"], serde_json::json!(["Year", "Month", "Day"]));
    }

    // ── resolve_dates tests ─────────────────────────────────────────────

    #[test]
    fn test_resolve_day_first() {
        let resolved = resolve_dates(&["31/01/2019", "01/02/2019"]).unwrap();
        assert_eq!(
            resolved,
            ResolvedColumn::Dates(vec![date(2019, 1, 31), date(2019, 2, 1)])
        );
    }

    #[test]
    fn test_resolve_year_first_dash() {
        let resolved = resolve_dates(&["2019-01-31", "2019-02-01"]).unwrap();
        assert_eq!(
            resolved,
            ResolvedColumn::Dates(vec![date(2019, 1, 31), date(2019, 2, 1)])
        );
    }

    #[test]
    fn test_resolve_repeated_values_map_back() {
        let column = ["05/03/2020", "31/03/2020", "05/03/2020", "05/03/2020"];
        let ResolvedColumn::Dates(dates) = resolve_dates(&column).unwrap() else {
            panic!("expected dates");
        };
        assert_eq!(
            dates,
            vec![date(2020, 3, 5), date(2020, 3, 31), date(2020, 3, 5), date(2020, 3, 5)]
        );
    }

    #[test]
    fn test_resolve_small_integers_stay_integers() {
        assert_eq!(
            resolve_dates(&["1", "2", "3"]).unwrap(),
            ResolvedColumn::Integers(vec![1, 2, 3])
        );
    }

    #[test]
    fn test_resolve_abbreviated_month() {
        let resolved = resolve_dates(&["31-Jan-2019", "01-feb-2019"]).unwrap();
        assert_eq!(
            resolved,
            ResolvedColumn::Dates(vec![date(2019, 1, 31), date(2019, 2, 1)])
        );
    }

    #[test]
    fn test_resolve_unusable_column_passes_through() {
        let column = vec!["01/02/03".to_string(), "04/05/06".to_string()];
        assert_eq!(
            resolve_dates(&column).unwrap(),
            ResolvedColumn::Unparsed(column.clone())
        );
    }

    #[test]
    fn test_resolve_impossible_date_passes_through() {
        // Layout is day-first, but 31 Feb does not exist.
        let resolved = resolve_dates(&["31/02/2019", "15/03/2019"]).unwrap();
        assert!(matches!(resolved, ResolvedColumn::Unparsed(_)));
    }

    #[test]
    fn test_resolve_propagates_format_error() {
        assert!(matches!(
            resolve_dates(&["31/01/2019", "2019-02-01"]),
            Err(DateError::Format(_))
        ));
    }

    #[test]
    fn test_resolve_empty_column() {
        let empty: [&str; 0] = [];
        assert_eq!(resolve_dates(&empty).unwrap(), ResolvedColumn::Dates(vec![]));
    }

    #[test]
    fn test_coerce_integers() {
        assert_eq!(coerce_integers(&[" 43831", "7"]), Some(vec![43_831, 7]));
        assert_eq!(coerce_integers(&["43831", "2019-01-01"]), None);
    }
}
