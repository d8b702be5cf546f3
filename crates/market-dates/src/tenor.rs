//! Tenor arithmetic on civil dates.
//!
//! A tenor code such as `"3M"`, `"1Y"`, `"2W"`, `"5D"` or `"spot"` is parsed
//! into a [`TenorCode`] and applied to one date or a batch of dates, forward
//! or in reverse, returning either the rolled date or the elapsed day count.
//!
//! # Parsing rules
//!
//! 1. `spot`, `ON`, `O/N`, `SN` and `S/N` are matched literally (any case).
//! 2. Otherwise the unit is chosen by the first unit letter present, in the
//!    fixed order year > month > week > day. `"1y6m"` is a one-year tenor:
//!    units are never composed.
//! 3. The magnitude is the run of digits directly in front of the unit
//!    letter, or directly after it when the letter comes first (`"M3"`).
//!
//! Anything else is a [`DateError::Parse`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::civil::CivilDate;
use crate::error::{DateError, Result};

// ── Tenor codes ─────────────────────────────────────────────────────────────

/// Unit letters, highest priority first.
const UNIT_PRIORITY: [char; 4] = ['y', 'm', 'w', 'd'];

/// Money-market short tenors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShortRate {
    /// `ON` / `O/N`: today to tomorrow.
    Overnight,
    /// `SN` / `S/N`: spot to the next day.
    SpotNext,
}

/// A parsed tenor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TenorCode {
    Spot,
    ShortRate(ShortRate),
    Day(u32),
    Week(u32),
    Month(u32),
    Year(u32),
}

impl TenorCode {
    /// Roll `date` by this tenor, backwards when `reverse` is set.
    ///
    /// Month and year tenors clamp to the last day of the target month.
    ///
    /// # Errors
    ///
    /// Returns [`DateError::Parse`] if the result leaves the representable
    /// date range.
    pub fn apply(&self, date: CivilDate, reverse: bool) -> Result<CivilDate> {
        let sign: i64 = if reverse { -1 } else { 1 };
        let rolled = match *self {
            TenorCode::Spot => Some(date),
            // Spot is the trade date here, so both short tenors are one day.
            TenorCode::ShortRate(ShortRate::Overnight | ShortRate::SpotNext) => {
                date.checked_add_days(sign)
            }
            TenorCode::Day(n) => date.checked_add_days(sign * i64::from(n)),
            TenorCode::Week(n) => date.checked_add_days(sign * 7 * i64::from(n)),
            TenorCode::Month(n) => date.checked_add_months(sign * i64::from(n)),
            TenorCode::Year(n) => date.checked_add_years(sign * i64::from(n)),
        };
        rolled.ok_or_else(|| {
            DateError::Parse(format!("tenor '{self}' from {date} is out of range"))
        })
    }
}

impl FromStr for TenorCode {
    type Err = DateError;

    fn from_str(s: &str) -> Result<Self> {
        parse_tenor(s)
    }
}

impl fmt::Display for TenorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TenorCode::Spot => write!(f, "spot"),
            TenorCode::ShortRate(ShortRate::Overnight) => write!(f, "ON"),
            TenorCode::ShortRate(ShortRate::SpotNext) => write!(f, "SN"),
            TenorCode::Day(n) => write!(f, "{n}D"),
            TenorCode::Week(n) => write!(f, "{n}W"),
            TenorCode::Month(n) => write!(f, "{n}M"),
            TenorCode::Year(n) => write!(f, "{n}Y"),
        }
    }
}

/// Parse a free-form tenor string into a [`TenorCode`].
///
/// # Errors
///
/// Returns [`DateError::Parse`] when no literal or unit letter matches, or
/// when the magnitude is missing or does not fit in a `u32`.
///
/// # Examples
///
/// ```
/// use market_dates::tenor::{parse_tenor, TenorCode};
///
/// assert_eq!(parse_tenor("3m").unwrap(), TenorCode::Month(3));
/// assert_eq!(parse_tenor("1y6m").unwrap(), TenorCode::Year(1));
/// assert!(parse_tenor("abc").is_err());
/// ```
pub fn parse_tenor(s: &str) -> Result<TenorCode> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return Err(DateError::Parse("empty tenor".to_string()));
    }

    match trimmed.to_ascii_uppercase().as_str() {
        "SPOT" => return Ok(TenorCode::Spot),
        "ON" | "O/N" => return Ok(TenorCode::ShortRate(ShortRate::Overnight)),
        "SN" | "S/N" => return Ok(TenorCode::ShortRate(ShortRate::SpotNext)),
        _ => {}
    }

    let Some((unit, at)) = UNIT_PRIORITY.into_iter().find_map(|unit| {
        trimmed
            .find(|c: char| c.eq_ignore_ascii_case(&unit))
            .map(|at| (unit, at))
    }) else {
        return Err(DateError::Parse(format!("unrecognized tenor: '{trimmed}'")));
    };

    let n = parse_magnitude(trimmed, at)?;
    Ok(match unit {
        'y' => TenorCode::Year(n),
        'm' => TenorCode::Month(n),
        'w' => TenorCode::Week(n),
        _ => TenorCode::Day(n),
    })
}

/// The run of digits directly in front of the unit letter, or directly after
/// it when the letter leads (`"M3"`).
fn parse_magnitude(s: &str, unit_at: usize) -> Result<u32> {
    let before = s[..unit_at].trim_end();
    let mut digits = &before[before.trim_end_matches(|c: char| c.is_ascii_digit()).len()..];
    if digits.is_empty() {
        let after = s[unit_at + 1..].trim_start();
        let end = after
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(after.len());
        digits = &after[..end];
    }
    if digits.is_empty() {
        return Err(DateError::Parse(format!("tenor has no magnitude: '{s}'")));
    }
    digits
        .parse()
        .map_err(|_| DateError::Parse(format!("tenor magnitude too large: '{s}'")))
}

// ── apply_tenor ─────────────────────────────────────────────────────────────

/// Flags for [`apply_tenor`] and [`apply_tenor_batch`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TenorOptions {
    /// Subtract the tenor instead of adding it.
    pub reverse: bool,
    /// Return the signed elapsed day count instead of the rolled date.
    pub as_day_count: bool,
}

/// The outcome of applying a tenor to one date.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum TenorValue {
    Date(CivilDate),
    DayCount(f64),
}

impl TenorValue {
    pub fn as_date(&self) -> Option<CivilDate> {
        match self {
            TenorValue::Date(date) => Some(*date),
            TenorValue::DayCount(_) => None,
        }
    }

    pub fn as_day_count(&self) -> Option<f64> {
        match self {
            TenorValue::Date(_) => None,
            TenorValue::DayCount(days) => Some(*days),
        }
    }
}

impl fmt::Display for TenorValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TenorValue::Date(date) => write!(f, "{date}"),
            TenorValue::DayCount(days) => write!(f, "{days}"),
        }
    }
}

/// Apply a tenor string to a single date.
///
/// # Errors
///
/// Returns [`DateError::Parse`] if the tenor is not recognized or the rolled
/// date is out of range.
///
/// # Examples
///
/// ```
/// use market_dates::{apply_tenor, CivilDate, TenorOptions, TenorValue};
///
/// let date = CivilDate::from_ymd(2018, 11, 23).unwrap();
/// let options = TenorOptions { reverse: true, ..Default::default() };
/// let rolled = apply_tenor(date, "6M", &options).unwrap();
/// assert_eq!(rolled, TenorValue::Date(CivilDate::from_ymd(2018, 5, 23).unwrap()));
/// ```
pub fn apply_tenor(date: CivilDate, tenor: &str, options: &TenorOptions) -> Result<TenorValue> {
    let code = parse_tenor(tenor)?;
    apply_code(date, &code, options)
}

/// Apply one tenor elementwise to a batch of dates.
///
/// The tenor is parsed once; the output has the same length and order as
/// the input, which is left untouched.
pub fn apply_tenor_batch(
    dates: &[CivilDate],
    tenor: &str,
    options: &TenorOptions,
) -> Result<Vec<TenorValue>> {
    let code = parse_tenor(tenor)?;
    dates
        .iter()
        .map(|date| apply_code(*date, &code, options))
        .collect()
}

/// Roll a date by a tenor, always returning a date.
pub fn roll_date(date: CivilDate, tenor: &str, reverse: bool) -> Result<CivilDate> {
    parse_tenor(tenor)?.apply(date, reverse)
}

/// Number of days between `date` and `date` rolled by `tenor`.
pub fn tenor_day_count(date: CivilDate, tenor: &str, reverse: bool) -> Result<f64> {
    let rolled = roll_date(date, tenor, reverse)?;
    Ok(date.days_until(&rolled) as f64)
}

fn apply_code(date: CivilDate, code: &TenorCode, options: &TenorOptions) -> Result<TenorValue> {
    let rolled = code.apply(date, options.reverse)?;
    if options.as_day_count {
        Ok(TenorValue::DayCount(date.days_until(&rolled) as f64))
    } else {
        Ok(TenorValue::Date(rolled))
    }
}
