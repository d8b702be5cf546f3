//! Day-granularity civil dates.
//!
//! [`CivilDate`] is the working value of every engine in this crate. It has no
//! time-of-day and no timezone: arithmetic is done on whole calendar days.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Months, NaiveDate, NaiveDateTime, TimeDelta};
use serde::{Deserialize, Serialize};

use crate::error::{DateError, Result};

/// `NaiveDate::num_days_from_ce` of 1970-01-01.
const UNIX_EPOCH_FROM_CE: i64 = 719_163;

/// Days from 1970-01-01 back to the spreadsheet epoch 1899-12-30.
const EXCEL_EPOCH_OFFSET: i64 = 25_569;

/// A calendar date with no time component and no timezone.
///
/// Serializes as an ISO 8601 `YYYY-MM-DD` string.
///
/// # Examples
///
/// ```
/// use market_dates::CivilDate;
///
/// let date = CivilDate::from_ymd(2020, 2, 29).unwrap();
/// assert_eq!(date.to_string(), "2020-02-29");
/// assert_eq!(date.checked_add_months(12).unwrap().to_string(), "2021-02-28");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CivilDate(NaiveDate);

impl CivilDate {
    /// Build a date from year, month (1-12) and day (1-31).
    ///
    /// # Errors
    ///
    /// Returns [`DateError::InvalidDate`] if the triple is not a real date.
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Result<Self> {
        NaiveDate::from_ymd_opt(year, month, day)
            .map(CivilDate)
            .ok_or_else(|| DateError::InvalidDate(format!("{year}-{month:02}-{day:02}")))
    }

    /// Parse a strict `YYYY-MM-DD` string.
    ///
    /// # Errors
    ///
    /// Returns [`DateError::Parse`] if the string is not an ISO date.
    pub fn parse_iso(s: &str) -> Result<Self> {
        NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
            .map(CivilDate)
            .map_err(|e| DateError::Parse(format!("'{}': {}", s.trim(), e)))
    }

    /// Build a date from a signed day offset relative to 1970-01-01.
    pub fn from_epoch_days(days: i64) -> Result<Self> {
        days.checked_add(UNIX_EPOCH_FROM_CE)
            .and_then(|ce| i32::try_from(ce).ok())
            .and_then(NaiveDate::from_num_days_from_ce_opt)
            .map(CivilDate)
            .ok_or_else(|| DateError::InvalidDate(format!("epoch day {days} out of range")))
    }

    /// Signed day offset relative to 1970-01-01.
    pub fn epoch_days(&self) -> i64 {
        i64::from(self.0.num_days_from_ce()) - UNIX_EPOCH_FROM_CE
    }

    /// Convert a spreadsheet (1900 date system) serial to a date.
    ///
    /// Serial 0 is 1899-12-30, which keeps modern serials aligned with the
    /// spreadsheet's fictitious 1900-02-29.
    pub fn from_excel_serial(serial: i64) -> Result<Self> {
        serial
            .checked_sub(EXCEL_EPOCH_OFFSET)
            .ok_or_else(|| DateError::InvalidDate(format!("serial {serial} out of range")))
            .and_then(Self::from_epoch_days)
    }

    /// The spreadsheet (1900 date system) serial for this date.
    pub fn excel_serial(&self) -> i64 {
        self.epoch_days() + EXCEL_EPOCH_OFFSET
    }

    pub fn year(&self) -> i32 {
        self.0.year()
    }

    pub fn month(&self) -> u32 {
        self.0.month()
    }

    pub fn day(&self) -> u32 {
        self.0.day()
    }

    /// Add (or with a negative count, subtract) calendar days.
    pub fn checked_add_days(&self, days: i64) -> Option<Self> {
        TimeDelta::try_days(days)
            .and_then(|delta| self.0.checked_add_signed(delta))
            .map(CivilDate)
    }

    /// Add (or subtract) whole months, clamping the day to the end of the
    /// target month: Jan 31 + 1 month is Feb 28 (or 29), never Mar 3.
    pub fn checked_add_months(&self, months: i64) -> Option<Self> {
        let magnitude = Months::new(u32::try_from(months.unsigned_abs()).ok()?);
        if months >= 0 {
            self.0.checked_add_months(magnitude)
        } else {
            self.0.checked_sub_months(magnitude)
        }
        .map(CivilDate)
    }

    /// Add (or subtract) whole years with the same end-of-month clamp, so
    /// Feb 29 lands on Feb 28 in a non-leap year.
    pub fn checked_add_years(&self, years: i64) -> Option<Self> {
        self.checked_add_months(years.checked_mul(12)?)
    }

    /// Signed number of days from `self` to `other`.
    pub fn days_until(&self, other: &CivilDate) -> i64 {
        (other.0 - self.0).num_days()
    }

    pub fn as_naive_date(&self) -> NaiveDate {
        self.0
    }
}

impl From<NaiveDate> for CivilDate {
    fn from(date: NaiveDate) -> Self {
        CivilDate(date)
    }
}

/// Truncates the time of day; 23:59 stays on the same date.
impl From<NaiveDateTime> for CivilDate {
    fn from(datetime: NaiveDateTime) -> Self {
        CivilDate(datetime.date())
    }
}

impl From<CivilDate> for NaiveDate {
    fn from(date: CivilDate) -> Self {
        date.0
    }
}

impl fmt::Display for CivilDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

impl FromStr for CivilDate {
    type Err = DateError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse_iso(s)
    }
}
