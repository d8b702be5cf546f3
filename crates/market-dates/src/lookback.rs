//! Look back a tenor from a date and snap onto an existing date index.
//!
//! Timeseries are indexed by trading dates, so a date computed by tenor
//! arithmetic may fall on a weekend or holiday gap. [`previous_date`] steps
//! back one day, then two, to land on (or near) an indexed date.

use std::collections::{BTreeSet, HashSet};

use crate::civil::CivilDate;
use crate::error::{DateError, Result};
use crate::tenor::parse_tenor;

/// A set of dates that can answer membership queries.
pub trait DateIndex {
    fn contains_date(&self, date: &CivilDate) -> bool;
}

impl DateIndex for BTreeSet<CivilDate> {
    fn contains_date(&self, date: &CivilDate) -> bool {
        self.contains(date)
    }
}

impl DateIndex for HashSet<CivilDate> {
    fn contains_date(&self, date: &CivilDate) -> bool {
        self.contains(date)
    }
}

/// Sorted slice; membership by binary search.
impl DateIndex for [CivilDate] {
    fn contains_date(&self, date: &CivilDate) -> bool {
        self.binary_search(date).is_ok()
    }
}

/// Unordered vector; membership by linear scan.
impl DateIndex for Vec<CivilDate> {
    fn contains_date(&self, date: &CivilDate) -> bool {
        self.contains(date)
    }
}

/// The date `tenor` before `date`, snapped onto `index`.
///
/// If the exact date is indexed it is returned. Otherwise the day before is
/// tried, and failing that the date two days before is returned without
/// checking the index again.
///
/// # Errors
///
/// Returns [`DateError::Parse`] if the tenor is not recognized or the result
/// is out of range.
///
/// # Examples
///
/// ```
/// use std::collections::BTreeSet;
/// use market_dates::{previous_date, CivilDate};
///
/// let d = |y, m, day| CivilDate::from_ymd(y, m, day).unwrap();
/// // 2018-11-04 is a Sunday and the weekend is not indexed.
/// let index: BTreeSet<_> = [d(2018, 11, 2), d(2018, 11, 5)].into_iter().collect();
/// assert_eq!(previous_date(&index, d(2019, 5, 4), "6M").unwrap(), d(2018, 11, 2));
/// ```
pub fn previous_date<I: DateIndex + ?Sized>(
    index: &I,
    date: CivilDate,
    tenor: &str,
) -> Result<CivilDate> {
    let anchor = parse_tenor(tenor)?.apply(date, true)?;
    if index.contains_date(&anchor) {
        return Ok(anchor);
    }

    let step_back = |days: i64| {
        anchor
            .checked_add_days(-days)
            .ok_or_else(|| DateError::Parse(format!("'{tenor}' before {date} is out of range")))
    };
    let day_before = step_back(1)?;
    if index.contains_date(&day_before) {
        Ok(day_before)
    } else {
        step_back(2)
    }
}
