//! # market-dates
//!
//! Deterministic date helpers for market-data workflows.
//!
//! Everything here is a pure function over day-granularity civil dates: no
//! clock access, no timezones, no I/O. Inputs are never mutated; every call
//! returns freshly computed output.
//!
//! ## Modules
//!
//! - [`civil`]: the [`CivilDate`] value type and spreadsheet serial conversion
//! - [`tenor`]: tenor codes (`3M`, `1Y`, `2W`, `spot`, ...) applied forward or in reverse
//! - [`format`]: infer one parse layout for a column of ambiguous textual dates
//! - [`lookback`]: look back a tenor and snap onto a timeseries date index
//! - [`table`]: clean every date-named column of an in-memory table
//! - [`bloomberg`]: melt Bloomberg `Date | PX_LAST` sheets into long rows
//! - [`error`]: error types

pub mod bloomberg;
pub mod civil;
pub mod error;
pub mod format;
pub mod lookback;
pub mod table;
pub mod tenor;

pub use bloomberg::{clean_bbg_sheet, melt_bbg_sheet, MeltedRow};
pub use civil::CivilDate;
pub use error::{DateError, Result};
pub use format::{
    coerce_integers, infer_layout, resolve_dates, DateLayout, MonthStyle, ResolvedColumn,
    Separator, Slot, YearWidth,
};
pub use lookback::{previous_date, DateIndex};
pub use table::{clean_date_columns, Cell, CleanOptions, Column, Table};
pub use tenor::{
    apply_tenor, apply_tenor_batch, parse_tenor, roll_date, tenor_day_count, ShortRate,
    TenorCode, TenorOptions, TenorValue,
};
