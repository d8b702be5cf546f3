//! CLI command implementations.

pub mod clean;
pub mod infer;
pub mod lookback;
pub mod melt;
pub mod roll;

pub use clean::CleanArgs;
pub use infer::InferArgs;
pub use lookback::LookbackArgs;
pub use melt::MeltArgs;
pub use roll::RollArgs;

use anyhow::{Context, Result};
use market_dates::CivilDate;

/// Parses a date argument in YYYY-MM-DD format.
pub fn parse_date(s: &str) -> Result<CivilDate> {
    CivilDate::parse_iso(s).with_context(|| format!("invalid date argument '{s}'"))
}
