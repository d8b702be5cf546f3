//! Error types for market-dates operations.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DateError {
    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Format error: {0}")]
    Format(String),

    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Sheet error: {0}")]
    Sheet(String),
}

pub type Result<T> = std::result::Result<T, DateError>;
