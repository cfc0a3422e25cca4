//! Error handling for guest session reporting.
//!
//! Row-level shape failures are not errors: they become rejection reasons
//! in the report. The variants here cover loading, caller-contract
//! violations and output failures.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    #[error("Session log not found at path: {path}")]
    InputNotFound { path: PathBuf },

    #[error("Invalid date '{value}': expected YYYY-MM-DD between 2019 and 2023")]
    InvalidDate { value: String },

    #[error("Invalid date range: start {start} is after end {end}")]
    InvalidDateRange { start: String, end: String },

    #[error("Failed to write report table: {path} - {reason}")]
    WriteFailed { path: PathBuf, reason: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

pub type Result<T> = std::result::Result<T, ReportError>;
