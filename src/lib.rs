//! Guest Session Report Library
//!
//! Validates the sessions of a wireless access controller's connection log
//! and aggregates guest traffic per client hardware address over a date
//! range.
//!
//! This library provides tools for:
//! - Loading the connection log CSV once as text rows
//! - Expanding an inclusive date range into the days a session must fall on
//! - Checking in-range rows against the guest login and field shape rules
//! - Summing connection time and traffic per client
//! - Recording every rejected row with all of its failure reasons
//! - Writing the validated and rejected tables as CSV or Parquet

pub mod cli;
pub mod config;
pub mod constants;
pub mod error;
pub mod loader;
pub mod models;
pub mod pipeline;
pub mod writer;

// Re-export commonly used types
pub use config::{ColumnMapping, CompressionAlgorithm, OutputFormat, ReportConfig};
pub use error::{ReportError, Result};
pub use loader::SessionLog;
pub use models::{
    Classification, ClientAggregate, RawRow, RejectedRecord, RejectionReason, ReportStats,
    ValidSession, Verdict,
};
pub use pipeline::{DateRange, Report, ReportPipeline};
pub use writer::{ReportWriter, WrittenReport};
