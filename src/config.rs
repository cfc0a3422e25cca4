//! Configuration management for report runs.
//!
//! Provides the guest login the validation rules compare against, the
//! source column names, and the output format settings.

use crate::constants::{GUEST_LOGIN, source_columns};
use polars::prelude::ParquetCompression;
use serde::{Deserialize, Serialize};

/// Names of the connection log columns the loader reads
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnMapping {
    pub username: String,
    pub client_mac: String,
    pub user_id: String,
    pub start_day: String,
    pub end_day: String,
    pub input_octets: String,
    pub output_octets: String,
    pub session_time: String,
}

impl Default for ColumnMapping {
    fn default() -> Self {
        Self {
            username: source_columns::USERNAME.to_string(),
            client_mac: source_columns::CLIENT_MAC.to_string(),
            user_id: source_columns::USER_ID.to_string(),
            start_day: source_columns::START_DAY.to_string(),
            end_day: source_columns::END_DAY.to_string(),
            input_octets: source_columns::INPUT_OCTETS.to_string(),
            output_octets: source_columns::OUTPUT_OCTETS.to_string(),
            session_time: source_columns::SESSION_TIME.to_string(),
        }
    }
}

/// File format of the two report tables
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputFormat {
    /// Comma-separated text, opens directly in a spreadsheet
    Csv,
    /// Columnar Parquet files
    Parquet,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Csv => "csv",
            OutputFormat::Parquet => "parquet",
        }
    }
}

/// Supported compression algorithms for parquet output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CompressionAlgorithm {
    /// Snappy compression - good balance of speed and compression
    Snappy,
    /// ZSTD compression - better compression ratio, slower
    Zstd,
    /// LZ4 compression - fastest, lower compression ratio
    Lz4,
    /// No compression
    Uncompressed,
}

impl CompressionAlgorithm {
    /// Convert to polars ParquetCompression type
    pub fn to_polars_compression(&self) -> ParquetCompression {
        match self {
            CompressionAlgorithm::Snappy => ParquetCompression::Snappy,
            CompressionAlgorithm::Zstd => ParquetCompression::Zstd(None),
            CompressionAlgorithm::Lz4 => ParquetCompression::Lz4Raw,
            CompressionAlgorithm::Uncompressed => ParquetCompression::Uncompressed,
        }
    }
}

/// Settings shared by every report run of one invocation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Username identifying the sessions that are counted
    pub guest_login: String,

    /// Source column names
    pub columns: ColumnMapping,

    /// Format of the validated and rejected tables
    pub output_format: OutputFormat,

    /// Compression applied to parquet output
    pub compression: CompressionAlgorithm,

    /// Show a progress bar on large classification passes
    pub show_progress: bool,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            guest_login: GUEST_LOGIN.to_string(),
            columns: ColumnMapping::default(),
            output_format: OutputFormat::Csv,
            compression: CompressionAlgorithm::Snappy,
            show_progress: true,
        }
    }
}

impl ReportConfig {
    /// Count sessions for a different guest login
    pub fn with_guest_login(mut self, login: impl Into<String>) -> Self {
        self.guest_login = login.into();
        self
    }

    /// Read the log with different column names
    pub fn with_columns(mut self, columns: ColumnMapping) -> Self {
        self.columns = columns;
        self
    }

    /// Set output format
    pub fn with_output_format(mut self, format: OutputFormat) -> Self {
        self.output_format = format;
        self
    }

    /// Set parquet compression
    pub fn with_compression(mut self, compression: CompressionAlgorithm) -> Self {
        self.compression = compression;
        self
    }

    /// Disable progress bars
    pub fn without_progress(mut self) -> Self {
        self.show_progress = false;
        self
    }
}
