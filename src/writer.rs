//! Report table writer
//!
//! Persists the validated-client and rejected-record tables of a report as
//! two files named from a base name. Writes are not atomic: a failure on the
//! second table leaves the first one on disk.

use crate::config::{OutputFormat, ReportConfig};
use crate::constants::{REJECTED_TABLE, VALIDATED_TABLE};
use crate::error::{ReportError, Result};
use crate::pipeline::Report;

use polars::prelude::{CsvWriter, DataFrame, ParquetWriter, SerWriter};
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Paths of the two tables written for one report
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenReport {
    pub validated_path: PathBuf,
    pub rejected_path: PathBuf,
}

/// Writes report tables in the configured format
#[derive(Debug, Clone)]
pub struct ReportWriter {
    output_dir: PathBuf,
    config: ReportConfig,
}

impl ReportWriter {
    /// Create a writer placing files in `output_dir`
    pub fn new(output_dir: impl Into<PathBuf>, config: ReportConfig) -> Self {
        Self {
            output_dir: output_dir.into(),
            config,
        }
    }

    /// Paths the tables for `base_name` will be written to
    pub fn table_paths(&self, base_name: &str) -> WrittenReport {
        let extension = self.config.output_format.extension();
        WrittenReport {
            validated_path: self
                .output_dir
                .join(format!("{}_{}.{}", base_name, VALIDATED_TABLE, extension)),
            rejected_path: self
                .output_dir
                .join(format!("{}_{}.{}", base_name, REJECTED_TABLE, extension)),
        }
    }

    /// Write both tables. Empty tables are written with their header only.
    ///
    /// # Arguments
    ///
    /// * `report` - Finished report to persist
    /// * `base_name` - File name prefix shared by both tables
    ///
    /// # Returns
    ///
    /// Paths of the validated and rejected tables. Fails on an empty base
    /// name or when either file cannot be written.
    pub fn write(&self, report: &Report, base_name: &str) -> Result<WrittenReport> {
        if base_name.trim().is_empty() {
            return Err(ReportError::Configuration {
                message: "output name must not be empty".to_string(),
            });
        }

        std::fs::create_dir_all(&self.output_dir)?;
        let paths = self.table_paths(base_name);

        let mut validated = report.validated_frame()?;
        self.write_frame(&mut validated, &paths.validated_path)?;

        let mut rejected = report.rejected_frame()?;
        self.write_frame(&mut rejected, &paths.rejected_path)?;

        Ok(paths)
    }

    fn write_frame(&self, frame: &mut DataFrame, path: &Path) -> Result<()> {
        let file = File::create(path)?;

        let result = match self.config.output_format {
            OutputFormat::Csv => CsvWriter::new(file).include_header(true).finish(frame),
            OutputFormat::Parquet => ParquetWriter::new(file)
                .with_compression(self.config.compression.to_polars_compression())
                .finish(frame)
                .map(|_| ()),
        };

        result.map_err(|e| ReportError::WriteFailed {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        debug!("Wrote {} rows to {}", frame.height(), path.display());
        Ok(())
    }
}
