//! Connection log loading.
//!
//! Reads the session CSV once into an immutable row collection. Every column
//! is read as text so that malformed numbers reach the classifier as
//! rejection reasons instead of failing the load. Day columns keep only the
//! `YYYY-MM-DD` part of the cell.

use crate::config::ColumnMapping;
use crate::constants::DAY_EXTRACT_PATTERN;
use crate::error::{ReportError, Result};
use crate::models::RawRow;
use polars::prelude::*;
use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;
use tracing::{debug, info, warn};

static DAY_EXTRACT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(DAY_EXTRACT_PATTERN).expect("day extract pattern is valid"));

/// Session rows loaded once and shared read-only by every report run
#[derive(Debug, Clone, Default)]
pub struct SessionLog {
    rows: Vec<RawRow>,
}

impl SessionLog {
    /// Load a connection log CSV
    pub fn from_csv(path: &Path, columns: &ColumnMapping) -> Result<Self> {
        if !path.exists() {
            return Err(ReportError::InputNotFound {
                path: path.to_path_buf(),
            });
        }

        let frame = CsvReadOptions::default()
            .with_has_header(true)
            .with_infer_schema_length(Some(0))
            .try_into_reader_with_file_path(Some(path.to_path_buf()))?
            .finish()?;

        debug!(
            "Read {} rows x {} columns from {}",
            frame.height(),
            frame.width(),
            path.display()
        );

        let log = Self::from_frame(&frame, columns)?;
        info!("Loaded {} session rows from {}", log.len(), path.display());
        Ok(log)
    }

    /// Build rows from a frame whose columns are all text
    pub fn from_frame(frame: &DataFrame, columns: &ColumnMapping) -> Result<Self> {
        let height = frame.height();

        let username = text_column(frame, &columns.username)?;
        let client_mac = text_column(frame, &columns.client_mac)?;
        let user_id = text_column(frame, &columns.user_id)?;
        let start_day = day_column(frame, &columns.start_day)?;
        let end_day = day_column(frame, &columns.end_day)?;
        let input_octets = text_column(frame, &columns.input_octets)?;
        let output_octets = text_column(frame, &columns.output_octets)?;
        let session_time = text_column(frame, &columns.session_time)?;

        let rows = (0..height)
            .map(|index| RawRow {
                index,
                username: username[index].clone(),
                client_mac: client_mac[index].clone(),
                user_id: user_id[index].clone(),
                start_day: start_day[index].clone(),
                end_day: end_day[index].clone(),
                input_octets: input_octets[index].clone(),
                output_octets: output_octets[index].clone(),
                session_time: session_time[index].clone(),
            })
            .collect();

        Ok(Self { rows })
    }

    /// Wrap rows that were built elsewhere
    pub fn from_rows(rows: Vec<RawRow>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[RawRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Cell values of a column as owned text. Empty cells, quoted or not, are
/// `None`. A column missing from the file yields `None` for every row.
fn text_column(frame: &DataFrame, name: &str) -> Result<Vec<Option<String>>> {
    let Ok(column) = frame.column(name) else {
        warn!("Column '{}' not found; every row will fail its check", name);
        return Ok(vec![None; frame.height()]);
    };

    let series = column.as_materialized_series().cast(&DataType::String)?;
    let values = series
        .str()?
        .into_iter()
        .map(|value| value.filter(|text| !text.is_empty()).map(str::to_string))
        .collect();

    Ok(values)
}

/// Day cells reduced to their `YYYY-MM-DD` part
fn day_column(frame: &DataFrame, name: &str) -> Result<Vec<Option<String>>> {
    Ok(text_column(frame, name)?
        .into_iter()
        .map(|value| value.as_deref().and_then(extract_day))
        .collect())
}

/// First `YYYY-MM-DD` substring of a cell, dropping any time of day
pub fn extract_day(value: &str) -> Option<String> {
    DAY_EXTRACT
        .captures(value)
        .and_then(|captures| captures.get(1))
        .map(|day| day.as_str().to_string())
}
