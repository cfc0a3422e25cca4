//! Validation and aggregation pipeline for guest sessions.
//!
//! One report run is a single sequential pass over the loaded rows:
//!
//! 1. **Expand** the requested date range into the set of day strings
//! 2. **Classify** each row: out of scope, valid, or rejected with reasons
//! 3. **Aggregate** valid rows per client hardware address
//! 4. **Assemble** the aggregates and the rejection log into a [`Report`]
//!
//! The rows are only borrowed. Every run builds its own date set, aggregates
//! and rejection log, so repeated runs over the same rows are independent.

pub mod aggregator;
pub mod classifier;
pub mod date_range;
pub mod report;
pub mod validators;

#[cfg(test)]
pub mod tests;

pub use self::aggregator::ClientAggregates;
pub use self::classifier::RowClassifier;
pub use self::date_range::{DateRange, DateSet};
pub use self::report::{Report, ReportBuilder};

use crate::config::ReportConfig;
use crate::constants::{PROGRESS_BAR_THRESHOLD, PROGRESS_UPDATE_INTERVAL};
use crate::models::RawRow;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Instant;
use tracing::{debug, info};

/// Runs reports over an already-loaded set of rows
#[derive(Debug, Clone)]
pub struct ReportPipeline {
    config: ReportConfig,
}

impl ReportPipeline {
    pub fn new(config: ReportConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ReportConfig {
        &self.config
    }

    /// Classify and aggregate every row for the given range.
    ///
    /// Shows a progress bar when enabled and the log is large.
    ///
    /// # Arguments
    ///
    /// * `rows` - Loaded session rows, only borrowed
    /// * `range` - Inclusive range both session days must fall in
    ///
    /// # Returns
    ///
    /// A fresh report with the client aggregates, the rejection log and the
    /// run counters
    pub fn run(&self, rows: &[RawRow], range: &DateRange) -> Report {
        let progress_bar = if self.config.show_progress && rows.len() > PROGRESS_BAR_THRESHOLD {
            Some(create_progress_bar(rows.len()))
        } else {
            None
        };

        let report = self.run_with_progress(rows, range, progress_bar.as_ref());

        if let Some(pb) = progress_bar {
            pb.finish_with_message("Classification complete");
        }

        report
    }

    /// Same as [`run`](Self::run), reporting progress to the given bar
    pub fn run_with_progress(
        &self,
        rows: &[RawRow],
        range: &DateRange,
        progress_bar: Option<&ProgressBar>,
    ) -> Report {
        let start_time = Instant::now();
        let dates = range.expand();
        let classifier = RowClassifier::new(&dates, &self.config.guest_login);
        let mut builder = ReportBuilder::new(*range);

        debug!(
            "Classifying {} rows against {} days for login '{}'",
            rows.len(),
            dates.len(),
            self.config.guest_login
        );

        for (position, row) in rows.iter().enumerate() {
            builder.record(row, classifier.classify(row));

            if let Some(pb) = progress_bar {
                if position % PROGRESS_UPDATE_INTERVAL == 0 {
                    pb.set_position(position as u64);
                }
            }
        }

        if let Some(pb) = progress_bar {
            pb.set_position(rows.len() as u64);
        }

        let report = builder.finish();
        info!(
            "{} ({}ms)",
            report.stats().summary(),
            start_time.elapsed().as_millis()
        );

        report
    }
}

fn create_progress_bar(total: usize) -> ProgressBar {
    let pb = ProgressBar::new(total as u64);
    if let Ok(style) = ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} rows {msg}")
    {
        pb.set_style(style.progress_chars("#>-"));
    }
    pb.set_message("Classifying sessions");
    pb
}
