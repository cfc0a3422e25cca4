//! Report assembly
//!
//! Collects classification outcomes into the validated-client aggregates and
//! the rejection log, and lays both out as tables for the writer.

use crate::constants::{rejected_columns, validated_columns};
use crate::error::Result;
use crate::models::{
    Classification, ClientAggregate, RawRow, RejectedRecord, ReportStats, Verdict,
};
use crate::pipeline::aggregator::ClientAggregates;
use crate::pipeline::date_range::DateRange;
use polars::prelude::*;

/// Accumulates one run's outcomes row by row
#[derive(Debug)]
pub struct ReportBuilder {
    range: DateRange,
    clients: ClientAggregates,
    rejected: Vec<RejectedRecord>,
    stats: ReportStats,
}

impl ReportBuilder {
    pub fn new(range: DateRange) -> Self {
        Self {
            range,
            clients: ClientAggregates::new(),
            rejected: Vec::new(),
            stats: ReportStats::default(),
        }
    }

    /// Route one classified row to the aggregates or the rejection log
    pub fn record(&mut self, row: &RawRow, classification: Classification) {
        self.stats.rows_scanned += 1;

        match classification {
            Classification::OutOfScope => {
                self.stats.out_of_scope += 1;
            }
            Classification::InScope(Verdict::Valid(session)) => {
                self.stats.in_scope += 1;
                self.stats.valid_rows += 1;
                self.clients.add(&session);
            }
            Classification::InScope(Verdict::Rejected(reasons)) => {
                self.stats.in_scope += 1;
                self.stats.rejected_rows += 1;
                self.rejected.push(RejectedRecord::from_row(row, reasons));
            }
        }
    }

    pub fn finish(mut self) -> Report {
        self.stats.clients = self.clients.len();
        Report {
            range: self.range,
            clients: self.clients,
            rejected: self.rejected,
            stats: self.stats,
        }
    }
}

/// Finished, read-only result of one report run
#[derive(Debug, Clone)]
pub struct Report {
    range: DateRange,
    clients: ClientAggregates,
    rejected: Vec<RejectedRecord>,
    stats: ReportStats,
}

impl Report {
    pub fn range(&self) -> &DateRange {
        &self.range
    }

    pub fn clients(&self) -> &ClientAggregates {
        &self.clients
    }

    pub fn client(&self, client_mac: &str) -> Option<&ClientAggregate> {
        self.clients.get(client_mac)
    }

    /// Rejected records in source order
    pub fn rejected(&self) -> &[RejectedRecord] {
        &self.rejected
    }

    pub fn stats(&self) -> &ReportStats {
        &self.stats
    }

    /// Validated clients table: address, identifier, username, `H:MM:SS`
    /// connection time, input and output bytes.
    pub fn validated_frame(&self) -> Result<DataFrame> {
        let clients: Vec<&ClientAggregate> = self.clients.iter().collect();

        let frame = df!(
            validated_columns::CLIENT_MAC => clients.iter().map(|c| c.client_mac.clone()).collect::<Vec<_>>(),
            validated_columns::USER_ID => clients.iter().map(|c| c.user_id).collect::<Vec<_>>(),
            validated_columns::USERNAME => clients.iter().map(|c| c.username.clone()).collect::<Vec<_>>(),
            validated_columns::SESSION_TIME => clients.iter().map(|c| c.formatted_session_time()).collect::<Vec<_>>(),
            validated_columns::INPUT_OCTETS => clients.iter().map(|c| c.input_octets).collect::<Vec<_>>(),
            validated_columns::OUTPUT_OCTETS => clients.iter().map(|c| c.output_octets).collect::<Vec<_>>()
        )?;

        Ok(frame)
    }

    /// Rejected records table with reasons joined by `"; "` and their count
    pub fn rejected_frame(&self) -> Result<DataFrame> {
        let records = &self.rejected;

        let frame = df!(
            rejected_columns::ORIGINAL_INDEX => records.iter().map(|r| r.original_index as u64).collect::<Vec<_>>(),
            rejected_columns::CLIENT_MAC => text_column(records, |r| &r.client_mac),
            rejected_columns::USERNAME => text_column(records, |r| &r.username),
            rejected_columns::USER_ID => text_column(records, |r| &r.user_id),
            rejected_columns::START_DAY => text_column(records, |r| &r.start_day),
            rejected_columns::END_DAY => text_column(records, |r| &r.end_day),
            rejected_columns::INPUT_OCTETS => text_column(records, |r| &r.input_octets),
            rejected_columns::OUTPUT_OCTETS => text_column(records, |r| &r.output_octets),
            rejected_columns::SESSION_TIME => text_column(records, |r| &r.session_time),
            rejected_columns::REJECTION_REASONS => records.iter().map(|r| r.joined_reasons()).collect::<Vec<_>>(),
            rejected_columns::ERROR_COUNT => records.iter().map(|r| r.reason_count() as u32).collect::<Vec<_>>()
        )?;

        Ok(frame)
    }
}

fn text_column(
    records: &[RejectedRecord],
    field: impl Fn(&RejectedRecord) -> &String,
) -> Vec<String> {
    records.iter().map(|record| field(record).clone()).collect()
}
