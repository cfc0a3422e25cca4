//! Core data structures for guest session reporting.
//!
//! Defines the raw session row as loaded, the outcome of classifying it,
//! the per-client aggregate and the rejected-record snapshot.

use crate::constants::{MISSING_SENTINEL, REASON_SEPARATOR};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::warn;

/// One session record as loaded from the connection log.
///
/// Every field is kept as text. Cells that were empty or unreadable are
/// `None` so the classifier can report them instead of failing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRow {
    /// Zero-based position of the row in the source file
    pub index: usize,
    pub username: Option<String>,
    pub client_mac: Option<String>,
    pub user_id: Option<String>,
    /// Calendar day the session started, `YYYY-MM-DD` when well formed
    pub start_day: Option<String>,
    /// Calendar day the session ended, `YYYY-MM-DD` when well formed
    pub end_day: Option<String>,
    pub input_octets: Option<String>,
    pub output_octets: Option<String>,
    /// Session duration in seconds
    pub session_time: Option<String>,
}

/// Fields of a row that passed every validation rule, coerced to numbers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidSession {
    pub client_mac: String,
    pub user_id: u32,
    pub username: String,
    pub session_time: u64,
    pub input_octets: u64,
    pub output_octets: u64,
}

/// A single failed validation rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RejectionReason {
    /// Username is not the guest login
    UsernameMismatch,
    /// Client hardware address is absent or blank
    MissingClientMac,
    /// Identifier is not 1-7 digits
    InvalidUserId,
    InvalidInputOctets,
    InvalidOutputOctets,
    InvalidSessionTime,
    /// Input byte count is digit-only but does not fit in 64 bits
    InputOctetsOverflow,
    /// Output byte count is digit-only but does not fit in 64 bits
    OutputOctetsOverflow,
    /// Session duration is digit-only but does not fit in 64 bits
    SessionTimeOverflow,
}

impl fmt::Display for RejectionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            RejectionReason::UsernameMismatch => "username mismatch",
            RejectionReason::MissingClientMac => "client MAC missing or empty",
            RejectionReason::InvalidUserId => "ID does not match format (1-7 digits)",
            RejectionReason::InvalidInputOctets => "input octets is not a valid number",
            RejectionReason::InvalidOutputOctets => "output octets is not a valid number",
            RejectionReason::InvalidSessionTime => "session time is not a valid number",
            RejectionReason::InputOctetsOverflow => "input octets exceeds 64-bit range",
            RejectionReason::OutputOctetsOverflow => "output octets exceeds 64-bit range",
            RejectionReason::SessionTimeOverflow => "session time exceeds 64-bit range",
        };
        f.write_str(text)
    }
}

/// Decision for an in-scope row
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Valid(ValidSession),
    /// Never empty; one entry per failed rule in rule order
    Rejected(Vec<RejectionReason>),
}

/// Outcome of classifying one row against a date set
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    InScope(Verdict),
    /// Start or end day missing or outside the range; the row is dropped
    OutOfScope,
}

impl Classification {
    pub fn is_in_scope(&self) -> bool {
        matches!(self, Classification::InScope(_))
    }
}

/// Running totals for one client hardware address
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientAggregate {
    pub client_mac: String,
    /// Identifier of the first valid session seen for this address
    pub user_id: u32,
    /// Username of the first valid session seen for this address
    pub username: String,
    pub session_time: u64,
    pub input_octets: u64,
    pub output_octets: u64,
}

impl ClientAggregate {
    /// Start an aggregate from the first valid session of a client
    pub fn seed(session: &ValidSession) -> Self {
        Self {
            client_mac: session.client_mac.clone(),
            user_id: session.user_id,
            username: session.username.clone(),
            session_time: session.session_time,
            input_octets: session.input_octets,
            output_octets: session.output_octets,
        }
    }

    /// Add a later session's measures. Identity fields are left as seeded.
    ///
    /// A total that would pass `u64::MAX` is pinned there and logged, so the
    /// capped value never goes unnoticed.
    pub fn absorb(&mut self, session: &ValidSession) {
        self.session_time = self.add_total(self.session_time, session.session_time, "session time");
        self.input_octets = self.add_total(self.input_octets, session.input_octets, "input octets");
        self.output_octets =
            self.add_total(self.output_octets, session.output_octets, "output octets");
    }

    fn add_total(&self, total: u64, value: u64, field: &str) -> u64 {
        total.checked_add(value).unwrap_or_else(|| {
            warn!(
                "{} total for client {} exceeds 64-bit range; capped at {}",
                field,
                self.client_mac,
                u64::MAX
            );
            u64::MAX
        })
    }

    /// Total connection time as `H:MM:SS`
    pub fn formatted_session_time(&self) -> String {
        format_hms(self.session_time)
    }
}

/// Snapshot of a rejected row with the reasons it failed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RejectedRecord {
    pub original_index: usize,
    pub client_mac: String,
    pub username: String,
    pub user_id: String,
    pub start_day: String,
    pub end_day: String,
    pub input_octets: String,
    pub output_octets: String,
    pub session_time: String,
    pub reasons: Vec<RejectionReason>,
}

impl RejectedRecord {
    /// Capture a row's fields, substituting the sentinel for missing ones
    pub fn from_row(row: &RawRow, reasons: Vec<RejectionReason>) -> Self {
        fn text(value: &Option<String>) -> String {
            value
                .clone()
                .unwrap_or_else(|| MISSING_SENTINEL.to_string())
        }

        Self {
            original_index: row.index,
            client_mac: text(&row.client_mac),
            username: text(&row.username),
            user_id: text(&row.user_id),
            start_day: text(&row.start_day),
            end_day: text(&row.end_day),
            input_octets: text(&row.input_octets),
            output_octets: text(&row.output_octets),
            session_time: text(&row.session_time),
            reasons,
        }
    }

    pub fn reason_count(&self) -> usize {
        self.reasons.len()
    }

    /// Reasons joined with `"; "` in rule order
    pub fn joined_reasons(&self) -> String {
        self.reasons
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(REASON_SEPARATOR)
    }
}

/// Counters for one report run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportStats {
    pub rows_scanned: usize,
    pub out_of_scope: usize,
    pub in_scope: usize,
    pub valid_rows: usize,
    pub rejected_rows: usize,
    pub clients: usize,
}

impl ReportStats {
    /// Percentage of in-scope rows that passed validation
    pub fn acceptance_rate(&self) -> f64 {
        if self.in_scope == 0 {
            0.0
        } else {
            (self.valid_rows as f64 / self.in_scope as f64) * 100.0
        }
    }

    pub fn summary(&self) -> String {
        format!(
            "Report Summary: {} rows scanned | {} in range | {} valid ({:.1}%) | \
             {} rejected | {} clients",
            self.rows_scanned,
            self.in_scope,
            self.valid_rows,
            self.acceptance_rate(),
            self.rejected_rows,
            self.clients
        )
    }
}

/// Format a number of seconds as `H:MM:SS`, hours unbounded
pub fn format_hms(seconds: u64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;
    format!("{}:{:02}:{:02}", hours, minutes, secs)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(mac: &str, id: u32, user: &str, time: u64, input: u64, output: u64) -> ValidSession {
        ValidSession {
            client_mac: mac.to_string(),
            user_id: id,
            username: user.to_string(),
            session_time: time,
            input_octets: input,
            output_octets: output,
        }
    }

    #[test]
    fn test_format_hms() {
        assert_eq!(format_hms(0), "0:00:00");
        assert_eq!(format_hms(60), "0:01:00");
        assert_eq!(format_hms(3661), "1:01:01");
        assert_eq!(format_hms(90_000), "25:00:00");
    }

    #[test]
    fn test_aggregate_keeps_first_identity() {
        let mut aggregate = ClientAggregate::seed(&session("AA:BB", 1, "first", 10, 100, 200));
        aggregate.absorb(&session("AA:BB", 2, "second", 20, 1, 2));

        assert_eq!(aggregate.user_id, 1);
        assert_eq!(aggregate.username, "first");
        assert_eq!(aggregate.session_time, 30);
        assert_eq!(aggregate.input_octets, 101);
        assert_eq!(aggregate.output_octets, 202);
        assert_eq!(aggregate.formatted_session_time(), "0:00:30");
    }

    #[test]
    fn test_total_overflow_is_capped() {
        let mut aggregate =
            ClientAggregate::seed(&session("AA:BB", 1, "first", u64::MAX - 5, 1, u64::MAX));
        aggregate.absorb(&session("AA:BB", 1, "first", 10, 2, 1));

        assert_eq!(aggregate.session_time, u64::MAX);
        assert_eq!(aggregate.input_octets, 3);
        assert_eq!(aggregate.output_octets, u64::MAX);
    }

    #[test]
    fn test_rejected_record_uses_sentinel() {
        let row = RawRow {
            index: 7,
            username: Some("otro".to_string()),
            start_day: Some("2021-01-01".to_string()),
            ..Default::default()
        };
        let record = RejectedRecord::from_row(
            &row,
            vec![
                RejectionReason::UsernameMismatch,
                RejectionReason::MissingClientMac,
            ],
        );

        assert_eq!(record.original_index, 7);
        assert_eq!(record.username, "otro");
        assert_eq!(record.client_mac, MISSING_SENTINEL);
        assert_eq!(record.end_day, MISSING_SENTINEL);
        assert_eq!(record.reason_count(), 2);
        assert_eq!(
            record.joined_reasons(),
            "username mismatch; client MAC missing or empty"
        );
    }

    #[test]
    fn test_stats_acceptance_rate() {
        let stats = ReportStats {
            in_scope: 4,
            valid_rows: 3,
            ..Default::default()
        };
        assert_eq!(stats.acceptance_rate(), 75.0);
        assert_eq!(ReportStats::default().acceptance_rate(), 0.0);
    }
}
