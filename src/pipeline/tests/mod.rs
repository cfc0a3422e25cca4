//! Pipeline tests over small in-memory session logs


use crate::config::ReportConfig;
use crate::models::RawRow;
use crate::pipeline::{DateRange, Report, ReportPipeline};

/// A guest session that passes every rule, on the given days
pub fn guest_row(index: usize, mac: &str, start_day: &str, end_day: &str) -> RawRow {
    RawRow {
        index,
        username: Some("invitado-deca".to_string()),
        client_mac: Some(mac.to_string()),
        user_id: Some("123".to_string()),
        start_day: Some(start_day.to_string()),
        end_day: Some(end_day.to_string()),
        input_octets: Some("100".to_string()),
        output_octets: Some("200".to_string()),
        session_time: Some("60".to_string()),
    }
}

/// Same row with a different session duration
pub fn with_duration(mut row: RawRow, seconds: &str) -> RawRow {
    row.session_time = Some(seconds.to_string());
    row
}

/// Run the default pipeline over `rows` for an inclusive range
pub fn run_report(rows: &[RawRow], start: &str, end: &str) -> Report {
    let range = DateRange::parse(start, end).unwrap();
    ReportPipeline::new(ReportConfig::default().without_progress()).run(rows, &range)
}
