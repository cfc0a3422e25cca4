//! Row classification against a date set
//!
//! A row is first gated on its days: both the start day and the end day must
//! be present and inside the range, otherwise it is out of scope and appears
//! in neither output table. In-scope rows are then checked against every
//! validation rule without short-circuiting, so a rejected row carries one
//! reason per failed rule.

use crate::models::{Classification, RawRow, RejectionReason, ValidSession, Verdict};
use crate::pipeline::date_range::DateSet;
use crate::pipeline::validators::{
    is_counter_shape, is_duration_shape, is_id_shape, is_mac_present,
};
use tracing::debug;

/// Classifies rows for one report run
#[derive(Debug, Clone, Copy)]
pub struct RowClassifier<'a> {
    dates: &'a DateSet,
    guest_login: &'a str,
}

impl<'a> RowClassifier<'a> {
    pub fn new(dates: &'a DateSet, guest_login: &'a str) -> Self {
        Self { dates, guest_login }
    }

    /// Classify one row against the date set and the validation rules.
    ///
    /// # Arguments
    ///
    /// * `row` - Loaded session row, left untouched
    ///
    /// # Returns
    ///
    /// `OutOfScope` when either day is missing or outside the range,
    /// otherwise `InScope` with the normalized session or every failed rule
    pub fn classify(&self, row: &RawRow) -> Classification {
        if !is_in_scope(row, self.dates) {
            return Classification::OutOfScope;
        }

        let reasons = rejection_reasons(row, self.guest_login);
        if !reasons.is_empty() {
            debug!("Row {} rejected: {:?}", row.index, reasons);
            return Classification::InScope(Verdict::Rejected(reasons));
        }

        match normalize(row) {
            Ok(session) => Classification::InScope(Verdict::Valid(session)),
            Err(reasons) => {
                debug!("Row {} rejected during coercion: {:?}", row.index, reasons);
                Classification::InScope(Verdict::Rejected(reasons))
            }
        }
    }
}

/// Both days present and in the set. Either one missing or outside the range
/// puts the row out of scope.
pub fn is_in_scope(row: &RawRow, dates: &DateSet) -> bool {
    let day_in_range = |day: &Option<String>| day.as_deref().is_some_and(|d| dates.contains(d));
    day_in_range(&row.start_day) && day_in_range(&row.end_day)
}

/// Every failed rule, in rule order. Missing fields fail their rule.
pub fn rejection_reasons(row: &RawRow, guest_login: &str) -> Vec<RejectionReason> {
    let mut reasons = Vec::new();

    if row.username.as_deref() != Some(guest_login) {
        reasons.push(RejectionReason::UsernameMismatch);
    }

    if !is_mac_present(row.client_mac.as_deref()) {
        reasons.push(RejectionReason::MissingClientMac);
    }

    if !row.user_id.as_deref().is_some_and(is_id_shape) {
        reasons.push(RejectionReason::InvalidUserId);
    }

    if !row.input_octets.as_deref().is_some_and(is_counter_shape) {
        reasons.push(RejectionReason::InvalidInputOctets);
    }

    if !row.output_octets.as_deref().is_some_and(is_counter_shape) {
        reasons.push(RejectionReason::InvalidOutputOctets);
    }

    if !row.session_time.as_deref().is_some_and(is_duration_shape) {
        reasons.push(RejectionReason::InvalidSessionTime);
    }

    reasons
}

/// Coerce a row that passed every rule.
///
/// The shape rules guarantee digit-only text, so the only failures left are
/// counters too large for `u64`. Each oversized counter adds its own reason,
/// in the same field order as the shape rules.
fn normalize(row: &RawRow) -> Result<ValidSession, Vec<RejectionReason>> {
    let mut reasons = Vec::new();
    let mut counter = |value: &Option<String>, overflow: RejectionReason| {
        let parsed = value.as_deref().and_then(|text| text.parse::<u64>().ok());
        if parsed.is_none() {
            reasons.push(overflow);
        }
        parsed.unwrap_or_default()
    };

    let input_octets = counter(&row.input_octets, RejectionReason::InputOctetsOverflow);
    let output_octets = counter(&row.output_octets, RejectionReason::OutputOctetsOverflow);
    let session_time = counter(&row.session_time, RejectionReason::SessionTimeOverflow);

    let user_id = row.user_id.as_deref().and_then(|text| text.parse::<u32>().ok());
    let Some(user_id) = user_id else {
        reasons.insert(0, RejectionReason::InvalidUserId);
        return Err(reasons);
    };

    if !reasons.is_empty() {
        return Err(reasons);
    }

    Ok(ValidSession {
        client_mac: row.client_mac.clone().unwrap_or_default(),
        user_id,
        username: row.username.clone().unwrap_or_default(),
        session_time,
        input_octets,
        output_octets,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::date_range::DateRange;

    fn january_first() -> DateSet {
        DateRange::parse("2021-01-01", "2021-01-01").unwrap().expand()
    }

    fn guest_row() -> RawRow {
        RawRow {
            index: 0,
            username: Some("invitado-deca".to_string()),
            client_mac: Some("AA:BB".to_string()),
            user_id: Some("123".to_string()),
            start_day: Some("2021-01-01".to_string()),
            end_day: Some("2021-01-01".to_string()),
            input_octets: Some("100".to_string()),
            output_octets: Some("200".to_string()),
            session_time: Some("60".to_string()),
        }
    }

    #[test]
    fn test_valid_row_is_normalized() {
        let dates = january_first();
        let classifier = RowClassifier::new(&dates, "invitado-deca");

        let expected = ValidSession {
            client_mac: "AA:BB".to_string(),
            user_id: 123,
            username: "invitado-deca".to_string(),
            session_time: 60,
            input_octets: 100,
            output_octets: 200,
        };
        assert_eq!(
            classifier.classify(&guest_row()),
            Classification::InScope(Verdict::Valid(expected))
        );
    }

    #[test]
    fn test_scope_requires_both_days() {
        let dates = january_first();

        let mut row = guest_row();
        row.end_day = Some("2021-02-15".to_string());
        assert!(!is_in_scope(&row, &dates));

        let mut row = guest_row();
        row.start_day = Some("2020-12-31".to_string());
        assert!(!is_in_scope(&row, &dates));

        let mut row = guest_row();
        row.end_day = None;
        assert!(!is_in_scope(&row, &dates));

        assert!(is_in_scope(&guest_row(), &dates));
    }

    #[test]
    fn test_out_of_scope_skips_validation() {
        let dates = january_first();
        let classifier = RowClassifier::new(&dates, "invitado-deca");

        let row = RawRow {
            start_day: Some("2021-01-01".to_string()),
            end_day: Some("2021-01-02".to_string()),
            ..Default::default()
        };
        assert_eq!(classifier.classify(&row), Classification::OutOfScope);
    }

    #[test]
    fn test_all_failures_are_recorded_in_order() {
        let row = RawRow {
            index: 3,
            username: Some("otro".to_string()),
            client_mac: Some("  ".to_string()),
            user_id: Some("12345678".to_string()),
            start_day: Some("2021-01-01".to_string()),
            end_day: Some("2021-01-01".to_string()),
            input_octets: Some("1.5".to_string()),
            output_octets: None,
            session_time: Some("-3".to_string()),
        };

        assert_eq!(
            rejection_reasons(&row, "invitado-deca"),
            vec![
                RejectionReason::UsernameMismatch,
                RejectionReason::MissingClientMac,
                RejectionReason::InvalidUserId,
                RejectionReason::InvalidInputOctets,
                RejectionReason::InvalidOutputOctets,
                RejectionReason::InvalidSessionTime,
            ]
        );
    }

    #[test]
    fn test_username_only_failure() {
        let dates = january_first();
        let classifier = RowClassifier::new(&dates, "invitado-deca");

        let mut row = guest_row();
        row.username = Some("otro".to_string());

        assert_eq!(
            classifier.classify(&row),
            Classification::InScope(Verdict::Rejected(vec![RejectionReason::UsernameMismatch]))
        );
    }

    #[test]
    fn test_username_is_compared_exactly() {
        let mut row = guest_row();
        row.username = Some("Invitado-Deca".to_string());
        assert_eq!(
            rejection_reasons(&row, "invitado-deca"),
            vec![RejectionReason::UsernameMismatch]
        );

        row.username = None;
        assert_eq!(
            rejection_reasons(&row, "invitado-deca"),
            vec![RejectionReason::UsernameMismatch]
        );
    }

    #[test]
    fn test_mac_carried_unchanged() {
        let dates = january_first();
        let classifier = RowClassifier::new(&dates, "invitado-deca");

        let mut row = guest_row();
        row.client_mac = Some(" AA:BB ".to_string());

        match classifier.classify(&row) {
            Classification::InScope(Verdict::Valid(session)) => {
                assert_eq!(session.client_mac, " AA:BB ");
            }
            other => panic!("Expected valid session, got {other:?}"),
        }
    }

    #[test]
    fn test_counter_overflow_is_rejected() {
        let dates = january_first();
        let classifier = RowClassifier::new(&dates, "invitado-deca");

        let mut row = guest_row();
        row.input_octets = Some("99999999999999999999999".to_string());

        assert_eq!(
            classifier.classify(&row),
            Classification::InScope(Verdict::Rejected(vec![
                RejectionReason::InputOctetsOverflow
            ]))
        );
    }

    #[test]
    fn test_every_overflowing_counter_is_reported() {
        let dates = january_first();
        let classifier = RowClassifier::new(&dates, "invitado-deca");

        let mut row = guest_row();
        row.input_octets = Some("99999999999999999999999".to_string());
        row.output_octets = Some("99999999999999999999999".to_string());
        row.session_time = Some("18446744073709551616".to_string());

        let Classification::InScope(Verdict::Rejected(reasons)) = classifier.classify(&row) else {
            panic!("Expected rejected row");
        };
        assert_eq!(
            reasons,
            vec![
                RejectionReason::InputOctetsOverflow,
                RejectionReason::OutputOctetsOverflow,
                RejectionReason::SessionTimeOverflow,
            ]
        );

        let record = crate::models::RejectedRecord::from_row(&row, reasons);
        assert_eq!(
            record.joined_reasons(),
            "input octets exceeds 64-bit range; output octets exceeds 64-bit range; \
             session time exceeds 64-bit range"
        );
    }

    #[test]
    fn test_largest_counter_is_accepted() {
        let dates = january_first();
        let classifier = RowClassifier::new(&dates, "invitado-deca");

        let mut row = guest_row();
        row.output_octets = Some(u64::MAX.to_string());

        match classifier.classify(&row) {
            Classification::InScope(Verdict::Valid(session)) => {
                assert_eq!(session.output_octets, u64::MAX);
            }
            other => panic!("Expected valid session, got {other:?}"),
        }
    }
}
