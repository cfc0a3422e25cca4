//! Shape validators for individual session fields
//!
//! Each check looks only at the text of one field. None of them parse the
//! value or judge whether it makes sense, and none of them fail.

use crate::constants::{COUNTER_SHAPE_PATTERN, DATE_SHAPE_PATTERN, ID_SHAPE_PATTERN};
use regex::Regex;
use std::sync::LazyLock;

static DATE_SHAPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(DATE_SHAPE_PATTERN).expect("date shape pattern is valid"));

static ID_SHAPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(ID_SHAPE_PATTERN).expect("id shape pattern is valid"));

static COUNTER_SHAPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(COUNTER_SHAPE_PATTERN).expect("counter shape pattern is valid"));

/// `YYYY-MM-DD` with year 2019-2023, month 01-12 and day 01-31.
///
/// Day is not checked against the month, so `2021-02-31` is accepted.
pub fn is_date_shape(value: &str) -> bool {
    DATE_SHAPE.is_match(value)
}

/// One to seven ASCII digits
pub fn is_id_shape(value: &str) -> bool {
    ID_SHAPE.is_match(value)
}

/// One or more ASCII digits, no sign or decimal point
pub fn is_counter_shape(value: &str) -> bool {
    COUNTER_SHAPE.is_match(value)
}

/// Non-empty and made of ASCII digits only
pub fn is_duration_shape(value: &str) -> bool {
    !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit())
}

/// Present and not blank once trimmed
pub fn is_mac_present(value: Option<&str>) -> bool {
    value.is_some_and(|mac| !mac.trim().is_empty())
}
