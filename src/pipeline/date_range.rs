//! Date range expansion
//!
//! Turns an inclusive pair of calendar dates into the set of day strings the
//! classifier tests row days against.

use crate::constants::DAY_FORMAT;
use crate::error::{ReportError, Result};
use crate::pipeline::validators::is_date_shape;
use chrono::NaiveDate;
use std::collections::BTreeSet;
use tracing::debug;

/// Inclusive range of calendar days, start never after end
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    /// Create a range, failing when `start` is after `end`
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if start > end {
            return Err(ReportError::InvalidDateRange {
                start: start.format(DAY_FORMAT).to_string(),
                end: end.format(DAY_FORMAT).to_string(),
            });
        }
        Ok(Self { start, end })
    }

    /// Parse both ends from `YYYY-MM-DD` text and build the range
    pub fn parse(start: &str, end: &str) -> Result<Self> {
        Self::new(parse_day(start)?, parse_day(end)?)
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Number of days in the range, both ends included
    pub fn day_count(&self) -> usize {
        (self.end - self.start).num_days() as usize + 1
    }

    /// Every day from start to end as `YYYY-MM-DD`
    pub fn expand(&self) -> DateSet {
        let days: BTreeSet<String> = self
            .start
            .iter_days()
            .take_while(|day| *day <= self.end)
            .map(|day| day.format(DAY_FORMAT).to_string())
            .collect();

        debug!(
            "Expanded {} to {} into {} days",
            self.start,
            self.end,
            days.len()
        );

        DateSet { days }
    }
}

/// Parse a day the way the prompt accepts it: date shape first, then a real
/// calendar date.
pub fn parse_day(value: &str) -> Result<NaiveDate> {
    let value = value.trim();
    if !is_date_shape(value) {
        return Err(ReportError::InvalidDate {
            value: value.to_string(),
        });
    }
    NaiveDate::parse_from_str(value, DAY_FORMAT).map_err(|_| ReportError::InvalidDate {
        value: value.to_string(),
    })
}

/// Ordered set of `YYYY-MM-DD` day strings for one report run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateSet {
    days: BTreeSet<String>,
}

impl DateSet {
    /// Whether a row's day text is one of the days in range
    pub fn contains(&self, day: &str) -> bool {
        self.days.contains(day)
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    /// Days in chronological order
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.days.iter().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_single_day_range() {
        let range = DateRange::new(date(2021, 1, 1), date(2021, 1, 1)).unwrap();
        let set = range.expand();

        assert_eq!(set.len(), 1);
        assert!(set.contains("2021-01-01"));
        assert!(!set.contains("2021-01-02"));
    }

    #[test]
    fn test_range_crosses_month_and_year() {
        let range = DateRange::new(date(2020, 12, 30), date(2021, 1, 2)).unwrap();
        let set = range.expand();

        assert_eq!(
            set.iter().collect::<Vec<_>>(),
            vec!["2020-12-30", "2020-12-31", "2021-01-01", "2021-01-02"]
        );
        assert_eq!(set.len(), range.day_count());
    }

    #[test]
    fn test_leap_year_february() {
        let leap = DateRange::new(date(2020, 2, 28), date(2020, 3, 1)).unwrap().expand();
        assert_eq!(leap.len(), 3);
        assert!(leap.contains("2020-02-29"));

        let common = DateRange::new(date(2021, 2, 28), date(2021, 3, 1)).unwrap().expand();
        assert_eq!(common.len(), 2);
        assert!(!common.contains("2021-02-29"));
    }

    #[test]
    fn test_inverted_range_fails() {
        let result = DateRange::new(date(2021, 1, 2), date(2021, 1, 1));
        match result.unwrap_err() {
            ReportError::InvalidDateRange { start, end } => {
                assert_eq!(start, "2021-01-02");
                assert_eq!(end, "2021-01-01");
            }
            other => panic!("Expected InvalidDateRange, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_day() {
        assert_eq!(parse_day(" 2021-03-04 ").unwrap(), date(2021, 3, 4));
        assert!(matches!(
            parse_day("2024-01-01"),
            Err(ReportError::InvalidDate { .. })
        ));
        // passes the shape check but is not a calendar date
        assert!(matches!(
            parse_day("2021-02-31"),
            Err(ReportError::InvalidDate { .. })
        ));
    }

    #[test]
    fn test_parse_range() {
        let range = DateRange::parse("2021-01-01", "2021-01-31").unwrap();
        assert_eq!(range.day_count(), 31);
        assert!(DateRange::parse("2021-02-01", "2021-01-31").is_err());
    }
}
