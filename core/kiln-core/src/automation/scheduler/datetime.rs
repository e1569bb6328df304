//! Strict datetime parsing for job schedules.
//!
//! Accepted forms:
//! - `YYYY-MM-DD HH:MM:SS`
//! - `YYYY-MM-DD` (midnight)
//!
//! The form is picked by pattern first, then parsed with the matching format,
//! so `2023-02-30` is reported as an invalid date rather than an unknown form.

use crate::error::{KilnError, KilnResult};
use chrono::{NaiveDate, NaiveDateTime};
use regex::Regex;
use std::sync::LazyLock;

pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
pub const DATE_FORMAT: &str = "%Y-%m-%d";

static DATETIME_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\d{4}-\d{2}-\d{2} \d{2}:\d{2}:\d{2}$").expect("valid datetime pattern")
});

static DATE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("valid date pattern"));

/// Parse a schedule boundary.
pub fn parse_datetime(input: &str) -> KilnResult<NaiveDateTime> {
    if DATETIME_PATTERN.is_match(input) {
        NaiveDateTime::parse_from_str(input, DATETIME_FORMAT).map_err(|_| {
            KilnError::InvalidDatetime {
                input: input.to_string(),
                kind: "datetime",
                expected_format: DATETIME_FORMAT,
            }
        })
    } else if DATE_PATTERN.is_match(input) {
        NaiveDate::parse_from_str(input, DATE_FORMAT)
            .map(|date| date.and_time(chrono::NaiveTime::MIN))
            .map_err(|_| KilnError::InvalidDatetime {
                input: input.to_string(),
                kind: "date",
                expected_format: DATE_FORMAT,
            })
    } else {
        Err(KilnError::UnrecognizedDatetime(input.to_string()))
    }
}
