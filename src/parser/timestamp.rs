//! Timestamp normalization for worklog start times.
//!
//! Entries are bucketed by the wall-clock date written in the source.
//! An offset, when present, is parsed (so malformed offsets are rejected)
//! and then discarded; no zone conversion happens.

use crate::utils::config::{NAIVE_TIMESTAMP_FORMATS, TIMESTAMP_FORMATS};
use crate::utils::error::ParseError;
use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// Parse a worklog timestamp into its local wall-clock time
///
/// Accepts RFC 3339, tracker style `2024-01-01T09:00:00.000+0000`,
/// offset-free date-times and bare dates (midnight).
pub fn parse_timestamp(value: &str) -> Result<NaiveDateTime, ParseError> {
    let value = value.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(dt.naive_local());
    }

    for format in TIMESTAMP_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(value, format) {
            return Ok(dt.naive_local());
        }
    }

    for format in NAIVE_TIMESTAMP_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, format) {
            return Ok(dt);
        }
    }

    if let Ok(day) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Ok(day.and_time(chrono::NaiveTime::MIN));
    }

    Err(ParseError::InvalidTimestamp(value.to_string()))
}

/// Parse a `YYYY-MM-DD` calendar date
pub fn parse_date(value: &str) -> Result<NaiveDate, ParseError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|e| ParseError::InvalidTimestamp(format!("{}: {}", value, e)))
}
