//! Field parsing utilities for event records
//!
//! Parse-or-null coercion for numeric columns and date-time group handling.
//! None of these functions fail: unusable input degrades to
//! [`FieldValue::Null`] or `None`.

use crate::app::models::FieldValue;
use crate::config::DateConfig;
use chrono::{NaiveDate, NaiveDateTime};

/// Coerce a float column; empty, whitespace-only or unparseable input is null
pub fn parse_float_or_null(value: &str) -> FieldValue {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return FieldValue::Null;
    }
    trimmed
        .parse::<f64>()
        .map(FieldValue::Float)
        .unwrap_or(FieldValue::Null)
}

/// Coerce an integer column; empty, whitespace-only or unparseable input is null
pub fn parse_int_or_null(value: &str) -> FieldValue {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return FieldValue::Null;
    }
    trimmed
        .parse::<i64>()
        .map(FieldValue::Integer)
        .unwrap_or(FieldValue::Null)
}

/// Parse a coordinate for the place lookup
pub fn parse_coordinate(value: &str) -> Option<f64> {
    value.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Drop the last `count` characters; shorter input becomes empty
pub fn truncate_trailing(value: &str, count: usize) -> &str {
    if count == 0 {
        return value;
    }
    match value.char_indices().rev().nth(count - 1) {
        Some((index, _)) => &value[..index],
        None => "",
    }
}

/// Build `Event_DTG` from a raw `DateTime`: truncate the fractional suffix,
/// then swap the date separator
pub fn reformat_dtg(raw: &str, dates: &DateConfig) -> String {
    let truncated = truncate_trailing(raw, dates.truncate_chars);
    if dates.source_separator.is_empty() {
        truncated.to_string()
    } else {
        truncated.replace(&dates.source_separator, &dates.output_separator)
    }
}

/// Parse an `Event_DTG` value against a strftime-style pattern
///
/// Patterns without time fields parse as midnight of the given date.
pub fn parse_dtg(value: &str, pattern: &str) -> Option<NaiveDateTime> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    NaiveDateTime::parse_from_str(trimmed, pattern)
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(trimmed, pattern)
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
}
