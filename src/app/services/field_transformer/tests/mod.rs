//! Tests for the field transformer module
//!
//! Unit tests for row reshaping, parse-or-null coercion and output layout.


use crate::app::models::RawRecord;
use crate::config::DateConfig;

/// Date settings used by the NCEDC feed: `/` in the source, `-` on output
pub fn ncedc_dates() -> DateConfig {
    DateConfig {
        source_separator: "/".to_string(),
        output_separator: "-".to_string(),
        parse_pattern: "%Y-%m-%d %H:%M:%S".to_string(),
        truncate_chars: 3,
    }
}

/// Build a raw record from name/value pairs in order
pub fn raw_record(fields: &[(&str, &str)]) -> RawRecord {
    fields
        .iter()
        .map(|(name, value)| (name.to_string(), value.to_string()))
        .collect()
}

/// A full NCEDC row in source column order
pub fn ncedc_row(date_time: &str) -> RawRecord {
    raw_record(&[
        ("DateTime", date_time),
        ("Latitude", "37.5"),
        ("Longitude", "-122.1"),
        ("Depth", ""),
        ("Magnitude", "3.2"),
        ("MagType", "Md"),
        ("NbStations", "12"),
        ("Gap", "85"),
        ("Distance", "abc"),
        ("RMS", "0.05"),
        ("Source", "NCSN"),
        ("EventID", "71234567"),
    ])
}
