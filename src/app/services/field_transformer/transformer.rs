//! Row transformation for event records

use super::field_parsers::{
    parse_coordinate, parse_dtg, parse_float_or_null, parse_int_or_null, reformat_dtg,
};
use crate::app::models::{EnrichedRecord, FieldValue, RawRecord};
use crate::config::DateConfig;
use crate::constants::columns;
use chrono::{Datelike, NaiveDateTime, Timelike};
use tracing::trace;

/// A transformed row waiting for place labels
#[derive(Debug, Clone, PartialEq)]
pub struct RecordTemplate {
    /// Coerced fields and date parts, without labels
    pub record: EnrichedRecord,
    /// Parsed event time
    pub event_time: NaiveDateTime,
    /// Latitude/longitude for the lookup; `None` when either is unusable
    pub coordinates: Option<(f64, f64)>,
}

/// Why a row produced no output
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// `Event_DTG` did not match the parse pattern
    UnparseableDateTime { event_dtg: String },
}

/// Result of transforming one source row
#[derive(Debug, Clone, PartialEq)]
pub enum TransformOutcome {
    Ready(RecordTemplate),
    Skip(SkipReason),
}

impl TransformOutcome {
    pub fn is_skip(&self) -> bool {
        matches!(self, TransformOutcome::Skip(_))
    }
}

/// Reshapes source rows according to the date-time group settings
#[derive(Debug, Clone)]
pub struct FieldTransformer {
    dates: DateConfig,
}

impl FieldTransformer {
    pub fn new(dates: DateConfig) -> Self {
        Self { dates }
    }

    pub fn dates(&self) -> &DateConfig {
        &self.dates
    }

    /// Transform one source row
    ///
    /// Never fails: numeric problems degrade to nulls and an unparseable
    /// timestamp skips the row.
    pub fn transform(&self, raw: &RawRecord) -> TransformOutcome {
        let date_time = raw
            .get(columns::DATE_TIME)
            .map(String::as_str)
            .unwrap_or_default();
        let event_dtg = reformat_dtg(date_time, &self.dates);

        let Some(event_time) = parse_dtg(&event_dtg, &self.dates.parse_pattern) else {
            trace!(
                "Skipping row: '{}' does not match '{}'",
                event_dtg, self.dates.parse_pattern
            );
            return TransformOutcome::Skip(SkipReason::UnparseableDateTime { event_dtg });
        };

        let mut record = EnrichedRecord::new();
        for (name, value) in raw {
            let field = name.as_str();
            if field == columns::DATE_TIME {
                record.insert(columns::EVENT_DTG, FieldValue::Text(event_dtg.clone()));
            } else if columns::FLOAT_COLUMNS.contains(&field) {
                record.insert(field, parse_float_or_null(value));
            } else if columns::INTEGER_COLUMNS.contains(&field) {
                record.insert(field, parse_int_or_null(value));
            } else {
                record.insert(field, FieldValue::Text(value.clone()));
            }
        }

        let parts = [
            i64::from(event_time.year()),
            i64::from(event_time.month()),
            i64::from(event_time.day()),
            i64::from(event_time.hour()),
            i64::from(event_time.minute()),
            i64::from(event_time.second()),
        ];
        for (name, value) in columns::DATE_PARTS.iter().zip(parts) {
            record.insert(*name, FieldValue::Integer(value));
        }

        let latitude = raw.get(columns::LATITUDE).and_then(|v| parse_coordinate(v));
        let longitude = raw.get(columns::LONGITUDE).and_then(|v| parse_coordinate(v));
        let coordinates = latitude.zip(longitude);

        TransformOutcome::Ready(RecordTemplate {
            record,
            event_time,
            coordinates,
        })
    }
}
