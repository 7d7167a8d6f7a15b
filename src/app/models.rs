//! Data models for earthquake reverse geo-coding
//!
//! This module contains the core data structures for representing source event
//! records, enriched output records, and the offline place table entries used
//! to label them.

use crate::constants::columns;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// =============================================================================
// Source Records
// =============================================================================

/// One source row: column name to raw string value, in header order
pub type RawRecord = IndexMap<String, String>;

// =============================================================================
// Field Values
// =============================================================================

/// A coerced output value
///
/// Numeric columns go through a parse-or-null rule, so a single column can hold
/// either a number or the null marker. The marker is rendered differently per
/// sink: the CSV writer uses the db null sentinel, index documents use the ES
/// null sentinel (or JSON `null`).
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// Passed through unchanged from the source
    Text(String),
    Integer(i64),
    Float(f64),
    /// Empty or unparseable input
    Null,
}

impl FieldValue {
    /// Render for delimited output, substituting `null_value` for nulls
    pub fn render(&self, null_value: &str) -> String {
        match self {
            FieldValue::Text(text) => text.clone(),
            FieldValue::Integer(value) => value.to_string(),
            FieldValue::Float(value) => format_float(*value),
            FieldValue::Null => null_value.to_string(),
        }
    }

    /// Convert to a JSON value; nulls become `null_value` or JSON `null`
    pub fn to_json(&self, null_value: Option<&str>) -> Value {
        match self {
            FieldValue::Text(text) => Value::String(text.clone()),
            FieldValue::Integer(value) => Value::from(*value),
            FieldValue::Float(value) => serde_json::Number::from_f64(*value)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            FieldValue::Null => match null_value {
                Some(sentinel) => Value::String(sentinel.to_string()),
                None => Value::Null,
            },
        }
    }
}

/// Format a float the way the event feed's consumers expect it
///
/// Integral values keep a trailing `.0` (`5.0`, not `5`) so the column type
/// stays recognisably floating point. Magnitudes below `1e-4` or from `1e16`
/// up use exponent notation with a signed, two-digit exponent (`1e-05`,
/// `1.5e+16`).
pub fn format_float(value: f64) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }

    let shortest = format!("{:?}", value);
    match shortest.split_once('e') {
        Some((mantissa, exponent)) => {
            let (sign, digits) = match exponent.strip_prefix('-') {
                Some(digits) => ('-', digits),
                None => ('+', exponent),
            };
            format!("{}e{}{:0>2}", mantissa, sign, digits)
        }
        None => shortest,
    }
}

// =============================================================================
// Place Labels
// =============================================================================

/// Administrative labels attached to an event by the location enricher
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaceLabels {
    /// ISO 3166-1 alpha-2 country code
    pub cc: String,
    /// First-level administrative division (state, province)
    pub admin1: String,
    /// Second-level administrative division (county, district)
    pub admin2: String,
    /// Nearest populated place name
    pub name: String,
}

impl PlaceLabels {
    pub fn new(
        cc: impl Into<String>,
        admin1: impl Into<String>,
        admin2: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            cc: cc.into(),
            admin1: admin1.into(),
            admin2: admin2.into(),
            name: name.into(),
        }
    }

    /// Labels used when the lookup returns no match
    pub fn empty() -> Self {
        Self::default()
    }
}

// =============================================================================
// Place Table Entries
// =============================================================================

/// One row of the offline place table (`lat,lon,name,admin1,admin2,cc`)
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Place {
    pub lat: f64,
    pub lon: f64,
    pub name: String,
    #[serde(default)]
    pub admin1: String,
    #[serde(default)]
    pub admin2: String,
    pub cc: String,
}

impl Place {
    /// Labels carried by this place
    pub fn labels(&self) -> PlaceLabels {
        PlaceLabels::new(&self.cc, &self.admin1, &self.admin2, &self.name)
    }

    /// Check the coordinates are finite and within WGS84 bounds
    pub fn has_valid_coordinates(&self) -> bool {
        valid_coordinates(self.lat, self.lon)
    }
}

/// Check a latitude/longitude pair is finite and within WGS84 bounds
pub fn valid_coordinates(lat: f64, lon: f64) -> bool {
    lat.is_finite()
        && lon.is_finite()
        && (-90.0..=90.0).contains(&lat)
        && (-180.0..=180.0).contains(&lon)
}

// =============================================================================
// Enriched Records
// =============================================================================

/// An output record: coerced source fields, date parts and place labels
///
/// Field order is significant and mirrors the output schema.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EnrichedRecord {
    fields: IndexMap<String, FieldValue>,
}

impl EnrichedRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a field, keeping the original position on replace
    pub fn insert(&mut self, name: impl Into<String>, value: FieldValue) {
        self.fields.insert(name.into(), value);
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// Field names in output order
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// Copy of this record carrying the given place labels
    pub fn with_labels(&self, labels: &PlaceLabels) -> Self {
        let mut record = self.clone();
        record.insert(columns::CC, FieldValue::Text(labels.cc.clone()));
        record.insert(columns::ADMIN1, FieldValue::Text(labels.admin1.clone()));
        record.insert(columns::ADMIN2, FieldValue::Text(labels.admin2.clone()));
        record.insert(columns::NAME, FieldValue::Text(labels.name.clone()));
        record
    }

    /// Structured JSON document with the same keys and order as the CSV row
    pub fn to_document(&self, null_value: Option<&str>) -> Map<String, Value> {
        self.fields
            .iter()
            .map(|(name, value)| (name.clone(), value.to_json(null_value)))
            .collect()
    }
}
