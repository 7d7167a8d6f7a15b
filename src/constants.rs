//! Application constants for the quake geocoder
//!
//! This module contains column names, default values, and file naming
//! conventions used throughout the quake geocoder application.

// =============================================================================
// Program Identity
// =============================================================================

/// Program name shown in banners and version output
pub const PROGRAM_NAME: &str = "quake-geocoder";

/// Directory under the user data directory holding the place table
pub const DATA_DIR_NAME: &str = "quake-geocoder";

/// Default offline place table file name (GeoNames cities >= 1000 inhabitants)
pub const DEFAULT_PLACES_FILE_NAME: &str = "rg_cities1000.csv";

// =============================================================================
// Source and Output Columns
// =============================================================================

/// Source and output column names for NCEDC-formatted event records
pub mod columns {
    /// Composite event timestamp in the source file
    pub const DATE_TIME: &str = "DateTime";

    /// Reformatted event timestamp that replaces `DateTime` in place
    pub const EVENT_DTG: &str = "Event_DTG";

    pub const LATITUDE: &str = "Latitude";
    pub const LONGITUDE: &str = "Longitude";
    pub const DEPTH: &str = "Depth";
    pub const MAGNITUDE: &str = "Magnitude";
    pub const NB_STATIONS: &str = "NbStations";
    pub const GAP: &str = "Gap";
    pub const DISTANCE: &str = "Distance";

    /// Columns coerced as floats through the parse-or-null rule
    pub const FLOAT_COLUMNS: &[&str] = &[DEPTH, MAGNITUDE, GAP, DISTANCE, LATITUDE, LONGITUDE];

    /// Columns coerced as integers through the parse-or-null rule
    pub const INTEGER_COLUMNS: &[&str] = &[NB_STATIONS];

    /// Exploded date components, appended after the source columns in this order
    pub const DATE_PARTS: &[&str] = &[
        "Event_Year",
        "Event_Month",
        "Event_Day",
        "Event_Hour",
        "Event_Min",
        "Event_Sec",
    ];

    pub const CC: &str = "cc";
    pub const ADMIN1: &str = "admin1";
    pub const ADMIN2: &str = "admin2";
    pub const NAME: &str = "name";

    /// Place label columns, appended last in this order
    pub const LABELS: &[&str] = &[CC, ADMIN1, ADMIN2, NAME];
}

// =============================================================================
// CSV Dialect Defaults
// =============================================================================

pub const DEFAULT_DELIMITER: &str = ",";
pub const DEFAULT_QUOTE_CHAR: &str = "\"";

/// Two-character escape accepted on the command line for a tab delimiter
pub const TAB_ESCAPE: &str = "\\t";

// =============================================================================
// Date-Time Group Defaults
// =============================================================================

pub const DEFAULT_SRC_DATE_SEPARATOR: &str = "/";
pub const DEFAULT_OUT_DATE_SEPARATOR: &str = "-";
pub const DEFAULT_DTG_PARSE_PATTERN: &str = "%Y-%m-%d %H:%M:%S";

/// Trailing characters dropped from `DateTime` (the `.00` fractional seconds)
pub const DEFAULT_DTG_TRUNCATE_CHARS: usize = 3;

// =============================================================================
// Output Defaults
// =============================================================================

pub const DEFAULT_DB_NULL_VALUE: &str = "NULL";
pub const DEFAULT_OUT_FILE_PREFIX: &str = "NCEDC_earthquakes";
pub const DEFAULT_OUT_FILE_SUFFIX: &str = "_reverse_geocoded";
pub const DEFAULT_OUT_FILE_EXTENSION: &str = ".csv";

/// Rows read between flushes and progress lines
pub const DEFAULT_FLUSH_ROWS: i64 = 1000;

// =============================================================================
// Elasticsearch Defaults
// =============================================================================

pub const DEFAULT_ES_HOST: &str = "localhost";
pub const DEFAULT_ES_PORT: u16 = 9200;
pub const DEFAULT_ES_INDEX: &str = "quakes";
pub const DEFAULT_ES_DOC_TYPE: &str = "quake";

/// Request timeout for index service calls (seconds)
pub const ES_REQUEST_TIMEOUT_SECS: u64 = 60;

// =============================================================================
// Geodesy
// =============================================================================

/// Mean Earth radius used for great-circle distances
pub const EARTH_RADIUS_KM: f64 = 6371.0088;
