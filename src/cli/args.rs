//! Command-line argument definitions for the quake geocoder
//!
//! This module defines the complete CLI interface using the clap derive API.
//! Flag names follow the long-standing NCEDC geocoding script so existing
//! invocations keep working.

use crate::config::QuoteMode;
use crate::constants::{
    DEFAULT_DB_NULL_VALUE, DEFAULT_DELIMITER, DEFAULT_DTG_PARSE_PATTERN,
    DEFAULT_DTG_TRUNCATE_CHARS, DEFAULT_ES_DOC_TYPE, DEFAULT_ES_HOST, DEFAULT_ES_INDEX,
    DEFAULT_ES_PORT, DEFAULT_FLUSH_ROWS, DEFAULT_OUT_DATE_SEPARATOR, DEFAULT_OUT_FILE_EXTENSION,
    DEFAULT_OUT_FILE_PREFIX, DEFAULT_OUT_FILE_SUFFIX, DEFAULT_QUOTE_CHAR,
    DEFAULT_SRC_DATE_SEPARATOR,
};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// CLI arguments for the earthquake reverse geocoder
///
/// Reverse geo-codes an NCEDC-formatted earthquake CSV file, attaching country
/// code, administrative levels and nearest place name to every event.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "quake-geocoder",
    version,
    about = "Reverse geo-code an NCEDC-formatted earthquake CSV file",
    long_about = "Reads an NCEDC-formatted earthquake CSV file, reformats the event timestamp, \
                  coerces numeric columns, attaches country/admin/place labels from an offline \
                  place table, and writes an enriched CSV file. Optionally bulk-indexes every \
                  output row into Elasticsearch."
)]
pub struct Args {
    /// Source file path
    #[arg(long = "src-file-path", value_name = "PATH", help = "Source file path")]
    pub src_file_path: PathBuf,

    /// Source delimiter character (`\t` for tab)
    #[arg(
        long = "src-delimiter",
        value_name = "CHAR",
        default_value = DEFAULT_DELIMITER,
        help = "Source file delimiter character"
    )]
    pub src_delimiter: String,

    #[arg(
        long = "src-quotechar",
        value_name = "CHAR",
        default_value = DEFAULT_QUOTE_CHAR,
        help = "Source file quote character"
    )]
    pub src_quotechar: String,

    #[arg(
        long = "src-quotemode",
        value_enum,
        ignore_case = true,
        default_value = "QUOTE_MINIMAL",
        help = "Source file quoting mode"
    )]
    pub src_quotemode: QuoteMode,

    #[arg(
        long = "src-date-ymd-separator",
        value_name = "SEP",
        default_value = DEFAULT_SRC_DATE_SEPARATOR,
        help = "Source date year, month, day separator"
    )]
    pub src_date_ymd_separator: String,

    /// Date-time group parse pattern (strftime syntax)
    #[arg(
        long = "dtg-parse-pattern",
        value_name = "PATTERN",
        default_value = DEFAULT_DTG_PARSE_PATTERN,
        help = "Date-Time-Group parse pattern"
    )]
    pub dtg_parse_pattern: String,

    /// Trailing characters dropped from DateTime before parsing
    ///
    /// NCEDC timestamps end with a fixed-width fractional seconds suffix
    /// such as `.00`; set to 0 for feeds without one.
    #[arg(
        long = "dtg-truncate-chars",
        value_name = "COUNT",
        default_value_t = DEFAULT_DTG_TRUNCATE_CHARS,
        help = "Trailing characters dropped from DateTime"
    )]
    pub dtg_truncate_chars: usize,

    /// Output file path (default: synthesized next to the source file)
    #[arg(long = "out-file-path", value_name = "PATH", help = "Output file path")]
    pub out_file_path: Option<PathBuf>,

    #[arg(
        long = "out-delimiter",
        value_name = "CHAR",
        default_value = DEFAULT_DELIMITER,
        help = "Output file delimiter character"
    )]
    pub out_delimiter: String,

    #[arg(
        long = "out-quotechar",
        value_name = "CHAR",
        default_value = DEFAULT_QUOTE_CHAR,
        help = "Output file quote character"
    )]
    pub out_quotechar: String,

    #[arg(
        long = "out-quotemode",
        value_enum,
        ignore_case = true,
        default_value = "QUOTE_MINIMAL",
        help = "Output file quoting mode"
    )]
    pub out_quotemode: QuoteMode,

    #[arg(
        long = "out-header-row",
        value_enum,
        ignore_case = true,
        default_value = "Y",
        help = "Output a header row to file"
    )]
    pub out_header_row: YesNo,

    #[arg(
        long = "out-db-null-value",
        value_name = "VALUE",
        default_value = DEFAULT_DB_NULL_VALUE,
        help = "Null value written to the output file"
    )]
    pub out_db_null_value: String,

    /// Null value written to index documents (default: JSON null)
    #[arg(
        long = "out-es-null-value",
        value_name = "VALUE",
        help = "Null value written to index documents"
    )]
    pub out_es_null_value: Option<String>,

    #[arg(
        long = "out-elastic-search",
        value_enum,
        ignore_case = true,
        default_value = "N",
        help = "Output to an Elasticsearch index"
    )]
    pub out_elastic_search: YesNo,

    #[arg(
        long = "es-host-url",
        value_name = "HOST",
        default_value = DEFAULT_ES_HOST,
        help = "Elasticsearch host URL"
    )]
    pub es_host_url: String,

    #[arg(
        long = "es-port-number",
        value_name = "PORT",
        default_value_t = DEFAULT_ES_PORT,
        help = "Elasticsearch port number"
    )]
    pub es_port_number: u16,

    #[arg(
        long = "es-index-name",
        value_name = "NAME",
        default_value = DEFAULT_ES_INDEX,
        help = "Elasticsearch index name"
    )]
    pub es_index_name: String,

    /// Document type tag sent with every bulk action (empty to omit)
    #[arg(
        long = "es-doc-type",
        value_name = "TYPE",
        default_value = DEFAULT_ES_DOC_TYPE,
        help = "Elasticsearch document type tag"
    )]
    pub es_doc_type: String,

    #[arg(
        long = "out-file-name-folder",
        value_name = "PATH",
        help = "Output file name folder (default: source file folder)"
    )]
    pub out_file_name_folder: Option<PathBuf>,

    #[arg(
        long = "out-file-name-prefix",
        value_name = "PREFIX",
        default_value = DEFAULT_OUT_FILE_PREFIX,
        help = "Output file name prefix"
    )]
    pub out_file_name_prefix: String,

    #[arg(
        long = "out-file-name-suffix",
        value_name = "SUFFIX",
        default_value = DEFAULT_OUT_FILE_SUFFIX,
        help = "Output file name suffix"
    )]
    pub out_file_name_suffix: String,

    #[arg(
        long = "out-file-name-extension",
        value_name = "EXT",
        default_value = DEFAULT_OUT_FILE_EXTENSION,
        help = "Output file name extension"
    )]
    pub out_file_name_extension: String,

    #[arg(
        long = "out-date-ymd-separator",
        value_name = "SEP",
        default_value = DEFAULT_OUT_DATE_SEPARATOR,
        help = "Output date year, month, day separator"
    )]
    pub out_date_ymd_separator: String,

    /// Maximum rows to process, 0 means unlimited
    #[arg(
        long = "max-rows",
        value_name = "COUNT",
        default_value_t = 0,
        allow_negative_numbers = true,
        help = "Maximum rows to process, 0 means unlimited"
    )]
    pub max_rows: i64,

    #[arg(
        long = "flush-rows",
        value_name = "COUNT",
        default_value_t = DEFAULT_FLUSH_ROWS,
        allow_negative_numbers = true,
        help = "Flush rows interval"
    )]
    pub flush_rows: i64,

    /// Offline place table (`lat,lon,name,admin1,admin2,cc`)
    ///
    /// Defaults to rg_cities1000.csv under the user data directory.
    #[arg(long = "places-file", value_name = "PATH", help = "Offline place table path")]
    pub places_file: Option<PathBuf>,

    /// Logging verbosity level
    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        help = "Increase logging verbosity (-v: info, -vv: debug, -vvv: trace)"
    )]
    pub verbose: u8,

    /// Suppress output (quiet mode)
    #[arg(
        short = 'q',
        long = "quiet",
        help = "Suppress progress output except errors",
        conflicts_with = "verbose"
    )]
    pub quiet: bool,
}

/// Y/N toggle used by the legacy flag set
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum YesNo {
    Y,
    N,
}

impl YesNo {
    pub fn is_yes(self) -> bool {
        self == YesNo::Y
    }
}

impl Args {
    /// Determine the appropriate log level based on verbosity flags
    pub fn get_log_level(&self) -> &'static str {
        if self.quiet {
            "error"
        } else {
            match self.verbose {
                0 => "warn",
                1 => "info",
                2 => "debug",
                _ => "trace",
            }
        }
    }

    /// Check if we should show progress bars (not in quiet mode)
    pub fn show_progress(&self) -> bool {
        !self.quiet
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(extra: &[&str]) -> Args {
        let mut argv = vec!["quake-geocoder", "--src-file-path", "quakes.csv"];
        argv.extend_from_slice(extra);
        Args::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_defaults_match_legacy_script() {
        let args = parse(&[]);
        assert_eq!(args.src_delimiter, ",");
        assert_eq!(args.src_quotechar, "\"");
        assert_eq!(args.src_quotemode, QuoteMode::Minimal);
        assert_eq!(args.src_date_ymd_separator, "/");
        assert_eq!(args.out_date_ymd_separator, "-");
        assert_eq!(args.dtg_parse_pattern, "%Y-%m-%d %H:%M:%S");
        assert_eq!(args.dtg_truncate_chars, 3);
        assert_eq!(args.out_header_row, YesNo::Y);
        assert_eq!(args.out_elastic_search, YesNo::N);
        assert_eq!(args.out_db_null_value, "NULL");
        assert!(args.out_es_null_value.is_none());
        assert_eq!(args.es_host_url, "localhost");
        assert_eq!(args.es_port_number, 9200);
        assert_eq!(args.es_index_name, "quakes");
        assert_eq!(args.out_file_name_prefix, "NCEDC_earthquakes");
        assert_eq!(args.out_file_name_suffix, "_reverse_geocoded");
        assert_eq!(args.out_file_name_extension, ".csv");
        assert_eq!(args.max_rows, 0);
        assert_eq!(args.flush_rows, 1000);
    }

    #[test]
    fn test_source_path_is_required() {
        let result = Args::try_parse_from(["quake-geocoder"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_quote_modes_parse_case_insensitively() {
        let args = parse(&["--src-quotemode", "quote_none", "--out-quotemode", "QUOTE_ALL"]);
        assert_eq!(args.src_quotemode, QuoteMode::None);
        assert_eq!(args.out_quotemode, QuoteMode::All);

        let args = parse(&["--out-quotemode", "QUOTE_NONNUMERIC"]);
        assert_eq!(args.out_quotemode, QuoteMode::NonNumeric);
    }

    #[test]
    fn test_unknown_quote_mode_is_rejected_at_parse_time() {
        let result = Args::try_parse_from([
            "quake-geocoder",
            "--src-file-path",
            "quakes.csv",
            "--src-quotemode",
            "QUOTE_SOMETIMES",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_yes_no_toggles() {
        let args = parse(&["--out-header-row", "n", "--out-elastic-search", "Y"]);
        assert!(!args.out_header_row.is_yes());
        assert!(args.out_elastic_search.is_yes());
    }

    #[test]
    fn test_negative_row_counts_are_accepted() {
        let args = parse(&["--max-rows", "-10", "--flush-rows", "-50"]);
        assert_eq!(args.max_rows, -10);
        assert_eq!(args.flush_rows, -50);
    }

    #[test]
    fn test_log_levels() {
        assert_eq!(parse(&[]).get_log_level(), "warn");
        assert_eq!(parse(&["-v"]).get_log_level(), "info");
        assert_eq!(parse(&["-vv"]).get_log_level(), "debug");
        assert_eq!(parse(&["-vvv"]).get_log_level(), "trace");
        assert_eq!(parse(&["-q"]).get_log_level(), "error");
        assert!(!parse(&["-q"]).show_progress());
    }
}
