//! Configuration resolution and validation.
//!
//! Turns raw command-line arguments into an immutable [`Config`]: CSV dialects
//! for both sides of the pipeline, date-time group handling, null sentinels,
//! the resolved output path, row limits, and optional index sink parameters.

use crate::cli::args::Args;
use crate::constants::{DATA_DIR_NAME, DEFAULT_PLACES_FILE_NAME, TAB_ESCAPE};
use crate::{Error, Result};
use anyhow::Context;
use clap::ValueEnum;
use serde::Serialize;
use std::path::{Component, Path, PathBuf};
use tracing::debug;

/// CSV quoting modes, named after the legacy script's options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ValueEnum)]
pub enum QuoteMode {
    /// Quote only fields that need it
    #[value(name = "QUOTE_MINIMAL")]
    Minimal,
    /// Never quote; the reader treats quote characters as data
    #[value(name = "QUOTE_NONE")]
    None,
    /// Quote every field
    #[value(name = "QUOTE_ALL")]
    All,
    /// Quote every non-numeric field
    #[value(name = "QUOTE_NONNUMERIC")]
    NonNumeric,
}

impl QuoteMode {
    /// Writer quote style for this mode
    ///
    /// `NonNumeric` maps to `Never` because the output writer quotes by value
    /// type itself; the csv crate would only look at the rendered text.
    pub fn quote_style(self) -> csv::QuoteStyle {
        match self {
            QuoteMode::Minimal => csv::QuoteStyle::Necessary,
            QuoteMode::None | QuoteMode::NonNumeric => csv::QuoteStyle::Never,
            QuoteMode::All => csv::QuoteStyle::Always,
        }
    }

    /// Whether the reader should interpret quote characters
    pub fn reader_quoting(self) -> bool {
        self != QuoteMode::None
    }
}

/// Delimiter, quote character and quoting mode for one side of the pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CsvDialect {
    pub delimiter: u8,
    pub quote: u8,
    pub quote_mode: QuoteMode,
}

impl Default for CsvDialect {
    fn default() -> Self {
        Self {
            delimiter: b',',
            quote: b'"',
            quote_mode: QuoteMode::Minimal,
        }
    }
}

impl CsvDialect {
    /// Build a dialect from command-line delimiter/quote strings
    pub fn from_cli(delimiter: &str, quote: &str, quote_mode: QuoteMode) -> Result<Self> {
        Ok(Self {
            delimiter: translate_delimiter(delimiter)?,
            quote: single_byte(quote, "quote character")?,
            quote_mode,
        })
    }

    /// Reader builder configured for this dialect
    ///
    /// The header row is consumed by the reader itself; rows of uneven length
    /// are accepted and aligned against the header downstream.
    pub fn reader_builder(&self) -> csv::ReaderBuilder {
        let mut builder = csv::ReaderBuilder::new();
        builder
            .delimiter(self.delimiter)
            .quote(self.quote)
            .quoting(self.quote_mode.reader_quoting())
            .has_headers(true)
            .flexible(true);
        builder
    }

    /// Writer builder configured for this dialect
    pub fn writer_builder(&self) -> csv::WriterBuilder {
        let mut builder = csv::WriterBuilder::new();
        builder
            .delimiter(self.delimiter)
            .quote(self.quote)
            .quote_style(self.quote_mode.quote_style())
            .has_headers(false);
        builder
    }
}

/// Date-time group handling for the `DateTime` column
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DateConfig {
    /// Separator between year, month and day in the source
    pub source_separator: String,
    /// Replacement separator written to `Event_DTG`
    pub output_separator: String,
    /// strftime-style pattern `Event_DTG` must match
    pub parse_pattern: String,
    /// Trailing characters dropped from `DateTime` before anything else
    pub truncate_chars: usize,
}

/// Null sentinels for the two sinks
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NullValues {
    /// Written to the output file for null fields
    pub db: String,
    /// Written to index documents for null fields; JSON `null` when unset
    pub es: Option<String>,
}

/// Connection parameters for the optional search index sink
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IndexConfig {
    pub host: String,
    pub port: u16,
    pub index_name: String,
    /// Document type tag; empty omits it from bulk actions
    pub doc_type: String,
}

impl IndexConfig {
    /// Base URL of the index service
    pub fn base_url(&self) -> String {
        let host = self.host.trim_end_matches('/');
        if host.starts_with("http://") || host.starts_with("https://") {
            host.to_string()
        } else {
            format!("http://{}:{}", host, self.port)
        }
    }
}

/// Output file naming rule used when no output path is given
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutputNaming {
    /// Folder for the output file; the source file's folder when unset
    pub folder: Option<PathBuf>,
    pub prefix: String,
    pub suffix: String,
    pub extension: String,
}

impl OutputNaming {
    /// File name synthesized from prefix, suffix and extension
    pub fn file_name(&self) -> String {
        format!("{}{}{}", self.prefix, self.suffix, self.extension)
    }
}

/// Fully resolved, immutable run configuration
#[derive(Debug, Clone, Serialize)]
pub struct Config {
    pub source_path: PathBuf,
    pub output_path: PathBuf,
    pub source_dialect: CsvDialect,
    pub output_dialect: CsvDialect,
    pub dates: DateConfig,
    pub nulls: NullValues,
    /// Write a header row before data rows
    pub header_row: bool,
    /// Source rows to consume before stopping (0 = unlimited)
    pub max_rows: u64,
    /// Rows read between flushes and progress lines
    pub flush_rows: u64,
    /// Present when index output is enabled
    pub index: Option<IndexConfig>,
    /// Explicit place table location
    pub places_path: Option<PathBuf>,
    pub show_progress: bool,
}

impl Config {
    /// Resolve command-line arguments into a run configuration
    pub fn from_args(args: &Args) -> Result<Self> {
        let naming = OutputNaming {
            folder: args.out_file_name_folder.clone(),
            prefix: args.out_file_name_prefix.clone(),
            suffix: args.out_file_name_suffix.clone(),
            extension: args.out_file_name_extension.clone(),
        };

        let source_path = normalize_path(&args.src_file_path)?;
        let output_path = normalize_path(&resolve_output_path(
            &args.src_file_path,
            args.out_file_path.as_deref(),
            &naming,
        ))?;

        let flush_rows = args.flush_rows.unsigned_abs();
        if flush_rows == 0 {
            return Err(Error::configuration(
                "Flush rows interval must be greater than 0".to_string(),
            ));
        }

        let index = args.out_elastic_search.is_yes().then(|| IndexConfig {
            host: args.es_host_url.clone(),
            port: args.es_port_number,
            index_name: args.es_index_name.clone(),
            doc_type: args.es_doc_type.clone(),
        });

        if let Some(index) = &index {
            if index.index_name.trim().is_empty() {
                return Err(Error::configuration(
                    "Elasticsearch index name cannot be empty".to_string(),
                ));
            }
        }

        let places_path = args
            .places_file
            .as_deref()
            .map(normalize_path)
            .transpose()?;

        let config = Self {
            source_path,
            output_path,
            source_dialect: CsvDialect::from_cli(
                &args.src_delimiter,
                &args.src_quotechar,
                args.src_quotemode,
            )?,
            output_dialect: CsvDialect::from_cli(
                &args.out_delimiter,
                &args.out_quotechar,
                args.out_quotemode,
            )?,
            dates: DateConfig {
                source_separator: args.src_date_ymd_separator.clone(),
                output_separator: args.out_date_ymd_separator.clone(),
                parse_pattern: args.dtg_parse_pattern.clone(),
                truncate_chars: args.dtg_truncate_chars,
            },
            nulls: NullValues {
                db: args.out_db_null_value.clone(),
                es: args.out_es_null_value.clone(),
            },
            header_row: args.out_header_row.is_yes(),
            max_rows: args.max_rows.unsigned_abs(),
            flush_rows,
            index,
            places_path,
            show_progress: args.show_progress(),
        };

        debug!("Resolved configuration: {:?}", config);
        Ok(config)
    }

    /// Place table path: explicit, or the default under the user data directory
    pub fn resolve_places_path(&self) -> Result<PathBuf> {
        match &self.places_path {
            Some(path) => Ok(path.clone()),
            None => default_places_path().map_err(|e| Error::configuration(format!("{:#}", e))),
        }
    }

    /// Pretty JSON rendering of the configuration for diagnostics
    pub fn to_pretty_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Default place table location under the user data directory
pub fn default_places_path() -> anyhow::Result<PathBuf> {
    let data_dir = dirs::data_dir().context("Could not determine user data directory")?;
    Ok(data_dir.join(DATA_DIR_NAME).join(DEFAULT_PLACES_FILE_NAME))
}

/// Translate a command-line delimiter: the `\t` escape becomes a tab,
/// anything else must be exactly one byte and passes through unchanged
pub fn translate_delimiter(value: &str) -> Result<u8> {
    if value == TAB_ESCAPE {
        return Ok(b'\t');
    }
    single_byte(value, "delimiter")
}

fn single_byte(value: &str, what: &str) -> Result<u8> {
    match value.as_bytes() {
        [byte] => Ok(*byte),
        _ => Err(Error::configuration(format!(
            "The {} must be a single ASCII character, got '{}'",
            what, value
        ))),
    }
}

/// Output path: the explicit path when given, otherwise the naming rule's
/// file name inside the naming folder (or the source file's folder)
pub fn resolve_output_path(
    source_path: &Path,
    output_path: Option<&Path>,
    naming: &OutputNaming,
) -> PathBuf {
    if let Some(path) = output_path {
        return path.to_path_buf();
    }

    let folder = match &naming.folder {
        Some(folder) => folder.clone(),
        None => source_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default(),
    };
    folder.join(naming.file_name())
}

/// Expand a leading `~` to the home directory
pub fn expand_home(path: &Path) -> Result<PathBuf> {
    let mut components = path.components();
    match components.next() {
        Some(Component::Normal(first)) if first == "~" => {
            let home = dirs::home_dir().ok_or_else(|| {
                Error::configuration("Could not determine home directory".to_string())
            })?;
            Ok(home.join(components.as_path()))
        }
        _ => Ok(path.to_path_buf()),
    }
}

/// Expand `~`, make absolute against the working directory, and fold
/// `.`/`..` components lexically
pub fn normalize_path(path: &Path) -> Result<PathBuf> {
    let expanded = expand_home(path)?;
    let absolute = if expanded.is_absolute() {
        expanded
    } else {
        std::env::current_dir()
            .map_err(|e| Error::io("Failed to determine working directory", e))?
            .join(expanded)
    };

    let mut normalized = PathBuf::new();
    for component in absolute.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other.as_os_str()),
        }
    }
    Ok(normalized)
}
