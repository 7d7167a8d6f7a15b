//! Output writer for enriched event records
//!
//! Quoting follows the configured mode with two refinements the csv crate does
//! not provide on its own:
//!
//! - `QUOTE_NONNUMERIC` quotes by value type, not by text: every text value,
//!   null sentinel and header name is quoted, integers and floats are not.
//! - `QUOTE_NONE` refuses a row with a value holding the delimiter, the quote
//!   character or a line break, since it cannot be written unambiguously.

use crate::app::models::{EnrichedRecord, FieldValue};
use crate::app::services::field_transformer::OutputSchema;
use crate::config::{CsvDialect, QuoteMode};
use crate::{Error, Result};
use std::fs::File;
use std::io::Write;
use std::path::Path;
use tracing::debug;

/// Writes enriched records as delimited rows
pub struct QuakeCsvWriter<W: Write> {
    writer: csv::Writer<W>,
    dialect: CsvDialect,
    schema: OutputSchema,
    null_value: String,
    file_label: String,
    rows_written: u64,
}

impl QuakeCsvWriter<File> {
    /// Create (or truncate) the output file and write the header if enabled
    pub fn create(
        path: &Path,
        dialect: &CsvDialect,
        schema: OutputSchema,
        header_row: bool,
        null_value: impl Into<String>,
    ) -> Result<Self> {
        let file = File::create(path)
            .map_err(|e| Error::io(format!("Failed to create output file {}", path.display()), e))?;
        Self::from_writer(
            file,
            dialect,
            schema,
            header_row,
            null_value,
            path.display().to_string(),
        )
    }
}

impl<W: Write> QuakeCsvWriter<W> {
    /// Wrap any byte sink
    pub fn from_writer(
        destination: W,
        dialect: &CsvDialect,
        schema: OutputSchema,
        header_row: bool,
        null_value: impl Into<String>,
        file_label: impl Into<String>,
    ) -> Result<Self> {
        let mut writer = Self {
            writer: dialect.writer_builder().from_writer(destination),
            dialect: *dialect,
            schema,
            null_value: null_value.into(),
            file_label: file_label.into(),
            rows_written: 0,
        };

        if header_row {
            let header: Vec<String> = writer
                .schema
                .fields()
                .iter()
                .map(|name| writer.quote_text(name))
                .collect();
            writer.check_unquoted(&header)?;
            writer
                .writer
                .write_record(&header)
                .map_err(|e| writer.csv_error("Failed to write header row", e))?;
            debug!("Header written to {}", writer.file_label);
        }

        Ok(writer)
    }

    /// Write one record in schema order, rendering nulls as the db sentinel
    ///
    /// Fields the schema names but the record lacks are written empty.
    pub fn write_record(&mut self, record: &EnrichedRecord) -> Result<()> {
        let row: Vec<String> = self
            .schema
            .fields()
            .iter()
            .map(|name| self.cell(record.get(name)))
            .collect();
        self.check_unquoted(&row)?;
        self.writer
            .write_record(&row)
            .map_err(|e| self.csv_error("Failed to write row", e))?;
        self.rows_written += 1;
        Ok(())
    }

    /// Push buffered rows through to the underlying sink
    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush().map_err(|e| {
            Error::io(format!("Failed to flush output file {}", self.file_label), e)
        })
    }

    pub fn rows_written(&self) -> u64 {
        self.rows_written
    }

    pub fn schema(&self) -> &OutputSchema {
        &self.schema
    }

    /// Flush and return the underlying sink
    pub fn into_inner(self) -> Result<W> {
        let label = self.file_label;
        self.writer.into_inner().map_err(|e| {
            Error::io(
                format!("Failed to flush output file {}", label),
                e.into_error(),
            )
        })
    }

    /// Render one value, adding quotes by type under `QUOTE_NONNUMERIC`
    fn cell(&self, value: Option<&FieldValue>) -> String {
        match value {
            Some(value @ (FieldValue::Integer(_) | FieldValue::Float(_))) => {
                value.render(&self.null_value)
            }
            Some(value) => self.quote_text(&value.render(&self.null_value)),
            None => self.quote_text(""),
        }
    }

    fn quote_text(&self, text: &str) -> String {
        if self.dialect.quote_mode != QuoteMode::NonNumeric {
            return text.to_string();
        }
        let quote = char::from(self.dialect.quote);
        let doubled = format!("{quote}{quote}");
        format!("{quote}{}{quote}", text.replace(quote, &doubled))
    }

    fn check_unquoted(&self, row: &[String]) -> Result<()> {
        if self.dialect.quote_mode != QuoteMode::None {
            return Ok(());
        }
        let needs_escape = |byte: &u8| {
            *byte == self.dialect.delimiter
                || *byte == self.dialect.quote
                || *byte == b'\n'
                || *byte == b'\r'
        };
        match row.iter().find(|value| value.as_bytes().iter().any(&needs_escape)) {
            Some(value) => Err(Error::csv_parsing(
                self.file_label.clone(),
                format!(
                    "Value {:?} needs quoting but the output quote mode is QUOTE_NONE",
                    value
                ),
                None,
            )),
            None => Ok(()),
        }
    }

    fn csv_error(&self, message: &str, error: csv::Error) -> Error {
        Error::csv_parsing(self.file_label.clone(), message, Some(error))
    }
}
