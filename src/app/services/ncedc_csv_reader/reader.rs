//! Record reader over a configurable CSV dialect

use crate::app::models::RawRecord;
use crate::config::CsvDialect;
use crate::constants::columns;
use crate::{Error, Result};
use csv::StringRecord;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::debug;

/// Streams source rows as ordered field-name to value mappings
pub struct NcedcCsvReader<R: Read> {
    reader: csv::Reader<R>,
    headers: Vec<String>,
    file_label: String,
    record: StringRecord,
}

impl NcedcCsvReader<File> {
    /// Open a source file and read its header row
    ///
    /// # Errors
    /// * `Error::Io` if the file cannot be opened
    /// * `Error::CsvParsing` if the header row cannot be read
    /// * `Error::MissingColumn` if the header lacks `DateTime`
    pub fn open(path: &Path, dialect: &CsvDialect) -> Result<Self> {
        let file = File::open(path)
            .map_err(|e| Error::io(format!("Failed to open {}", path.display()), e))?;
        Self::from_reader(file, dialect, path.display().to_string())
    }
}

impl<R: Read> NcedcCsvReader<R> {
    /// Wrap any byte source; `file_label` is used in error messages
    pub fn from_reader(source: R, dialect: &CsvDialect, file_label: impl Into<String>) -> Result<Self> {
        let file_label = file_label.into();
        let mut reader = dialect.reader_builder().from_reader(source);

        let headers: Vec<String> = reader
            .headers()
            .map_err(|e| {
                Error::csv_parsing(&file_label, "Failed to read header row", Some(e))
            })?
            .iter()
            .map(str::to_string)
            .collect();

        if !headers.iter().any(|h| h == columns::DATE_TIME) {
            return Err(Error::missing_column(&file_label, columns::DATE_TIME));
        }

        debug!("Source header for {}: {:?}", file_label, headers);

        Ok(Self {
            reader,
            headers,
            file_label,
            record: StringRecord::new(),
        })
    }

    /// Source column names in file order
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Read the next data row, or `None` at end of input
    ///
    /// Short rows are padded with empty values; fields beyond the header
    /// are ignored.
    pub fn next_record(&mut self) -> Result<Option<RawRecord>> {
        let has_record = self.reader.read_record(&mut self.record).map_err(|e| {
            let line = e.position().map(|p| p.line()).unwrap_or_default();
            Error::csv_parsing(
                &self.file_label,
                format!("Failed to read record near line {}", line),
                Some(e),
            )
        })?;

        if !has_record {
            return Ok(None);
        }

        let record = self
            .headers
            .iter()
            .enumerate()
            .map(|(index, name)| {
                let value = self.record.get(index).unwrap_or_default();
                (name.clone(), value.to_string())
            })
            .collect();

        Ok(Some(record))
    }
}

impl<R: Read> Iterator for NcedcCsvReader<R> {
    type Item = Result<RawRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_record().transpose()
    }
}
