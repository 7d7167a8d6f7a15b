//! Tests for the record processing pipeline
//!
//! Shared fixtures: a scripted lookup that answers from a fixed table and an
//! in-memory harness that runs the whole pipeline over CSV text.

pub mod enrichment_tests;

use crate::app::models::PlaceLabels;
use crate::app::services::csv_writer::QuakeCsvWriter;
use crate::app::services::field_transformer::{FieldTransformer, OutputSchema};
use crate::app::services::index_sink::tests::RecordingClient;
use crate::app::services::ncedc_csv_reader::NcedcCsvReader;
use crate::app::services::record_processor::{
    GeocodePipeline, LocationEnricher, PlaceLookup, RunStats,
};
use crate::app::services::index_sink::BatchSink;
use crate::config::{CsvDialect, DateConfig};
use crate::{Error, Result};
use std::cell::RefCell;
use tokio_util::sync::CancellationToken;

/// NCEDC source header
pub const NCEDC_HEADER: &str =
    "DateTime,Latitude,Longitude,Depth,Magnitude,MagType,NbStations,Gap,Distance,RMS,Source,EventID";

/// Lookup answering from a fixed coordinate table
#[derive(Debug, Default)]
pub struct ScriptedLookup {
    answers: Vec<((f64, f64), Vec<PlaceLabels>)>,
    pub calls: RefCell<Vec<(f64, f64)>>,
    fail: bool,
}

impl ScriptedLookup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn answer(mut self, latitude: f64, longitude: f64, labels: Vec<PlaceLabels>) -> Self {
        self.answers.push(((latitude, longitude), labels));
        self
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }
}

impl PlaceLookup for ScriptedLookup {
    fn lookup(&self, latitude: f64, longitude: f64) -> Result<Vec<PlaceLabels>> {
        self.calls.borrow_mut().push((latitude, longitude));
        if self.fail {
            return Err(Error::place_registry("lookup backend unavailable"));
        }
        Ok(self
            .answers
            .iter()
            .find(|((lat, lon), _)| *lat == latitude && *lon == longitude)
            .map(|(_, labels)| labels.clone())
            .unwrap_or_default())
    }
}

/// The usual single-match answer
pub fn somewhere() -> PlaceLabels {
    PlaceLabels::new("US", "California", "", "Somewhere")
}

pub fn ncedc_dates() -> DateConfig {
    DateConfig {
        source_separator: "/".to_string(),
        output_separator: "-".to_string(),
        parse_pattern: "%Y-%m-%d %H:%M:%S".to_string(),
        truncate_chars: 3,
    }
}

/// Source text with the NCEDC header and the given data lines
pub fn source(lines: &[&str]) -> String {
    let mut text = format!("{}\n", NCEDC_HEADER);
    for line in lines {
        text.push_str(line);
        text.push('\n');
    }
    text
}

/// One NCEDC data line at the given coordinates
pub fn event_line(date_time: &str, latitude: &str, longitude: &str, event_id: u32) -> String {
    format!(
        "{},{},{},,3.2,Md,12,85,abc,0.05,NC,{}",
        date_time, latitude, longitude, event_id
    )
}

/// Harness settings
#[derive(Debug, Clone, Copy)]
pub struct Settings {
    pub max_rows: u64,
    pub flush_rows: u64,
    pub header_row: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            max_rows: 0,
            flush_rows: 1000,
            header_row: true,
        }
    }
}

/// Everything a pipeline run produced
#[derive(Debug)]
pub struct RunOutput {
    pub stats: RunStats,
    pub csv: String,
    pub progress_lines: usize,
}

impl RunOutput {
    pub fn lines(&self) -> Vec<&str> {
        self.csv.lines().collect()
    }
}

/// Run the pipeline over CSV text, optionally indexing into `client`
pub async fn run_pipeline<L: PlaceLookup>(
    text: &str,
    lookup: L,
    client: Option<&RecordingClient>,
    settings: Settings,
) -> Result<RunOutput> {
    let dialect = CsvDialect::default();
    let mut reader = NcedcCsvReader::from_reader(text.as_bytes(), &dialect, "memory")?;
    let schema = OutputSchema::from_source_headers(reader.headers())?;
    let mut writer =
        QuakeCsvWriter::from_writer(Vec::new(), &dialect, schema, settings.header_row, "NULL", "memory")?;

    let mut pipeline = GeocodePipeline::new(
        FieldTransformer::new(ncedc_dates()),
        LocationEnricher::new(lookup),
        settings.max_rows,
        settings.flush_rows,
    );
    if let Some(client) = client {
        pipeline = pipeline.with_sink(BatchSink::new(client, "quakes", "quake", None));
    }

    let stats = pipeline.run(&mut reader, &mut writer).await?;
    let progress_lines = pipeline.progress().lines_emitted();
    let bytes = writer.into_inner()?;

    Ok(RunOutput {
        stats,
        csv: String::from_utf8(bytes).unwrap(),
        progress_lines,
    })
}

/// Run the pipeline under a cancellation token without an index sink
///
/// Returns the run result together with whatever reached the output, so
/// interrupted runs can be inspected too.
pub async fn run_cancellable<L: PlaceLookup>(
    text: &str,
    lookup: L,
    settings: Settings,
    cancellation_token: CancellationToken,
) -> (Result<RunStats>, String) {
    let dialect = CsvDialect::default();
    let mut reader = NcedcCsvReader::from_reader(text.as_bytes(), &dialect, "memory").unwrap();
    let schema = OutputSchema::from_source_headers(reader.headers()).unwrap();
    let mut writer =
        QuakeCsvWriter::from_writer(Vec::new(), &dialect, schema, settings.header_row, "NULL", "memory")
            .unwrap();

    let mut pipeline: GeocodePipeline<L, RecordingClient> = GeocodePipeline::new(
        FieldTransformer::new(ncedc_dates()),
        LocationEnricher::new(lookup),
        settings.max_rows,
        settings.flush_rows,
    )
    .with_cancellation(cancellation_token);

    let result = pipeline.run(&mut reader, &mut writer).await;
    let bytes = writer.into_inner().unwrap();
    (result, String::from_utf8(bytes).unwrap())
}
