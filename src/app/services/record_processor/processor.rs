//! Main pipeline implementation and read loop orchestration
//!
//! This module contains `GeocodePipeline`, which owns the run state (counters,
//! pending index batch, progress clock) and threads each source row through
//! transformation, location labelling and output.

use crate::app::services::csv_writer::QuakeCsvWriter;
use crate::app::services::field_transformer::{FieldTransformer, TransformOutcome};
use crate::app::services::index_sink::{BatchSink, IndexClient};
use crate::app::services::ncedc_csv_reader::NcedcCsvReader;
use crate::{Error, Result};
use std::io::{Read, Write};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::{
    enrichment::{LocationEnricher, PlaceLookup},
    progress::ProgressReporter,
    stats::RunStats,
};

/// Single-pass reverse geocoding pipeline
///
/// Rows are processed strictly in order, one at a time. Every `flush_rows`
/// rows read, the output is flushed, the pending index batch is submitted and
/// a progress line is emitted. Once `max_rows` rows have been read (0 means no
/// limit) the loop stops, and everything buffered is flushed before returning.
///
/// The cancellation token is checked before every row. A cancelled run flushes
/// the rows already written to the output and returns
/// `Error::ProcessingInterrupted` without submitting the pending index batch.
pub struct GeocodePipeline<L, C> {
    transformer: FieldTransformer,
    enricher: LocationEnricher<L>,
    sink: Option<BatchSink<C>>,
    max_rows: u64,
    flush_rows: u64,
    progress: ProgressReporter,
    cancellation_token: CancellationToken,
}

impl<L: PlaceLookup, C: IndexClient> GeocodePipeline<L, C> {
    /// Create a pipeline without an index sink
    ///
    /// # Arguments
    ///
    /// * `transformer` - Row reshaping rules
    /// * `enricher` - Location labelling over a lookup collaborator
    /// * `max_rows` - Rows to read before stopping, 0 for no limit
    /// * `flush_rows` - Flush and progress cadence in rows read; 0 is treated as 1
    pub fn new(
        transformer: FieldTransformer,
        enricher: LocationEnricher<L>,
        max_rows: u64,
        flush_rows: u64,
    ) -> Self {
        Self {
            transformer,
            enricher,
            sink: None,
            max_rows,
            flush_rows: flush_rows.max(1),
            progress: ProgressReporter::hidden(),
            cancellation_token: CancellationToken::new(),
        }
    }

    /// Also submit every written record to a search index
    pub fn with_sink(mut self, sink: BatchSink<C>) -> Self {
        self.sink = Some(sink);
        self
    }

    pub fn with_progress(mut self, progress: ProgressReporter) -> Self {
        self.progress = progress;
        self
    }

    /// Stop at the next row once `cancellation_token` is cancelled
    pub fn with_cancellation(mut self, cancellation_token: CancellationToken) -> Self {
        self.cancellation_token = cancellation_token;
        self
    }

    pub fn progress(&self) -> &ProgressReporter {
        &self.progress
    }

    /// Run the read loop to completion
    ///
    /// Lookup, write and index failures abort the run immediately, as does
    /// cancellation.
    pub async fn run<R: Read, W: Write>(
        &mut self,
        reader: &mut NcedcCsvReader<R>,
        writer: &mut QuakeCsvWriter<W>,
    ) -> Result<RunStats> {
        let mut stats = RunStats::new();
        info!(
            "Starting reverse geocoding pass (max rows: {}, flush every {} rows)",
            self.max_rows, self.flush_rows
        );
        self.progress.start();

        loop {
            if self.cancellation_token.is_cancelled() {
                writer.flush()?;
                warn!("Run cancelled after {} rows read", stats.rows_read);
                if let Some(sink) = self.sink.as_ref().filter(|sink| sink.pending_len() > 0) {
                    warn!("{} pending index documents not submitted", sink.pending_len());
                }
                return Err(Error::processing_interrupted(format!(
                    "Processing interrupted by user after {} rows read",
                    stats.rows_read
                )));
            }

            let Some(row) = reader.next_record()? else {
                break;
            };
            stats.rows_read += 1;

            match self.transformer.transform(&row) {
                TransformOutcome::Skip(_) => stats.rows_skipped += 1,
                TransformOutcome::Ready(template) => {
                    let enrichment = self.enricher.enrich(template)?;
                    stats.record_lookup(enrichment.status);

                    for record in &enrichment.records {
                        writer.write_record(record)?;
                        stats.rows_written += 1;
                        if let Some(sink) = self.sink.as_mut() {
                            sink.push(record);
                        }
                    }
                }
            }

            if self.max_rows > 0 && stats.rows_read >= self.max_rows {
                debug!("Row limit of {} reached", self.max_rows);
                break;
            }

            if stats.rows_read % self.flush_rows == 0 {
                self.flush(writer, &mut stats).await?;
                self.progress.report(stats.rows_read);
                tokio::task::yield_now().await;
            }
        }

        self.flush(writer, &mut stats).await?;
        stats.elapsed = self.progress.elapsed();
        self.progress.finish(stats.rows_read);

        if let Some(sink) = self.sink.as_ref() {
            info!(
                "Indexed {} documents in {} bulk requests",
                sink.documents_submitted(),
                sink.batches_submitted()
            );
        }
        info!("{}", stats.summary());
        Ok(stats)
    }

    async fn flush<W: Write>(
        &mut self,
        writer: &mut QuakeCsvWriter<W>,
        stats: &mut RunStats,
    ) -> Result<()> {
        writer.flush()?;
        if let Some(sink) = self.sink.as_mut() {
            stats.documents_indexed += sink.flush().await? as u64;
        }
        Ok(())
    }
}
