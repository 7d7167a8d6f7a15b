//! Tests for the index sink module
//!
//! A recording client stands in for the search index so batching, id
//! assignment and document shape can be checked without a network.

pub mod elastic_tests;

use crate::app::models::{EnrichedRecord, FieldValue, PlaceLabels};
use crate::app::services::index_sink::{IndexClient, IndexDocument};
use crate::{Error, Result};
use std::cell::RefCell;

/// One bulk submission seen by the recording client
#[derive(Debug, Clone)]
pub struct RecordedBatch {
    pub index_name: String,
    pub doc_type: String,
    pub documents: Vec<IndexDocument>,
}

/// Index client that records every call
#[derive(Debug, Default)]
pub struct RecordingClient {
    pub dropped_indices: RefCell<Vec<String>>,
    pub batches: RefCell<Vec<RecordedBatch>>,
    pub fail_submissions: bool,
}

impl RecordingClient {
    pub fn failing() -> Self {
        Self {
            fail_submissions: true,
            ..Self::default()
        }
    }

    pub fn document_ids(&self) -> Vec<u64> {
        self.batches
            .borrow()
            .iter()
            .flat_map(|batch| batch.documents.iter().map(|d| d.id))
            .collect()
    }
}

impl IndexClient for RecordingClient {
    async fn ensure_index_absent(&self, index_name: &str) -> Result<()> {
        self.dropped_indices.borrow_mut().push(index_name.to_string());
        Ok(())
    }

    async fn submit_batch(
        &self,
        index_name: &str,
        doc_type: &str,
        documents: &[IndexDocument],
    ) -> Result<usize> {
        if self.fail_submissions {
            return Err(Error::index_sink("bulk rejected"));
        }
        self.batches.borrow_mut().push(RecordedBatch {
            index_name: index_name.to_string(),
            doc_type: doc_type.to_string(),
            documents: documents.to_vec(),
        });
        Ok(documents.len())
    }
}

/// A small enriched record with one null field
pub fn sample_record(magnitude: f64) -> EnrichedRecord {
    let mut record = EnrichedRecord::new();
    record.insert("Event_DTG", FieldValue::Text("2016-01-02 03:04:05".to_string()));
    record.insert("Depth", FieldValue::Null);
    record.insert("Magnitude", FieldValue::Float(magnitude));
    record.insert("NbStations", FieldValue::Integer(12));
    record.with_labels(&PlaceLabels::new("US", "California", "", "Somewhere"))
}
