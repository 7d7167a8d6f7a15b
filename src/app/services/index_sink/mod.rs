//! Search index batch sink
//!
//! When index output is enabled every written record is also buffered as a
//! JSON document and submitted to the index in bulk. The transport lives
//! behind the [`IndexClient`] capability so the pipeline can be driven against
//! a recording client in tests and against Elasticsearch in production.
//!
//! Document ids come from one counter starting at 1 that runs across the whole
//! run, not per batch.

use crate::Result;
use crate::app::models::EnrichedRecord;
use serde_json::{Map, Value};
use tracing::debug;

pub mod elastic;

#[cfg(test)]
pub mod tests;

pub use elastic::ElasticClient;

/// One document queued for bulk submission
#[derive(Debug, Clone, PartialEq)]
pub struct IndexDocument {
    /// Sequential document id
    pub id: u64,
    /// Document body
    pub source: Map<String, Value>,
}

/// Bulk index transport
#[allow(async_fn_in_trait)]
pub trait IndexClient {
    /// Check the service is reachable and drop any existing index of this name
    ///
    /// A missing index is not an error.
    async fn ensure_index_absent(&self, index_name: &str) -> Result<()>;

    /// Submit a batch of documents in one bulk request
    ///
    /// Returns the number of documents accepted.
    async fn submit_batch(
        &self,
        index_name: &str,
        doc_type: &str,
        documents: &[IndexDocument],
    ) -> Result<usize>;
}

impl<C: IndexClient + ?Sized> IndexClient for &C {
    async fn ensure_index_absent(&self, index_name: &str) -> Result<()> {
        (**self).ensure_index_absent(index_name).await
    }

    async fn submit_batch(
        &self,
        index_name: &str,
        doc_type: &str,
        documents: &[IndexDocument],
    ) -> Result<usize> {
        (**self).submit_batch(index_name, doc_type, documents).await
    }
}

/// Buffers documents and submits them in batches
#[derive(Debug)]
pub struct BatchSink<C> {
    client: C,
    index_name: String,
    doc_type: String,
    null_value: Option<String>,
    pending: Vec<IndexDocument>,
    next_id: u64,
    documents_submitted: u64,
    batches_submitted: u64,
}

impl<C: IndexClient> BatchSink<C> {
    pub fn new(
        client: C,
        index_name: impl Into<String>,
        doc_type: impl Into<String>,
        null_value: Option<String>,
    ) -> Self {
        Self {
            client,
            index_name: index_name.into(),
            doc_type: doc_type.into(),
            null_value,
            pending: Vec::new(),
            next_id: 1,
            documents_submitted: 0,
            batches_submitted: 0,
        }
    }

    /// Drop any existing index before the run starts
    pub async fn prepare(&self) -> Result<()> {
        self.client.ensure_index_absent(&self.index_name).await
    }

    /// Queue a record as the next document
    pub fn push(&mut self, record: &EnrichedRecord) {
        let document = IndexDocument {
            id: self.next_id,
            source: record.to_document(self.null_value.as_deref()),
        };
        self.next_id += 1;
        self.pending.push(document);
    }

    /// Submit everything queued so far; a no-op when nothing is pending
    pub async fn flush(&mut self) -> Result<usize> {
        if self.pending.is_empty() {
            return Ok(0);
        }

        let accepted = self
            .client
            .submit_batch(&self.index_name, &self.doc_type, &self.pending)
            .await?;
        debug!(
            "Submitted batch of {} documents to index '{}'",
            self.pending.len(),
            self.index_name
        );

        self.documents_submitted += self.pending.len() as u64;
        self.batches_submitted += 1;
        self.pending.clear();
        Ok(accepted)
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    pub fn documents_submitted(&self) -> u64 {
        self.documents_submitted
    }

    pub fn batches_submitted(&self) -> u64 {
        self.batches_submitted
    }
}
