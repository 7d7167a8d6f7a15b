//! Elasticsearch transport over HTTP

use super::{IndexClient, IndexDocument};
use crate::config::IndexConfig;
use crate::constants::{ES_REQUEST_TIMEOUT_SECS, PROGRAM_NAME};
use crate::{Error, Result};
use reqwest::StatusCode;
use serde_json::{Value, json};
use std::time::Duration;
use tracing::{debug, info};

/// Elasticsearch bulk client
#[derive(Debug, Clone)]
pub struct ElasticClient {
    http: reqwest::Client,
    base_url: String,
}

impl ElasticClient {
    /// Build a client for the configured host and port
    pub fn new(config: &IndexConfig) -> Result<Self> {
        Self::with_base_url(config.base_url())
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(format!("{}/{}", PROGRAM_NAME, env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(ES_REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| Error::http("Failed to create HTTP client", e))?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Fetch the cluster info document
    pub async fn ping(&self) -> Result<Value> {
        let response = self
            .http
            .get(&self.base_url)
            .send()
            .await
            .map_err(|e| Error::http(format!("Index service unreachable at {}", self.base_url), e))?;

        if !response.status().is_success() {
            return Err(Error::index_sink(format!(
                "Index service at {} answered with status: {}",
                self.base_url,
                response.status()
            )));
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| Error::http("Failed to read index service info", e))
    }
}

impl IndexClient for ElasticClient {
    async fn ensure_index_absent(&self, index_name: &str) -> Result<()> {
        let info = self.ping().await?;
        debug!("Index service info: {}", info);

        let response = self
            .http
            .delete(self.url(index_name))
            .send()
            .await
            .map_err(|e| Error::http(format!("Failed to delete index '{}'", index_name), e))?;

        match response.status() {
            status if status.is_success() => {
                info!("Deleted existing index '{}'", index_name);
                Ok(())
            }
            StatusCode::NOT_FOUND | StatusCode::BAD_REQUEST => {
                debug!("Index '{}' not present, nothing to delete", index_name);
                Ok(())
            }
            status => Err(Error::index_sink(format!(
                "Deleting index '{}' failed with status: {}",
                index_name, status
            ))),
        }
    }

    async fn submit_batch(
        &self,
        index_name: &str,
        doc_type: &str,
        documents: &[IndexDocument],
    ) -> Result<usize> {
        let body = bulk_body(index_name, doc_type, documents)?;

        let response = self
            .http
            .post(self.url("_bulk"))
            .header(reqwest::header::CONTENT_TYPE, "application/x-ndjson")
            .body(body)
            .send()
            .await
            .map_err(|e| Error::http("Bulk request failed", e))?;

        let status = response.status();
        let reply: Value = response
            .json()
            .await
            .map_err(|e| Error::http("Failed to read bulk response", e))?;

        if !status.is_success() {
            return Err(Error::index_sink(format!(
                "Bulk request to '{}' failed with status {}: {}",
                index_name, status, reply
            )));
        }

        check_bulk_reply(&reply, documents.len())
    }
}

/// Render the NDJSON body of a bulk request
///
/// Each document contributes an action line and a source line; an empty
/// `doc_type` omits `_type` from the action.
pub fn bulk_body(index_name: &str, doc_type: &str, documents: &[IndexDocument]) -> Result<String> {
    let mut body = String::new();
    for document in documents {
        let mut action = json!({ "_index": index_name, "_id": document.id });
        if !doc_type.is_empty() {
            action["_type"] = Value::String(doc_type.to_string());
        }

        body.push_str(&serde_json::to_string(&json!({ "index": action }))?);
        body.push('\n');
        body.push_str(&serde_json::to_string(&document.source)?);
        body.push('\n');
    }
    Ok(body)
}

/// Turn a bulk reply into an accepted count, failing on item errors
pub fn check_bulk_reply(reply: &Value, submitted: usize) -> Result<usize> {
    if reply.get("errors").and_then(Value::as_bool) != Some(true) {
        return Ok(submitted);
    }

    let failures: Vec<String> = reply
        .get("items")
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(|item| item.get("index"))
                .filter_map(|result| result.get("error").map(|error| (result, error)))
                .map(|(result, error)| format!("id {}: {}", result.get("_id").unwrap_or(&Value::Null), error))
                .collect()
        })
        .unwrap_or_default();

    Err(Error::index_sink(format!(
        "{} of {} documents rejected{}",
        failures.len(),
        submitted,
        failures
            .first()
            .map(|first| format!(" (first: {})", first))
            .unwrap_or_default()
    )))
}
