// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Status data sources.
//!
//! A source returns every sample it holds for a subject inside a window, in
//! whatever order it stores them.

use crate::config::Config;
use crate::models::{ReportWindow, SampleError, StatusDocument, StatusSample};
use chrono::{FixedOffset, Offset};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::future::Future;
use std::time::Duration;

/// Supplies status samples for a subject and window.
pub trait StatusSource {
    fn fetch_samples(
        &self,
        subject_id: &str,
        window: &ReportWindow,
    ) -> impl Future<Output = Result<Vec<StatusSample>, SourceError>> + Send;
}

/// Validate raw documents, reporting the position of the first bad one.
pub fn decode_documents(
    documents: Vec<StatusDocument>,
    offset: FixedOffset,
) -> Result<Vec<StatusSample>, SourceError> {
    documents
        .into_iter()
        .enumerate()
        .map(|(index, doc)| {
            doc.into_sample(offset)
                .map_err(|source| SourceError::Malformed { index, source })
        })
        .collect()
}

// ─── Document store ──────────────────────────────────────────

/// Client for the status document store.
///
/// Requests are JSON objects carrying an `action`; `get_document` answers with
/// `{"documents": [...]}`.
#[derive(Clone)]
pub struct DocumentStoreClient {
    http: reqwest::Client,
    endpoint: String,
    offset: FixedOffset,
}

#[derive(Debug, Serialize)]
struct GetDocumentRequest<'a> {
    action: &'static str,
    username: &'a str,
    creation_date_start: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    creation_date_end: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GetDocumentResponse {
    #[serde(default)]
    documents: Vec<StatusDocument>,
    #[serde(default)]
    error: Option<String>,
}

const STORE_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

impl DocumentStoreClient {
    /// Create a client for `endpoint` whose timestamps are read at `offset`.
    pub fn new(
        endpoint: impl Into<String>,
        timeout: Duration,
        offset: FixedOffset,
    ) -> Result<Self, SourceError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SourceError::Transport(e.to_string()))?;
        Ok(Self {
            http,
            endpoint: endpoint.into(),
            offset,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, SourceError> {
        Self::new(
            config.document_store_url.clone(),
            config.source_timeout,
            config.utc_offset,
        )
    }
}

impl StatusSource for DocumentStoreClient {
    async fn fetch_samples(
        &self,
        subject_id: &str,
        window: &ReportWindow,
    ) -> Result<Vec<StatusSample>, SourceError> {
        let request = GetDocumentRequest {
            action: "get_document",
            username: subject_id,
            creation_date_start: window.start.format(STORE_DATE_FORMAT).to_string(),
            creation_date_end: window
                .end
                .map(|end| end.format(STORE_DATE_FORMAT).to_string()),
        };

        let started = std::time::Instant::now();
        let response = self
            .http
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await
            .map_err(|e| SourceError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(SourceError::Rejected { status, body });
        }

        let body: GetDocumentResponse = response
            .json()
            .await
            .map_err(|e| SourceError::Decode(e.to_string()))?;

        if let Some(error) = body.error {
            return Err(SourceError::Rejected { status: 200, body: error });
        }

        tracing::debug!(
            subject = %subject_id,
            documents = body.documents.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Fetched status documents"
        );

        decode_documents(body.documents, self.offset)
    }
}

// ─── In-memory ───────────────────────────────────────────────

/// Source backed by documents held in memory.
///
/// Documents are validated on every fetch, so malformed entries surface the
/// same way they would from the document store.
#[derive(Debug, Clone)]
pub struct InMemorySource {
    documents: HashMap<String, Vec<StatusDocument>>,
    offset: FixedOffset,
}

impl Default for InMemorySource {
    fn default() -> Self {
        Self::new(chrono::Utc.fix())
    }
}

impl InMemorySource {
    pub fn new(offset: FixedOffset) -> Self {
        Self {
            documents: HashMap::new(),
            offset,
        }
    }

    /// Add typed samples for a subject.
    pub fn with_samples(mut self, subject_id: &str, samples: &[StatusSample]) -> Self {
        self.documents
            .entry(subject_id.to_string())
            .or_default()
            .extend(samples.iter().map(StatusDocument::from_sample));
        self
    }

    /// Add raw documents for a subject.
    pub fn with_documents(mut self, subject_id: &str, documents: Vec<StatusDocument>) -> Self {
        self.documents
            .entry(subject_id.to_string())
            .or_default()
            .extend(documents);
        self
    }
}

impl StatusSource for InMemorySource {
    async fn fetch_samples(
        &self,
        subject_id: &str,
        window: &ReportWindow,
    ) -> Result<Vec<StatusSample>, SourceError> {
        let documents = self.documents.get(subject_id).cloned().unwrap_or_default();
        let samples = decode_documents(documents, self.offset)?;
        Ok(samples
            .into_iter()
            .filter(|s| window.contains(s.timestamp))
            .collect())
    }
}

/// Errors from a status source.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("Document store request failed: {0}")]
    Transport(String),

    #[error("Document store rejected request (HTTP {status}): {body}")]
    Rejected { status: u16, body: String },

    #[error("Failed to decode document store response: {0}")]
    Decode(String),

    #[error("Malformed sample #{index}: {source}")]
    Malformed {
        index: usize,
        #[source]
        source: SampleError,
    },
}
