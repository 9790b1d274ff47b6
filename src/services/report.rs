// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Report generation service.
//!
//! Handles the per-subject workflow:
//! 1. Fetch status samples from the source
//! 2. Reduce them to intervals, hour buckets and a peak hour
//! 3. Format the summary
//! 4. Hand it to the sink
//!
//! Batch runs isolate failures: one subject's error never stops the others.

use crate::models::{FormattedReport, ReportWindow, Subject};
use crate::services::formatter::format_report;
use crate::services::reducer::{ActivityReducer, ReduceError};
use crate::services::sink::{DeliveryError, ReportSink};
use crate::services::source::{SourceError, StatusSource};
use futures_util::stream::{self, StreamExt};
use serde::{Deserialize, Serialize};

/// Generates and delivers activity reports.
pub struct ReportService<S, K> {
    source: S,
    sink: K,
    reducer: ActivityReducer,
    concurrency: usize,
}

impl<S, K> ReportService<S, K>
where
    S: StatusSource + Sync,
    K: ReportSink + Sync,
{
    pub fn new(source: S, sink: K) -> Self {
        Self {
            source,
            sink,
            reducer: ActivityReducer::new(),
            concurrency: 4,
        }
    }

    /// Limit how many subjects a batch run processes at once.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    pub fn sink(&self) -> &K {
        &self.sink
    }

    /// Build a subject's report without delivering it.
    pub async fn generate(
        &self,
        subject_id: &str,
        window: &ReportWindow,
    ) -> Result<FormattedReport, ReportError> {
        let samples = self
            .source
            .fetch_samples(subject_id, window)
            .await
            .map_err(|e| ReportError::from_source(subject_id, e))?;

        let summary = self.reducer.reduce(&samples).map_err(|e| match e {
            ReduceError::EmptyDataset => ReportError::EmptyDataset {
                subject: subject_id.to_string(),
                window: window.to_string(),
            },
        })?;

        if summary.skipped_boundaries > 0 {
            tracing::warn!(
                subject = %subject_id,
                window = %window,
                skipped = summary.skipped_boundaries,
                "Report built with non-monotonic boundaries skipped"
            );
        }

        tracing::info!(
            subject = %subject_id,
            window = %window,
            samples = samples.len(),
            intervals = summary.intervals.len(),
            peak_hour = ?summary.peak.hour,
            "Report generated"
        );

        Ok(format_report(subject_id, window, &summary, chrono::Utc::now()))
    }

    /// Generate a subject's report and deliver it.
    pub async fn run(
        &self,
        subject: &Subject,
        window: &ReportWindow,
    ) -> Result<FormattedReport, ReportError> {
        let report = self.generate(&subject.id, window).await?;
        self.sink
            .deliver(subject, &report)
            .await
            .map_err(|source| ReportError::Delivery {
                subject: subject.id.clone(),
                source,
            })?;
        Ok(report)
    }

    /// Run every subject, collecting successes and failures separately.
    pub async fn run_batch(&self, subjects: &[Subject], window: &ReportWindow) -> BatchOutcome {
        tracing::info!(
            subjects = subjects.len(),
            window = %window,
            concurrency = self.concurrency,
            "Starting report batch"
        );

        let results: Vec<(String, Result<FormattedReport, ReportError>)> =
            stream::iter(subjects.iter().cloned())
                .map(|subject| async move {
                    let result = self.run(&subject, window).await;
                    (subject.id, result)
                })
                .buffer_unordered(self.concurrency)
                .collect()
                .await;

        let mut outcome = BatchOutcome::default();
        for (subject, result) in results {
            match result {
                Ok(_) => outcome.delivered.push(subject),
                Err(e) => {
                    tracing::error!(subject = %subject, error = %e, "Report failed");
                    outcome.failed.push(SubjectFailure {
                        subject,
                        kind: e.kind().to_string(),
                        error: e.to_string(),
                    });
                }
            }
        }
        outcome.delivered.sort();
        outcome.failed.sort_by(|a, b| a.subject.cmp(&b.subject));

        tracing::info!(
            delivered = outcome.delivered.len(),
            failed = outcome.failed.len(),
            "Report batch finished"
        );
        outcome
    }
}

/// Result of a batch run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchOutcome {
    pub delivered: Vec<String>,
    pub failed: Vec<SubjectFailure>,
}

/// One subject that failed in a batch run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubjectFailure {
    pub subject: String,
    /// Machine-readable error kind, e.g. "empty_dataset"
    pub kind: String,
    pub error: String,
}

/// Errors generating or delivering one subject's report.
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("No status samples for subject {subject} in window {window}")]
    EmptyDataset { subject: String, window: String },

    #[error("Malformed sample #{index} for subject {subject}: {reason}")]
    MalformedSample {
        subject: String,
        index: usize,
        reason: String,
    },

    #[error("Status source failed for subject {subject}: {source}")]
    Source {
        subject: String,
        #[source]
        source: SourceError,
    },

    #[error("Delivery failed for subject {subject}: {source}")]
    Delivery {
        subject: String,
        #[source]
        source: DeliveryError,
    },
}

impl ReportError {
    fn from_source(subject_id: &str, err: SourceError) -> Self {
        let subject = subject_id.to_string();
        match err {
            SourceError::Malformed { index, source } => ReportError::MalformedSample {
                subject,
                index,
                reason: source.to_string(),
            },
            source => ReportError::Source { subject, source },
        }
    }

    /// Short identifier for the error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            ReportError::EmptyDataset { .. } => "empty_dataset",
            ReportError::MalformedSample { .. } => "malformed_sample",
            ReportError::Source { .. } => "source_error",
            ReportError::Delivery { .. } => "delivery_error",
        }
    }

    pub fn subject(&self) -> &str {
        match self {
            ReportError::EmptyDataset { subject, .. }
            | ReportError::MalformedSample { subject, .. }
            | ReportError::Source { subject, .. }
            | ReportError::Delivery { subject, .. } => subject,
        }
    }
}
