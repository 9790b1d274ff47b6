// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Report sinks: where finished reports go.
//!
//! Handles:
//! - Telegram delivery (Bot API `sendMessage`)
//! - JSON file export
//! - Fan-out to whichever of those are configured

use crate::config::Config;
use crate::models::{FormattedReport, Subject};
use crate::services::formatter::render_text;
use std::future::Future;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

/// Telegram rejects messages longer than this many characters.
const TELEGRAM_MESSAGE_LIMIT: usize = 4096;

/// Accepts a finished report for a subject.
pub trait ReportSink {
    fn deliver(
        &self,
        subject: &Subject,
        report: &FormattedReport,
    ) -> impl Future<Output = Result<(), DeliveryError>> + Send;
}

// ─── Telegram ────────────────────────────────────────────────

/// Sends reports as text messages through a Telegram bot.
#[derive(Clone)]
pub struct TelegramSink {
    http: reqwest::Client,
    api_url: String,
    token: String,
}

impl TelegramSink {
    pub fn new(api_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_url: api_url.into().trim_end_matches('/').to_string(),
            token: token.into(),
        }
    }

    /// Send one message to a chat.
    pub async fn send_message(&self, chat_id: i64, text: &str) -> Result<(), DeliveryError> {
        let url = format!("{}/bot{}/sendMessage", self.api_url, self.token);
        let body = serde_json::json!({
            "chat_id": chat_id,
            "text": text,
        });

        let response = self
            .http
            .post(&url)
            .json(&body)
            .send()
            .await
            // reqwest errors include the URL, which carries the token
            .map_err(|e| DeliveryError::Transport(e.without_url().to_string()))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            if status == 429 {
                tracing::warn!(chat_id, "Telegram rate limit hit (429)");
            }
            return Err(DeliveryError::Rejected { status, body });
        }

        Ok(())
    }
}

impl ReportSink for TelegramSink {
    async fn deliver(
        &self,
        subject: &Subject,
        report: &FormattedReport,
    ) -> Result<(), DeliveryError> {
        let chat_id = subject
            .chat_id
            .ok_or_else(|| DeliveryError::MissingChatId(subject.id.clone()))?;

        let text = render_text(report);
        for chunk in split_message(&text, TELEGRAM_MESSAGE_LIMIT) {
            self.send_message(chat_id, &chunk).await?;
        }

        tracing::info!(subject = %subject.id, chat_id, "Report sent via Telegram");
        Ok(())
    }
}

/// Split text into chunks of at most `limit` characters, breaking at line
/// ends where possible.
pub fn split_message(text: &str, limit: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for line in text.split_inclusive('\n') {
        let line_len = line.chars().count();
        if current_len + line_len > limit && !current.is_empty() {
            chunks.push(std::mem::take(&mut current));
            current_len = 0;
        }
        if line_len > limit {
            // A single overlong line is hard-split
            let chars: Vec<char> = line.chars().collect();
            for piece in chars.chunks(limit) {
                chunks.push(piece.iter().collect());
            }
            continue;
        }
        current.push_str(line);
        current_len += line_len;
    }
    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}

// ─── File export ─────────────────────────────────────────────

/// Writes each report as pretty-printed JSON to `<dir>/<subject>.json`.
#[derive(Debug, Clone)]
pub struct FileSink {
    dir: PathBuf,
}

impl FileSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Path a subject's report is written to.
    pub fn report_path(&self, subject_id: &str) -> PathBuf {
        self.dir.join(format!("{}.json", sanitize_file_stem(subject_id)))
    }
}

impl ReportSink for FileSink {
    async fn deliver(
        &self,
        subject: &Subject,
        report: &FormattedReport,
    ) -> Result<(), DeliveryError> {
        let json = serde_json::to_vec_pretty(report)
            .map_err(|e| DeliveryError::Encode(e.to_string()))?;

        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| DeliveryError::Io(e.to_string()))?;

        let path = self.report_path(&subject.id);
        tokio::fs::write(&path, json)
            .await
            .map_err(|e| DeliveryError::Io(e.to_string()))?;

        tracing::info!(subject = %subject.id, path = %path.display(), "Report saved");
        Ok(())
    }
}

/// Keep ASCII alphanumerics, `-`, `_` and `.`; replace everything else.
fn sanitize_file_stem(subject_id: &str) -> String {
    let stem: String = subject_id
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.') {
                c
            } else {
                '_'
            }
        })
        .collect();
    if stem.trim_matches('.').is_empty() {
        "_".to_string()
    } else {
        stem
    }
}

// ─── Fan-out ─────────────────────────────────────────────────

/// Delivers to every sink enabled in [`Config`].
#[derive(Clone, Default)]
pub struct ConfiguredSink {
    telegram: Option<TelegramSink>,
    file: Option<FileSink>,
}

impl ConfiguredSink {
    pub fn new(telegram: Option<TelegramSink>, file: Option<FileSink>) -> Self {
        Self { telegram, file }
    }

    pub fn from_config(config: &Config) -> Self {
        let telegram = config
            .telegram_bot_token
            .as_ref()
            .map(|token| TelegramSink::new(config.telegram_api_url.clone(), token.clone()));
        let file = config.report_output_dir.clone().map(FileSink::new);
        Self { telegram, file }
    }

    pub fn is_empty(&self) -> bool {
        self.telegram.is_none() && self.file.is_none()
    }
}

impl ReportSink for ConfiguredSink {
    async fn deliver(
        &self,
        subject: &Subject,
        report: &FormattedReport,
    ) -> Result<(), DeliveryError> {
        if self.is_empty() {
            tracing::info!(subject = %subject.id, "No report sinks configured; skipping delivery");
            return Ok(());
        }

        // File export first so a Telegram failure still leaves a copy on disk
        if let Some(file) = &self.file {
            file.deliver(subject, report).await?;
        }
        if let Some(telegram) = &self.telegram {
            telegram.deliver(subject, report).await?;
        }
        Ok(())
    }
}

// ─── In-memory ───────────────────────────────────────────────

/// Records deliveries in memory.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    delivered: Arc<Mutex<Vec<(String, FormattedReport)>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reports delivered so far, in delivery order.
    pub fn delivered(&self) -> Vec<(String, FormattedReport)> {
        self.delivered
            .lock()
            .map(|reports| reports.clone())
            .unwrap_or_default()
    }
}

impl ReportSink for MemorySink {
    async fn deliver(
        &self,
        subject: &Subject,
        report: &FormattedReport,
    ) -> Result<(), DeliveryError> {
        let mut delivered = self
            .delivered
            .lock()
            .map_err(|_| DeliveryError::Io("memory sink lock poisoned".to_string()))?;
        delivered.push((subject.id.clone(), report.clone()));
        Ok(())
    }
}

/// Errors from delivering a report.
#[derive(Debug, thiserror::Error)]
pub enum DeliveryError {
    #[error("Subject {0} has no chat id")]
    MissingChatId(String),

    #[error("Delivery request failed: {0}")]
    Transport(String),

    #[error("Delivery rejected (HTTP {status}): {body}")]
    Rejected { status: u16, body: String },

    #[error("Failed to encode report: {0}")]
    Encode(String),

    #[error("I/O error: {0}")]
    Io(String),
}
