//! Application configuration loaded from environment variables.
//!
//! Every connection parameter the collaborators need lives here and is passed
//! to their constructors explicitly.

use crate::models::subject::{parse_subject_list, Subject};
use chrono::{FixedOffset, Offset, Utc};
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// Default Telegram Bot API base URL.
pub const DEFAULT_TELEGRAM_API_URL: &str = "https://api.telegram.org";

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server port
    pub port: u16,

    // --- Status source ---
    /// Document store endpoint that answers `get_document` requests
    pub document_store_url: String,
    /// Request timeout for the document store
    pub source_timeout: Duration,

    // --- Report sinks ---
    /// Telegram bot token; Telegram delivery is disabled when unset
    pub telegram_bot_token: Option<String>,
    /// Telegram Bot API base URL
    pub telegram_api_url: String,
    /// Directory for JSON report export; disabled when unset
    pub report_output_dir: Option<PathBuf>,

    // --- Reporting ---
    /// Offset of the wall clock used for hour buckets
    pub utc_offset: FixedOffset,
    /// Hour (0-23) at which a report day begins
    pub day_start_hour: u32,
    /// Subjects covered by a batch run
    pub subjects: Vec<Subject>,
    /// Maximum subjects processed at once in a batch run
    pub concurrency: usize,
}

impl Default for Config {
    /// Default config for testing only.
    fn default() -> Self {
        Self {
            port: 8080,
            document_store_url: "http://localhost:5555/documents".to_string(),
            source_timeout: Duration::from_secs(10),
            telegram_bot_token: None,
            telegram_api_url: DEFAULT_TELEGRAM_API_URL.to_string(),
            report_output_dir: None,
            utc_offset: Utc.fix(),
            day_start_hour: 0,
            subjects: Vec::new(),
            concurrency: 4,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// A `.env` file in the working directory is loaded first if present.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let offset_minutes: i32 = parse_var("REPORT_UTC_OFFSET_MINUTES", 0)?;
        let utc_offset = FixedOffset::east_opt(offset_minutes * 60).ok_or_else(|| {
            ConfigError::Invalid("REPORT_UTC_OFFSET_MINUTES", offset_minutes.to_string())
        })?;

        let day_start_hour: u32 = parse_var("REPORT_DAY_START_HOUR", 0)?;
        if day_start_hour > 23 {
            return Err(ConfigError::Invalid(
                "REPORT_DAY_START_HOUR",
                day_start_hour.to_string(),
            ));
        }

        let subjects = match env::var("REPORT_SUBJECTS") {
            Ok(raw) => parse_subject_list(&raw)
                .map_err(|e| ConfigError::Invalid("REPORT_SUBJECTS", e))?,
            Err(_) => Vec::new(),
        };

        Ok(Self {
            port: parse_var("PORT", 8080)?,
            document_store_url: env::var("DOCUMENT_STORE_URL")
                .map(|v| v.trim().to_string())
                .map_err(|_| ConfigError::Missing("DOCUMENT_STORE_URL"))?,
            source_timeout: Duration::from_secs(parse_var("SOURCE_TIMEOUT_SECS", 10)?),
            telegram_bot_token: non_empty_var("TELEGRAM_BOT_TOKEN"),
            telegram_api_url: non_empty_var("TELEGRAM_API_URL")
                .unwrap_or_else(|| DEFAULT_TELEGRAM_API_URL.to_string()),
            report_output_dir: non_empty_var("REPORT_OUTPUT_DIR").map(PathBuf::from),
            utc_offset,
            day_start_hour,
            subjects,
            concurrency: parse_var::<usize>("REPORT_CONCURRENCY", 4)?.max(1),
        })
    }
}

/// Read a variable, treating blank values as unset.
fn non_empty_var(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Parse a variable, falling back to `default` when unset.
fn parse_var<T: FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match non_empty_var(name) {
        Some(raw) => raw.parse().map_err(|_| ConfigError::Invalid(name, raw)),
        None => Ok(default),
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {0}: {1}")]
    Invalid(&'static str, String),
}
