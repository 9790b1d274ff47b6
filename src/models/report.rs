// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Presentation-ready report handed to sinks and API clients.

use crate::models::sample::Status;
use serde::{Deserialize, Serialize};

/// Formatted activity report for one subject.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormattedReport {
    pub subject: String,
    /// Window start, "YYYY-MM-DD HH:MM"
    pub window_start: String,
    pub window_end: Option<String>,
    /// When the report was generated (RFC 3339, UTC)
    pub generated_at: String,
    pub peak_hour: Option<u32>,
    /// "8:00 - 9:00" or "No data"
    pub peak_hour_label: String,
    /// "H:MM:SS"
    pub peak_duration: String,
    pub total_online: String,
    pub rows: Vec<ReportRow>,
    pub hours: Vec<HourRow>,
    #[serde(default)]
    pub skipped_boundaries: usize,
}

/// One activity interval.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportRow {
    /// "08:00 - 09:30"
    pub activity: String,
    pub status: Status,
    pub duration: String,
}

/// Accumulated duration for one hour of the day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourRow {
    pub hour: u32,
    pub duration: String,
}
