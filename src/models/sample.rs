// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Presence status samples as recorded by the tracker.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Presence status of a subject at a point in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Online,
    Offline,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Online => "online",
            Status::Offline => "offline",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Status {
    type Err = SampleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("online") {
            Ok(Status::Online)
        } else if s.eq_ignore_ascii_case("offline") {
            Ok(Status::Offline)
        } else {
            Err(SampleError::UnknownStatus(s.to_string()))
        }
    }
}

/// A single `(status, timestamp)` observation.
///
/// Timestamps are wall-clock times in the report's timezone; hour buckets are
/// keyed by their hour-of-day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusSample {
    pub status: Status,
    pub timestamp: NaiveDateTime,
}

impl StatusSample {
    pub fn new(status: Status, timestamp: NaiveDateTime) -> Self {
        Self { status, timestamp }
    }
}

/// Raw status record as stored by the document store.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatusDocument {
    /// "online" or "offline"
    #[serde(default)]
    pub status: Option<String>,
    /// ISO 8601 timestamp, with or without offset
    #[serde(default)]
    pub creation_date: Option<String>,
}

impl StatusDocument {
    /// Build a document from an already-typed sample.
    pub fn from_sample(sample: &StatusSample) -> Self {
        Self {
            status: Some(sample.status.to_string()),
            creation_date: Some(sample.timestamp.format("%Y-%m-%dT%H:%M:%S%.f").to_string()),
        }
    }

    /// Validate the document into a sample.
    ///
    /// Timestamps carrying an offset are converted to `offset` before the
    /// offset is dropped; naive timestamps are taken as-is.
    pub fn into_sample(self, offset: FixedOffset) -> Result<StatusSample, SampleError> {
        let status = self.status.ok_or(SampleError::MissingStatus)?.parse()?;
        let raw = self.creation_date.ok_or(SampleError::MissingTimestamp)?;
        let timestamp = parse_timestamp(&raw, offset)?;
        Ok(StatusSample { status, timestamp })
    }
}

/// Offset-bearing layouts tried after RFC 3339. `%z` takes `+HHMM` and `+HH:MM`.
const OFFSET_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f%z",
    "%Y-%m-%d %H:%M:%S%.f%z",
    "%Y-%m-%dT%H:%M%z",
    "%Y-%m-%d %H:%M%z",
];

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Parse an ISO 8601 timestamp into wall-clock time at `offset`.
///
/// Accepts full and minute-precision times with or without an offset, and
/// bare dates, which mean midnight.
pub fn parse_timestamp(raw: &str, offset: FixedOffset) -> Result<NaiveDateTime, SampleError> {
    let raw = raw.trim();

    let with_offset = DateTime::parse_from_rfc3339(raw).ok().or_else(|| {
        OFFSET_FORMATS
            .iter()
            .find_map(|fmt| DateTime::parse_from_str(raw, fmt).ok())
    });
    if let Some(dt) = with_offset {
        return Ok(dt.with_timezone(&offset).naive_local());
    }

    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .map(|date| date.and_time(NaiveTime::MIN))
        })
        .ok_or_else(|| SampleError::InvalidTimestamp(raw.to_string()))
}

/// Errors from validating a raw status record.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SampleError {
    #[error("Unknown status value: {0:?}")]
    UnknownStatus(String),

    #[error("Missing status")]
    MissingStatus,

    #[error("Missing timestamp")]
    MissingTimestamp,

    #[error("Invalid timestamp: {0:?}")]
    InvalidTimestamp(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utc() -> FixedOffset {
        FixedOffset::east_opt(0).unwrap()
    }

    fn at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    #[test]
    fn test_status_parse_is_case_insensitive() {
        assert_eq!("online".parse::<Status>().unwrap(), Status::Online);
        assert_eq!(" Offline ".parse::<Status>().unwrap(), Status::Offline);
        assert_eq!(
            "recently".parse::<Status>(),
            Err(SampleError::UnknownStatus("recently".to_string()))
        );
    }

    #[test]
    fn test_parse_naive_timestamps() {
        assert_eq!(parse_timestamp("2024-03-01T08:05:00", utc()).unwrap(), at(8, 5));
        assert_eq!(
            parse_timestamp("2024-03-01 08:05:00.123456", utc()).unwrap(),
            at(8, 5) + chrono::TimeDelta::microseconds(123_456)
        );
    }

    #[test]
    fn test_parse_offset_timestamp_converts_to_report_offset() {
        let moscow = FixedOffset::east_opt(3 * 3600).unwrap();
        assert_eq!(
            parse_timestamp("2024-03-01T05:05:00Z", moscow).unwrap(),
            at(8, 5)
        );
        assert_eq!(
            parse_timestamp("2024-03-01 08:05:00+03:00", utc()).unwrap(),
            at(5, 5)
        );
    }

    #[test]
    fn test_parse_minute_precision_timestamp() {
        assert_eq!(parse_timestamp("2024-03-01 08:05", utc()).unwrap(), at(8, 5));
        assert_eq!(parse_timestamp("2024-03-01T08:05", utc()).unwrap(), at(8, 5));
    }

    #[test]
    fn test_parse_date_only_is_midnight() {
        assert_eq!(parse_timestamp("2024-03-01", utc()).unwrap(), at(0, 0));
    }

    #[test]
    fn test_parse_compact_offset() {
        assert_eq!(
            parse_timestamp("2024-03-01T08:05:00+0300", utc()).unwrap(),
            at(5, 5)
        );
        assert_eq!(
            parse_timestamp("2024-03-01 08:05-0100", utc()).unwrap(),
            at(9, 5)
        );
    }

    #[test]
    fn test_parse_garbage_timestamp() {
        assert!(matches!(
            parse_timestamp("yesterday", utc()),
            Err(SampleError::InvalidTimestamp(_))
        ));
    }

    #[test]
    fn test_document_missing_fields() {
        let doc = StatusDocument {
            status: None,
            creation_date: Some("2024-03-01T08:00:00".to_string()),
        };
        assert_eq!(doc.into_sample(utc()), Err(SampleError::MissingStatus));

        let doc = StatusDocument {
            status: Some("online".to_string()),
            creation_date: None,
        };
        assert_eq!(doc.into_sample(utc()), Err(SampleError::MissingTimestamp));
    }

    #[test]
    fn test_document_from_sample_round_trips() {
        let sample = StatusSample::new(Status::Offline, at(23, 40));
        let doc = StatusDocument::from_sample(&sample);
        assert_eq!(doc.status.as_deref(), Some("offline"));
        assert_eq!(doc.into_sample(utc()).unwrap(), sample);
    }
}
