// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Report time windows.

use chrono::{NaiveDateTime, NaiveTime, TimeDelta};
use std::fmt;

/// Half-open window `[start, end)` of wall-clock time a report covers.
///
/// An open end means "up to the latest sample".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportWindow {
    pub start: NaiveDateTime,
    pub end: Option<NaiveDateTime>,
}

impl ReportWindow {
    pub fn new(start: NaiveDateTime, end: Option<NaiveDateTime>) -> Self {
        Self { start, end }
    }

    /// The most recent complete report day before `now`.
    ///
    /// A report day runs from `day_start_hour` to the same hour on the next
    /// calendar day.
    pub fn previous_day(now: NaiveDateTime, day_start_hour: u32) -> Self {
        let boundary_time = NaiveTime::from_hms_opt(day_start_hour.min(23), 0, 0)
            .unwrap_or(NaiveTime::MIN);
        let mut day_end = now.date().and_time(boundary_time);
        if now < day_end {
            day_end -= TimeDelta::days(1);
        }
        Self {
            start: day_end - TimeDelta::days(1),
            end: Some(day_end),
        }
    }

    /// Whether `timestamp` falls inside the window.
    pub fn contains(&self, timestamp: NaiveDateTime) -> bool {
        timestamp >= self.start && self.end.is_none_or(|end| timestamp < end)
    }
}

impl fmt::Display for ReportWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..", self.start.format("%Y-%m-%d %H:%M"))?;
        if let Some(end) = self.end {
            write!(f, "{}", end.format("%Y-%m-%d %H:%M"))?;
        }
        Ok(())
    }
}
