// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Reconstructed activity timeline: intervals, hour buckets and peak hour.

use crate::models::sample::Status;
use chrono::{NaiveDateTime, TimeDelta};
use std::collections::BTreeMap;

/// A maximal span during which the subject's status did not change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActivityInterval {
    pub status: Status,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub duration: TimeDelta,
}

impl ActivityInterval {
    /// Build an interval. `end` must not precede `start`.
    pub fn new(status: Status, start: NaiveDateTime, end: NaiveDateTime) -> Self {
        debug_assert!(end >= start, "interval ends before it starts");
        Self {
            status,
            start,
            end,
            duration: end - start,
        }
    }
}

/// Accumulated duration per hour-of-day (0-23).
///
/// Iteration is in ascending hour order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HourBuckets {
    hours: BTreeMap<u32, TimeDelta>,
}

impl HourBuckets {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, hour: u32, duration: TimeDelta) {
        let total = self.hours.entry(hour).or_insert_with(TimeDelta::zero);
        *total = *total + duration;
    }

    /// Duration recorded for `hour`, zero if none.
    pub fn get(&self, hour: u32) -> TimeDelta {
        self.hours.get(&hour).copied().unwrap_or_else(TimeDelta::zero)
    }

    pub fn iter(&self) -> impl Iterator<Item = (u32, TimeDelta)> + '_ {
        self.hours.iter().map(|(hour, duration)| (*hour, *duration))
    }

    pub fn total(&self) -> TimeDelta {
        self.hours.values().fold(TimeDelta::zero(), |acc, d| acc + *d)
    }

    pub fn len(&self) -> usize {
        self.hours.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hours.is_empty()
    }
}

/// The hour with the most accumulated activity.
///
/// `hour` is `None` when nothing was recorded, which is distinct from an hour
/// with zero minutes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PeakHour {
    pub hour: Option<u32>,
    pub duration: TimeDelta,
}

impl PeakHour {
    pub fn none() -> Self {
        Self {
            hour: None,
            duration: TimeDelta::zero(),
        }
    }

    pub fn has_data(&self) -> bool {
        self.hour.is_some()
    }
}

/// Result of reducing one subject's samples.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivitySummary {
    /// Intervals in chronological order
    pub intervals: Vec<ActivityInterval>,
    pub hours: HourBuckets,
    pub peak: PeakHour,
    /// Status changes dropped because they went back in time
    pub skipped_boundaries: usize,
}

impl ActivitySummary {
    /// Total duration spent in `status` across all intervals.
    pub fn time_in(&self, status: Status) -> TimeDelta {
        self.intervals
            .iter()
            .filter(|i| i.status == status)
            .fold(TimeDelta::zero(), |acc, i| acc + i.duration)
    }
}
