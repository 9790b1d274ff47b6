// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Activity reduction: raw status samples to intervals, hour buckets and a
//! peak hour.
//!
//! Pipeline:
//! 1. Collapse consecutive duplicate statuses
//! 2. Sort by timestamp
//! 3. Walk status changes, emitting intervals and filling hour buckets
//! 4. Pick the busiest hour
//!
//! Everything here is pure and synchronous.

use crate::models::{ActivityInterval, ActivitySummary, HourBuckets, PeakHour, StatusSample};
use chrono::{NaiveDateTime, TimeDelta, Timelike};

/// Reduces one subject's samples into an [`ActivitySummary`].
#[derive(Debug, Default, Clone, Copy)]
pub struct ActivityReducer;

impl ActivityReducer {
    pub fn new() -> Self {
        Self
    }

    /// Reduce raw samples, in any order, to a summary.
    pub fn reduce(&self, samples: &[StatusSample]) -> Result<ActivitySummary, ReduceError> {
        let mut cleaned = deduplicate(samples)?;

        if !is_chronological(&cleaned) {
            tracing::warn!(
                samples = cleaned.len(),
                "Status samples arrived out of order; sorting by timestamp"
            );
        }
        // Stable, so equal timestamps keep arrival order
        cleaned.sort_by_key(|s| s.timestamp);

        let timeline = reconstruct(&cleaned);
        let peak = select_peak(&timeline.hours);

        tracing::debug!(
            raw = samples.len(),
            deduplicated = cleaned.len(),
            intervals = timeline.intervals.len(),
            peak_hour = ?peak.hour,
            "Reduced status samples"
        );

        Ok(ActivitySummary {
            intervals: timeline.intervals,
            hours: timeline.hours,
            peak,
            skipped_boundaries: timeline.skipped_boundaries,
        })
    }
}

/// Intervals and hour buckets produced by [`reconstruct`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Timeline {
    pub intervals: Vec<ActivityInterval>,
    pub hours: HourBuckets,
    pub skipped_boundaries: usize,
}

/// Collapse runs of the same status to their first sample.
///
/// Each sample is compared with the one before it in input order. The first
/// sample is always kept.
pub fn deduplicate(samples: &[StatusSample]) -> Result<Vec<StatusSample>, ReduceError> {
    let first = samples.first().ok_or(ReduceError::EmptyDataset)?;

    let mut kept = Vec::with_capacity(samples.len());
    kept.push(*first);
    kept.extend(
        samples
            .windows(2)
            .filter(|pair| pair[1].status != pair[0].status)
            .map(|pair| pair[1]),
    );
    Ok(kept)
}

/// Rebuild intervals from deduplicated samples.
///
/// The last sample only marks the end of the window: it never opens an
/// interval and never closes one. A status change whose timestamp precedes
/// the open interval's start is logged and skipped, and the state machine
/// still moves to it.
pub fn reconstruct(samples: &[StatusSample]) -> Timeline {
    let mut timeline = Timeline::default();
    let Some((first, rest)) = samples.split_first() else {
        return timeline;
    };

    let mut current_status = first.status;
    let mut start_time = first.timestamp;

    let boundaries = &rest[..rest.len().saturating_sub(1)];
    for sample in boundaries {
        if sample.status == current_status {
            continue;
        }

        if sample.timestamp < start_time {
            tracing::warn!(
                start = %start_time,
                timestamp = %sample.timestamp,
                status = %sample.status,
                "Non-monotonic timestamp at status change; skipping interval"
            );
            timeline.skipped_boundaries += 1;
        } else {
            let interval = ActivityInterval::new(current_status, start_time, sample.timestamp);
            distribute_by_hour(&mut timeline.hours, interval.start, interval.end);
            timeline.intervals.push(interval);
        }

        current_status = sample.status;
        start_time = sample.timestamp;
    }

    timeline
}

/// Pick the hour with the most accumulated time. Ties go to the lowest hour.
pub fn select_peak(hours: &HourBuckets) -> PeakHour {
    let mut peak = PeakHour::none();
    for (hour, duration) in hours.iter() {
        if peak.hour.is_none() || duration > peak.duration {
            peak = PeakHour {
                hour: Some(hour),
                duration,
            };
        }
    }
    peak
}

/// Split `[start, end)` at each top of the hour and credit each piece to its
/// hour-of-day.
fn distribute_by_hour(hours: &mut HourBuckets, start: NaiveDateTime, end: NaiveDateTime) {
    let mut cursor = start;
    while cursor < end {
        let step_end = next_hour(cursor).map_or(end, |next| next.min(end));
        hours.add(cursor.hour(), step_end - cursor);
        cursor = step_end;
    }
}

/// The next top of the hour strictly after `t`, or `None` past the last
/// representable hour.
fn next_hour(t: NaiveDateTime) -> Option<NaiveDateTime> {
    let into_hour = TimeDelta::seconds(i64::from(t.minute() * 60 + t.second()))
        + TimeDelta::nanoseconds(i64::from(t.nanosecond()));
    (t - into_hour).checked_add_signed(TimeDelta::hours(1))
}

fn is_chronological(samples: &[StatusSample]) -> bool {
    samples.windows(2).all(|pair| pair[0].timestamp <= pair[1].timestamp)
}

/// Errors from reducing samples.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReduceError {
    #[error("No status samples to reduce")]
    EmptyDataset,
}
