// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use chrono::{NaiveDate, NaiveDateTime};
use presence_report::config::Config;
use presence_report::models::{Status, StatusSample, Subject};
use presence_report::routes::create_router;
use presence_report::services::{InMemorySource, MemorySink, ReportService};
use presence_report::AppState;
use std::sync::Arc;

/// Wall-clock time on the fixture day (2024-03-01).
#[allow(dead_code)]
pub fn at(h: u32, m: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 3, 1)
        .unwrap()
        .and_hms_opt(h, m, 0)
        .unwrap()
}

#[allow(dead_code)]
pub fn sample(status: Status, timestamp: NaiveDateTime) -> StatusSample {
    StatusSample::new(status, timestamp)
}

/// The reference day: online 08:00-09:30, offline 09:30-09:45, terminated at 11:00.
#[allow(dead_code)]
pub fn reference_day() -> Vec<StatusSample> {
    vec![
        sample(Status::Online, at(8, 0)),
        sample(Status::Online, at(8, 5)),
        sample(Status::Offline, at(9, 30)),
        sample(Status::Online, at(9, 45)),
        sample(Status::Offline, at(11, 0)),
    ]
}

/// Source with `alice` holding the reference day.
#[allow(dead_code)]
pub fn test_source() -> InMemorySource {
    InMemorySource::default().with_samples("alice", &reference_day())
}

/// Create a test app with in-memory dependencies.
/// Returns the router, the shared state and the sink for inspection.
#[allow(dead_code)]
pub fn create_test_app(
    source: InMemorySource,
    subjects: Vec<Subject>,
) -> (
    axum::Router,
    Arc<AppState<InMemorySource, MemorySink>>,
    MemorySink,
) {
    let config = Config {
        subjects,
        ..Config::default()
    };
    let sink = MemorySink::new();
    let reports = ReportService::new(source, sink.clone()).with_concurrency(config.concurrency);

    let state = Arc::new(AppState { config, reports });

    (create_router(state.clone()), state, sink)
}
