// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Report service tests against in-memory collaborators.

use chrono::TimeDelta;
use presence_report::models::{ReportWindow, Status, StatusDocument, Subject};
use presence_report::services::{
    DeliveryError, InMemorySource, MemorySink, ReportError, ReportService, ReportSink,
};

mod common;
use common::{at, reference_day, test_source};

fn fixture_day() -> ReportWindow {
    ReportWindow::new(at(0, 0), Some(at(0, 0) + TimeDelta::days(1)))
}

/// Sink that refuses every delivery.
struct RejectingSink;

impl ReportSink for RejectingSink {
    async fn deliver(
        &self,
        _subject: &Subject,
        _report: &presence_report::models::FormattedReport,
    ) -> Result<(), DeliveryError> {
        Err(DeliveryError::Rejected {
            status: 403,
            body: "bot was blocked by the user".to_string(),
        })
    }
}

#[tokio::test]
async fn test_generate_reference_day() {
    let service = ReportService::new(test_source(), MemorySink::new());

    let report = service.generate("alice", &fixture_day()).await.unwrap();

    assert_eq!(report.subject, "alice");
    assert_eq!(report.rows.len(), 2);
    assert_eq!(report.rows[0].activity, "08:00 - 09:30");
    assert_eq!(report.rows[0].status, Status::Online);
    assert_eq!(report.rows[0].duration, "1:30:00");
    assert_eq!(report.rows[1].activity, "09:30 - 09:45");
    assert_eq!(report.rows[1].duration, "0:15:00");
    assert_eq!(report.peak_hour, Some(8));
    assert_eq!(report.peak_hour_label, "8:00 - 9:00");
    assert_eq!(report.peak_duration, "1:00:00");
    // generate never delivers
    assert!(service.sink().delivered().is_empty());
}

#[tokio::test]
async fn test_generate_without_samples_is_empty_dataset() {
    let service = ReportService::new(test_source(), MemorySink::new());

    let err = service.generate("bob", &fixture_day()).await.unwrap_err();

    match &err {
        ReportError::EmptyDataset { subject, window } => {
            assert_eq!(subject, "bob");
            assert_eq!(window, "2024-03-01 00:00..2024-03-02 00:00");
        }
        other => panic!("expected EmptyDataset, got {:?}", other),
    }
    assert_eq!(err.kind(), "empty_dataset");
    assert_eq!(err.subject(), "bob");
}

#[tokio::test]
async fn test_samples_outside_window_are_ignored() {
    let service = ReportService::new(test_source(), MemorySink::new());
    let next_day = ReportWindow::new(at(0, 0) + TimeDelta::days(1), None);

    let err = service.generate("alice", &next_day).await.unwrap_err();
    assert!(matches!(err, ReportError::EmptyDataset { .. }));
}

#[tokio::test]
async fn test_malformed_sample_fails_fast() {
    let source = InMemorySource::default().with_documents(
        "carol",
        vec![
            StatusDocument {
                status: Some("online".to_string()),
                creation_date: Some("2024-03-01T08:00:00".to_string()),
            },
            StatusDocument {
                status: Some("online".to_string()),
                creation_date: Some("not a date".to_string()),
            },
        ],
    );
    let service = ReportService::new(source, MemorySink::new());

    let err = service.generate("carol", &fixture_day()).await.unwrap_err();
    match err {
        ReportError::MalformedSample { subject, index, reason } => {
            assert_eq!(subject, "carol");
            assert_eq!(index, 1);
            assert!(reason.contains("not a date"));
        }
        other => panic!("expected MalformedSample, got {:?}", other),
    }
}

#[tokio::test]
async fn test_run_delivers_report() {
    let sink = MemorySink::new();
    let service = ReportService::new(test_source(), sink.clone());

    let report = service
        .run(&Subject::with_chat("alice", 42), &fixture_day())
        .await
        .unwrap();

    let delivered = sink.delivered();
    assert_eq!(delivered.len(), 1);
    assert_eq!(delivered[0].0, "alice");
    assert_eq!(delivered[0].1, report);
}

#[tokio::test]
async fn test_run_reports_delivery_failure() {
    let service = ReportService::new(test_source(), RejectingSink);

    let err = service
        .run(&Subject::with_chat("alice", 42), &fixture_day())
        .await
        .unwrap_err();

    assert_eq!(err.kind(), "delivery_error");
    assert!(err.to_string().contains("alice"));
}

#[tokio::test]
async fn test_batch_isolates_failures() {
    let source = test_source()
        .with_samples("dave", &reference_day())
        .with_documents(
            "carol",
            vec![StatusDocument {
                status: Some("invisible".to_string()),
                creation_date: Some("2024-03-01T08:00:00".to_string()),
            }],
        );
    let sink = MemorySink::new();
    let service = ReportService::new(source, sink.clone()).with_concurrency(2);

    let subjects = vec![
        Subject::new("dave"),
        Subject::new("bob"),
        Subject::new("carol"),
        Subject::new("alice"),
    ];
    let outcome = service.run_batch(&subjects, &fixture_day()).await;

    assert_eq!(outcome.delivered, vec!["alice", "dave"]);
    assert_eq!(outcome.failed.len(), 2);
    assert_eq!(outcome.failed[0].subject, "bob");
    assert_eq!(outcome.failed[0].kind, "empty_dataset");
    assert_eq!(outcome.failed[1].subject, "carol");
    assert_eq!(outcome.failed[1].kind, "malformed_sample");

    let mut delivered: Vec<String> = sink.delivered().into_iter().map(|(s, _)| s).collect();
    delivered.sort();
    assert_eq!(delivered, vec!["alice", "dave"]);
}

#[tokio::test]
async fn test_batch_with_no_subjects() {
    let service = ReportService::new(test_source(), MemorySink::new());
    let outcome = service.run_batch(&[], &fixture_day()).await;
    assert!(outcome.delivered.is_empty());
    assert!(outcome.failed.is_empty());
}
