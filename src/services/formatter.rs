// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Turns an [`ActivitySummary`] into a [`FormattedReport`] and plain text.

use crate::models::{
    ActivitySummary, FormattedReport, HourRow, PeakHour, ReportRow, ReportWindow, Status,
};
use crate::time_utils::{format_clock, format_duration, format_minute, format_utc_rfc3339};
use chrono::{DateTime, Utc};
use std::fmt::Write as _;

/// Label used when no hour has any recorded activity.
pub const NO_DATA_LABEL: &str = "No data";

/// Build the presentation form of a summary.
pub fn format_report(
    subject: &str,
    window: &ReportWindow,
    summary: &ActivitySummary,
    generated_at: DateTime<Utc>,
) -> FormattedReport {
    let rows = summary
        .intervals
        .iter()
        .map(|interval| ReportRow {
            activity: format!(
                "{} - {}",
                format_clock(interval.start),
                format_clock(interval.end)
            ),
            status: interval.status,
            duration: format_duration(interval.duration),
        })
        .collect();

    let hours = summary
        .hours
        .iter()
        .map(|(hour, duration)| HourRow {
            hour,
            duration: format_duration(duration),
        })
        .collect();

    FormattedReport {
        subject: subject.to_string(),
        window_start: format_minute(window.start),
        window_end: window.end.map(format_minute),
        generated_at: format_utc_rfc3339(generated_at),
        peak_hour: summary.peak.hour,
        peak_hour_label: peak_hour_label(&summary.peak),
        peak_duration: format_duration(summary.peak.duration),
        total_online: format_duration(summary.time_in(Status::Online)),
        rows,
        hours,
        skipped_boundaries: summary.skipped_boundaries,
    }
}

/// "8:00 - 9:00" for hour 8, [`NO_DATA_LABEL`] when there is no peak.
pub fn peak_hour_label(peak: &PeakHour) -> String {
    match peak.hour {
        Some(hour) => format!("{}:00 - {}:00", hour, hour + 1),
        None => NO_DATA_LABEL.to_string(),
    }
}

/// Render a report as a plain-text message.
pub fn render_text(report: &FormattedReport) -> String {
    let mut text = String::new();
    let _ = writeln!(text, "Activity report: {}", report.subject);
    let _ = writeln!(
        text,
        "Window: {} - {}",
        report.window_start,
        report.window_end.as_deref().unwrap_or("now")
    );
    let _ = writeln!(
        text,
        "Peak hour: {} ({})",
        report.peak_hour_label, report.peak_duration
    );
    let _ = writeln!(text, "Total online: {}", report.total_online);
    text.push('\n');

    if report.rows.is_empty() {
        text.push_str("No status changes recorded in this window.\n");
    }
    for row in &report.rows {
        let _ = writeln!(
            text,
            "{}  {:<7}  {}",
            row.activity, row.status, row.duration
        );
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ActivityInterval, HourBuckets};
    use chrono::{NaiveDate, NaiveDateTime, TimeDelta, TimeZone};

    fn at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    fn sample_summary() -> ActivitySummary {
        let mut hours = HourBuckets::new();
        hours.add(8, TimeDelta::hours(1));
        hours.add(9, TimeDelta::minutes(45));
        ActivitySummary {
            intervals: vec![
                ActivityInterval::new(Status::Online, at(8, 0), at(9, 30)),
                ActivityInterval::new(Status::Offline, at(9, 30), at(9, 45)),
            ],
            hours,
            peak: PeakHour {
                hour: Some(8),
                duration: TimeDelta::hours(1),
            },
            skipped_boundaries: 0,
        }
    }

    #[test]
    fn test_format_report_rows() {
        let window = ReportWindow::new(at(0, 0), Some(at(0, 0) + TimeDelta::days(1)));
        let generated_at = Utc.with_ymd_and_hms(2024, 3, 2, 0, 5, 0).unwrap();
        let report = format_report("alice", &window, &sample_summary(), generated_at);

        assert_eq!(report.subject, "alice");
        assert_eq!(report.window_start, "2024-03-01 00:00");
        assert_eq!(report.window_end.as_deref(), Some("2024-03-02 00:00"));
        assert_eq!(report.generated_at, "2024-03-02T00:05:00Z");
        assert_eq!(report.peak_hour, Some(8));
        assert_eq!(report.peak_hour_label, "8:00 - 9:00");
        assert_eq!(report.peak_duration, "1:00:00");
        assert_eq!(report.total_online, "1:30:00");
        assert_eq!(report.rows.len(), 2);
        assert_eq!(report.rows[0].activity, "08:00 - 09:30");
        assert_eq!(report.rows[0].status, Status::Online);
        assert_eq!(report.rows[0].duration, "1:30:00");
        assert_eq!(report.rows[1].activity, "09:30 - 09:45");
        assert_eq!(report.rows[1].duration, "0:15:00");
        assert_eq!(report.hours[1].hour, 9);
        assert_eq!(report.hours[1].duration, "0:45:00");
    }

    #[test]
    fn test_peak_hour_label() {
        assert_eq!(peak_hour_label(&PeakHour::none()), NO_DATA_LABEL);
        let late = PeakHour {
            hour: Some(23),
            duration: TimeDelta::minutes(20),
        };
        assert_eq!(peak_hour_label(&late), "23:00 - 24:00");
    }

    #[test]
    fn test_render_text() {
        let window = ReportWindow::new(at(0, 0), None);
        let report = format_report("alice", &window, &sample_summary(), Utc::now());
        let text = render_text(&report);

        assert!(text.starts_with("Activity report: alice\n"));
        assert!(text.contains("Window: 2024-03-01 00:00 - now"));
        assert!(text.contains("Peak hour: 8:00 - 9:00 (1:00:00)"));
        assert!(text.contains("08:00 - 09:30  online   1:30:00"));
        assert!(text.contains("09:30 - 09:45  offline  0:15:00"));
    }

    #[test]
    fn test_render_text_without_rows() {
        let summary = ActivitySummary {
            intervals: vec![],
            hours: HourBuckets::new(),
            peak: PeakHour::none(),
            skipped_boundaries: 0,
        };
        let window = ReportWindow::new(at(0, 0), None);
        let report = format_report("bob", &window, &summary, Utc::now());
        let text = render_text(&report);
        assert!(text.contains("Peak hour: No data (0:00:00)"));
        assert!(text.contains("No status changes recorded"));
    }
}
