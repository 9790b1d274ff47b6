// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod activity;
pub mod report;
pub mod sample;
pub mod subject;
pub mod window;

pub use activity::{ActivityInterval, ActivitySummary, HourBuckets, PeakHour};
pub use report::{FormattedReport, HourRow, ReportRow};
pub use sample::{SampleError, Status, StatusDocument, StatusSample};
pub use subject::Subject;
pub use window::ReportWindow;
