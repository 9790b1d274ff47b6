// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Presence report: reconstruct a subject's online/offline timeline
//!
//! This crate turns timestamped status samples into activity intervals,
//! per-hour presence totals and a peak hour, and delivers the result as a
//! report.

pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_utils;

use config::Config;
use services::{ConfiguredSink, DocumentStoreClient, ReportService};

/// Shared application state.
pub struct AppState<S = DocumentStoreClient, K = ConfiguredSink> {
    pub config: Config,
    pub reports: ReportService<S, K>,
}
