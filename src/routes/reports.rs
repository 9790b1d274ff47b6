// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Report routes.

use crate::config::Config;
use crate::error::{AppError, Result};
use crate::models::sample::parse_timestamp;
use crate::models::{FormattedReport, ReportWindow};
use crate::services::{BatchOutcome, ReportSink, StatusSource};
use crate::time_utils::local_now;
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;

/// Longest subject identifier accepted in a path.
const MAX_SUBJECT_LEN: usize = 128;

/// Report routes.
pub fn routes<S, K>() -> Router<Arc<AppState<S, K>>>
where
    S: StatusSource + Send + Sync + 'static,
    K: ReportSink + Send + Sync + 'static,
{
    Router::new()
        .route("/api/reports/run", post(run_reports::<S, K>))
        .route("/api/reports/{subject}", get(get_report::<S, K>))
}

/// Optional window bounds, ISO 8601.
#[derive(Debug, Default, Deserialize)]
pub struct ReportQuery {
    pub start: Option<String>,
    pub end: Option<String>,
}

/// Generate a subject's report without delivering it.
async fn get_report<S, K>(
    State(state): State<Arc<AppState<S, K>>>,
    Path(subject): Path<String>,
    Query(query): Query<ReportQuery>,
) -> Result<Json<FormattedReport>>
where
    S: StatusSource + Send + Sync + 'static,
    K: ReportSink + Send + Sync + 'static,
{
    if subject.trim().is_empty() || subject.len() > MAX_SUBJECT_LEN {
        return Err(AppError::BadRequest(format!(
            "subject must be 1-{} characters",
            MAX_SUBJECT_LEN
        )));
    }

    let window = resolve_window(&state.config, &query)?;
    let report = state.reports.generate(&subject, &window).await?;
    Ok(Json(report))
}

/// Run and deliver reports for every configured subject.
async fn run_reports<S, K>(
    State(state): State<Arc<AppState<S, K>>>,
    Query(query): Query<ReportQuery>,
) -> Result<Json<BatchOutcome>>
where
    S: StatusSource + Send + Sync + 'static,
    K: ReportSink + Send + Sync + 'static,
{
    let window = resolve_window(&state.config, &query)?;
    let outcome = state
        .reports
        .run_batch(&state.config.subjects, &window)
        .await;
    Ok(Json(outcome))
}

/// Window from query bounds, or the previous report day when no start is given.
fn resolve_window(config: &Config, query: &ReportQuery) -> Result<ReportWindow> {
    let offset = config.utc_offset;
    let parse = |name: &str, raw: &str| {
        parse_timestamp(raw, offset)
            .map_err(|e| AppError::BadRequest(format!("invalid {}: {}", name, e)))
    };

    let Some(raw_start) = query.start.as_deref() else {
        if query.end.is_some() {
            return Err(AppError::BadRequest("end requires start".to_string()));
        }
        return Ok(ReportWindow::previous_day(
            local_now(offset),
            config.day_start_hour,
        ));
    };

    let start = parse("start", raw_start)?;
    let end = query.end.as_deref().map(|raw| parse("end", raw)).transpose()?;
    if end.is_some_and(|end| end <= start) {
        return Err(AppError::BadRequest("end must be after start".to_string()));
    }
    Ok(ReportWindow::new(start, end))
}
