// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Presence Report API Server
//!
//! Serves per-subject activity reports and runs delivery batches for the
//! configured subjects.

use presence_report::{
    config::Config,
    services::{ConfiguredSink, DocumentStoreClient, ReportService},
    AppState,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured JSON logging
    init_logging();

    // Load configuration from environment
    let config = Config::from_env().expect("Failed to load configuration");
    tracing::info!(port = config.port, "Starting Presence Report API");

    let source =
        DocumentStoreClient::from_config(&config).expect("Failed to build document store client");
    tracing::info!(endpoint = %config.document_store_url, "Document store client initialized");

    let sink = ConfiguredSink::from_config(&config);
    tracing::info!(
        telegram = config.telegram_bot_token.is_some(),
        output_dir = ?config.report_output_dir,
        "Report sinks initialized"
    );
    if sink.is_empty() {
        tracing::warn!("No report sinks configured; batch runs will not deliver anything");
    }

    let reports = ReportService::new(source, sink).with_concurrency(config.concurrency);
    tracing::info!(
        subjects = config.subjects.len(),
        utc_offset = %config.utc_offset,
        day_start_hour = config.day_start_hour,
        "Report service initialized"
    );

    // Build shared state
    let state = Arc::new(AppState {
        config: config.clone(),
        reports,
    });

    // Build router
    let app = presence_report::routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging.
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("presence_report=debug".parse().unwrap())
                .add_directive("info".parse().unwrap()),
        )
        .with(format)
        .init();
}
