// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! HTTP server wiring: shared state, routes, and the serve loop

use std::sync::Arc;

use anyhow::Result;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use super::files::{annotated_image_handler, download_csv_handler, original_image_handler};
use super::handlers::health_handler;
use super::process::{process_batch_handler, process_handler};
use crate::analysis::AnalysisClient;
use crate::config::AppConfig;
use crate::results::ResultRecorder;
use crate::vision::Annotator;

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub client: Arc<AnalysisClient>,
    pub recorder: Arc<ResultRecorder>,
    pub annotator: Arc<Annotator>,
}

impl AppState {
    pub fn new(
        config: AppConfig,
        client: AnalysisClient,
        recorder: ResultRecorder,
        annotator: Annotator,
    ) -> Self {
        Self {
            config: Arc::new(config),
            client: Arc::new(client),
            recorder: Arc::new(recorder),
            annotator: Arc::new(annotator),
        }
    }
}

/// Assemble the service router
pub fn build_router(state: AppState) -> Router {
    // Room for a batch of files plus multipart framing
    let body_limit = state.config.max_upload_bytes.saturating_mul(16);

    Router::new()
        .route("/health", get(health_handler))
        .route("/v1/process", post(process_handler))
        .route("/v1/process-batch", post(process_batch_handler))
        .route("/v1/results/csv", get(download_csv_handler))
        .route("/v1/images/:name", get(original_image_handler))
        .route("/v1/annotated/:name", get(annotated_image_handler))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serve until shutdown is signalled
pub async fn run(state: AppState) -> Result<()> {
    let addr = state.config.listen_addr.clone();
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!("API server listening on {}", addr);

    let app = build_router(state);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    info!("shutdown signal received");
}
