// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use std::env;

use anyhow::{Context, Result};
use clap::Parser;

use tower_vision_node::analysis::AnalysisClient;
use tower_vision_node::api::{self, AppState};
use tower_vision_node::config::{AppConfig, Args};
use tower_vision_node::results::ResultRecorder;
use tower_vision_node::vision::Annotator;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    // Initialize tracing subscriber for logging
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "info");
    }
    tracing_subscriber::fmt::init();

    let config = AppConfig::from_args(Args::parse())?;

    println!(
        "🚀 Starting Tower Vision Node v{}...",
        tower_vision_node::version::VERSION
    );
    println!("   Analysis API: {}", config.api_url);
    println!("   Results folder: {}", config.results_dir.display());
    println!("   Annotated folder: {}", config.annotated_dir.display());

    // One-time setup phase: storage folders, results ledger, remote client
    config
        .ensure_dirs()
        .context("failed to create storage folders")?;
    let recorder =
        ResultRecorder::open(config.csv_path()).context("failed to open results ledger")?;
    let client = AnalysisClient::new(&config.api_url, config.request_timeout)
        .context("failed to build analysis client")?;
    let annotator = Annotator::new().context("failed to load label font")?;

    let state = AppState::new(config, client, recorder, annotator);
    api::run(state).await
}
