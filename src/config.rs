// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Runtime configuration
//!
//! Every component receives its configuration explicitly; nothing reads
//! module-level globals. Storage folders are created once during the setup
//! phase (`ensure_dirs`), before the server starts.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use url::Url;

/// Name of the results ledger inside the results folder
pub const RESULTS_CSV: &str = "results.csv";

/// Command-line and environment arguments
#[derive(Debug, Parser)]
#[command(name = "tower-vision-node", version)]
pub struct Args {
    /// Address the HTTP server listens on
    #[arg(long, env = "LISTEN_ADDR", default_value = "127.0.0.1:8080")]
    pub listen_addr: String,

    /// Remote analysis API endpoint
    #[arg(
        long,
        env = "ANALYSIS_API_URL",
        default_value = "https://tower-ai.onrender.com/process-image"
    )]
    pub api_url: String,

    /// Folder holding uploaded originals and the results CSV
    #[arg(long, env = "RESULTS_DIR", default_value = "API_results")]
    pub results_dir: PathBuf,

    /// Folder holding annotated outputs
    #[arg(long, env = "ANNOTATED_DIR", default_value = "API_annotated")]
    pub annotated_dir: PathBuf,

    /// Timeout for one remote analysis request, in seconds
    #[arg(long, env = "REQUEST_TIMEOUT_SECS", default_value_t = 120)]
    pub request_timeout_secs: u64,

    /// Pause between files in batch mode, in milliseconds
    #[arg(long, env = "BATCH_PAUSE_MS", default_value_t = 1000)]
    pub batch_pause_ms: u64,

    /// Maximum accepted upload size in bytes
    #[arg(long, env = "MAX_UPLOAD_BYTES", default_value_t = 10 * 1024 * 1024)]
    pub max_upload_bytes: usize,
}

/// Validated application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub listen_addr: String,
    pub api_url: String,
    pub results_dir: PathBuf,
    pub annotated_dir: PathBuf,
    pub request_timeout: Duration,
    pub batch_pause: Duration,
    pub max_upload_bytes: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            listen_addr: "127.0.0.1:8080".to_string(),
            api_url: "https://tower-ai.onrender.com/process-image".to_string(),
            results_dir: PathBuf::from("API_results"),
            annotated_dir: PathBuf::from("API_annotated"),
            request_timeout: Duration::from_secs(120),
            batch_pause: Duration::from_secs(1),
            max_upload_bytes: 10 * 1024 * 1024,
        }
    }
}

impl AppConfig {
    /// Build a validated configuration from parsed arguments
    pub fn from_args(args: Args) -> Result<Self> {
        Url::parse(&args.api_url)
            .with_context(|| format!("invalid analysis API URL '{}'", args.api_url))?;

        Ok(Self {
            listen_addr: args.listen_addr,
            api_url: args.api_url,
            results_dir: args.results_dir,
            annotated_dir: args.annotated_dir,
            request_timeout: Duration::from_secs(args.request_timeout_secs),
            batch_pause: Duration::from_millis(args.batch_pause_ms),
            max_upload_bytes: args.max_upload_bytes,
        })
    }

    /// Path of the results CSV inside the results folder
    pub fn csv_path(&self) -> PathBuf {
        self.results_dir.join(RESULTS_CSV)
    }

    /// Create the storage folders. Runs once during startup.
    pub fn ensure_dirs(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(&self.results_dir)?;
        std::fs::create_dir_all(&self.annotated_dir)
    }
}
