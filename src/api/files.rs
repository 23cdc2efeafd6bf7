// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Download endpoints for stored artifacts
//!
//! Serves the results CSV, stored originals, and annotated outputs. File
//! name parameters are rejected if they could escape the storage folders.

use std::path::PathBuf;

use axum::body::Body;
use axum::extract::{Path as UrlPath, State};
use axum::http::header;
use axum::response::Response;

use super::errors::ApiError;
use super::server::AppState;
use crate::config::RESULTS_CSV;

/// Reject names that could escape the storage folders
pub fn safe_file_name(name: &str) -> Result<&str, ApiError> {
    if name.is_empty() || name.contains('/') || name.contains('\\') || name.contains("..") {
        return Err(ApiError::InvalidUpload(format!(
            "invalid file name '{}'",
            name
        )));
    }
    Ok(name)
}

fn content_type_for(name: &str) -> &'static str {
    match name.rsplit('.').next().map(str::to_ascii_lowercase).as_deref() {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        _ => "application/octet-stream",
    }
}

async fn serve_file(
    path: PathBuf,
    content_type: &str,
    download_name: Option<String>,
) -> Result<Response, ApiError> {
    let bytes = tokio::fs::read(&path).await.map_err(|_| {
        ApiError::NotFound(format!("no stored file named '{}'", path.display()))
    })?;

    let mut builder = Response::builder().header(header::CONTENT_TYPE, content_type);
    if let Some(name) = download_name {
        builder = builder.header(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", name),
        );
    }

    builder
        .body(Body::from(bytes))
        .map_err(|e| ApiError::Internal(e.to_string()))
}

/// GET /v1/results/csv - download the results ledger
pub async fn download_csv_handler(State(state): State<AppState>) -> Result<Response, ApiError> {
    let path = state.config.csv_path();
    if !path.exists() {
        return Err(ApiError::NotFound(RESULTS_CSV.to_string()));
    }
    serve_file(path, "text/csv", Some(RESULTS_CSV.to_string())).await
}

/// GET /v1/images/:name - a stored original
pub async fn original_image_handler(
    State(state): State<AppState>,
    UrlPath(name): UrlPath<String>,
) -> Result<Response, ApiError> {
    let name = safe_file_name(&name)?;
    serve_file(
        state.config.results_dir.join(name),
        content_type_for(name),
        None,
    )
    .await
}

/// GET /v1/annotated/:name - an annotated output, offered as a download
pub async fn annotated_image_handler(
    State(state): State<AppState>,
    UrlPath(name): UrlPath<String>,
) -> Result<Response, ApiError> {
    let name = safe_file_name(&name)?;
    serve_file(
        state.config.annotated_dir.join(name),
        content_type_for(name),
        Some(format!("annotated_{}", name)),
    )
    .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_safe_file_name_accepts_plain_names() {
        assert_eq!(safe_file_name("tower1.jpg").unwrap(), "tower1.jpg");
        assert_eq!(safe_file_name("site-4_v2.png").unwrap(), "site-4_v2.png");
    }

    #[test]
    fn test_safe_file_name_rejects_traversal() {
        assert!(safe_file_name("../results.csv").is_err());
        assert!(safe_file_name("a/b.jpg").is_err());
        assert!(safe_file_name("a\\b.jpg").is_err());
        assert!(safe_file_name("").is_err());
    }

    #[test]
    fn test_content_types() {
        assert_eq!(content_type_for("tower1.jpg"), "image/jpeg");
        assert_eq!(content_type_for("tower1.JPEG"), "image/jpeg");
        assert_eq!(content_type_for("tower1.png"), "image/png");
        assert_eq!(content_type_for("tower1"), "application/octet-stream");
    }
}
