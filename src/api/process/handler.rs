// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Image processing endpoint handlers
//!
//! Pipeline per image:
//! 1. Validate the upload (name filter, magic bytes, size cap)
//! 2. Persist the original into the results folder under its own name
//! 3. POST it to the analysis API
//! 4. Append the text and detection rows to the CSV ledger
//! 5. When detections exist, render and persist the annotated copy

use std::time::Instant;

use axum::extract::{Multipart, State};
use axum::Json;
use tokio::time::sleep;
use tracing::{info, warn};

use super::response::{BatchItem, BatchResponse, ProcessResponse};
use crate::api::errors::ApiError;
use crate::api::files::safe_file_name;
use crate::api::server::AppState;
use crate::vision::image_utils;

struct Upload {
    file_name: String,
    bytes: Vec<u8>,
}

/// POST /v1/process - analyze a single uploaded image
///
/// # Request
/// multipart/form-data with one `file` part carrying the image.
///
/// # Errors
/// - 400 Bad Request: missing part, bad file name, or not a jpg/png image
/// - 502 Bad Gateway: the analysis API failed or returned non-200
/// - 500 Internal Server Error: storage failure
pub async fn process_handler(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<ProcessResponse>, ApiError> {
    let upload = read_upload(&mut multipart).await?.ok_or_else(|| {
        ApiError::InvalidUpload("multipart field 'file' is required".to_string())
    })?;

    let response = process_one(&state, upload).await?;
    Ok(Json(response))
}

/// POST /v1/process-batch - analyze several uploads sequentially
///
/// Files are processed in upload order with a fixed pause between files.
/// One file's failure is reported in its batch entry and does not stop the
/// rest of the batch.
pub async fn process_batch_handler(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<BatchResponse>, ApiError> {
    let mut items = Vec::new();

    while let Some(upload) = read_upload(&mut multipart).await? {
        if !items.is_empty() {
            sleep(state.config.batch_pause).await;
        }

        let file_name = upload.file_name.clone();
        match process_one(&state, upload).await {
            Ok(result) => items.push(BatchItem::succeeded(result)),
            Err(e) => {
                warn!("batch item {} failed: {}", file_name, e);
                items.push(BatchItem::failed(file_name, e.to_string()));
            }
        }
    }

    if items.is_empty() {
        return Err(ApiError::InvalidUpload(
            "at least one 'file' part is required".to_string(),
        ));
    }

    Ok(Json(BatchResponse::new(items)))
}

/// Pull the next `file` part out of the multipart stream
async fn read_upload(multipart: &mut Multipart) -> Result<Option<Upload>, ApiError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::InvalidUpload(e.to_string()))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let file_name = field
            .file_name()
            .map(str::to_string)
            .ok_or_else(|| ApiError::InvalidUpload("file part must carry a file name".to_string()))?;
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::InvalidUpload(e.to_string()))?
            .to_vec();

        return Ok(Some(Upload { file_name, bytes }));
    }

    Ok(None)
}

async fn process_one(state: &AppState, upload: Upload) -> Result<ProcessResponse, ApiError> {
    let started = Instant::now();
    let name = safe_file_name(&upload.file_name)?.to_string();

    // 1. Validate before anything touches disk or the network
    if !image_utils::has_supported_extension(&name) {
        return Err(ApiError::InvalidUpload(format!(
            "'{}' is not a jpg, jpeg or png file",
            name
        )));
    }
    image_utils::decode_upload(&upload.bytes, state.config.max_upload_bytes)
        .map_err(|e| ApiError::InvalidUpload(e.to_string()))?;

    // 2. Persist the original under its own name
    let original_path = state.config.results_dir.join(&name);
    tokio::fs::write(&original_path, &upload.bytes)
        .await
        .map_err(|e| ApiError::Internal(format!("failed to store upload: {}", e)))?;

    // 3. Remote analysis; a failure here leaves no trace in the ledger
    let analysis = state.client.process_image(&name, upload.bytes).await?;
    let extracted_text = analysis.extracted_text().to_string();
    let detections = analysis.antenna_detections;

    // 4. Ledger rows, text and detections together
    state
        .recorder
        .append_result(&name, &extracted_text, &detections)
        .await?;

    // 5. Annotated copy, only when something was detected. An unreadable
    // source skips annotation without failing the image.
    let mut annotated = false;
    if !detections.is_empty() {
        if let Some(rendered) = state.annotator.annotate_file(&original_path, &detections) {
            let annotated_path = state.config.annotated_dir.join(&name);
            rendered.save(&annotated_path).map_err(|e| {
                ApiError::Internal(format!("failed to save annotated image: {}", e))
            })?;
            annotated = true;
        }
    }

    info!(
        "processed {}: {} detections, {} text chars, {}ms",
        name,
        detections.len(),
        extracted_text.len(),
        started.elapsed().as_millis()
    );

    Ok(ProcessResponse::new(
        name,
        extracted_text,
        detections,
        annotated,
        started.elapsed().as_millis() as u64,
    ))
}
