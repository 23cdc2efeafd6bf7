// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Append-only CSV ledger of analysis results
//!
//! The ledger reuses one column set for two row kinds: a text row per image,
//! then either one row per detection or a single no-detection row. Fields
//! not applicable to a row kind stay blank. This is the documented external
//! format and is preserved as-is.

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};

use csv::WriterBuilder;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::analysis::Detection;

/// Header of the results ledger; written once, when the file is created
pub const CSV_HEADER: [&str; 6] = [
    "Image Name",
    "Extracted Text",
    "Total Antennas",
    "Class Name",
    "Bounding Box (x1,y1,x2,y2)",
    "Confidence Score",
];

#[derive(Debug, Error)]
pub enum RecorderError {
    #[error("failed to open results file: {0}")]
    Open(#[source] std::io::Error),

    #[error("failed to write results row: {0}")]
    Csv(#[from] csv::Error),

    #[error("failed to flush results file: {0}")]
    Flush(#[source] std::io::Error),
}

/// Serialized access to the results CSV
///
/// One `append_result` call writes the text row and every detection row
/// together under a single lock, so rows from two images cannot interleave.
pub struct ResultRecorder {
    csv_path: PathBuf,
    lock: Mutex<()>,
}

impl ResultRecorder {
    /// Open the recorder, creating the CSV with its header if absent
    ///
    /// An existing file is left untouched; every later write appends.
    pub fn open(csv_path: impl Into<PathBuf>) -> Result<Self, RecorderError> {
        let csv_path = csv_path.into();

        if !csv_path.exists() {
            let mut writer = csv::Writer::from_path(&csv_path)?;
            writer.write_record(CSV_HEADER)?;
            writer.flush().map_err(RecorderError::Flush)?;
            info!("created results ledger at {}", csv_path.display());
        }

        Ok(Self {
            csv_path,
            lock: Mutex::new(()),
        })
    }

    /// Path of the ledger file
    pub fn csv_path(&self) -> &Path {
        &self.csv_path
    }

    /// Append the full result for one image
    ///
    /// Writes exactly one text row (literal `No text found` when the text is
    /// empty), then either one row per detection with the total count in the
    /// count column, or a single `No detection` row.
    pub async fn append_result(
        &self,
        image_name: &str,
        extracted_text: &str,
        detections: &[Detection],
    ) -> Result<(), RecorderError> {
        let _guard = self.lock.lock().await;

        let file = OpenOptions::new()
            .append(true)
            .open(&self.csv_path)
            .map_err(RecorderError::Open)?;
        let mut writer = WriterBuilder::new().from_writer(file);

        let text_field = if extracted_text.is_empty() {
            "No text found"
        } else {
            extracted_text
        };
        writer.write_record([image_name, text_field, "", "", "", ""])?;

        if detections.is_empty() {
            writer.write_record([image_name, "", "0", "No detection", "N/A", "N/A"])?;
        } else {
            let total = detections.len().to_string();
            for detection in detections {
                let [x1, y1, x2, y2] = detection.bbox;
                let bbox_field = format!("[{}, {}, {}, {}]", x1, y1, x2, y2);
                let confidence_field = format!("{:.2}", detection.confidence);
                writer.write_record([
                    image_name,
                    "",
                    total.as_str(),
                    detection.class_name.as_str(),
                    bbox_field.as_str(),
                    confidence_field.as_str(),
                ])?;
            }
        }

        writer.flush().map_err(RecorderError::Flush)?;
        debug!(
            "recorded {}: {} detection rows",
            image_name,
            detections.len().max(1)
        );
        Ok(())
    }
}
