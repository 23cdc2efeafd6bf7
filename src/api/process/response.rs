// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Processing response types

use serde::{Deserialize, Serialize};

use crate::analysis::Detection;

/// Outcome of processing one uploaded image
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessResponse {
    pub image_name: String,
    /// Extracted text, or "No text found"
    pub extracted_text: String,
    /// Number of detections (equals `detections.len()`)
    pub total_detections: usize,
    /// Detection table as reported by the analysis API
    pub detections: Vec<Detection>,
    /// Download URL of the stored original
    pub original_url: String,
    /// Download URL of the annotated copy; present only when one was written
    #[serde(skip_serializing_if = "Option::is_none")]
    pub annotated_url: Option<String>,
    /// Processing time in milliseconds
    pub processing_time_ms: u64,
}

impl ProcessResponse {
    /// Build the response for a processed image
    pub fn new(
        image_name: String,
        extracted_text: String,
        detections: Vec<Detection>,
        annotated: bool,
        processing_time_ms: u64,
    ) -> Self {
        let extracted_text = if extracted_text.is_empty() {
            "No text found".to_string()
        } else {
            extracted_text
        };
        let original_url = format!("/v1/images/{}", image_name);
        let annotated_url = annotated.then(|| format!("/v1/annotated/{}", image_name));

        Self {
            image_name,
            extracted_text,
            total_detections: detections.len(),
            detections,
            original_url,
            annotated_url,
            processing_time_ms,
        }
    }
}

/// One entry in a batch response
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchItem {
    pub image_name: String,
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<ProcessResponse>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl BatchItem {
    pub fn succeeded(result: ProcessResponse) -> Self {
        Self {
            image_name: result.image_name.clone(),
            ok: true,
            result: Some(result),
            error: None,
        }
    }

    pub fn failed(image_name: String, error: String) -> Self {
        Self {
            image_name,
            ok: false,
            result: None,
            error: Some(error),
        }
    }
}

/// Response for a batch upload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchResponse {
    pub processed: usize,
    pub failed: usize,
    pub items: Vec<BatchItem>,
}

impl BatchResponse {
    pub fn new(items: Vec<BatchItem>) -> Self {
        let processed = items.iter().filter(|item| item.ok).count();
        Self {
            processed,
            failed: items.len() - processed,
            items,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detection() -> Detection {
        Detection {
            class_name: "panel".to_string(),
            bbox: [10, 10, 50, 60],
            confidence: 0.87,
        }
    }

    #[test]
    fn test_empty_text_becomes_no_text_found() {
        let response =
            ProcessResponse::new("tower1.jpg".to_string(), String::new(), vec![], false, 12);
        assert_eq!(response.extracted_text, "No text found");
        assert_eq!(response.total_detections, 0);
        assert!(response.annotated_url.is_none());
    }

    #[test]
    fn test_annotated_url_present_when_written() {
        let response = ProcessResponse::new(
            "tower1.jpg".to_string(),
            "TWR-001".to_string(),
            vec![detection()],
            true,
            34,
        );
        assert_eq!(response.original_url, "/v1/images/tower1.jpg");
        assert_eq!(
            response.annotated_url.as_deref(),
            Some("/v1/annotated/tower1.jpg")
        );
        assert_eq!(response.total_detections, 1);
    }

    #[test]
    fn test_batch_counts() {
        let ok = BatchItem::succeeded(ProcessResponse::new(
            "a.jpg".to_string(),
            "T".to_string(),
            vec![],
            false,
            5,
        ));
        let bad = BatchItem::failed("b.jpg".to_string(), "API Error: 503".to_string());
        let response = BatchResponse::new(vec![ok, bad]);
        assert_eq!(response.processed, 1);
        assert_eq!(response.failed, 1);
        assert_eq!(response.items.len(), 2);
    }

    #[test]
    fn test_camel_case_serialization() {
        let response = ProcessResponse::new(
            "tower1.jpg".to_string(),
            "TWR-001".to_string(),
            vec![detection()],
            true,
            34,
        );
        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("\"imageName\":\"tower1.jpg\""));
        assert!(json.contains("\"totalDetections\":1"));
        assert!(json.contains("\"annotatedUrl\""));
        // The detection table keeps the analysis API's own field names
        assert!(json.contains("\"class_name\":\"panel\""));
    }
}
