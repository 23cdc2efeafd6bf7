// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Wire types for the analysis API response

use serde::{Deserialize, Serialize};

/// One object instance reported by the analysis API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Detection {
    /// Class label, e.g. "panel"
    pub class_name: String,
    /// Pixel coordinates as [x1, y1, x2, y2]
    pub bbox: [i32; 4],
    /// Confidence score (0.0-1.0)
    pub confidence: f32,
}

impl Detection {
    /// Label drawn onto the annotated image
    pub fn label(&self) -> String {
        format!("{} ({:.1}%)", self.class_name, self.confidence * 100.0)
    }
}

/// Text extraction section of the response
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TextDetections {
    #[serde(default)]
    pub all_text: String,
}

/// Full response body from the analysis endpoint
///
/// Both sections tolerate absence and default to empty, so a response that
/// only carries one of them still parses.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalysisResponse {
    #[serde(default)]
    pub text_detections: TextDetections,
    #[serde(default)]
    pub antenna_detections: Vec<Detection>,
}

impl AnalysisResponse {
    /// Extracted text with surrounding whitespace removed
    pub fn extracted_text(&self) -> &str {
        self.text_detections.all_text.trim()
    }
}
