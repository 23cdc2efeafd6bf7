// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Remote image-analysis API integration
//!
//! The analysis service is an external collaborator: one multipart POST per
//! image, one JSON response carrying extracted text and antenna detections.

pub mod client;
pub mod types;

pub use client::{AnalysisClient, AnalysisError};
pub use types::{AnalysisResponse, Detection, TextDetections};
