// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Image validation and annotation
//!
//! This module provides:
//! - Validation and decoding of uploaded photos
//! - Bounding-box and label rendering for annotated copies

pub mod annotator;
pub mod image_utils;

pub use annotator::Annotator;
pub use image_utils::{
    decode_upload, detect_format, has_supported_extension, ImageError, ImageInfo,
};
