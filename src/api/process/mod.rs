// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Image processing endpoint module
//!
//! Provides POST /v1/process for a single upload and POST /v1/process-batch
//! for sequential multi-file processing.

pub mod handler;
pub mod response;

pub use handler::{process_batch_handler, process_handler};
pub use response::{BatchItem, BatchResponse, ProcessResponse};
