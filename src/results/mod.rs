// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Persistent recording of analysis results

pub mod recorder;

pub use recorder::{RecorderError, ResultRecorder, CSV_HEADER};
