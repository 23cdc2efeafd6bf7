// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod errors;
pub mod files;
pub mod handlers;
pub mod process;
pub mod server;

pub use errors::{ApiError, ErrorResponse};
pub use handlers::HealthResponse;
pub use process::{
    process_batch_handler, process_handler, BatchItem, BatchResponse, ProcessResponse,
};
pub use server::{build_router, run, AppState};
