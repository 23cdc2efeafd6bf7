// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use std::collections::HashMap;
use std::fmt;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::analysis::AnalysisError;
use crate::results::RecorderError;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ErrorResponse {
    pub error_type: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<HashMap<String, serde_json::Value>>,
}

#[derive(Debug, Clone)]
pub enum ApiError {
    InvalidUpload(String),
    NotFound(String),
    AnalysisFailed { status: u16 },
    Upstream(String),
    Internal(String),
}

impl ApiError {
    pub fn to_response(&self) -> ErrorResponse {
        let (error_type, message, details) = match self {
            ApiError::InvalidUpload(msg) => ("invalid_upload", msg.clone(), None),
            ApiError::NotFound(msg) => ("not_found", msg.clone(), None),
            ApiError::AnalysisFailed { status } => {
                let mut details = HashMap::new();
                details.insert(
                    "remote_status".to_string(),
                    serde_json::Value::Number((*status).into()),
                );
                (
                    "analysis_failed",
                    format!("analysis API returned status {}", status),
                    Some(details),
                )
            }
            ApiError::Upstream(msg) => ("upstream_error", msg.clone(), None),
            ApiError::Internal(msg) => ("internal_error", msg.clone(), None),
        };

        ErrorResponse {
            error_type: error_type.to_string(),
            message,
            details,
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::InvalidUpload(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::AnalysisFailed { .. } | ApiError::Upstream(_) => StatusCode::BAD_GATEWAY,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::InvalidUpload(msg) => write!(f, "Invalid upload: {}", msg),
            ApiError::NotFound(msg) => write!(f, "Not found: {}", msg),
            ApiError::AnalysisFailed { status } => {
                write!(f, "API Error: {}", status)
            }
            ApiError::Upstream(msg) => write!(f, "Upstream error: {}", msg),
            ApiError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status_code(), Json(self.to_response())).into_response()
    }
}

impl From<AnalysisError> for ApiError {
    fn from(err: AnalysisError) -> Self {
        match err {
            AnalysisError::Api { status, .. } => ApiError::AnalysisFailed {
                status: status.as_u16(),
            },
            AnalysisError::Transport(e) => ApiError::Upstream(e.to_string()),
            AnalysisError::Decode(e) => ApiError::Upstream(format!("malformed response: {}", e)),
        }
    }
}

impl From<RecorderError> for ApiError {
    fn from(err: RecorderError) -> Self {
        ApiError::Internal(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            ApiError::InvalidUpload("x".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::NotFound("x".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::AnalysisFailed { status: 503 }.status_code(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            ApiError::Internal("x".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_analysis_failure_carries_remote_status() {
        let response = ApiError::AnalysisFailed { status: 503 }.to_response();
        assert_eq!(response.error_type, "analysis_failed");
        let details = response.details.unwrap();
        assert_eq!(details["remote_status"], serde_json::json!(503));
    }

    #[test]
    fn test_from_analysis_error() {
        let err: ApiError = AnalysisError::Api {
            status: reqwest::StatusCode::SERVICE_UNAVAILABLE,
            body: String::new(),
        }
        .into();
        assert!(matches!(err, ApiError::AnalysisFailed { status: 503 }));
    }

    #[test]
    fn test_error_response_serialization() {
        let response = ApiError::InvalidUpload("file part is required".into()).to_response();
        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("\"error_type\":\"invalid_upload\""));
        assert!(!json.contains("details"));
    }
}
