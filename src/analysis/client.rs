// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Client for the remote image-analysis API

use std::time::Duration;

use reqwest::multipart::{Form, Part};
use reqwest::{Client, StatusCode};
use thiserror::Error;
use tracing::{debug, info};

use super::types::AnalysisResponse;

/// Errors from one analysis round trip
///
/// A non-200 status, a transport failure, and a malformed body are distinct
/// cases: the first carries the remote status code for reporting, the other
/// two carry the underlying error message.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("analysis API returned {status}")]
    Api { status: StatusCode, body: String },

    #[error("failed to reach analysis API: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("malformed analysis response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl AnalysisError {
    /// Status reported by the remote API, when this was an API error
    pub fn api_status(&self) -> Option<StatusCode> {
        match self {
            AnalysisError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Client for the remote analysis service
#[derive(Debug, Clone)]
pub struct AnalysisClient {
    client: Client,
    endpoint: String,
}

impl AnalysisClient {
    /// Create a new analysis client with an explicit request timeout
    pub fn new(endpoint: &str, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;

        let endpoint = endpoint.trim_end_matches('/').to_string();
        info!("analysis client configured: endpoint={}", endpoint);

        Ok(Self { client, endpoint })
    }

    /// Get the configured endpoint
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Check if the analysis service answers at all
    pub async fn health_check(&self) -> bool {
        match self.client.get(&self.endpoint).send().await {
            Ok(_) => true,
            Err(e) => {
                debug!("analysis health check failed: {}", e);
                false
            }
        }
    }

    /// Send one image for processing
    ///
    /// The image goes out as multipart field `file`. Success is exactly
    /// HTTP 200; any other status becomes [`AnalysisError::Api`] with the
    /// response body kept for logging. The body is fetched before decoding
    /// so transport and decode failures stay distinguishable.
    pub async fn process_image(
        &self,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> Result<AnalysisResponse, AnalysisError> {
        debug!(
            "analysis POST {} ({} bytes, {})",
            self.endpoint,
            bytes.len(),
            file_name
        );

        let part = Part::bytes(bytes).file_name(file_name.to_string());
        let form = Form::new().part("file", part);

        let response = self.client.post(&self.endpoint).multipart(form).send().await?;

        let status = response.status();
        if status != StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            return Err(AnalysisError::Api { status, body });
        }

        let body = response.text().await?;
        let parsed: AnalysisResponse = serde_json::from_str(&body)?;

        debug!(
            "analysis response for {}: {} detections, {} text chars",
            file_name,
            parsed.antenna_detections.len(),
            parsed.text_detections.all_text.len()
        );
        Ok(parsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_trims_trailing_slash() {
        let client =
            AnalysisClient::new("http://localhost:9000/process-image/", Duration::from_secs(5))
                .unwrap();
        assert_eq!(client.endpoint(), "http://localhost:9000/process-image");
    }

    #[tokio::test]
    async fn test_health_check_unreachable() {
        let client =
            AnalysisClient::new("http://127.0.0.1:59999", Duration::from_secs(1)).unwrap();
        assert!(!client.health_check().await);
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_transport_error() {
        let client =
            AnalysisClient::new("http://127.0.0.1:59999", Duration::from_secs(1)).unwrap();
        let err = client
            .process_image("tower1.jpg", vec![0xFF, 0xD8, 0xFF])
            .await
            .unwrap_err();
        assert!(matches!(err, AnalysisError::Transport(_)));
        assert!(err.api_status().is_none());
    }

    #[test]
    fn test_api_status_accessor() {
        let err = AnalysisError::Api {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            body: "boom".to_string(),
        };
        assert_eq!(err.api_status(), Some(StatusCode::INTERNAL_SERVER_ERROR));
    }
}
