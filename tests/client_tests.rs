// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Analysis client tests against a local stub of the remote API

use std::net::SocketAddr;
use std::time::Duration;

use axum::extract::Multipart;
use axum::http::{header, StatusCode};
use axum::routing::post;
use axum::Router;

use tower_vision_node::analysis::{AnalysisClient, AnalysisError};

const EXAMPLE_BODY: &str = r#"{
    "text_detections": {"all_text": "TWR-001"},
    "antenna_detections": [
        {"class_name": "panel", "bbox": [10, 10, 50, 60], "confidence": 0.87}
    ]
}"#;

async fn spawn_stub(router: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    addr
}

fn endpoint(addr: SocketAddr) -> String {
    format!("http://{}/process-image", addr)
}

#[tokio::test]
async fn test_success_response_is_parsed() {
    let router = Router::new().route(
        "/process-image",
        post(|mut multipart: Multipart| async move {
            // The image must arrive as multipart field `file`
            let field = multipart.next_field().await.unwrap().unwrap();
            assert_eq!(field.name(), Some("file"));
            assert_eq!(field.file_name(), Some("tower1.jpg"));
            let bytes = field.bytes().await.unwrap();
            assert!(!bytes.is_empty());

            ([(header::CONTENT_TYPE, "application/json")], EXAMPLE_BODY)
        }),
    );
    let addr = spawn_stub(router).await;

    let client = AnalysisClient::new(&endpoint(addr), Duration::from_secs(5)).unwrap();
    let response = client
        .process_image("tower1.jpg", vec![0xFF, 0xD8, 0xFF, 0xE0])
        .await
        .unwrap();

    assert_eq!(response.extracted_text(), "TWR-001");
    assert_eq!(response.antenna_detections.len(), 1);
    assert_eq!(response.antenna_detections[0].class_name, "panel");
    assert_eq!(response.antenna_detections[0].bbox, [10, 10, 50, 60]);
}

#[tokio::test]
async fn test_non_200_is_api_error_with_status() {
    let router = Router::new().route(
        "/process-image",
        post(|| async { (StatusCode::SERVICE_UNAVAILABLE, "model loading") }),
    );
    let addr = spawn_stub(router).await;

    let client = AnalysisClient::new(&endpoint(addr), Duration::from_secs(5)).unwrap();
    let err = client
        .process_image("tower1.jpg", vec![0xFF, 0xD8, 0xFF, 0xE0])
        .await
        .unwrap_err();

    match err {
        AnalysisError::Api { status, body } => {
            assert_eq!(status, reqwest::StatusCode::SERVICE_UNAVAILABLE);
            assert_eq!(body, "model loading");
        }
        other => panic!("expected Api error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_malformed_body_is_decode_error() {
    let router = Router::new().route("/process-image", post(|| async { "definitely not json" }));
    let addr = spawn_stub(router).await;

    let client = AnalysisClient::new(&endpoint(addr), Duration::from_secs(5)).unwrap();
    let err = client
        .process_image("tower1.jpg", vec![0xFF, 0xD8, 0xFF, 0xE0])
        .await
        .unwrap_err();

    assert!(matches!(err, AnalysisError::Decode(_)));
}

#[tokio::test]
async fn test_response_with_no_detections_parses() {
    let router = Router::new().route(
        "/process-image",
        post(|| async {
            (
                [(header::CONTENT_TYPE, "application/json")],
                r#"{"text_detections": {"all_text": ""}, "antenna_detections": []}"#,
            )
        }),
    );
    let addr = spawn_stub(router).await;

    let client = AnalysisClient::new(&endpoint(addr), Duration::from_secs(5)).unwrap();
    let response = client
        .process_image("tower1.jpg", vec![0xFF, 0xD8, 0xFF, 0xE0])
        .await
        .unwrap();

    assert_eq!(response.extracted_text(), "");
    assert!(response.antenna_detections.is_empty());
}
