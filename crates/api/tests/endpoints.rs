// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Integration tests for the bootstrap endpoints

use api::{Server, ServerConfig};
use axum::http::StatusCode;

async fn start_test_server() -> std::net::SocketAddr {
    let config = ServerConfig::for_testing();
    let (addr, _token) = Server::new(config)
        .expect("Failed to create server")
        .run_for_testing()
        .await
        .expect("Failed to start test server");
    addr
}

#[tokio::test]
async fn health_reports_status() {
    let addr = start_test_server().await;
    let client = reqwest::Client::new();

    let response = client
        .get(format!("http://{addr}/health"))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::OK);

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "Up");
    assert_eq!(body["environment"], "testing");
    // The health request itself was admitted, so its partition is tracked.
    assert_eq!(body["admission_partitions"], 1);
}

#[tokio::test]
async fn hello_greets_with_environment() {
    let addr = start_test_server().await;
    let client = reqwest::Client::new();

    let response = client
        .get(format!("http://{addr}/api/hello"))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::OK);

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert!(
        body["message"]
            .as_str()
            .expect("message field")
            .contains("Hello")
    );
    assert_eq!(body["environment"], "testing");
    assert!(body["timestamp"].is_string());
}

#[tokio::test]
async fn openapi_document_lists_routes() {
    let addr = start_test_server().await;
    let client = reqwest::Client::new();

    let response = client
        .get(format!("http://{addr}/api-doc/openapi.json"))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::OK);

    let document: serde_json::Value = response.json().await.expect("Failed to parse document");
    assert!(document["paths"]["/health"].is_object());
    assert!(document["paths"]["/api/hello"].is_object());
}

#[tokio::test]
async fn swagger_ui_is_served() {
    let addr = start_test_server().await;
    let client = reqwest::Client::new();

    let response = client
        .get(format!("http://{addr}/swagger-ui"))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::OK);

    let body = response.text().await.expect("Failed to read response");
    assert!(body.contains("swagger-ui"));
}
