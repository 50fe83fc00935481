// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! HTTP request handlers module
//!
//! This module provides the handlers for the API host's bootstrap
//! endpoints: the health check and the hello smoke endpoint.

use axum::{Json, extract::State, response::IntoResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    config::Environment,
    error::ServerError,
    state::{HealthCheck, ServerState},
};

/// Health check endpoint handler
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    summary = "Health check endpoint",
    description = "Returns the current health status of the API host including version, environment, and the number of admission partitions currently tracked.",
    responses(
        (status = 200, description = "Service is healthy", body = HealthCheck),
        (status = 429, description = "Request throttled by the global admission limiter", body = String)
    )
)]
pub async fn health_handler(
    State(state): State<ServerState>,
) -> Result<impl IntoResponse, ServerError> {
    let health = state.health_check().await?;
    Ok(Json(health))
}

/// Greeting returned by the hello smoke endpoint
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HelloResponse {
    /// Static greeting message
    pub message: String,
    /// UTC timestamp of the response
    pub timestamp: String,
    /// Environment the host is running in
    pub environment: Environment,
}

/// Hello smoke endpoint handler
///
/// A throwaway endpoint for verifying the host is up and the middleware
/// chain is wired; real feature endpoints replace it as they land.
#[utoipa::path(
    get,
    path = "/api/hello",
    tag = "bootstrap",
    summary = "Bootstrap smoke endpoint",
    description = "Returns a greeting with the current timestamp and environment. Useful for verifying the middleware chain end to end.",
    responses(
        (status = 200, description = "Host is serving requests", body = HelloResponse),
        (status = 429, description = "Request throttled by the global admission limiter", body = String)
    )
)]
pub async fn hello_handler(State(state): State<ServerState>) -> Json<HelloResponse> {
    Json(HelloResponse {
        message: "Hello from the API host".to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
        environment: state.config().environment,
    })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use admission_control::{AdmissionConfig, AdmissionController};
    use tokio_util::sync::CancellationToken;

    use super::*;
    use crate::config::ServerConfig;

    fn test_state() -> ServerState {
        ServerState::new(
            ServerConfig::for_testing(),
            Arc::new(AdmissionController::new(AdmissionConfig::default())),
            CancellationToken::new(),
        )
    }

    #[tokio::test]
    async fn hello_reports_environment() {
        let Json(body) = hello_handler(State(test_state())).await;
        assert_eq!(body.environment, Environment::Testing);
        assert!(body.message.contains("Hello"));
    }
}
