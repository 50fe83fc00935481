// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! `OpenAPI` document definition
//!
//! Aggregates the host's annotated handlers and schemas into the document
//! served at `/api-doc/openapi.json`.

use utoipa::OpenApi;

use crate::{
    config::Environment,
    routes::handlers::HelloResponse,
    state::{HealthCheck, HealthStatus},
};

/// `OpenAPI` documentation for the API host
#[derive(OpenApi)]
#[openapi(
    info(
        title = "API Host",
        description = "HTTP API host with partitioned request admission control. Every request is gated by a fixed-window rate limiter before routing; throttled clients receive 429 with a Retry-After hint.",
    ),
    paths(
        crate::routes::handlers::health_handler,
        crate::routes::handlers::hello_handler,
    ),
    components(schemas(HealthCheck, HealthStatus, HelloResponse, Environment)),
    tags(
        (name = "health", description = "Service health endpoints"),
        (name = "bootstrap", description = "Bootstrap smoke endpoints")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_all_routes() {
        let doc = ApiDoc::openapi();
        let paths: Vec<_> = doc.paths.paths.keys().cloned().collect();
        assert!(paths.contains(&"/health".to_string()));
        assert!(paths.contains(&"/api/hello".to_string()));
    }
}
