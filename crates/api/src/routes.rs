// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Routes module
//!
//! This module provides route configuration for the API host. Admission
//! gating is *not* applied here: the server installs it on top of the
//! assembled router, so every route below (health and docs included) sits
//! behind the global limiter.

pub mod handlers;

use axum::{Router, routing::get};
use handlers::{health_handler, hello_handler};

use crate::{
    openapi::{openapi_spec, swagger_ui},
    state::ServerState,
};

/// Create application routes
pub fn create_routes() -> Router<ServerState> {
    let health_routes = Router::new().route("/health", get(health_handler));

    let docs_routes = Router::new()
        .route("/api-doc/openapi.json", get(openapi_spec))
        .route("/swagger-ui", get(swagger_ui));

    // Business endpoints are deferred; the hello route is the bootstrap
    // smoke endpoint until feature packages land.
    let api_routes = Router::new().route("/api/hello", get(hello_handler));

    Router::new()
        .merge(health_routes)
        .merge(docs_routes)
        .merge(api_routes)
}
