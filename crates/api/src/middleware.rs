// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Middleware module for HTTP request processing
//!
//! This module provides the global admission middleware. It runs ahead of
//! routing for every inbound request: health and documentation endpoints are
//! gated exactly like API endpoints, matching the process-wide limiter the
//! host is built around.

use std::{net::SocketAddr, time::Duration};

use admission_control::{Decision, RequestInfo};
use axum::{
    Json,
    extract::{ConnectInfo, Request, State},
    http::{HeaderValue, StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::debug;

use crate::state::ServerState;

/// Authenticated principal name for the current request.
///
/// Inserted as a request extension by an authentication layer. No such
/// layer is wired yet, so the `identity-or-host` key policy currently
/// always falls through to the `Host` header.
#[derive(Debug, Clone)]
pub struct ClientIdentity(pub String);

/// Global admission middleware
///
/// Resolves the request's partition key, asks the admission controller for
/// a verdict, and short-circuits with `429 Too Many Requests` on rejection.
/// Admitted requests pass through unchanged.
pub async fn admission_middleware(
    State(state): State<ServerState>,
    req: Request,
    next: Next,
) -> Response {
    let info = request_info(&req);
    let key = state.controller().resolve_key(&info);

    match state.controller().try_acquire(&key) {
        Decision::Admit => next.run(req).await,
        Decision::Reject { retry_after } => {
            // Expected outcome for a throttled client, not a failure.
            debug!(key = %key, "request throttled");
            too_many_requests(retry_after)
        }
    }
}

/// Build the admission request descriptor from whatever the request exposes.
///
/// Nothing here is required: a request with no connection info, identity, or
/// `Host` header resolves to the shared fallback partition downstream.
fn request_info(req: &Request) -> RequestInfo {
    RequestInfo {
        remote_addr: req
            .extensions()
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| *addr),
        identity: req
            .extensions()
            .get::<ClientIdentity>()
            .map(|identity| identity.0.clone()),
        host: req
            .headers()
            .get(header::HOST)
            .and_then(|value| value.to_str().ok())
            .map(ToString::to_string),
    }
}

/// Build the rejection response, with a `Retry-After` hint derived from the
/// partition's window state.
fn too_many_requests(retry_after: Duration) -> Response {
    let status = StatusCode::TOO_MANY_REQUESTS;
    let mut response = (
        status,
        Json(serde_json::json!({
            "error": "too many requests",
            "status": status.as_u16()
        })),
    )
        .into_response();

    let mut seconds = retry_after.as_secs();
    if retry_after.subsec_nanos() > 0 {
        seconds += 1;
    }
    let seconds = seconds.max(1);

    if let Ok(value) = HeaderValue::from_str(&seconds.to_string()) {
        response.headers_mut().insert(header::RETRY_AFTER, value);
    }

    response
}
