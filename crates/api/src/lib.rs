// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! API Host Server Implementation
//!
//! This crate provides the HTTP host process, built with Axum. It is a
//! bootstrap: it wires cross-cutting middleware (request-id, tracing, CORS,
//! timeouts, and the global admission limiter), the health and documentation
//! endpoints, and coordinated graceful shutdown. Business endpoints and
//! authentication are deferred to feature packages.
//!
//! # Module Structure
//!
//! - [`config`]: Server configuration and environment management with hierarchical loading
//! - [`docs`]: `OpenAPI` document definition
//! - [`error`]: Error types and HTTP response handling with proper status codes
//! - [`middleware`]: The global admission middleware gating every request
//! - [`openapi`]: `OpenAPI` specification and Swagger UI endpoints
//! - [`routes`]: Route configuration and HTTP request handlers
//! - [`server`]: Main server implementation, lifecycle, and coordinated shutdown
//! - [`state`]: Shared application state with cancellation token support
//!
//! # Key Features
//!
//! - **Global Request Admission**: partitioned fixed-window limiting ahead of
//!   routing; throttled clients receive `429` with a `Retry-After` hint
//! - **Graceful Shutdown**: coordinated termination using `CancellationToken`
//! - **Health Monitoring**: liveness endpoint reporting version, environment,
//!   and tracked admission partitions
//! - **Comprehensive Middleware**: request tracing, CORS, timeouts

pub mod config;
pub mod docs;
pub mod error;
pub mod middleware;
pub mod openapi;
pub mod routes;
pub mod server;
pub mod state;

pub use admission_control::{
    AdmissionConfig, AdmissionController, Decision, KeyPolicy, PermitLimit, RequestInfo,
    WindowDuration,
};
pub use config::{Environment, ServerConfig};
pub use error::{ServerError, ServerResult};
pub use server::Server;
pub use state::{HealthCheck, HealthStatus, ServerState};
