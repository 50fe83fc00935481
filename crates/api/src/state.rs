// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Server state management module
//!
//! This module provides shared application state for the API host: the
//! configuration, the shared admission controller, and the cancellation
//! token for coordinated shutdown.

use std::sync::Arc;

use admission_control::AdmissionController;
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use utoipa::ToSchema;

use crate::{
    config::{Environment, ServerConfig},
    error::ServerResult,
};

/// Shared application state with cancellation token support
#[derive(Debug, Clone)]
pub struct ServerState {
    /// Server configuration
    config: ServerConfig,
    /// Admission controller gating every inbound request
    controller: Arc<AdmissionController>,
    /// Cancellation token for coordinated shutdown
    pub cancellation_token: CancellationToken,
}

impl ServerState {
    /// Create new server state
    ///
    /// # Arguments
    ///
    /// * `config` - Server configuration
    /// * `controller` - Shared admission controller
    /// * `cancellation_token` - Token for coordinated cancellation
    pub fn new(
        config: ServerConfig,
        controller: Arc<AdmissionController>,
        cancellation_token: CancellationToken,
    ) -> Self {
        Self {
            config,
            controller,
            cancellation_token,
        }
    }

    /// Server configuration
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// The shared admission controller
    pub fn controller(&self) -> &Arc<AdmissionController> {
        &self.controller
    }

    /// Perform health check operations
    pub async fn health_check(&self) -> ServerResult<HealthCheck> {
        let status = if self.cancellation_token.is_cancelled() {
            HealthStatus::Down {
                reason: Box::from("shutdown in progress"),
            }
        } else {
            HealthStatus::Up
        };

        Ok(HealthCheck {
            status,
            version: Box::from(env!("CARGO_PKG_VERSION")),
            environment: self.config.environment,
            timestamp: chrono::Utc::now().to_rfc3339(),
            admission_partitions: self.controller.partition_count(),
        })
    }
}

/// Health status of the service
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
pub enum HealthStatus {
    /// Service is fully operational and responding normally
    Up,

    /// Service is not operational or winding down
    Down {
        /// Human-readable explanation of why the service is down
        reason: Box<str>,
    },
}

/// Health check status
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthCheck {
    /// Service status
    pub status: HealthStatus,
    /// Service version
    pub version: Box<str>,
    /// Environment
    pub environment: Environment,
    /// Timestamp
    pub timestamp: String,
    /// Number of admission partitions currently tracked
    pub admission_partitions: usize,
}

#[cfg(test)]
mod tests {
    use admission_control::AdmissionConfig;

    use super::*;

    fn state_for_tests() -> ServerState {
        let config = ServerConfig::default();
        let controller = Arc::new(AdmissionController::new(AdmissionConfig::default()));
        ServerState::new(config, controller, CancellationToken::new())
    }

    #[test]
    fn server_state_creation() {
        let state = state_for_tests();
        assert!(!state.cancellation_token.is_cancelled());
        assert_eq!(state.controller().partition_count(), 0);
    }

    #[tokio::test]
    async fn health_reports_up_with_partition_count() {
        let state = state_for_tests();
        state.controller().try_acquire("203.0.113.5");

        let health = state.health_check().await.expect("health check");
        assert_eq!(health.status, HealthStatus::Up);
        assert_eq!(&*health.version, env!("CARGO_PKG_VERSION"));
        assert_eq!(health.admission_partitions, 1);
    }

    #[tokio::test]
    async fn health_reports_down_after_cancellation() {
        let state = state_for_tests();
        state.cancellation_token.cancel();

        let health = state.health_check().await.expect("health check");
        assert!(matches!(health.status, HealthStatus::Down { .. }));
    }
}
