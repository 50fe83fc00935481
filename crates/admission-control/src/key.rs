// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Partition-key resolution.
//!
//! The HTTP layer hands the controller a [`RequestInfo`] descriptor; the
//! configured [`KeyPolicy`] derives the partition key from it. Resolution
//! never fails: a request with no usable source degrades to the shared
//! [`FALLBACK_KEY`] partition, which means all such requests draw from one
//! budget.

use std::net::SocketAddr;

use serde::{Deserialize, Serialize};

/// Partition key used when no better source is available on the request.
pub const FALLBACK_KEY: &str = "unknown";

/// The request attributes the admission layer needs for key resolution.
///
/// This is a plain value type so the core stays independent of any
/// particular HTTP framework; the middleware fills it from whatever the
/// transport exposes.
#[derive(Debug, Clone, Default)]
pub struct RequestInfo {
    /// Remote address of the underlying connection, when known
    pub remote_addr: Option<SocketAddr>,
    /// Authenticated principal name, when an auth layer has established one
    pub identity: Option<String>,
    /// The request's `Host` header value
    pub host: Option<String>,
}

/// Deployment-time choice of how requests are partitioned.
///
/// Exactly one policy is active per process; it is part of
/// [`AdmissionConfig`](crate::AdmissionConfig) and never varies per request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum KeyPolicy {
    /// Partition by the connection's remote IP address. The default: the
    /// peer address cannot be forged by a request header.
    #[default]
    RemoteAddress,
    /// Partition by authenticated identity, falling back to the request's
    /// `Host` header for unauthenticated traffic.
    IdentityOrHost,
}

impl KeyPolicy {
    /// Derive the partition key for a request.
    pub fn resolve(&self, info: &RequestInfo) -> String {
        match self {
            KeyPolicy::RemoteAddress => info
                .remote_addr
                .map_or_else(|| FALLBACK_KEY.to_string(), |addr| addr.ip().to_string()),
            KeyPolicy::IdentityOrHost => info
                .identity
                .clone()
                .or_else(|| info.host.clone())
                .unwrap_or_else(|| FALLBACK_KEY.to_string()),
        }
    }
}
