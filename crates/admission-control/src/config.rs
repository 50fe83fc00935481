// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Admission controller configuration.
//!
//! Configuration is immutable once a controller is constructed. Invalid
//! values (a zero permit limit, a zero-length window) are rejected when the
//! validated newtypes are built, so a process cannot start with an
//! ill-defined limiter.

use std::time::Duration;

use serde::{Deserialize, Deserializer, Serialize, de};

use crate::error::{AdmissionError, Result};
use crate::key::KeyPolicy;

/// Permits granted per partition per window when not configured otherwise.
const DEFAULT_PERMIT_LIMIT: u32 = 100;
/// Window length when not configured otherwise.
const DEFAULT_WINDOW_SECS: u64 = 60;

/// A validated permit limit, guaranteed to be greater than zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PermitLimit(u32);

impl PermitLimit {
    /// Create a new `PermitLimit`.
    ///
    /// # Errors
    ///
    /// Returns [`AdmissionError::Config`] if `limit` is zero: a limiter that
    /// can never admit is a misconfiguration, not a policy.
    pub fn new(limit: u32) -> Result<Self> {
        if limit == 0 {
            return Err(AdmissionError::Config(
                "permit limit must be greater than 0".to_string(),
            ));
        }
        Ok(Self(limit))
    }

    /// Get the permit limit value.
    pub fn value(&self) -> u32 {
        self.0
    }
}

impl Default for PermitLimit {
    fn default() -> Self {
        Self(DEFAULT_PERMIT_LIMIT)
    }
}

impl<'de> Deserialize<'de> for PermitLimit {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let limit = u32::deserialize(deserializer)?;
        Self::new(limit).map_err(|e| de::Error::custom(e.to_string()))
    }
}

/// A validated window duration, guaranteed to be non-zero.
///
/// Deserializes from a whole number of seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WindowDuration(Duration);

impl WindowDuration {
    /// Create a new `WindowDuration` from a duration.
    ///
    /// # Errors
    ///
    /// Returns [`AdmissionError::Config`] if the duration is zero.
    pub fn new(window: Duration) -> Result<Self> {
        if window.is_zero() {
            return Err(AdmissionError::Config(
                "window duration must be non-zero".to_string(),
            ));
        }
        Ok(Self(window))
    }

    /// Create a new `WindowDuration` from a whole number of seconds.
    ///
    /// # Errors
    ///
    /// Returns [`AdmissionError::Config`] if `seconds` is zero.
    pub fn from_secs(seconds: u64) -> Result<Self> {
        Self::new(Duration::from_secs(seconds))
    }

    /// Get the window duration value.
    pub fn value(&self) -> Duration {
        self.0
    }
}

impl Default for WindowDuration {
    fn default() -> Self {
        Self(Duration::from_secs(DEFAULT_WINDOW_SECS))
    }
}

impl<'de> Deserialize<'de> for WindowDuration {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let seconds = u64::deserialize(deserializer)?;
        Self::from_secs(seconds).map_err(|e| de::Error::custom(e.to_string()))
    }
}

/// Configuration for an [`AdmissionController`](crate::AdmissionController).
///
/// Read once at startup; never re-read per request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdmissionConfig {
    /// Permits available per window per partition
    #[serde(default)]
    pub permit_limit: PermitLimit,

    /// Length of each fixed window, in seconds on the wire
    #[serde(default)]
    pub window: WindowDuration,

    /// When set, a background task restores due windows without waiting for
    /// the partition to be queried. Lazy reset-on-access happens regardless,
    /// so the admit/reject behavior is identical either way.
    #[serde(default = "default_auto_replenish")]
    pub auto_replenish: bool,

    /// How requests are mapped to partitions
    #[serde(default)]
    pub key_policy: KeyPolicy,

    /// Optional cap on tracked partitions. `None` (the default) preserves
    /// one entry per observed key for the process lifetime; `Some(n)` opts
    /// into evicting expired windows once the map grows past `n`.
    #[serde(default)]
    pub max_partitions: Option<usize>,
}

fn default_auto_replenish() -> bool {
    true
}

impl Default for AdmissionConfig {
    fn default() -> Self {
        Self {
            permit_limit: PermitLimit::default(),
            window: WindowDuration::default(),
            auto_replenish: true,
            key_policy: KeyPolicy::default(),
            max_partitions: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn permit_limit_validation() {
        assert!(PermitLimit::new(0).is_err());
        assert!(PermitLimit::new(1).is_ok());
        assert_eq!(PermitLimit::default().value(), 100);
    }

    #[test]
    fn window_duration_validation() {
        assert!(WindowDuration::new(Duration::ZERO).is_err());
        assert!(WindowDuration::from_secs(0).is_err());
        assert!(WindowDuration::from_secs(1).is_ok());
        assert_eq!(WindowDuration::default().value(), Duration::from_secs(60));
    }

    #[test]
    fn defaults_match_deployment_profile() {
        let config = AdmissionConfig::default();
        assert_eq!(config.permit_limit.value(), 100);
        assert_eq!(config.window.value(), Duration::from_secs(60));
        assert!(config.auto_replenish);
        assert_eq!(config.key_policy, KeyPolicy::RemoteAddress);
        assert!(config.max_partitions.is_none());
    }

    #[test]
    fn invalid_values_fail_deserialization() {
        assert!(serde_json::from_str::<PermitLimit>("0").is_err());
        assert!(serde_json::from_str::<WindowDuration>("0").is_err());

        let config: AdmissionConfig =
            serde_json::from_str(r#"{"permit_limit": 5, "window": 2}"#).expect("valid config");
        assert_eq!(config.permit_limit.value(), 5);
        assert_eq!(config.window.value(), Duration::from_secs(2));
        assert!(config.auto_replenish);
    }
}
