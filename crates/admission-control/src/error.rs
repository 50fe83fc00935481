// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Error types for admission control.

use thiserror::Error;

/// Errors produced while constructing admission-control components.
///
/// Per-request outcomes are never errors: a rejected request is an ordinary
/// [`Decision`](crate::Decision) value. Only configuration that would leave
/// the limiter ill-defined is rejected, and that happens before a controller
/// can be constructed.
#[derive(Error, Debug)]
pub enum AdmissionError {
    /// Configuration validation errors
    #[error("invalid admission configuration: {0}")]
    Config(String),
}

/// Result type alias for admission-control operations.
pub type Result<T> = std::result::Result<T, AdmissionError>;
