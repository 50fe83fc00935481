// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Partitioned fixed-window request admission control.
//!
//! This crate decides, for each inbound request, whether it may proceed.
//! Requests are partitioned into independent budgets by a configurable key
//! policy (remote address by default); each partition owns a fixed window of
//! permits that replenishes at window boundaries. The crate knows nothing
//! about HTTP: callers hand it a [`RequestInfo`] descriptor and act on the
//! returned [`Decision`].
//!
//! # Module Structure
//!
//! - [`config`]: validated controller configuration
//! - [`controller`]: the partition map and admit/reject decisions
//! - [`error`]: error types (startup-time configuration only)
//! - [`key`]: partition-key policies and the request descriptor
//! - [`window`]: per-partition fixed-window state
//!
//! # Example
//!
//! ```
//! use admission_control::{AdmissionConfig, AdmissionController};
//!
//! let controller = AdmissionController::new(AdmissionConfig::default());
//! assert!(controller.try_acquire("203.0.113.5").is_admitted());
//! ```
//!
//! All counters are in-memory and reset on process restart; coordinating
//! limits across processes is explicitly out of scope.

pub mod config;
pub mod controller;
pub mod error;
pub mod key;
pub mod window;

pub use config::{AdmissionConfig, PermitLimit, WindowDuration};
pub use controller::{AdmissionController, Decision};
pub use error::{AdmissionError, Result};
pub use key::{FALLBACK_KEY, KeyPolicy, RequestInfo};
pub use window::FixedWindow;
