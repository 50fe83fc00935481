// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! The admission controller: partition map, decisions, replenishment.

use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace, warn};

use crate::config::AdmissionConfig;
use crate::key::RequestInfo;
use crate::window::FixedWindow;

/// The background replenisher ticks several times per window so due windows
/// are restored close to their boundary.
const REPLENISH_TICK_DIVISOR: u32 = 4;
/// Floor for the replenisher tick, so sub-second windows don't spin.
const MIN_REPLENISH_TICK: Duration = Duration::from_millis(10);

/// Outcome of an admission check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// The request may proceed; one permit was consumed.
    Admit,
    /// The partition's budget is exhausted for the current window.
    Reject {
        /// Time until the partition's window resets. Suitable for a
        /// `Retry-After` hint; not load-bearing.
        retry_after: Duration,
    },
}

impl Decision {
    /// Whether the request was admitted.
    pub fn is_admitted(&self) -> bool {
        matches!(self, Decision::Admit)
    }
}

/// Partitioned fixed-window admission controller.
///
/// One [`FixedWindow`] per observed partition key, created lazily on first
/// sight with a full budget. The map grows for the process lifetime unless
/// [`max_partitions`](AdmissionConfig::max_partitions) opts into eviction.
///
/// Fixed-window counting costs O(1) memory per partition and a
/// one-comparison decision. A burst straddling a window boundary can be
/// admitted up to twice the limit in a short span; under steady load each
/// partition sees at most `permit_limit` admits per window.
///
/// The controller is explicitly constructed and shared via [`Arc`]; it holds
/// no process-global state.
#[derive(Debug)]
pub struct AdmissionController {
    /// Window state per partition key
    partitions: DashMap<String, FixedWindow>,
    /// Immutable controller configuration
    config: AdmissionConfig,
}

impl AdmissionController {
    /// Create a controller from a validated configuration.
    pub fn new(config: AdmissionConfig) -> Self {
        Self {
            partitions: DashMap::new(),
            config,
        }
    }

    /// The controller's configuration.
    pub fn config(&self) -> &AdmissionConfig {
        &self.config
    }

    /// Derive the partition key for a request via the configured policy.
    pub fn resolve_key(&self, info: &RequestInfo) -> String {
        self.config.key_policy.resolve(info)
    }

    /// Atomically check and consume one permit for `key`.
    ///
    /// An unknown key gets a fresh partition with a full budget; an expired
    /// window is replenished before the check. The check-then-decrement runs
    /// under the partition's map-entry lock, so concurrent callers on the
    /// same key serialize there and the permit count can neither go negative
    /// nor exceed the limit. There are no await points and no lock shared
    /// across partitions.
    pub fn try_acquire(&self, key: &str) -> Decision {
        let now = Instant::now();

        if let Some(cap) = self.config.max_partitions
            && self.partitions.len() > cap
        {
            self.enforce_partition_cap(cap, now);
        }

        let permit_limit = self.config.permit_limit.value();
        let window = self.config.window.value();

        trace!(key = %key, "checking admission");

        // Fast path: the partition already exists; avoid allocating the key.
        if let Some(mut entry) = self.partitions.get_mut(key) {
            return Self::decide(key, entry.value_mut(), permit_limit, window, now);
        }

        let mut entry = self.partitions.entry(key.to_owned()).or_insert_with(|| {
            debug!(key = %key, limit = permit_limit, "creating partition window");
            FixedWindow::starting_at(permit_limit, now)
        });
        Self::decide(key, entry.value_mut(), permit_limit, window, now)
    }

    fn decide(
        key: &str,
        state: &mut FixedWindow,
        permit_limit: u32,
        window: Duration,
        now: Instant,
    ) -> Decision {
        if state.try_acquire(permit_limit, window, now) {
            Decision::Admit
        } else {
            // A normal outcome, not a failure.
            debug!(key = %key, "partition budget exhausted");
            Decision::Reject {
                retry_after: state.time_until_reset(window, now),
            }
        }
    }

    /// Restore every due window to a full budget.
    ///
    /// Called by the replenisher task; acquire paths replenish lazily as
    /// well, so running this is never required for correctness.
    pub fn replenish_due(&self) {
        let now = Instant::now();
        let permit_limit = self.config.permit_limit.value();
        let window = self.config.window.value();

        let mut restored = 0usize;
        for mut entry in self.partitions.iter_mut() {
            if entry.value().is_expired(window, now) {
                entry.value_mut().replenish(permit_limit, now);
                restored += 1;
            }
        }

        if restored > 0 {
            trace!(windows = restored, "replenished due windows");
        }
    }

    /// Number of partitions currently tracked.
    pub fn partition_count(&self) -> usize {
        self.partitions.len()
    }

    /// Raw permits left in `key`'s current window, if the partition exists.
    ///
    /// Reported without applying boundary replenishment; primarily for
    /// introspection and tests.
    pub fn permits_remaining(&self, key: &str) -> Option<u32> {
        self.partitions.get(key).map(|w| w.permits_remaining())
    }

    /// Run the periodic replenish/eviction sweep until cancelled.
    ///
    /// Spawned by the host when
    /// [`auto_replenish`](AdmissionConfig::auto_replenish) is set; windows
    /// are then restored independently of whether their partition receives
    /// traffic.
    pub async fn run_replenisher(self: Arc<Self>, cancellation_token: CancellationToken) {
        let window = self.config.window.value();
        let period = (window / REPLENISH_TICK_DIVISOR).max(MIN_REPLENISH_TICK);

        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        debug!(period = ?period, "admission replenisher started");

        loop {
            tokio::select! {
                () = cancellation_token.cancelled() => {
                    debug!("admission replenisher stopped");
                    break;
                }
                _ = ticker.tick() => {
                    self.replenish_due();
                    if let Some(cap) = self.config.max_partitions
                        && self.partitions.len() > cap
                    {
                        self.enforce_partition_cap(cap, Instant::now());
                    }
                }
            }
        }
    }

    /// Evict partitions once the map exceeds the configured cap.
    ///
    /// Dropping an expired-window entry is invisible to callers: the next
    /// acquire recreates it with a full budget, the same outcome a reset
    /// would have produced. Only if the map is still over the cap are the
    /// oldest live windows dropped, which does reset their mid-window
    /// budget.
    fn enforce_partition_cap(&self, cap: usize, now: Instant) {
        let window = self.config.window.value();
        let before = self.partitions.len();

        self.partitions
            .retain(|_, state| !state.is_expired(window, now));

        let after = self.partitions.len();
        if after < before {
            debug!(evicted = before - after, "evicted expired partitions");
        }

        if after > cap {
            warn!(
                partitions = after,
                cap, "partition map still over cap after eviction, dropping oldest"
            );

            let mut oldest: Vec<_> = self
                .partitions
                .iter()
                .map(|entry| (entry.key().clone(), entry.value().started_at()))
                .collect();
            oldest.sort_by_key(|(_, started)| *started);

            let excess = after - cap / 2;
            for (key, _) in oldest.into_iter().take(excess) {
                self.partitions.remove(&key);
            }
        }
    }
}
