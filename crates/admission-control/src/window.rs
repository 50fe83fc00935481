// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Fixed-window state for a single partition.

use std::time::{Duration, Instant};

/// Permit accounting for one partition's current time slice.
///
/// Invariant: `permits_remaining` never exceeds the configured limit. It
/// only decreases on admission and snaps back to the full limit at slice
/// boundaries. The window does not know its own limit or length; the
/// controller passes both in, which keeps this type a plain value and the
/// configuration in exactly one place.
///
/// All mutation happens under the partition map's entry lock, so the
/// check-then-decrement below is atomic with respect to concurrent callers
/// on the same key.
#[derive(Debug, Clone)]
pub struct FixedWindow {
    /// Permits left in the current slice
    permits_remaining: u32,
    /// When the current slice began
    window_start: Instant,
}

impl FixedWindow {
    /// Create a window with a full budget starting now.
    pub fn new(permit_limit: u32) -> Self {
        Self::starting_at(permit_limit, Instant::now())
    }

    /// Create a window with a full budget starting at `now`.
    pub fn starting_at(permit_limit: u32, now: Instant) -> Self {
        Self {
            permits_remaining: permit_limit,
            window_start: now,
        }
    }

    /// Consume one permit if the window has capacity at `now`.
    ///
    /// An expired slice is replenished to the full `permit_limit` first, so
    /// a partition idle for several windows presents a full budget rather
    /// than an accumulated one. Returns `true` on admission.
    pub fn try_acquire(&mut self, permit_limit: u32, window: Duration, now: Instant) -> bool {
        if self.is_expired(window, now) {
            self.replenish(permit_limit, now);
        }

        if self.permits_remaining > 0 {
            self.permits_remaining -= 1;
            true
        } else {
            false
        }
    }

    /// Whether the current slice has run its course at `now`.
    pub fn is_expired(&self, window: Duration, now: Instant) -> bool {
        now.duration_since(self.window_start) >= window
    }

    /// Reset to a full budget with a slice starting at `now`.
    pub fn replenish(&mut self, permit_limit: u32, now: Instant) {
        self.permits_remaining = permit_limit;
        self.window_start = now;
    }

    /// Permits left in the current slice.
    ///
    /// Reported as-is; callers that care about boundary crossings check
    /// [`is_expired`](Self::is_expired) first.
    pub fn permits_remaining(&self) -> u32 {
        self.permits_remaining
    }

    /// When the current slice began.
    pub fn started_at(&self) -> Instant {
        self.window_start
    }

    /// Time until the current slice ends, measured at `now`.
    ///
    /// Zero when the slice has already expired.
    pub fn time_until_reset(&self, window: Duration, now: Instant) -> Duration {
        window.saturating_sub(now.duration_since(self.window_start))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WINDOW: Duration = Duration::from_secs(60);

    #[test]
    fn fresh_window_holds_full_budget() {
        let window = FixedWindow::new(10);
        assert_eq!(window.permits_remaining(), 10);
    }

    #[test]
    fn admits_until_exhausted() {
        let start = Instant::now();
        let mut window = FixedWindow::starting_at(3, start);

        for _ in 0..3 {
            assert!(window.try_acquire(3, WINDOW, start));
        }
        assert_eq!(window.permits_remaining(), 0);
        assert!(!window.try_acquire(3, WINDOW, start));
        // Still zero, never negative.
        assert_eq!(window.permits_remaining(), 0);
    }

    #[test]
    fn boundary_replenishes_to_full_budget() {
        let start = Instant::now();
        let mut window = FixedWindow::starting_at(5, start);

        for _ in 0..5 {
            assert!(window.try_acquire(5, WINDOW, start));
        }
        assert!(!window.try_acquire(5, WINDOW, start + Duration::from_secs(59)));

        // One second past the boundary: full budget again, not a single permit.
        let later = start + Duration::from_secs(61);
        assert!(window.try_acquire(5, WINDOW, later));
        assert_eq!(window.permits_remaining(), 4);
    }

    #[test]
    fn idle_windows_do_not_accumulate_permits() {
        let start = Instant::now();
        let mut window = FixedWindow::starting_at(5, start);

        // Idle across three whole windows.
        let much_later = start + Duration::from_secs(200);
        assert!(window.try_acquire(5, WINDOW, much_later));
        assert_eq!(window.permits_remaining(), 4);
    }

    #[test]
    fn one_minute_scenario() {
        // permit_limit = 100, window = 1 minute, key "203.0.113.5":
        // 100 admits, the 101st rejects, 61 seconds later admits again.
        let start = Instant::now();
        let mut window = FixedWindow::starting_at(100, start);

        for _ in 0..100 {
            assert!(window.try_acquire(100, WINDOW, start));
        }
        assert!(!window.try_acquire(100, WINDOW, start + Duration::from_secs(1)));
        assert!(window.try_acquire(100, WINDOW, start + Duration::from_secs(61)));
    }

    #[test]
    fn time_until_reset_counts_down() {
        let start = Instant::now();
        let window = FixedWindow::starting_at(1, start);

        assert_eq!(window.time_until_reset(WINDOW, start), WINDOW);
        assert_eq!(
            window.time_until_reset(WINDOW, start + Duration::from_secs(45)),
            Duration::from_secs(15)
        );
        assert_eq!(
            window.time_until_reset(WINDOW, start + Duration::from_secs(90)),
            Duration::ZERO
        );
    }
}
