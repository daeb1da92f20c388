//! # Exponential Backoff
//!
//! Requeue delays for objects that failed to reconcile. The sequence
//! doubles from the minimum up to a hard cap; the default used for
//! reconciliation errors is 30s, 1m, 2m, 4m, 8m, 10m (max).

use std::time::Duration;

/// Exponential backoff calculator.
///
/// Each call to `next_backoff` returns the current delay and doubles it,
/// capped at `max_seconds`. The reconciler tracks one instance per object
/// key and drops it after a successful reconciliation.
#[derive(Debug, Clone)]
pub struct ExponentialBackoff {
    /// Minimum backoff value in seconds (for reset)
    min_seconds: u64,
    /// Current backoff value in seconds
    current_seconds: u64,
    /// Maximum backoff value in seconds
    max_seconds: u64,
}

impl ExponentialBackoff {
    /// First delay handed out for a newly failing object.
    pub const DEFAULT_MIN_SECONDS: u64 = 30;

    /// Cap on the delay for an object that keeps failing.
    pub const DEFAULT_MAX_SECONDS: u64 = 600;

    /// Create a new exponential backoff with the given bounds in seconds.
    #[must_use]
    pub fn new(min_seconds: u64, max_seconds: u64) -> Self {
        Self {
            min_seconds,
            current_seconds: min_seconds,
            max_seconds,
        }
    }

    /// Get the next backoff duration in seconds and advance the sequence.
    pub fn next_backoff_seconds(&mut self) -> u64 {
        let result_seconds = self.current_seconds;
        self.current_seconds =
            std::cmp::min(self.current_seconds.saturating_mul(2), self.max_seconds);
        result_seconds
    }

    /// Get the next backoff duration as a `Duration` and advance the sequence.
    #[must_use]
    pub fn next_backoff(&mut self) -> Duration {
        Duration::from_secs(self.next_backoff_seconds())
    }

    /// Reset the backoff to the initial state.
    #[allow(dead_code)] // Utility method, exercised in tests
    pub fn reset(&mut self) {
        self.current_seconds = self.min_seconds;
    }
}

impl Default for ExponentialBackoff {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MIN_SECONDS, Self::DEFAULT_MAX_SECONDS)
    }
}
