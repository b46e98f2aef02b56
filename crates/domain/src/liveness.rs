//! Liveness: client-side inference of backend reachability.
//!
//! Every request outcome feeds [`LivenessState`]. A separate periodic tick
//! calls [`LivenessState::evaluate`] to decide whether the backend should be
//! shown as offline.

use std::time::{Duration, Instant};

/// Time without a successful response after which the backend is offline.
pub const OFFLINE_THRESHOLD: Duration = Duration::from_secs(15);

/// Online/offline change produced by the liveness bookkeeping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LivenessTransition {
    WentOnline,
    WentOffline,
}

/// Process-wide liveness bookkeeping.
#[derive(Debug, Clone)]
pub struct LivenessState {
    online: bool,
    last_success_at: Instant,
    consecutive_failures: u32,
    offline_threshold: Duration,
}

impl LivenessState {
    /// Start online, as if a request had just succeeded at `now`.
    #[must_use]
    pub fn new(now: Instant) -> Self {
        Self::with_threshold(now, OFFLINE_THRESHOLD)
    }

    #[must_use]
    pub fn with_threshold(now: Instant, offline_threshold: Duration) -> Self {
        Self {
            online: true,
            last_success_at: now,
            consecutive_failures: 0,
            offline_threshold,
        }
    }

    #[must_use]
    pub fn is_online(&self) -> bool {
        self.online
    }

    #[must_use]
    pub fn last_success_at(&self) -> Instant {
        self.last_success_at
    }

    #[must_use]
    pub fn consecutive_failures(&self) -> u32 {
        self.consecutive_failures
    }

    /// Record a response from the backend.
    ///
    /// Resets the failure counter and marks the backend online immediately.
    pub fn record_success(&mut self, now: Instant) -> Option<LivenessTransition> {
        self.last_success_at = now;
        self.consecutive_failures = 0;
        if self.online {
            None
        } else {
            self.online = true;
            Some(LivenessTransition::WentOnline)
        }
    }

    /// Record a failed request. Never changes the online flag by itself.
    pub fn record_failure(&mut self) {
        self.consecutive_failures = self.consecutive_failures.saturating_add(1);
    }

    /// Periodic check.
    ///
    /// Goes offline only when the threshold is exceeded while online. Comes
    /// back online only when under the threshold and no failure happened
    /// since the last success.
    pub fn evaluate(&mut self, now: Instant) -> Option<LivenessTransition> {
        let elapsed = now.saturating_duration_since(self.last_success_at);
        let should_be_offline = elapsed > self.offline_threshold;

        if should_be_offline && self.online {
            self.online = false;
            Some(LivenessTransition::WentOffline)
        } else if !should_be_offline && !self.online && self.consecutive_failures == 0 {
            self.online = true;
            Some(LivenessTransition::WentOnline)
        } else {
            None
        }
    }
}
