//! Backend liveness shared by the request gateway and the monitor task.
//!
//! [`Liveness`] owns the process-wide [`LivenessState`] and publishes the
//! online flag on a `watch` channel. The gateway records request outcomes;
//! [`spawn_liveness_monitor`] re-evaluates the state on a fixed tick so the
//! backend is declared offline even when no request is in flight.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use homeserver_domain::liveness::{LivenessState, LivenessTransition, OFFLINE_THRESHOLD};
use tokio::sync::watch;
use tokio::time::Instant;

use crate::scheduler::ScheduledTask;

/// Interval between two liveness evaluations.
pub const LIVENESS_TICK: Duration = Duration::from_secs(1);

struct Inner {
    state: Mutex<LivenessState>,
    online: watch::Sender<bool>,
}

/// Cloneable handle to the shared liveness state.
#[derive(Clone)]
pub struct Liveness {
    inner: Arc<Inner>,
}

impl Default for Liveness {
    fn default() -> Self {
        Self::new()
    }
}

impl Liveness {
    /// Start online, as if a request had just succeeded.
    #[must_use]
    pub fn new() -> Self {
        Self::with_threshold(OFFLINE_THRESHOLD)
    }

    #[must_use]
    pub fn with_threshold(threshold: Duration) -> Self {
        let state = LivenessState::with_threshold(Instant::now().into_std(), threshold);
        let (online, _) = watch::channel(state.is_online());
        Self {
            inner: Arc::new(Inner {
                state: Mutex::new(state),
                online,
            }),
        }
    }

    /// Receive every online/offline flip.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.inner.online.subscribe()
    }

    #[must_use]
    pub fn is_online(&self) -> bool {
        self.lock().is_online()
    }

    #[must_use]
    pub fn consecutive_failures(&self) -> u32 {
        self.lock().consecutive_failures()
    }

    /// The backend answered.
    pub fn record_success(&self) {
        let transition = self.lock().record_success(Instant::now().into_std());
        self.publish(transition);
    }

    /// The request failed at the HTTP level.
    pub fn record_failure(&self) {
        let failures = {
            let mut state = self.lock();
            state.record_failure();
            state.consecutive_failures()
        };
        tracing::debug!(failures, "backend request failed");
    }

    /// Compare the time since the last success against the threshold.
    pub fn evaluate(&self) -> Option<LivenessTransition> {
        let transition = self.lock().evaluate(Instant::now().into_std());
        self.publish(transition);
        transition
    }

    fn publish(&self, transition: Option<LivenessTransition>) {
        match transition {
            Some(LivenessTransition::WentOffline) => {
                tracing::warn!("backend unreachable, switching to offline mode");
                self.inner.online.send_replace(false);
            }
            Some(LivenessTransition::WentOnline) => {
                tracing::info!("backend reachable again");
                self.inner.online.send_replace(true);
            }
            None => {}
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, LivenessState> {
        self.inner
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

/// Evaluate `liveness` every `tick` until the returned handle is dropped.
#[must_use]
pub fn spawn_liveness_monitor(liveness: Liveness, tick: Duration) -> ScheduledTask {
    ScheduledTask::periodic(tick, tick, move || {
        liveness.evaluate();
        std::future::ready(())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time;

    #[tokio::test(start_paused = true)]
    async fn should_stay_online_while_requests_succeed() {
        let liveness = Liveness::new();
        let _monitor = spawn_liveness_monitor(liveness.clone(), LIVENESS_TICK);

        for _ in 0..30 {
            time::sleep(Duration::from_secs(1)).await;
            liveness.record_success();
        }

        assert!(liveness.is_online());
        assert_eq!(liveness.consecutive_failures(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn should_publish_offline_exactly_once() {
        let liveness = Liveness::new();
        let mut rx = liveness.subscribe();
        let _monitor = spawn_liveness_monitor(liveness.clone(), LIVENESS_TICK);

        time::sleep(Duration::from_millis(15_500)).await;
        assert!(liveness.is_online());

        time::sleep(Duration::from_secs(1)).await;
        assert!(!liveness.is_online());
        assert!(rx.has_changed().unwrap());
        assert!(!*rx.borrow_and_update());

        time::sleep(Duration::from_secs(30)).await;
        assert!(!rx.has_changed().unwrap());
    }

    #[tokio::test(start_paused = true)]
    async fn should_come_back_online_on_next_success() {
        let liveness = Liveness::new();
        let mut rx = liveness.subscribe();
        let _monitor = spawn_liveness_monitor(liveness.clone(), LIVENESS_TICK);

        time::sleep(Duration::from_secs(20)).await;
        assert!(!*rx.borrow_and_update());

        liveness.record_success();
        assert!(*rx.borrow_and_update());
        assert!(liveness.is_online());
    }

    #[tokio::test(start_paused = true)]
    async fn should_not_flip_offline_on_failures_alone() {
        let liveness = Liveness::new();
        let _monitor = spawn_liveness_monitor(liveness.clone(), LIVENESS_TICK);

        for _ in 0..5 {
            liveness.record_failure();
        }
        time::sleep(Duration::from_secs(5)).await;

        assert!(liveness.is_online());
        assert_eq!(liveness.consecutive_failures(), 5);
    }
}
