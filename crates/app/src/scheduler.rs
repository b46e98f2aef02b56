//! Scheduled tasks owned by views.
//!
//! A [`ScheduledTask`] wraps a spawned tokio task. Cancelling the handle, or
//! dropping it, aborts the task at its next await point, so a view that goes
//! away takes all of its timers with it.

use std::future::Future;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};

/// Handle to a background task that is aborted on drop.
#[derive(Debug)]
pub struct ScheduledTask {
    handle: JoinHandle<()>,
}

impl ScheduledTask {
    /// Spawn `future` as an owned task.
    pub fn spawn<F>(future: F) -> Self
    where
        F: Future<Output = ()> + Send + 'static,
    {
        Self {
            handle: tokio::spawn(future),
        }
    }

    /// Run `tick` every `period`, first after `initial_delay`.
    ///
    /// Each run is awaited before the next tick is taken; late ticks are
    /// delayed rather than bunched up, so runs never overlap.
    pub fn periodic<F, Fut>(initial_delay: Duration, period: Duration, mut tick: F) -> Self
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        Self::spawn(async move {
            let mut interval = time::interval_at(Instant::now() + initial_delay, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                tick().await;
            }
        })
    }

    /// Run `future` once after `delay`.
    pub fn after<F>(delay: Duration, future: F) -> Self
    where
        F: Future<Output = ()> + Send + 'static,
    {
        Self::spawn(async move {
            time::sleep(delay).await;
            future.await;
        })
    }

    /// Abort the task. Idempotent.
    pub fn cancel(&self) {
        self.handle.abort();
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Wait for the task to end, either by completing or by being cancelled.
    pub async fn wait(&mut self) {
        let _ = (&mut self.handle).await;
    }
}

impl Drop for ScheduledTask {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn counter() -> (Arc<AtomicU32>, impl FnMut() -> std::future::Ready<()> + Send + 'static) {
        let count = Arc::new(AtomicU32::new(0));
        let inner = Arc::clone(&count);
        let tick = move || {
            inner.fetch_add(1, Ordering::SeqCst);
            std::future::ready(())
        };
        (count, tick)
    }

    #[tokio::test(start_paused = true)]
    async fn should_tick_periodically_after_initial_delay() {
        let (count, tick) = counter();
        let _task = ScheduledTask::periodic(Duration::ZERO, Duration::from_secs(3), tick);

        time::sleep(Duration::from_millis(10)).await;
        assert_eq!(count.load(Ordering::SeqCst), 1);

        time::sleep(Duration::from_secs(6)).await;
        assert_eq!(count.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn should_stop_ticking_once_cancelled() {
        let (count, tick) = counter();
        let task = ScheduledTask::periodic(Duration::ZERO, Duration::from_secs(1), tick);

        time::sleep(Duration::from_millis(1500)).await;
        task.cancel();
        let seen = count.load(Ordering::SeqCst);

        time::sleep(Duration::from_secs(10)).await;
        assert_eq!(count.load(Ordering::SeqCst), seen);
    }

    #[tokio::test(start_paused = true)]
    async fn should_abort_on_drop() {
        let (count, tick) = counter();
        let task = ScheduledTask::periodic(Duration::from_secs(1), Duration::from_secs(1), tick);
        drop(task);

        time::sleep(Duration::from_secs(5)).await;
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn should_run_one_shot_after_delay() {
        let (count, mut tick) = counter();
        let mut task = ScheduledTask::after(Duration::from_millis(500), async move {
            tick().await;
        });

        time::sleep(Duration::from_millis(499)).await;
        assert_eq!(count.load(Ordering::SeqCst), 0);

        task.wait().await;
        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert!(task.is_finished());
    }
}
