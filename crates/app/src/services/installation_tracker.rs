//! Installation tracker: create a game server and follow its installation.
//!
//! [`InstallationTracker::start`] sends the creation request. Only when the
//! backend accepts it does a poll task start; it queries the job once per
//! interval until the job completes, fails, exceeds its poll budget or the
//! returned [`InstallationHandle`] is cancelled or dropped.

use std::sync::Arc;
use std::time::Duration;

use homeserver_domain::error::HomeServerError;
use homeserver_domain::gameserver::GameserverSpec;
use homeserver_domain::id::InstallationId;
use homeserver_domain::installation::{
    InstallPhase, InstallationProgress, MAX_INSTALL_POLLS, PollDecision,
};
use homeserver_domain::notification::Notification;
use tokio::sync::watch;
use tokio::time::{self, Instant, MissedTickBehavior};

use crate::ports::{GameserverApi, Notifier};
use crate::scheduler::ScheduledTask;
use crate::services::ServiceContext;

/// Interval between two installation status polls.
pub const INSTALL_POLL_INTERVAL: Duration = Duration::from_secs(1);

pub struct InstallationTracker<A, N> {
    ctx: ServiceContext<A, N>,
    poll_interval: Duration,
    max_polls: u32,
}

impl<A, N> InstallationTracker<A, N>
where
    A: GameserverApi + 'static,
    N: Notifier + 'static,
{
    #[must_use]
    pub fn new(ctx: ServiceContext<A, N>) -> Self {
        Self::with_limits(ctx, INSTALL_POLL_INTERVAL, MAX_INSTALL_POLLS)
    }

    #[must_use]
    pub fn with_limits(ctx: ServiceContext<A, N>, poll_interval: Duration, max_polls: u32) -> Self {
        Self {
            ctx,
            poll_interval,
            max_polls,
        }
    }

    /// Request the installation and start polling it.
    ///
    /// # Errors
    ///
    /// Returns the creation failure (transport error or `success: false`);
    /// no poll task is started in that case.
    #[tracing::instrument(skip(self, spec), fields(server = %spec.name, kind = %spec.kind))]
    pub async fn start(&self, spec: GameserverSpec) -> Result<InstallationHandle, HomeServerError> {
        let id = self
            .ctx
            .call(self.ctx.api().create_gameserver(&spec))
            .await
            .map_err(|err| self.ctx.fail("Could not create game server", err))?;
        tracing::info!(installation_id = %id, "installation started");
        self.ctx
            .notify(Notification::info(format!("Installing {}...", spec.name)));

        let mut progress = InstallationProgress::default();
        progress.activate(id.clone());
        let (sender, receiver) = watch::channel(progress);
        let sender = Arc::new(sender);

        let task = ScheduledTask::spawn(poll_loop(
            self.ctx.clone(),
            id.clone(),
            spec.name,
            Arc::clone(&sender),
            self.poll_interval,
            self.max_polls,
        ));

        Ok(InstallationHandle {
            id,
            sender,
            receiver,
            task,
        })
    }
}

async fn poll_loop<A: GameserverApi, N: Notifier>(
    ctx: ServiceContext<A, N>,
    id: InstallationId,
    server: String,
    progress: Arc<watch::Sender<InstallationProgress>>,
    poll_interval: Duration,
    max_polls: u32,
) {
    let mut interval = time::interval_at(Instant::now() + poll_interval, poll_interval);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        interval.tick().await;

        let mut decision = PollDecision::Stop;
        progress.send_modify(|p| decision = p.next_poll(max_polls));
        if decision == PollDecision::Stop {
            break;
        }

        match ctx.call(ctx.api().installation_status(&id)).await {
            Ok(job) => {
                tracing::debug!(progress = job.progress, status = ?job.status, "installation polled");
                progress.send_modify(|p| p.apply(&job));
            }
            Err(err) if err.is_stale_handle() => {
                progress.send_modify(|p| p.fail(format!("installation '{id}' not found")));
            }
            Err(err) => {
                tracing::warn!(installation_id = %id, error = %err, "installation poll failed");
            }
        }

        if progress.borrow().is_terminal() {
            break;
        }
    }

    let last = progress.borrow().clone();
    match last.phase {
        InstallPhase::Complete => {
            tracing::info!(installation_id = %id, "installation complete");
            ctx.notify(Notification::success(format!("{server} installed successfully")));
        }
        InstallPhase::Error | InstallPhase::TimedOut => {
            tracing::warn!(installation_id = %id, phase = ?last.phase, message = %last.message, "installation ended");
            ctx.notify(Notification::error(format!(
                "Installation of {server} failed: {}",
                last.message
            )));
        }
        _ => {}
    }
}

/// View-side handle on a running installation.
///
/// Dropping the handle cancels the poll task.
pub struct InstallationHandle {
    id: InstallationId,
    sender: Arc<watch::Sender<InstallationProgress>>,
    receiver: watch::Receiver<InstallationProgress>,
    task: ScheduledTask,
}

impl InstallationHandle {
    #[must_use]
    pub fn id(&self) -> &InstallationId {
        &self.id
    }

    #[must_use]
    pub fn progress(&self) -> InstallationProgress {
        self.receiver.borrow().clone()
    }

    /// Follow every progress update.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<InstallationProgress> {
        self.receiver.clone()
    }

    /// Stop polling. A job that already ended keeps its final phase.
    pub fn cancel(&self) {
        self.task.cancel();
        self.sender.send_modify(InstallationProgress::cancel);
    }

    /// Wait for the poll task to end and return the final progress.
    pub async fn wait(&mut self) -> InstallationProgress {
        self.task.wait().await;
        self.progress()
    }
}
