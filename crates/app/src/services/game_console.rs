//! Game console: live console output of a running game server.
//!
//! Opening a [`ConsoleView`] fetches the output right away and then every
//! [`CONSOLE_REFRESH`]. Sending a command schedules one extra refresh shortly
//! after. Every timer belongs to the view; closing or dropping it stops all
//! console traffic and discards results still in flight.

use std::sync::Arc;
use std::time::Duration;

use homeserver_domain::error::{HomeServerError, ValidationError};
use tokio::sync::watch;

use crate::ports::{GameserverApi, Notifier};
use crate::scheduler::ScheduledTask;
use crate::services::ServiceContext;

/// Interval between two console refreshes.
pub const CONSOLE_REFRESH: Duration = Duration::from_secs(3);

/// Delay between a sent command and the refresh that shows its effect.
pub const COMMAND_FOLLOW_UP: Duration = Duration::from_millis(500);

/// Opens console views.
pub struct GameConsole<A, N> {
    ctx: ServiceContext<A, N>,
    refresh: Duration,
}

impl<A, N> GameConsole<A, N>
where
    A: GameserverApi + 'static,
    N: Notifier + 'static,
{
    #[must_use]
    pub fn new(ctx: ServiceContext<A, N>) -> Self {
        Self {
            ctx,
            refresh: CONSOLE_REFRESH,
        }
    }

    /// Open the console of `server` and start refreshing it.
    #[must_use]
    pub fn open(&self, server: &str) -> ConsoleView<A, N> {
        let (sender, output) = watch::channel(String::new());
        let sender = Arc::new(sender);
        let server: Arc<str> = Arc::from(server);
        tracing::debug!(%server, "console opened");

        let refresh = {
            let ctx = self.ctx.clone();
            let server = Arc::clone(&server);
            let sender = Arc::clone(&sender);
            ScheduledTask::periodic(Duration::ZERO, self.refresh, move || {
                fetch_output(ctx.clone(), Arc::clone(&server), Arc::clone(&sender))
            })
        };

        ConsoleView {
            ctx: self.ctx.clone(),
            server,
            sender,
            output,
            refresh,
            follow_ups: Vec::new(),
        }
    }
}

async fn fetch_output<A: GameserverApi, N: Notifier>(
    ctx: ServiceContext<A, N>,
    server: Arc<str>,
    sender: Arc<watch::Sender<String>>,
) {
    match ctx.call(ctx.api().console_output(&server)).await {
        Ok(output) => {
            sender.send_replace(output);
        }
        Err(err) => tracing::debug!(%server, error = %err, "console refresh failed"),
    }
}

/// An open console. Owns its refresh timers.
pub struct ConsoleView<A, N> {
    ctx: ServiceContext<A, N>,
    server: Arc<str>,
    sender: Arc<watch::Sender<String>>,
    output: watch::Receiver<String>,
    refresh: ScheduledTask,
    follow_ups: Vec<ScheduledTask>,
}

impl<A, N> ConsoleView<A, N>
where
    A: GameserverApi + 'static,
    N: Notifier + 'static,
{
    #[must_use]
    pub fn server(&self) -> &str {
        &self.server
    }

    /// Latest console output.
    #[must_use]
    pub fn output(&self) -> String {
        self.output.borrow().clone()
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<String> {
        self.output.clone()
    }

    /// Send `command` to the server console and refresh shortly after.
    ///
    /// # Errors
    ///
    /// Returns [`HomeServerError::Validation`] for a blank command, or the
    /// backend failure.
    #[tracing::instrument(skip(self), fields(server = %self.server))]
    pub async fn send_command(&mut self, command: &str) -> Result<(), HomeServerError> {
        let command = command.trim();
        if command.is_empty() {
            return Err(self
                .ctx
                .fail("Console", ValidationError::EmptyField("command")));
        }
        self.ctx
            .call(self.ctx.api().send_console_command(&self.server, command))
            .await
            .map_err(|err| self.ctx.fail("Could not send command", err))?;

        self.follow_ups.retain(|task| !task.is_finished());
        self.follow_ups.push(ScheduledTask::after(
            COMMAND_FOLLOW_UP,
            fetch_output(
                self.ctx.clone(),
                Arc::clone(&self.server),
                Arc::clone(&self.sender),
            ),
        ));
        Ok(())
    }

    /// Stop every timer owned by the view.
    pub fn close(self) {
        tracing::debug!(server = %self.server, "console closed");
        self.refresh.cancel();
        for task in &self.follow_ups {
            task.cancel();
        }
    }
}
