//! # homeserver-adapter-virtual
//!
//! Simulated homeserver that keeps every piece of backend state in memory.
//! Lets the CLI and the application services run without a real Raspberry Pi.
//!
//! ## Simulated behaviour
//!
//! | Area | Behaviour |
//! |------|-----------|
//! | System | Stats drift on every call; four systemd services that start and stop |
//! | Network | DNS records and Pi-hole counters held in memory |
//! | Game servers | Installations advance 10 % per status poll; start, stop and console commands change state |
//! | Hosting | Webspaces held in memory, canned Apache log |
//! | SSH | Sessions keyed by a random id, a tiny shell (`pwd`, `cd`, `ls`, `echo`, `whoami`, `sudo`) |
//! | Files | An in-memory tree seeded with `/home/pi`, `/var/www` and `/opt/gameservers` |
//!
//! ## Dependency rule
//!
//! Depends on `homeserver-app` (port traits) and `homeserver-domain` only.

mod sim;

use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use homeserver_domain::error::ApiError;

use sim::State;

/// In-memory backend implementing every API port.
pub struct VirtualBackend {
    state: Mutex<State>,
    latency: Duration,
}

impl Default for VirtualBackend {
    fn default() -> Self {
        Self {
            state: Mutex::new(State::seeded()),
            latency: Duration::ZERO,
        }
    }
}

impl VirtualBackend {
    /// Delay every answer by `latency`, to mimic a slow network.
    #[must_use]
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    async fn respond(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Wait for the simulated latency, then run `f` against the state.
    async fn with_state<T>(
        &self,
        f: impl FnOnce(&mut State) -> Result<T, ApiError> + Send,
    ) -> Result<T, ApiError> {
        self.respond().await;
        f(&mut self.lock())
    }
}

pub(crate) fn not_found(what: &str) -> ApiError {
    ApiError::Status {
        status: 404,
        message: format!("{what} not found"),
    }
}

pub(crate) fn bad_request(message: impl Into<String>) -> ApiError {
    ApiError::Status {
        status: 400,
        message: message.into(),
    }
}
