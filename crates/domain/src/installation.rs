//! Installation job: backend-tracked asynchronous game-server provisioning.
//!
//! The client drives a small state machine per job:
//!
//! ```text
//! idle ──create ok──▶ active ──complete──▶ complete
//!   │                   │ ├────error─────▶ error
//!   └──create failed──▶ error
//!                       │ ├──poll > max──▶ timed_out
//!                       │ └──view closed─▶ cancelled
//! ```

use serde::{Deserialize, Serialize};

use crate::id::InstallationId;

/// Upper bound of status polls before the job is declared timed out.
pub const MAX_INSTALL_POLLS: u32 = 300;

/// Message surfaced when the poll budget is exhausted.
pub const TIMEOUT_MESSAGE: &str = "installation timed out: the installation took too long";

const UNKNOWN_ERROR_MESSAGE: &str = "unknown installation error";

/// Status reported by the backend for an installation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InstallationStatus {
    Installing,
    Complete,
    Error,
    /// The backend does not know the installation id.
    #[serde(other)]
    Unknown,
}

/// Snapshot of a backend installation job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallationJob {
    pub id: InstallationId,
    pub status: InstallationStatus,
    /// Percentage, clamped to `0..=100`.
    pub progress: u8,
    pub message: String,
}

impl InstallationJob {
    #[must_use]
    pub fn new(
        id: InstallationId,
        status: InstallationStatus,
        progress: i64,
        message: impl Into<String>,
    ) -> Self {
        Self {
            id,
            status,
            progress: clamp_progress(progress),
            message: message.into(),
        }
    }
}

fn clamp_progress(raw: i64) -> u8 {
    u8::try_from(raw.clamp(0, 100)).unwrap_or(100)
}

/// Lifecycle phase of a tracked installation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InstallPhase {
    Idle,
    Active,
    Complete,
    Error,
    TimedOut,
    Cancelled,
}

impl InstallPhase {
    #[must_use]
    pub fn is_terminal(self) -> bool {
        !matches!(self, Self::Idle | Self::Active)
    }
}

/// What the poll loop should do on its next tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollDecision {
    Poll,
    Stop,
}

/// Client-side view of an installation, driven by the poll loop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InstallationProgress {
    pub phase: InstallPhase,
    pub installation_id: Option<InstallationId>,
    pub progress: u8,
    pub message: String,
    pub polls: u32,
}

impl Default for InstallationProgress {
    fn default() -> Self {
        Self {
            phase: InstallPhase::Idle,
            installation_id: None,
            progress: 0,
            message: "sending installation request".to_string(),
            polls: 0,
        }
    }
}

impl InstallationProgress {
    /// The creation request succeeded; polling may begin.
    pub fn activate(&mut self, id: InstallationId) {
        if self.phase != InstallPhase::Idle {
            return;
        }
        self.phase = InstallPhase::Active;
        self.installation_id = Some(id);
        self.message = "installation started".to_string();
    }

    /// Move to the error phase (creation failure or reported error).
    pub fn fail(&mut self, message: impl Into<String>) {
        if self.phase.is_terminal() {
            return;
        }
        self.phase = InstallPhase::Error;
        self.progress = 0;
        self.message = message.into();
    }

    /// The owning view went away.
    pub fn cancel(&mut self) {
        if self.phase.is_terminal() {
            return;
        }
        self.phase = InstallPhase::Cancelled;
    }

    /// Account for one tick of the poll loop.
    ///
    /// Returns [`PollDecision::Stop`] once the job is terminal or when the
    /// tick count exceeds `max_polls`, in which case the job times out.
    pub fn next_poll(&mut self, max_polls: u32) -> PollDecision {
        if self.phase != InstallPhase::Active {
            return PollDecision::Stop;
        }
        self.polls += 1;
        if self.polls > max_polls {
            self.phase = InstallPhase::TimedOut;
            self.message = TIMEOUT_MESSAGE.to_string();
            return PollDecision::Stop;
        }
        PollDecision::Poll
    }

    /// Fold a polled backend snapshot into the progress.
    pub fn apply(&mut self, job: &InstallationJob) {
        if self.phase != InstallPhase::Active {
            return;
        }
        match job.status {
            InstallationStatus::Installing => {
                self.progress = job.progress;
                self.message.clone_from(&job.message);
            }
            InstallationStatus::Complete => {
                self.phase = InstallPhase::Complete;
                self.progress = 100;
                self.message = if job.message.is_empty() {
                    "server installed successfully".to_string()
                } else {
                    job.message.clone()
                };
            }
            InstallationStatus::Error => {
                let message = if job.message.is_empty() {
                    UNKNOWN_ERROR_MESSAGE.to_string()
                } else {
                    job.message.clone()
                };
                self.fail(message);
            }
            InstallationStatus::Unknown => {
                self.fail(format!("installation '{}' not found", job.id));
            }
        }
    }

    #[must_use]
    pub fn is_terminal(&self) -> bool {
        self.phase.is_terminal()
    }
}
