//! SSH terminal: command echo over a backend-held SSH session.
//!
//! The terminal owns at most one [`Session`]. Input is echoed locally,
//! recorded in a most-recent-first history and forwarded to `ssh/execute`.
//! `exit` is handled locally and closes the session instead.

use homeserver_domain::error::{HomeServerError, SessionError};
use homeserver_domain::notification::Notification;
use homeserver_domain::session::{CommandOutput, Session, SshCredentials};
use homeserver_domain::terminal::{
    CommandHistory, LineKind, TerminalLine, is_exit_command, is_password_prompt,
};

use crate::ports::{Notifier, SshApi};
use crate::services::ServiceContext;

/// What happened to a submitted line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    /// Blank input, nothing was done.
    Ignored,
    /// The command ran on the remote host.
    Executed(CommandOutput),
    /// `exit` was entered and the session was closed.
    Exited,
}

pub struct SshTerminal<A, N> {
    ctx: ServiceContext<A, N>,
    session: Option<Session>,
    credentials: Option<SshCredentials>,
    history: CommandHistory,
    lines: Vec<TerminalLine>,
    prompt: String,
    last_output: String,
}

impl<A: SshApi, N: Notifier> SshTerminal<A, N> {
    #[must_use]
    pub fn new(ctx: ServiceContext<A, N>) -> Self {
        Self {
            ctx,
            session: None,
            credentials: None,
            history: CommandHistory::new(),
            lines: Vec::new(),
            prompt: "$".to_string(),
            last_output: String::new(),
        }
    }

    #[must_use]
    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.session.is_some()
    }

    #[must_use]
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    #[must_use]
    pub fn lines(&self) -> &[TerminalLine] {
        &self.lines
    }

    /// Take the lines written since the last call.
    pub fn drain_lines(&mut self) -> Vec<TerminalLine> {
        std::mem::take(&mut self.lines)
    }

    #[must_use]
    pub fn history(&self) -> &CommandHistory {
        &self.history
    }

    pub fn history_mut(&mut self) -> &mut CommandHistory {
        &mut self.history
    }

    /// Whether the last output asks for a password.
    #[must_use]
    pub fn awaiting_password(&self) -> bool {
        is_password_prompt(&self.last_output)
    }

    /// Open a session with `credentials`.
    ///
    /// # Errors
    ///
    /// Returns [`HomeServerError::Validation`] for incomplete credentials,
    /// [`SessionError::AlreadyConnected`] when a session is open, or the
    /// backend failure.
    #[tracing::instrument(skip(self, credentials), fields(target = %credentials.target()))]
    pub async fn connect(&mut self, credentials: SshCredentials) -> Result<&Session, HomeServerError> {
        credentials
            .validate()
            .map_err(|err| self.ctx.fail("SSH login", err))?;
        if let Some(session) = &self.session {
            let err = SessionError::AlreadyConnected(session.target.clone());
            return Err(self.ctx.fail("SSH login", err));
        }

        let grant = match self.ctx.call(self.ctx.api().connect(&credentials)).await {
            Ok(grant) => grant,
            Err(err) => {
                self.push(LineKind::Error, format!("Connection failed: {err}"));
                return Err(self.ctx.fail("SSH connection failed", err));
            }
        };

        let session = Session::open(grant, &credentials);
        tracing::info!(session_id = %session.id, "ssh session opened");
        self.prompt.clone_from(&session.prompt);
        self.push(LineKind::Success, format!("Connected to {}", session.target));
        self.push(
            LineKind::Info,
            "Type 'exit' or disconnect to close the session",
        );
        self.ctx
            .notify(Notification::success(format!("Connected to {}", session.target)));
        self.credentials = Some(credentials);
        Ok(self.session.insert(session))
    }

    /// Handle one line of user input.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::NotConnected`] without any request when no
    /// session is open, or the backend failure. A 401/404/410 answer means
    /// the backend dropped the session; it is discarded locally too.
    pub async fn submit(&mut self, input: &str) -> Result<Submission, HomeServerError> {
        let command = input.trim();
        if command.is_empty() {
            return Ok(Submission::Ignored);
        }
        let Some(session_id) = self.session.as_ref().map(|s| s.id.clone()) else {
            self.push(LineKind::Error, SessionError::NotConnected.to_string());
            return Err(self.ctx.fail("Terminal", SessionError::NotConnected));
        };

        self.history.push(command);
        self.push(LineKind::Command, format!("{} {command}", self.prompt));

        if is_exit_command(command) {
            self.disconnect().await;
            return Ok(Submission::Exited);
        }

        match self.ctx.call(self.ctx.api().execute(&session_id, command)).await {
            Ok(output) => {
                self.show(&output);
                Ok(Submission::Executed(output))
            }
            Err(err) => Err(self.execution_failed(err)),
        }
    }

    /// Send the login password as input, on explicit request of the user.
    ///
    /// The password is echoed masked.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::NotConnected`] or
    /// [`SessionError::NoSavedPassword`] without a request, or the backend
    /// failure.
    pub async fn autofill_password(&mut self) -> Result<CommandOutput, HomeServerError> {
        let Some(session_id) = self.session.as_ref().map(|s| s.id.clone()) else {
            return Err(self.ctx.fail("Terminal", SessionError::NotConnected));
        };
        let Some(password) = self
            .credentials
            .as_ref()
            .map(|c| c.password.clone())
            .filter(|p| !p.is_empty())
        else {
            tracing::debug!("no saved password available for auto-fill");
            return Err(SessionError::NoSavedPassword.into());
        };

        match self.ctx.call(self.ctx.api().execute(&session_id, &password)).await {
            Ok(output) => {
                self.push(LineKind::Output, "*".repeat(password.chars().count()));
                self.show(&output);
                Ok(output)
            }
            Err(err) => Err(self.execution_failed(err)),
        }
    }

    /// Close the session.
    ///
    /// The local session is always discarded, whatever the backend answers.
    pub async fn disconnect(&mut self) {
        let Some(session) = self.session.take() else {
            return;
        };
        self.credentials = None;
        self.last_output.clear();
        match self.ctx.call(self.ctx.api().disconnect(&session.id)).await {
            Ok(_) => tracing::info!(session_id = %session.id, "ssh session closed"),
            Err(err) => {
                tracing::warn!(session_id = %session.id, error = %err, "disconnect failed, session dropped locally");
            }
        }
        self.prompt = "$".to_string();
        self.push(LineKind::Info, format!("Disconnected from {}", session.target));
        self.ctx.notify(Notification::info("SSH connection closed"));
    }

    fn show(&mut self, output: &CommandOutput) {
        if !output.output.is_empty() {
            self.push(LineKind::Output, output.output.clone());
        }
        if !output.error.is_empty() {
            self.push(LineKind::Error, output.error.clone());
        }
        if let Some(prompt) = &output.prompt {
            self.prompt.clone_from(prompt);
        }
        self.last_output = format!("{}{}", output.output, output.error);
    }

    fn execution_failed(&mut self, err: homeserver_domain::error::ApiError) -> HomeServerError {
        self.push(LineKind::Error, format!("Error: {err}"));
        if err.is_stale_handle() {
            if let Some(session) = self.session.take() {
                tracing::warn!(session_id = %session.id, "session no longer known by backend");
            }
            self.credentials = None;
            self.prompt = "$".to_string();
            self.push(LineKind::Info, "Session expired, please reconnect");
        }
        self.ctx.fail("Command failed", err)
    }

    fn push(&mut self, kind: LineKind, text: impl Into<String>) {
        self.lines.push(TerminalLine::new(kind, text));
    }
}
