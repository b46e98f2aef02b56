//! Session: a backend-issued handle for an interactive SSH command channel.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::id::SessionId;
use crate::time::{Timestamp, now};

/// Default SSH port.
pub const DEFAULT_SSH_PORT: u16 = 22;

/// Login data for opening an SSH session (or storing sudo credentials).
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SshCredentials {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
}

impl SshCredentials {
    #[must_use]
    pub fn new(
        host: impl Into<String>,
        port: Option<u16>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            host: host.into().trim().to_string(),
            port: port.unwrap_or(DEFAULT_SSH_PORT),
            username: username.into().trim().to_string(),
            password: password.into(),
        }
    }

    /// Check that every required field is present.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyField`] for the first missing field,
    /// or [`ValidationError::ZeroPort`].
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.host.is_empty() {
            return Err(ValidationError::EmptyField("host"));
        }
        if self.username.is_empty() {
            return Err(ValidationError::EmptyField("username"));
        }
        if self.password.is_empty() {
            return Err(ValidationError::EmptyField("password"));
        }
        if self.port == 0 {
            return Err(ValidationError::ZeroPort);
        }
        Ok(())
    }

    /// `user@host:port`.
    #[must_use]
    pub fn target(&self) -> String {
        format!("{}@{}:{}", self.username, self.host, self.port)
    }
}

impl fmt::Debug for SshCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SshCredentials")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

/// Backend answer to `ssh/connect`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionGrant {
    pub session_id: SessionId,
    pub prompt: String,
}

/// An open SSH command session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub id: SessionId,
    pub created_at: Timestamp,
    pub target: String,
    pub prompt: String,
}

impl Session {
    #[must_use]
    pub fn open(grant: SessionGrant, credentials: &SshCredentials) -> Self {
        Self {
            id: grant.session_id,
            created_at: now(),
            target: credentials.target(),
            prompt: grant.prompt,
        }
    }
}

/// Result of running one command in a session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CommandOutput {
    pub output: String,
    pub error: String,
    pub prompt: Option<String>,
    pub exit_status: Option<i32>,
}

/// Credentials as reported back by the backend settings endpoint.
///
/// The backend never returns the password.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredCredentials {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_port() -> u16 {
    DEFAULT_SSH_PORT
}

/// Outcome of `settings/test-connection`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnectionTest {
    pub has_sudo: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_default_port_to_22() {
        let creds = SshCredentials::new("nas", None, "admin", "secret");
        assert_eq!(creds.port, 22);
        assert_eq!(creds.target(), "admin@nas:22");
    }

    #[test]
    fn should_trim_host_and_username() {
        let creds = SshCredentials::new("  nas ", Some(2222), " admin ", "secret");
        assert_eq!(creds.host, "nas");
        assert_eq!(creds.username, "admin");
    }

    #[test]
    fn should_reject_missing_password() {
        let creds = SshCredentials::new("nas", None, "admin", "");
        assert_eq!(
            creds.validate(),
            Err(ValidationError::EmptyField("password"))
        );
    }

    #[test]
    fn should_reject_missing_host_first() {
        let creds = SshCredentials::new("", None, "", "");
        assert_eq!(creds.validate(), Err(ValidationError::EmptyField("host")));
    }

    #[test]
    fn should_mask_password_in_debug_output() {
        let creds = SshCredentials::new("nas", None, "admin", "hunter2");
        let debug = format!("{creds:?}");
        assert!(!debug.contains("hunter2"));
    }

    #[test]
    fn should_open_session_from_grant() {
        let creds = SshCredentials::new("nas", None, "admin", "pw");
        let session = Session::open(
            SessionGrant {
                session_id: SessionId::new("admin@nas:22").unwrap(),
                prompt: "admin@nas:~$".to_string(),
            },
            &creds,
        );
        assert_eq!(session.prompt, "admin@nas:~$");
        assert_eq!(session.target, "admin@nas:22");
    }

    #[test]
    fn should_deserialize_command_output_with_missing_fields() {
        let out: CommandOutput = serde_json::from_str(r#"{"output":"hi\n"}"#).unwrap();
        assert_eq!(out.output, "hi\n");
        assert!(out.error.is_empty());
        assert!(out.prompt.is_none());
    }
}
