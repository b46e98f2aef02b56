//! SSH and settings simulation: a tiny shell over the in-memory file tree.

use homeserver_app::ports::{SettingsApi, SshApi};
use homeserver_domain::error::ApiError;
use homeserver_domain::files::join_path;
use homeserver_domain::id::SessionId;
use homeserver_domain::session::{
    CommandOutput, ConnectionTest, SessionGrant, SshCredentials, StoredCredentials,
};
use uuid::Uuid;

use super::State;
use super::filesystem;
use crate::{VirtualBackend, bad_request};

/// Users the simulated host lets run `sudo`.
const SUDOERS: [&str; 2] = ["root", "pi"];

/// An open simulated SSH session.
pub(crate) struct ShellSession {
    pub username: String,
    pub host: String,
    pub cwd: String,
}

impl ShellSession {
    fn home(&self) -> String {
        if self.username == "root" {
            "/root".to_string()
        } else {
            format!("/home/{}", self.username)
        }
    }

    fn prompt(&self) -> String {
        let home = self.home();
        let shown = match self.cwd.strip_prefix(&home) {
            Some(rest) if rest.is_empty() || rest.starts_with('/') => format!("~{rest}"),
            _ => self.cwd.clone(),
        };
        format!("{}@{}:{shown}$", self.username, self.host)
    }

    /// Absolute, normalised path for a shell argument.
    fn resolve(&self, arg: &str) -> String {
        let raw = if arg.is_empty() || arg == "~" {
            self.home()
        } else if let Some(rest) = arg.strip_prefix("~/") {
            join_path(&self.home(), rest)
        } else if arg.starts_with('/') {
            arg.to_string()
        } else {
            join_path(&self.cwd, arg)
        };
        let mut parts: Vec<&str> = Vec::new();
        for segment in raw.split('/') {
            match segment {
                "" | "." => {}
                ".." => {
                    parts.pop();
                }
                other => parts.push(other),
            }
        }
        format!("/{}", parts.join("/"))
    }
}

fn run(state: &mut State, id: &SessionId, command: &str) -> Result<CommandOutput, ApiError> {
    let files = &state.files;
    let session = state.sessions.get_mut(id).ok_or_else(|| ApiError::Status {
        status: 401,
        message: "no active SSH connection".to_string(),
    })?;
    let (program, args) = command
        .trim()
        .split_once(' ')
        .map_or((command.trim(), ""), |(program, args)| (program, args.trim()));

    let mut out = CommandOutput {
        exit_status: Some(0),
        ..CommandOutput::default()
    };
    match program {
        "pwd" => out.output = format!("{}\n", session.cwd),
        "whoami" => out.output = format!("{}\n", session.username),
        "hostname" => out.output = format!("{}\n", session.host),
        "echo" => out.output = format!("{args}\n"),
        "ls" => {
            let target = session.resolve(if args.is_empty() { "." } else { args });
            match filesystem::children(files, &target) {
                Some(items) => {
                    out.output = items
                        .iter()
                        .map(|item| item.name.as_str())
                        .collect::<Vec<_>>()
                        .join("  ");
                    out.output.push('\n');
                }
                None => {
                    out.error = format!("ls: cannot access '{args}': No such file or directory\n");
                    out.exit_status = Some(2);
                }
            }
        }
        "cd" => {
            let target = session.resolve(args);
            if filesystem::is_dir(files, &target) {
                session.cwd = target;
            } else {
                out.error = format!("cd: {args}: No such file or directory\n");
                out.exit_status = Some(1);
            }
        }
        "sudo" => {
            out.output = format!("[sudo] password for {}: ", session.username);
        }
        other => {
            out.error = format!("{other}: command not found\n");
            out.exit_status = Some(127);
        }
    }
    out.prompt = Some(session.prompt());
    Ok(out)
}

fn require_complete(credentials: &SshCredentials) -> Result<(), ApiError> {
    credentials
        .validate()
        .map_err(|_| bad_request("host, username and password required"))
}

impl SshApi for VirtualBackend {
    async fn connect(&self, credentials: &SshCredentials) -> Result<SessionGrant, ApiError> {
        self.with_state(|state| {
            require_complete(credentials)?;
            let session_id = SessionId::new(Uuid::new_v4().to_string())
                .map_err(|err| bad_request(err.to_string()))?;
            let mut session = ShellSession {
                username: credentials.username.clone(),
                host: credentials.host.clone(),
                cwd: "/".to_string(),
            };
            let home = session.home();
            if filesystem::is_dir(&state.files, &home) {
                session.cwd = home;
            }
            let prompt = session.prompt();
            tracing::debug!(session_id = %session_id, target = %credentials.target(), "virtual session opened");
            state.sessions.insert(session_id.clone(), session);
            Ok(SessionGrant { session_id, prompt })
        })
        .await
    }

    async fn execute(&self, session: &SessionId, command: &str) -> Result<CommandOutput, ApiError> {
        self.with_state(|state| run(state, session, command)).await
    }

    async fn disconnect(&self, session: &SessionId) -> Result<String, ApiError> {
        self.with_state(|state| match state.sessions.remove(session) {
            Some(_) => Ok("SSH connection closed".to_string()),
            None => Err(ApiError::Rejected("no active session found".to_string())),
        })
        .await
    }
}

impl SettingsApi for VirtualBackend {
    async fn stored_credentials(&self) -> Result<Option<StoredCredentials>, ApiError> {
        self.with_state(|state| Ok(state.credentials.clone())).await
    }

    async fn save_credentials(&self, credentials: &SshCredentials) -> Result<String, ApiError> {
        self.with_state(|state| {
            require_complete(credentials)?;
            state.credentials = Some(StoredCredentials {
                username: credentials.username.clone(),
                host: credentials.host.clone(),
                port: credentials.port,
            });
            Ok("Credentials saved".to_string())
        })
        .await
    }

    async fn delete_credentials(&self) -> Result<String, ApiError> {
        self.with_state(|state| {
            state.credentials = None;
            Ok("Credentials deleted".to_string())
        })
        .await
    }

    async fn test_connection(&self, credentials: &SshCredentials) -> Result<ConnectionTest, ApiError> {
        self.with_state(|_| {
            require_complete(credentials)?;
            Ok(ConnectionTest {
                has_sudo: SUDOERS.contains(&credentials.username.as_str()),
            })
        })
        .await
    }
}
