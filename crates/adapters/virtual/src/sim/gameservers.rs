//! Game-server simulation: installations that progress on every poll.

use homeserver_app::ports::GameserverApi;
use homeserver_domain::error::ApiError;
use homeserver_domain::gameserver::{
    Gameserver, GameserverAction, GameserverConfig, GameserverKind, GameserverLogs,
    GameserverSpec, GameserverStatus,
};
use homeserver_domain::id::InstallationId;
use homeserver_domain::installation::{InstallationJob, InstallationStatus};
use homeserver_domain::time::now;
use uuid::Uuid;

use super::State;
use crate::{VirtualBackend, bad_request, not_found};

/// Progress added by every status poll.
const PROGRESS_STEP: u8 = 10;

/// Lines of console output returned per request.
const CONSOLE_TAIL: usize = 50;

/// A running or finished simulated installation.
pub(crate) struct Installation {
    pub server: String,
    pub progress: u8,
}

impl Installation {
    fn advance(&mut self) -> (InstallationStatus, &'static str) {
        self.progress = self.progress.saturating_add(PROGRESS_STEP).min(100);
        match self.progress {
            100 => (InstallationStatus::Complete, "Installation complete"),
            p if p < 40 => (InstallationStatus::Installing, "Downloading server files"),
            p if p < 80 => (InstallationStatus::Installing, "Extracting"),
            _ => (InstallationStatus::Installing, "Writing configuration"),
        }
    }
}

fn config_for(kind: &GameserverKind, spec_port: u16) -> (String, String) {
    match kind {
        GameserverKind::MinecraftJava | GameserverKind::MinecraftBedrock => (
            "server.properties".to_string(),
            format!("motd=A Minecraft Server\nserver-port={spec_port}\nmax-players=20\n"),
        ),
        GameserverKind::BeamMp => (
            "ServerConfig.toml".to_string(),
            format!("[General]\nPort = {spec_port}\nMaxPlayers = 8\n"),
        ),
        _ => ("config.txt".to_string(), format!("port={spec_port}\n")),
    }
}

impl State {
    fn server_mut(&mut self, name: &str) -> Result<&mut Gameserver, ApiError> {
        self.gameservers
            .iter_mut()
            .find(|server| server.name == name)
            .ok_or_else(|| not_found("server"))
    }

    fn console_mut(&mut self, name: &str) -> &mut Vec<String> {
        self.consoles.entry(name.to_string()).or_default()
    }
}

impl GameserverApi for VirtualBackend {
    async fn list_gameservers(&self) -> Result<Vec<Gameserver>, ApiError> {
        self.with_state(|state| Ok(state.gameservers.clone())).await
    }

    async fn create_gameserver(&self, spec: &GameserverSpec) -> Result<InstallationId, ApiError> {
        self.with_state(|state| {
            if state.gameservers.iter().any(|s| s.name == spec.name) {
                return Err(bad_request(format!(
                    "a server named '{}' already exists",
                    spec.name
                )));
            }
            let id = InstallationId::new(format!("{}_{}", spec.name, Uuid::new_v4().simple()))
                .map_err(|err| bad_request(err.to_string()))?;
            state.gameservers.push(Gameserver {
                name: spec.name.clone(),
                kind: spec.kind.clone(),
                port: spec.port,
                ram: spec.ram,
                status: GameserverStatus::Installing,
                created: Some(now().to_rfc3339()),
            });
            let (file, content) = config_for(&spec.kind, spec.port);
            state.configs.insert(spec.name.clone(), format!("{file}\n{content}"));
            state.installations.insert(
                id.clone(),
                Installation {
                    server: spec.name.clone(),
                    progress: 0,
                },
            );
            tracing::info!(installation_id = %id, server = %spec.name, "virtual installation started");
            Ok(id)
        })
        .await
    }

    async fn installation_status(&self, id: &InstallationId) -> Result<InstallationJob, ApiError> {
        self.with_state(|state| {
            let Some(installation) = state.installations.get_mut(id) else {
                return Ok(InstallationJob::new(
                    id.clone(),
                    InstallationStatus::Unknown,
                    0,
                    "no installation found",
                ));
            };
            let (status, message) = installation.advance();
            let progress = i64::from(installation.progress);
            let server = installation.server.clone();
            let finished = status == InstallationStatus::Complete;
            if let Some(entry) = state.gameservers.iter_mut().find(|s| {
                finished && s.name == server && s.status == GameserverStatus::Installing
            }) {
                entry.status = GameserverStatus::Stopped;
            }
            Ok(InstallationJob::new(id.clone(), status, progress, message))
        })
        .await
    }

    async fn control_gameserver(
        &self,
        name: &str,
        action: GameserverAction,
    ) -> Result<String, ApiError> {
        self.with_state(|state| {
            let server = state.server_mut(name)?;
            let line = match action {
                GameserverAction::Start | GameserverAction::Restart => {
                    server.status = GameserverStatus::Running;
                    "[Server] Done! For help, type \"help\""
                }
                GameserverAction::Stop => {
                    server.status = GameserverStatus::Stopped;
                    "[Server] Stopping the server"
                }
            };
            state.console_mut(name).push(line.to_string());
            Ok(format!("Server {name}: {action} executed"))
        })
        .await
    }

    async fn delete_gameserver(&self, name: &str) -> Result<String, ApiError> {
        self.with_state(|state| {
            state.server_mut(name)?;
            state.gameservers.retain(|server| server.name != name);
            state.consoles.remove(name);
            state.configs.remove(name);
            state.installations.retain(|_, inst| inst.server != name);
            Ok(format!("Server {name} deleted"))
        })
        .await
    }

    async fn gameserver_config(&self, name: &str) -> Result<GameserverConfig, ApiError> {
        self.with_state(|state| {
            state.server_mut(name)?;
            let stored = state.configs.get(name).ok_or_else(|| not_found("config file"))?;
            let (file, content) = stored.split_once('\n').unwrap_or((stored.as_str(), ""));
            Ok(GameserverConfig {
                file: file.to_string(),
                content: content.to_string(),
            })
        })
        .await
    }

    async fn save_gameserver_config(&self, name: &str, content: &str) -> Result<String, ApiError> {
        self.with_state(|state| {
            state.server_mut(name)?;
            let stored = state.configs.get(name).ok_or_else(|| not_found("config file"))?;
            let file = stored.split_once('\n').map_or(stored.as_str(), |(file, _)| file);
            let updated = format!("{file}\n{content}");
            state.configs.insert(name.to_string(), updated);
            Ok("Configuration saved".to_string())
        })
        .await
    }

    async fn console_output(&self, name: &str) -> Result<String, ApiError> {
        self.with_state(|state| {
            let lines = state.consoles.get(name).map(Vec::as_slice).unwrap_or_default();
            if lines.is_empty() {
                return Ok("No console output available".to_string());
            }
            let start = lines.len().saturating_sub(CONSOLE_TAIL);
            Ok(lines[start..].join("\n"))
        })
        .await
    }

    async fn send_console_command(&self, name: &str, command: &str) -> Result<String, ApiError> {
        self.with_state(|state| {
            let server = state.server_mut(name)?;
            if server.status != GameserverStatus::Running {
                return Err(bad_request(format!("server '{name}' is not running")));
            }
            if command == "stop" {
                server.status = GameserverStatus::Stopped;
            }
            let console = state.console_mut(name);
            console.push(format!("> {command}"));
            console.push(match command {
                "stop" => "[Server] Stopping the server".to_string(),
                "list" => "[Server] There are 0 of a max of 20 players online".to_string(),
                other => format!("[Server] Unknown command '{other}'"),
            });
            Ok("Command sent".to_string())
        })
        .await
    }

    async fn gameserver_logs(&self, name: &str) -> Result<GameserverLogs, ApiError> {
        self.with_state(|state| {
            let status = state.server_mut(name)?.status;
            let logs = state.consoles.get(name).map(|lines| lines.join("\n")).unwrap_or_default();
            Ok(GameserverLogs {
                last_error: (status == GameserverStatus::Error)
                    .then(|| "installation failed".to_string()),
                logs,
            })
        })
        .await
    }
}
