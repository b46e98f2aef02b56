//! In-memory port implementations shared by the service tests.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use homeserver_domain::dns::DnsEntry;
use homeserver_domain::error::ApiError;
use homeserver_domain::files::{DirectoryListing, FileItem};
use homeserver_domain::gameserver::{
    Gameserver, GameserverAction, GameserverConfig, GameserverKind, GameserverLogs,
    GameserverSpec, GameserverStatus,
};
use homeserver_domain::id::{InstallationId, SessionId};
use homeserver_domain::installation::{InstallationJob, InstallationStatus};
use homeserver_domain::notification::{Notification, NotificationLevel};
use homeserver_domain::power::{MacAddress, PowerAction};
use homeserver_domain::service::{ServiceAction, ServiceInfo, ServiceState};
use homeserver_domain::session::{
    CommandOutput, ConnectionTest, SessionGrant, SshCredentials, StoredCredentials,
};
use homeserver_domain::stats::{PiholeStats, SystemStats};
use homeserver_domain::webspace::Webspace;

use crate::ports::{
    FileApi, GameserverApi, HostingApi, NetworkApi, Notifier, PowerApi, SettingsApi, SshApi,
    SystemApi,
};

/// How a scripted call should fail.
#[derive(Debug, Clone, Copy)]
pub enum Failure {
    Rejected,
    Status(u16),
    Network,
}

impl Failure {
    fn into_error(self) -> ApiError {
        match self {
            Self::Rejected => ApiError::Rejected("rejected by backend".to_string()),
            Self::Status(status) => ApiError::Status {
                status,
                message: "backend error".to_string(),
            },
            Self::Network => ApiError::Network("connection refused".into()),
        }
    }
}

/// Scripted answer to `installation_status`.
#[derive(Debug, Clone)]
pub enum Poll {
    Installing(i64),
    Complete,
    Error(&'static str),
    Unknown,
    Fail(Failure),
}

#[derive(Default)]
pub struct FakeApi {
    calls: Mutex<Vec<String>>,
    failures: Mutex<HashMap<&'static str, Failure>>,
    polls: Mutex<VecDeque<Poll>>,
    outputs: Mutex<VecDeque<Result<CommandOutput, Failure>>>,
    pub servers: Mutex<Vec<Gameserver>>,
    pub console: Mutex<String>,
}

impl FakeApi {
    pub fn new() -> Self {
        Self {
            console: Mutex::new("[Server] Done".to_string()),
            ..Self::default()
        }
    }

    /// Make every call to `op` fail.
    pub fn fail(&self, op: &'static str, failure: Failure) {
        self.failures.lock().unwrap().insert(op, failure);
    }

    pub fn heal(&self, op: &'static str) {
        self.failures.lock().unwrap().remove(op);
    }

    pub fn script_polls(&self, polls: impl IntoIterator<Item = Poll>) {
        self.polls.lock().unwrap().extend(polls);
    }

    pub fn script_output(&self, output: Result<CommandOutput, Failure>) {
        self.outputs.lock().unwrap().push_back(output);
    }

    pub fn with_server(self, name: &str, status: GameserverStatus) -> Self {
        self.servers.lock().unwrap().push(Gameserver {
            name: name.to_string(),
            kind: GameserverKind::MinecraftJava,
            port: 25565,
            ram: 4,
            status,
            created: None,
        });
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    /// Number of calls whose label starts with `op`.
    pub fn count(&self, op: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|call| call.split(':').next() == Some(op))
            .count()
    }

    fn record(&self, op: &'static str, detail: &str) -> Result<(), ApiError> {
        let label = if detail.is_empty() {
            op.to_string()
        } else {
            format!("{op}:{detail}")
        };
        self.calls.lock().unwrap().push(label);
        match self.failures.lock().unwrap().get(op) {
            Some(failure) => Err(failure.into_error()),
            None => Ok(()),
        }
    }
}

impl SystemApi for FakeApi {
    async fn system_stats(&self) -> Result<SystemStats, ApiError> {
        self.record("system_stats", "")?;
        Ok(SystemStats {
            cpu: 12.5,
            ram: 40.0,
            disk: 70.2,
            temp: 48.0,
        })
    }

    async fn list_services(&self) -> Result<Vec<ServiceInfo>, ApiError> {
        self.record("list_services", "")?;
        Ok(vec![ServiceInfo {
            name: "apache2".to_string(),
            status: ServiceState::Running,
        }])
    }

    async fn control_service(&self, name: &str, action: ServiceAction) -> Result<String, ApiError> {
        self.record("control_service", &format!("{name}/{action}"))?;
        Ok(String::new())
    }

    async fn service_status(&self, name: &str) -> Result<String, ApiError> {
        self.record("service_status", name)?;
        Ok(format!("{name}.service - active (running)"))
    }
}

impl NetworkApi for FakeApi {
    async fn list_dns(&self) -> Result<Vec<DnsEntry>, ApiError> {
        self.record("list_dns", "")?;
        Ok(vec![DnsEntry::new("nas.home", "192.168.0.10").unwrap()])
    }

    async fn add_dns(&self, entry: &DnsEntry) -> Result<String, ApiError> {
        self.record("add_dns", &entry.domain)?;
        Ok("DNS entry added".to_string())
    }

    async fn delete_dns(&self, domain: &str) -> Result<String, ApiError> {
        self.record("delete_dns", domain)?;
        Ok("DNS entry deleted".to_string())
    }

    async fn pihole_stats(&self) -> Result<PiholeStats, ApiError> {
        self.record("pihole_stats", "")?;
        Ok(PiholeStats {
            blocked: "12,345".to_string(),
            total: "45,678".to_string(),
            block_rate: "27.0".to_string(),
        })
    }

    async fn add_blocklist(&self, url: &str) -> Result<String, ApiError> {
        self.record("add_blocklist", url)?;
        Ok("Blocklist added".to_string())
    }

    async fn update_gravity(&self) -> Result<String, ApiError> {
        self.record("update_gravity", "")?;
        Ok("Gravity updated".to_string())
    }
}

impl GameserverApi for FakeApi {
    async fn list_gameservers(&self) -> Result<Vec<Gameserver>, ApiError> {
        self.record("list_gameservers", "")?;
        Ok(self.servers.lock().unwrap().clone())
    }

    async fn create_gameserver(&self, spec: &GameserverSpec) -> Result<InstallationId, ApiError> {
        self.record("create_gameserver", &spec.name)?;
        Ok(InstallationId::new(format!("{}_install", spec.name)).unwrap())
    }

    async fn installation_status(&self, id: &InstallationId) -> Result<InstallationJob, ApiError> {
        self.record("installation_status", id.as_str())?;
        let next = self
            .polls
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Poll::Installing(50));
        let job = |status, progress, message: &str| {
            InstallationJob::new(id.clone(), status, progress, message)
        };
        match next {
            Poll::Installing(progress) => Ok(job(
                InstallationStatus::Installing,
                progress,
                "downloading",
            )),
            Poll::Complete => Ok(job(InstallationStatus::Complete, 100, "")),
            Poll::Error(message) => Ok(job(InstallationStatus::Error, 0, message)),
            Poll::Unknown => Ok(job(InstallationStatus::Unknown, 0, "no installation found")),
            Poll::Fail(failure) => Err(failure.into_error()),
        }
    }

    async fn control_gameserver(
        &self,
        name: &str,
        action: GameserverAction,
    ) -> Result<String, ApiError> {
        self.record("control_gameserver", &format!("{name}/{action}"))?;
        Ok(format!("server {name} {action}ed"))
    }

    async fn delete_gameserver(&self, name: &str) -> Result<String, ApiError> {
        self.record("delete_gameserver", name)?;
        Ok("server deleted".to_string())
    }

    async fn gameserver_config(&self, name: &str) -> Result<GameserverConfig, ApiError> {
        self.record("gameserver_config", name)?;
        Ok(GameserverConfig {
            file: "server.properties".to_string(),
            content: "motd=hello".to_string(),
        })
    }

    async fn save_gameserver_config(&self, name: &str, _content: &str) -> Result<String, ApiError> {
        self.record("save_gameserver_config", name)?;
        Ok("configuration saved".to_string())
    }

    async fn console_output(&self, name: &str) -> Result<String, ApiError> {
        self.record("console_output", name)?;
        Ok(self.console.lock().unwrap().clone())
    }

    async fn send_console_command(&self, name: &str, command: &str) -> Result<String, ApiError> {
        self.record("send_console_command", &format!("{name}/{command}"))?;
        Ok("command sent".to_string())
    }

    async fn gameserver_logs(&self, name: &str) -> Result<GameserverLogs, ApiError> {
        self.record("gameserver_logs", name)?;
        Ok(GameserverLogs {
            last_error: Some("port already in use".to_string()),
            logs: "boot\ncrash".to_string(),
        })
    }
}

impl HostingApi for FakeApi {
    async fn list_webspaces(&self) -> Result<Vec<Webspace>, ApiError> {
        self.record("list_webspaces", "")?;
        Ok(vec![Webspace::new("blog.home", "/var/www/blog").unwrap()])
    }

    async fn create_webspace(&self, webspace: &Webspace) -> Result<String, ApiError> {
        self.record("create_webspace", &webspace.domain)?;
        Ok("Webspace created".to_string())
    }

    async fn delete_webspace(&self, domain: &str) -> Result<String, ApiError> {
        self.record("delete_webspace", domain)?;
        Ok("Webspace deleted".to_string())
    }

    async fn apache_logs(&self) -> Result<String, ApiError> {
        self.record("apache_logs", "")?;
        Ok("[error] AH00558".to_string())
    }
}

impl PowerApi for FakeApi {
    async fn power(&self, action: PowerAction) -> Result<String, ApiError> {
        self.record("power", action.as_str())?;
        Ok(format!("system {action}"))
    }

    async fn wake(&self, mac: &MacAddress) -> Result<String, ApiError> {
        self.record("wake", mac.as_str())?;
        Ok("Wake-on-LAN packet sent".to_string())
    }
}

impl SshApi for FakeApi {
    async fn connect(&self, credentials: &SshCredentials) -> Result<SessionGrant, ApiError> {
        self.record("connect", &credentials.host)?;
        Ok(SessionGrant {
            session_id: SessionId::new(credentials.target()).unwrap(),
            prompt: format!("{}@{}:~$", credentials.username, credentials.host),
        })
    }

    async fn execute(&self, _session: &SessionId, command: &str) -> Result<CommandOutput, ApiError> {
        self.record("execute", command)?;
        let scripted = self.outputs.lock().unwrap().pop_front();
        match scripted {
            Some(Ok(output)) => Ok(output),
            Some(Err(failure)) => Err(failure.into_error()),
            None => Ok(CommandOutput {
                output: format!("ran {command}"),
                ..CommandOutput::default()
            }),
        }
    }

    async fn disconnect(&self, session: &SessionId) -> Result<String, ApiError> {
        self.record("disconnect", session.as_str())?;
        Ok("disconnected".to_string())
    }
}

impl SettingsApi for FakeApi {
    async fn stored_credentials(&self) -> Result<Option<StoredCredentials>, ApiError> {
        self.record("stored_credentials", "")?;
        Ok(Some(StoredCredentials {
            username: "pi".to_string(),
            host: "192.168.0.205".to_string(),
            port: 22,
        }))
    }

    async fn save_credentials(&self, credentials: &SshCredentials) -> Result<String, ApiError> {
        self.record("save_credentials", &credentials.username)?;
        Ok("credentials saved".to_string())
    }

    async fn delete_credentials(&self) -> Result<String, ApiError> {
        self.record("delete_credentials", "")?;
        Ok("credentials deleted".to_string())
    }

    async fn test_connection(&self, credentials: &SshCredentials) -> Result<ConnectionTest, ApiError> {
        self.record("test_connection", &credentials.host)?;
        Ok(ConnectionTest { has_sudo: true })
    }
}

impl FileApi for FakeApi {
    async fn list_directory(&self, path: &str) -> Result<DirectoryListing, ApiError> {
        self.record("list_directory", path)?;
        Ok(DirectoryListing {
            path: path.to_string(),
            items: vec![
                FileItem {
                    name: "notes.txt".to_string(),
                    path: format!("{}/notes.txt", path.trim_end_matches('/')),
                    is_directory: false,
                    size: Some(12),
                    modified: None,
                },
                FileItem {
                    name: "docs".to_string(),
                    path: format!("{}/docs", path.trim_end_matches('/')),
                    is_directory: true,
                    size: None,
                    modified: None,
                },
            ],
        })
    }

    async fn read_file(&self, path: &str) -> Result<String, ApiError> {
        self.record("read_file", path)?;
        Ok("hello".to_string())
    }

    async fn write_file(&self, path: &str, _content: &str) -> Result<String, ApiError> {
        self.record("write_file", path)?;
        Ok("file saved".to_string())
    }

    async fn create_folder(&self, parent: &str, name: &str) -> Result<String, ApiError> {
        self.record("create_folder", &format!("{parent}/{name}"))?;
        Ok("folder created".to_string())
    }

    async fn rename(&self, old_path: &str, new_name: &str) -> Result<String, ApiError> {
        self.record("rename", &format!("{old_path}->{new_name}"))?;
        Ok("renamed".to_string())
    }

    async fn delete_path(&self, path: &str) -> Result<String, ApiError> {
        self.record("delete_path", path)?;
        Ok("deleted".to_string())
    }

    async fn download(&self, path: &str) -> Result<Vec<u8>, ApiError> {
        self.record("download", path)?;
        Ok(b"hello".to_vec())
    }

    async fn upload(&self, directory: &str, file_name: &str, _bytes: Vec<u8>) -> Result<String, ApiError> {
        self.record("upload", &format!("{directory}/{file_name}"))?;
        Ok("uploaded".to_string())
    }
}

/// Keeps every notification for later inspection.
#[derive(Default)]
pub struct RecordingNotifier {
    seen: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    pub fn all(&self) -> Vec<Notification> {
        self.seen.lock().unwrap().clone()
    }

    pub fn last(&self) -> Option<Notification> {
        self.seen.lock().unwrap().last().cloned()
    }

    pub fn count(&self, level: NotificationLevel) -> usize {
        self.seen
            .lock()
            .unwrap()
            .iter()
            .filter(|n| n.level == level)
            .count()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: Notification) {
        self.seen.lock().unwrap().push(notification);
    }
}
