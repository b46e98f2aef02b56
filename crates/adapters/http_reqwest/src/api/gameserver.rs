//! `gameserver/*`: provisioning, lifecycle, config, console and logs.

use homeserver_app::ports::GameserverApi;
use homeserver_domain::error::ApiError;
use homeserver_domain::gameserver::{
    Gameserver, GameserverAction, GameserverConfig, GameserverLogs, GameserverSpec,
};
use homeserver_domain::id::InstallationId;
use homeserver_domain::installation::{InstallationJob, InstallationStatus};
use serde::Deserialize;
use serde_json::json;

use crate::client::HttpClient;

#[derive(Deserialize)]
struct ServerList {
    #[serde(default)]
    servers: Vec<Gameserver>,
}

#[derive(Deserialize)]
struct Created {
    installation_id: InstallationId,
}

#[derive(Deserialize)]
struct StatusBody {
    status: JobStatus,
}

#[derive(Deserialize)]
struct JobStatus {
    status: InstallationStatus,
    #[serde(default)]
    progress: i64,
    #[serde(default)]
    message: String,
}

#[derive(Deserialize)]
struct ConsoleOutput {
    #[serde(default)]
    output: String,
}

impl GameserverApi for HttpClient {
    async fn list_gameservers(&self) -> Result<Vec<Gameserver>, ApiError> {
        let list: ServerList = self.fetch(self.get(&["gameserver", "list"])).await?;
        Ok(list.servers)
    }

    async fn create_gameserver(&self, spec: &GameserverSpec) -> Result<InstallationId, ApiError> {
        let created: Created = self
            .fetch(self.post(&["gameserver", "create"]).json(spec))
            .await?;
        Ok(created.installation_id)
    }

    async fn installation_status(&self, id: &InstallationId) -> Result<InstallationJob, ApiError> {
        let body: StatusBody = self
            .fetch(self.get(&["gameserver", "installation", id.as_str()]))
            .await?;
        let JobStatus {
            status,
            progress,
            message,
        } = body.status;
        Ok(InstallationJob::new(id.clone(), status, progress, message))
    }

    async fn control_gameserver(
        &self,
        name: &str,
        action: GameserverAction,
    ) -> Result<String, ApiError> {
        self.acknowledge(self.post(&["gameserver", name, action.as_str()]))
            .await
    }

    async fn delete_gameserver(&self, name: &str) -> Result<String, ApiError> {
        self.acknowledge(self.delete(&["gameserver", name, "delete"]))
            .await
    }

    async fn gameserver_config(&self, name: &str) -> Result<GameserverConfig, ApiError> {
        self.fetch(self.get(&["gameserver", name, "config"])).await
    }

    async fn save_gameserver_config(&self, name: &str, content: &str) -> Result<String, ApiError> {
        self.acknowledge(
            self.post(&["gameserver", name, "config"])
                .json(&json!({ "content": content })),
        )
        .await
    }

    async fn console_output(&self, name: &str) -> Result<String, ApiError> {
        let console: ConsoleOutput = self
            .fetch(self.get(&["gameserver", name, "console"]))
            .await?;
        Ok(console.output)
    }

    async fn send_console_command(&self, name: &str, command: &str) -> Result<String, ApiError> {
        self.acknowledge(
            self.post(&["gameserver", name, "command"])
                .json(&json!({ "command": command })),
        )
        .await
    }

    async fn gameserver_logs(&self, name: &str) -> Result<GameserverLogs, ApiError> {
        self.fetch(self.get(&["gameserver", name, "logs"])).await
    }
}
