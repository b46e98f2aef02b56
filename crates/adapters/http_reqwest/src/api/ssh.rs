//! `ssh/connect`, `ssh/execute`, `ssh/disconnect`.

use homeserver_app::ports::SshApi;
use homeserver_domain::error::ApiError;
use homeserver_domain::id::SessionId;
use homeserver_domain::session::{CommandOutput, SessionGrant, SshCredentials};
use serde::Deserialize;
use serde_json::json;

use crate::client::HttpClient;

#[derive(Deserialize)]
struct Connected {
    session_id: SessionId,
    #[serde(default)]
    prompt: String,
}

impl SshApi for HttpClient {
    async fn connect(&self, credentials: &SshCredentials) -> Result<SessionGrant, ApiError> {
        let connected: Connected = self
            .fetch(self.post(&["ssh", "connect"]).json(credentials))
            .await?;
        Ok(SessionGrant {
            session_id: connected.session_id,
            prompt: connected.prompt,
        })
    }

    async fn execute(&self, session: &SessionId, command: &str) -> Result<CommandOutput, ApiError> {
        self.fetch(
            self.post(&["ssh", "execute"])
                .json(&json!({ "session_id": session, "command": command })),
        )
        .await
    }

    async fn disconnect(&self, session: &SessionId) -> Result<String, ApiError> {
        self.acknowledge(
            self.post(&["ssh", "disconnect"])
                .json(&json!({ "session_id": session })),
        )
        .await
    }
}
