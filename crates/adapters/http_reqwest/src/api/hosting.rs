//! `webspace/*` and `apache/logs`.

use homeserver_app::ports::HostingApi;
use homeserver_domain::error::ApiError;
use homeserver_domain::webspace::Webspace;
use serde::Deserialize;
use serde_json::json;

use crate::client::HttpClient;

#[derive(Deserialize)]
struct WebspaceList {
    #[serde(default)]
    webspaces: Vec<Webspace>,
}

#[derive(Deserialize)]
struct ApacheLogs {
    #[serde(default)]
    logs: String,
}

impl HostingApi for HttpClient {
    async fn list_webspaces(&self) -> Result<Vec<Webspace>, ApiError> {
        let list: WebspaceList = self.fetch(self.get(&["webspace", "list"])).await?;
        Ok(list.webspaces)
    }

    async fn create_webspace(&self, webspace: &Webspace) -> Result<String, ApiError> {
        self.acknowledge(self.post(&["webspace", "create"]).json(webspace))
            .await
    }

    async fn delete_webspace(&self, domain: &str) -> Result<String, ApiError> {
        self.acknowledge(
            self.delete(&["webspace", "delete"])
                .json(&json!({ "domain": domain })),
        )
        .await
    }

    async fn apache_logs(&self) -> Result<String, ApiError> {
        let logs: ApacheLogs = self.fetch(self.get(&["apache", "logs"])).await?;
        Ok(logs.logs)
    }
}
