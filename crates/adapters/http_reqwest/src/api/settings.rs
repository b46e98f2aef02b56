//! `settings/credentials` and `settings/test-connection`.

use homeserver_app::ports::SettingsApi;
use homeserver_domain::error::ApiError;
use homeserver_domain::session::{ConnectionTest, SshCredentials, StoredCredentials};
use serde::Deserialize;

use crate::client::HttpClient;

#[derive(Deserialize)]
struct Credentials {
    #[serde(default)]
    credentials: Option<StoredCredentials>,
}

#[derive(Deserialize)]
struct TestOutcome {
    #[serde(default)]
    has_sudo: bool,
}

impl SettingsApi for HttpClient {
    async fn stored_credentials(&self) -> Result<Option<StoredCredentials>, ApiError> {
        let body: Credentials = self.fetch(self.get(&["settings", "credentials"])).await?;
        Ok(body.credentials)
    }

    async fn save_credentials(&self, credentials: &SshCredentials) -> Result<String, ApiError> {
        self.acknowledge(self.post(&["settings", "credentials"]).json(credentials))
            .await
    }

    async fn delete_credentials(&self) -> Result<String, ApiError> {
        self.acknowledge(self.delete(&["settings", "credentials"]))
            .await
    }

    async fn test_connection(&self, credentials: &SshCredentials) -> Result<ConnectionTest, ApiError> {
        let outcome: TestOutcome = self
            .fetch(self.post(&["settings", "test-connection"]).json(credentials))
            .await?;
        Ok(ConnectionTest {
            has_sudo: outcome.has_sudo,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_backend;
    use axum::routing::{get, post};
    use axum::{Json, Router};
    use serde_json::json;

    #[tokio::test]
    async fn should_read_missing_credentials_as_none() {
        let router = Router::new().route(
            "/settings/credentials",
            get(|| async { Json(json!({"success": true, "credentials": null})) }),
        );
        let client = test_backend::serve(router).await;

        assert_eq!(client.stored_credentials().await.unwrap(), None);
    }

    #[tokio::test]
    async fn should_default_port_of_stored_credentials() {
        let router = Router::new().route(
            "/settings/credentials",
            get(|| async {
                Json(json!({"success": true, "credentials": {"username": "pi", "host": "192.168.0.205"}}))
            }),
        );
        let client = test_backend::serve(router).await;

        let creds = client.stored_credentials().await.unwrap().unwrap();

        assert_eq!(creds.port, 22);
    }

    #[tokio::test]
    async fn should_report_sudo_rights() {
        let router = Router::new().route(
            "/settings/test-connection",
            post(|| async { Json(json!({"success": true, "has_sudo": false})) }),
        );
        let client = test_backend::serve(router).await;
        let creds = SshCredentials::new("192.168.0.205", Some(22), "pi", "secret");

        let outcome = client.test_connection(&creds).await.unwrap();

        assert!(!outcome.has_sudo);
    }
}
