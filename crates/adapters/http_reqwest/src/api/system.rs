//! `system/stats`, `services/list` and `service/{name}/...`.

use homeserver_app::ports::SystemApi;
use homeserver_domain::error::ApiError;
use homeserver_domain::service::{ServiceAction, ServiceInfo};
use homeserver_domain::stats::SystemStats;
use serde::Deserialize;

use crate::client::HttpClient;

#[derive(Deserialize)]
struct ServiceList {
    services: Vec<ServiceInfo>,
}

#[derive(Deserialize)]
struct ServiceStatus {
    #[serde(default)]
    status: String,
}

impl SystemApi for HttpClient {
    async fn system_stats(&self) -> Result<SystemStats, ApiError> {
        self.fetch(self.get(&["system", "stats"])).await
    }

    async fn list_services(&self) -> Result<Vec<ServiceInfo>, ApiError> {
        let list: ServiceList = self.fetch(self.get(&["services", "list"])).await?;
        Ok(list.services)
    }

    async fn control_service(&self, name: &str, action: ServiceAction) -> Result<String, ApiError> {
        self.acknowledge(self.post(&["service", name, action.as_str()]))
            .await
    }

    async fn service_status(&self, name: &str) -> Result<String, ApiError> {
        let status: ServiceStatus = self.fetch(self.get(&["service", name, "status"])).await?;
        Ok(status.status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_backend;
    use axum::extract::Path;
    use axum::routing::{get, post};
    use axum::{Json, Router};
    use homeserver_domain::service::ServiceState;
    use serde_json::{Value, json};

    fn backend() -> Router {
        Router::new()
            .route(
                "/system/stats",
                get(|| async {
                    Json(json!({"success": true, "cpu": 12.5, "ram": 40.1, "disk": 70.0, "temp": 48.3}))
                }),
            )
            .route(
                "/services/list",
                get(|| async {
                    Json(json!({"success": true, "services": [
                        {"name": "apache2", "status": "running"},
                        {"name": "bind9", "status": "stopped"},
                    ]}))
                }),
            )
            .route(
                "/service/{name}/{action}",
                post(|Path((name, action)): Path<(String, String)>| async move {
                    Json(json!({"success": true, "message": format!("{action} {name}")}))
                }),
            )
            .route(
                "/service/{name}/status",
                get(|Path(name): Path<String>| async move {
                    Json::<Value>(json!({"success": true, "status": format!("{name}.service - active")}))
                }),
            )
    }

    #[tokio::test]
    async fn should_decode_system_stats() {
        let client = test_backend::serve(backend()).await;

        let stats = client.system_stats().await.unwrap();

        assert!((stats.cpu - 12.5).abs() < f64::EPSILON);
        assert!((stats.temp - 48.3).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn should_list_services_with_state() {
        let client = test_backend::serve(backend()).await;

        let services = client.list_services().await.unwrap();

        assert_eq!(services.len(), 2);
        assert_eq!(services[1].status, ServiceState::Stopped);
    }

    #[tokio::test]
    async fn should_post_service_action_in_path() {
        let client = test_backend::serve(backend()).await;

        let message = client
            .control_service("apache2", ServiceAction::Restart)
            .await
            .unwrap();

        assert_eq!(message, "restart apache2");
    }

    #[tokio::test]
    async fn should_read_service_status_text() {
        let client = test_backend::serve(backend()).await;

        let status = client.service_status("ssh").await.unwrap();

        assert_eq!(status, "ssh.service - active");
    }
}
