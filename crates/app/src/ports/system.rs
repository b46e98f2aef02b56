//! System port: host statistics and systemd service control.

use std::future::Future;

use homeserver_domain::error::ApiError;
use homeserver_domain::service::{ServiceAction, ServiceInfo};
use homeserver_domain::stats::SystemStats;

pub trait SystemApi: Send + Sync {
    /// `GET system/stats`.
    fn system_stats(&self) -> impl Future<Output = Result<SystemStats, ApiError>> + Send;

    /// `GET services/list`.
    fn list_services(&self) -> impl Future<Output = Result<Vec<ServiceInfo>, ApiError>> + Send;

    /// `POST service/{name}/{action}`. Returns the backend message.
    fn control_service(
        &self,
        name: &str,
        action: ServiceAction,
    ) -> impl Future<Output = Result<String, ApiError>> + Send;

    /// `GET service/{name}/status`. Returns the raw status text.
    fn service_status(&self, name: &str) -> impl Future<Output = Result<String, ApiError>> + Send;
}
