//! Game-server port: provisioning, lifecycle, configuration and console.

use std::future::Future;

use homeserver_domain::error::ApiError;
use homeserver_domain::gameserver::{
    Gameserver, GameserverAction, GameserverConfig, GameserverLogs, GameserverSpec,
};
use homeserver_domain::id::InstallationId;
use homeserver_domain::installation::InstallationJob;

pub trait GameserverApi: Send + Sync {
    /// `GET gameserver/list`.
    fn list_gameservers(&self) -> impl Future<Output = Result<Vec<Gameserver>, ApiError>> + Send;

    /// `POST gameserver/create`. Returns the id of the started installation.
    fn create_gameserver(
        &self,
        spec: &GameserverSpec,
    ) -> impl Future<Output = Result<InstallationId, ApiError>> + Send;

    /// `GET gameserver/installation/{id}`.
    fn installation_status(
        &self,
        id: &InstallationId,
    ) -> impl Future<Output = Result<InstallationJob, ApiError>> + Send;

    /// `POST gameserver/{name}/{action}`.
    fn control_gameserver(
        &self,
        name: &str,
        action: GameserverAction,
    ) -> impl Future<Output = Result<String, ApiError>> + Send;

    /// `DELETE gameserver/{name}/delete`.
    fn delete_gameserver(&self, name: &str)
    -> impl Future<Output = Result<String, ApiError>> + Send;

    /// `GET gameserver/{name}/config`.
    fn gameserver_config(
        &self,
        name: &str,
    ) -> impl Future<Output = Result<GameserverConfig, ApiError>> + Send;

    /// `POST gameserver/{name}/config`.
    fn save_gameserver_config(
        &self,
        name: &str,
        content: &str,
    ) -> impl Future<Output = Result<String, ApiError>> + Send;

    /// `GET gameserver/{name}/console`.
    fn console_output(&self, name: &str) -> impl Future<Output = Result<String, ApiError>> + Send;

    /// `POST gameserver/{name}/command`.
    fn send_console_command(
        &self,
        name: &str,
        command: &str,
    ) -> impl Future<Output = Result<String, ApiError>> + Send;

    /// `GET gameserver/{name}/logs`.
    fn gameserver_logs(
        &self,
        name: &str,
    ) -> impl Future<Output = Result<GameserverLogs, ApiError>> + Send;
}
