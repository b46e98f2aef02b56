//! Settings port: Linux credentials stored by the backend for sudo commands.

use std::future::Future;

use homeserver_domain::error::ApiError;
use homeserver_domain::session::{ConnectionTest, SshCredentials, StoredCredentials};

pub trait SettingsApi: Send + Sync {
    /// `GET settings/credentials`. `None` when nothing is stored.
    fn stored_credentials(
        &self,
    ) -> impl Future<Output = Result<Option<StoredCredentials>, ApiError>> + Send;

    /// `POST settings/credentials`.
    fn save_credentials(
        &self,
        credentials: &SshCredentials,
    ) -> impl Future<Output = Result<String, ApiError>> + Send;

    /// `DELETE settings/credentials`.
    fn delete_credentials(&self) -> impl Future<Output = Result<String, ApiError>> + Send;

    /// `POST settings/test-connection`.
    fn test_connection(
        &self,
        credentials: &SshCredentials,
    ) -> impl Future<Output = Result<ConnectionTest, ApiError>> + Send;
}
