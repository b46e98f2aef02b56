//! SSH port: backend-held interactive command sessions.

use std::future::Future;

use homeserver_domain::error::ApiError;
use homeserver_domain::id::SessionId;
use homeserver_domain::session::{CommandOutput, SessionGrant, SshCredentials};

pub trait SshApi: Send + Sync {
    /// `POST ssh/connect`.
    fn connect(
        &self,
        credentials: &SshCredentials,
    ) -> impl Future<Output = Result<SessionGrant, ApiError>> + Send;

    /// `POST ssh/execute`.
    ///
    /// A stale session surfaces as an HTTP 401/404/410
    /// [`ApiError::Status`](homeserver_domain::error::ApiError::Status).
    fn execute(
        &self,
        session: &SessionId,
        command: &str,
    ) -> impl Future<Output = Result<CommandOutput, ApiError>> + Send;

    /// `POST ssh/disconnect`.
    fn disconnect(&self, session: &SessionId)
    -> impl Future<Output = Result<String, ApiError>> + Send;
}
