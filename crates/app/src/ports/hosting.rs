//! Hosting port: Apache webspaces.

use std::future::Future;

use homeserver_domain::error::ApiError;
use homeserver_domain::webspace::Webspace;

pub trait HostingApi: Send + Sync {
    /// `GET webspace/list`.
    fn list_webspaces(&self) -> impl Future<Output = Result<Vec<Webspace>, ApiError>> + Send;

    /// `POST webspace/create`.
    fn create_webspace(
        &self,
        webspace: &Webspace,
    ) -> impl Future<Output = Result<String, ApiError>> + Send;

    /// `DELETE webspace/delete`.
    fn delete_webspace(&self, domain: &str)
    -> impl Future<Output = Result<String, ApiError>> + Send;

    /// `GET apache/logs`. Tail of the Apache error log.
    fn apache_logs(&self) -> impl Future<Output = Result<String, ApiError>> + Send;
}
