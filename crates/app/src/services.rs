//! Application services: use-case implementations.
//!
//! Each service struct accepts port trait implementations via generic parameters
//! (constructor injection), keeping this layer decoupled from concrete adapters.
//! Services report failures to the [`Notifier`] *and* return them, so a front
//! end can either show toasts or act on the typed error.

pub mod dashboard_service;
pub mod file_manager;
pub mod game_console;
pub mod gameserver_service;
pub mod hosting_service;
pub mod installation_tracker;
pub mod network_service;
pub mod power_service;
pub mod settings_service;
pub mod ssh_terminal;

#[cfg(test)]
pub(crate) mod fakes;

use std::future::Future;
use std::sync::Arc;

use homeserver_domain::error::{ApiError, HomeServerError};
use homeserver_domain::notification::Notification;

use crate::gateway::RequestGateway;
use crate::ports::Notifier;

pub use dashboard_service::{DashboardService, DashboardSnapshot};
pub use file_manager::FileManager;
pub use game_console::{ConsoleView, GameConsole};
pub use gameserver_service::GameserverService;
pub use hosting_service::HostingService;
pub use installation_tracker::{InstallationHandle, InstallationTracker};
pub use network_service::NetworkService;
pub use power_service::PowerService;
pub use settings_service::SettingsService;
pub use ssh_terminal::{SshTerminal, Submission};

/// Ports and gateway shared by every use-case.
pub struct ServiceContext<A, N> {
    api: Arc<A>,
    notifier: Arc<N>,
    gateway: RequestGateway,
}

impl<A, N> Clone for ServiceContext<A, N> {
    fn clone(&self) -> Self {
        Self {
            api: Arc::clone(&self.api),
            notifier: Arc::clone(&self.notifier),
            gateway: self.gateway.clone(),
        }
    }
}

impl<A, N: Notifier> ServiceContext<A, N> {
    #[must_use]
    pub fn new(api: Arc<A>, notifier: Arc<N>, gateway: RequestGateway) -> Self {
        Self {
            api,
            notifier,
            gateway,
        }
    }

    #[must_use]
    pub fn api(&self) -> &A {
        &self.api
    }

    #[must_use]
    pub fn gateway(&self) -> &RequestGateway {
        &self.gateway
    }

    pub(crate) async fn call<T, F>(&self, request: F) -> Result<T, ApiError>
    where
        F: Future<Output = Result<T, ApiError>>,
    {
        self.gateway.call(request).await
    }

    pub(crate) fn notify(&self, notification: Notification) {
        self.notifier.notify(notification);
    }

    /// Report `err` as a notification prefixed with `context` and hand it back.
    ///
    /// Input validation problems are warnings, everything else is an error.
    pub(crate) fn fail(&self, context: &str, err: impl Into<HomeServerError>) -> HomeServerError {
        let err = err.into();
        let message = format!("{context}: {}", err.user_message());
        tracing::warn!(error = %err, %message, "operation failed");
        let notification = match err {
            HomeServerError::Validation(_) => Notification::warning(message),
            _ => Notification::error(message),
        };
        self.notifier.notify(notification);
        err
    }

    /// Notify `message`, or `fallback` when the backend sent none.
    pub(crate) fn succeed(&self, message: &str, fallback: &str) {
        let text = if message.trim().is_empty() {
            fallback
        } else {
            message
        };
        self.notifier.notify(Notification::success(text));
    }
}
