//! Settings service: Linux credentials the backend keeps for sudo commands.

use homeserver_domain::error::HomeServerError;
use homeserver_domain::notification::Notification;
use homeserver_domain::session::{ConnectionTest, SshCredentials, StoredCredentials};

use crate::ports::{Notifier, SettingsApi};
use crate::services::ServiceContext;

pub struct SettingsService<A, N> {
    ctx: ServiceContext<A, N>,
}

impl<A: SettingsApi, N: Notifier> SettingsService<A, N> {
    #[must_use]
    pub fn new(ctx: ServiceContext<A, N>) -> Self {
        Self { ctx }
    }

    /// Stored credentials, `None` when nothing is saved.
    ///
    /// # Errors
    ///
    /// Returns [`HomeServerError::Api`] when the request fails.
    pub async fn credentials(&self) -> Result<Option<StoredCredentials>, HomeServerError> {
        self.ctx
            .call(self.ctx.api().stored_credentials())
            .await
            .map_err(|err| self.ctx.fail("Could not load credentials", err))
    }

    /// # Errors
    ///
    /// Returns [`HomeServerError::Validation`] before any request for
    /// incomplete credentials, or the backend failure.
    #[tracing::instrument(skip(self, credentials), fields(target = %credentials.target()))]
    pub async fn save(&self, credentials: &SshCredentials) -> Result<(), HomeServerError> {
        credentials
            .validate()
            .map_err(|err| self.ctx.fail("Credentials", err))?;
        let message = self
            .ctx
            .call(self.ctx.api().save_credentials(credentials))
            .await
            .map_err(|err| self.ctx.fail("Could not save credentials", err))?;
        self.ctx.succeed(&message, "Credentials saved");
        Ok(())
    }

    /// # Errors
    ///
    /// Returns [`HomeServerError::Api`] when the request fails.
    pub async fn delete(&self) -> Result<(), HomeServerError> {
        let message = self
            .ctx
            .call(self.ctx.api().delete_credentials())
            .await
            .map_err(|err| self.ctx.fail("Could not delete credentials", err))?;
        self.ctx.succeed(&message, "Credentials deleted");
        Ok(())
    }

    /// Check that the backend can log in with `credentials`.
    ///
    /// # Errors
    ///
    /// Returns [`HomeServerError::Validation`] before any request for
    /// incomplete credentials, or the backend failure.
    #[tracing::instrument(skip(self, credentials), fields(target = %credentials.target()))]
    pub async fn test(&self, credentials: &SshCredentials) -> Result<ConnectionTest, HomeServerError> {
        credentials
            .validate()
            .map_err(|err| self.ctx.fail("Credentials", err))?;
        self.ctx.notify(Notification::info("Testing connection..."));
        let outcome = self
            .ctx
            .call(self.ctx.api().test_connection(credentials))
            .await
            .map_err(|err| self.ctx.fail("Connection failed", err))?;
        let sudo = if outcome.has_sudo { "yes" } else { "no" };
        self.ctx.notify(Notification::success(format!(
            "Connection successful, sudo rights: {sudo}"
        )));
        Ok(outcome)
    }
}
