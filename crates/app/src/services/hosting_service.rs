//! Hosting service: Apache webspaces and their logs.

use homeserver_domain::error::{HomeServerError, ValidationError};
use homeserver_domain::webspace::Webspace;

use crate::ports::{HostingApi, Notifier};
use crate::services::ServiceContext;

pub struct HostingService<A, N> {
    ctx: ServiceContext<A, N>,
}

impl<A: HostingApi, N: Notifier> HostingService<A, N> {
    #[must_use]
    pub fn new(ctx: ServiceContext<A, N>) -> Self {
        Self { ctx }
    }

    /// # Errors
    ///
    /// Returns [`HomeServerError::Api`] when the request fails.
    pub async fn list(&self) -> Result<Vec<Webspace>, HomeServerError> {
        self.ctx
            .call(self.ctx.api().list_webspaces())
            .await
            .map_err(|err| self.ctx.fail("Could not load webspaces", err))
    }

    /// # Errors
    ///
    /// Returns [`HomeServerError::Validation`] before any request when
    /// `domain` or `path` is blank, or the backend failure.
    #[tracing::instrument(skip(self))]
    pub async fn create(&self, domain: &str, path: &str) -> Result<Webspace, HomeServerError> {
        let webspace = Webspace::new(domain, path).map_err(|err| self.ctx.fail("Webspace", err))?;
        let message = self
            .ctx
            .call(self.ctx.api().create_webspace(&webspace))
            .await
            .map_err(|err| self.ctx.fail("Could not create webspace", err))?;
        self.ctx.succeed(&message, "Webspace created");
        Ok(webspace)
    }

    /// # Errors
    ///
    /// Returns [`HomeServerError::Validation`] for a blank domain, or the
    /// backend failure.
    #[tracing::instrument(skip(self))]
    pub async fn delete(&self, domain: &str) -> Result<(), HomeServerError> {
        let domain = domain.trim();
        if domain.is_empty() {
            return Err(self
                .ctx
                .fail("Webspace", ValidationError::EmptyField("domain")));
        }
        let message = self
            .ctx
            .call(self.ctx.api().delete_webspace(domain))
            .await
            .map_err(|err| self.ctx.fail("Could not delete webspace", err))?;
        self.ctx.succeed(&message, "Webspace deleted");
        Ok(())
    }

    /// Tail of the Apache error log.
    ///
    /// # Errors
    ///
    /// Returns [`HomeServerError::Api`] when the request fails.
    pub async fn apache_logs(&self) -> Result<String, HomeServerError> {
        self.ctx
            .call(self.ctx.api().apache_logs())
            .await
            .map_err(|err| self.ctx.fail("Could not load Apache logs", err))
    }
}
