//! Network service: use-cases for DNS records and Pi-hole.

use homeserver_domain::dns::DnsEntry;
use homeserver_domain::error::{HomeServerError, ValidationError};
use homeserver_domain::stats::PiholeStats;

use crate::ports::{NetworkApi, Notifier};
use crate::services::ServiceContext;

pub struct NetworkService<A, N> {
    ctx: ServiceContext<A, N>,
}

impl<A: NetworkApi, N: Notifier> NetworkService<A, N> {
    #[must_use]
    pub fn new(ctx: ServiceContext<A, N>) -> Self {
        Self { ctx }
    }

    /// # Errors
    ///
    /// Returns [`HomeServerError::Api`] when the request fails.
    pub async fn list_dns(&self) -> Result<Vec<DnsEntry>, HomeServerError> {
        self.ctx
            .call(self.ctx.api().list_dns())
            .await
            .map_err(|err| self.ctx.fail("Could not load DNS entries", err))
    }

    /// Validate and add a DNS record.
    ///
    /// # Errors
    ///
    /// Returns [`HomeServerError::Validation`] before any request when
    /// `domain` or `ip` is blank, or the backend failure.
    #[tracing::instrument(skip(self))]
    pub async fn add_dns(&self, domain: &str, ip: &str) -> Result<DnsEntry, HomeServerError> {
        let entry = DnsEntry::new(domain, ip).map_err(|err| self.ctx.fail("DNS entry", err))?;
        let message = self
            .ctx
            .call(self.ctx.api().add_dns(&entry))
            .await
            .map_err(|err| self.ctx.fail("Could not add DNS entry", err))?;
        self.ctx.succeed(&message, "DNS entry added");
        Ok(entry)
    }

    /// # Errors
    ///
    /// Returns [`HomeServerError::Validation`] for a blank domain, or the
    /// backend failure.
    #[tracing::instrument(skip(self))]
    pub async fn delete_dns(&self, domain: &str) -> Result<(), HomeServerError> {
        let domain = non_empty(domain, "domain").map_err(|err| self.ctx.fail("DNS entry", err))?;
        let message = self
            .ctx
            .call(self.ctx.api().delete_dns(domain))
            .await
            .map_err(|err| self.ctx.fail("Could not delete DNS entry", err))?;
        self.ctx.succeed(&message, "DNS entry deleted");
        Ok(())
    }

    /// # Errors
    ///
    /// Returns [`HomeServerError::Api`] when the request fails.
    pub async fn pihole_stats(&self) -> Result<PiholeStats, HomeServerError> {
        self.ctx
            .call(self.ctx.api().pihole_stats())
            .await
            .map_err(|err| self.ctx.fail("Could not load Pi-hole statistics", err))
    }

    /// # Errors
    ///
    /// Returns [`HomeServerError::Validation`] for a blank URL, or the
    /// backend failure.
    #[tracing::instrument(skip(self))]
    pub async fn add_blocklist(&self, url: &str) -> Result<(), HomeServerError> {
        let url = non_empty(url, "URL").map_err(|err| self.ctx.fail("Blocklist", err))?;
        let message = self
            .ctx
            .call(self.ctx.api().add_blocklist(url))
            .await
            .map_err(|err| self.ctx.fail("Could not add blocklist", err))?;
        self.ctx.succeed(&message, "Blocklist added");
        Ok(())
    }

    /// # Errors
    ///
    /// Returns [`HomeServerError::Api`] when the request fails.
    pub async fn update_gravity(&self) -> Result<(), HomeServerError> {
        let message = self
            .ctx
            .call(self.ctx.api().update_gravity())
            .await
            .map_err(|err| self.ctx.fail("Could not update gravity", err))?;
        self.ctx.succeed(&message, "Gravity updated");
        Ok(())
    }
}

fn non_empty<'a>(value: &'a str, field: &'static str) -> Result<&'a str, ValidationError> {
    let value = value.trim();
    if value.is_empty() {
        Err(ValidationError::EmptyField(field))
    } else {
        Ok(value)
    }
}
