//! Power service: shutdown, reboot, suspend and Wake-on-LAN.

use homeserver_domain::error::HomeServerError;
use homeserver_domain::power::{MacAddress, PowerAction};

use crate::ports::{Notifier, PowerApi};
use crate::services::ServiceContext;

pub struct PowerService<A, N> {
    ctx: ServiceContext<A, N>,
}

impl<A: PowerApi, N: Notifier> PowerService<A, N> {
    #[must_use]
    pub fn new(ctx: ServiceContext<A, N>) -> Self {
        Self { ctx }
    }

    /// Send a power action. Confirmation is the caller's job.
    ///
    /// # Errors
    ///
    /// Returns [`HomeServerError::Api`] when the request fails.
    #[tracing::instrument(skip(self))]
    pub async fn power(&self, action: PowerAction) -> Result<String, HomeServerError> {
        let message = self
            .ctx
            .call(self.ctx.api().power(action))
            .await
            .map_err(|err| self.ctx.fail(&format!("Could not {action}"), err))?;
        tracing::warn!(%action, "power action sent");
        self.ctx.succeed(&message, &format!("{action} requested"));
        Ok(message)
    }

    /// Send a Wake-on-LAN packet to `mac`.
    ///
    /// # Errors
    ///
    /// Returns [`HomeServerError::Validation`] before any request when the
    /// address is malformed, or the backend failure.
    #[tracing::instrument(skip(self))]
    pub async fn wake(&self, mac: &str) -> Result<MacAddress, HomeServerError> {
        let mac: MacAddress = mac.parse().map_err(|err| self.ctx.fail("Wake-on-LAN", err))?;
        let message = self
            .ctx
            .call(self.ctx.api().wake(&mac))
            .await
            .map_err(|err| self.ctx.fail("Could not send Wake-on-LAN packet", err))?;
        self.ctx.succeed(&message, "Wake-on-LAN packet sent");
        Ok(mac)
    }
}
