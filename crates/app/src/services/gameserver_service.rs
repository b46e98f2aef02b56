//! Game-server service: listing, lifecycle control, config and logs.
//!
//! Provisioning lives in [`InstallationTracker`](super::InstallationTracker),
//! the live console in [`GameConsole`](super::GameConsole).

use homeserver_domain::error::{HomeServerError, NotFoundError};
use homeserver_domain::gameserver::{
    Gameserver, GameserverAction, GameserverConfig, GameserverLogs,
};

use crate::ports::{GameserverApi, Notifier};
use crate::services::ServiceContext;

pub struct GameserverService<A, N> {
    ctx: ServiceContext<A, N>,
}

impl<A: GameserverApi, N: Notifier> GameserverService<A, N> {
    #[must_use]
    pub fn new(ctx: ServiceContext<A, N>) -> Self {
        Self { ctx }
    }

    /// # Errors
    ///
    /// Returns [`HomeServerError::Api`] when the request fails.
    pub async fn list(&self) -> Result<Vec<Gameserver>, HomeServerError> {
        self.ctx
            .call(self.ctx.api().list_gameservers())
            .await
            .map_err(|err| self.ctx.fail("Could not load game servers", err))
    }

    /// Look a server up by name.
    ///
    /// # Errors
    ///
    /// Returns [`HomeServerError::NotFound`] when no server has that name,
    /// or the backend failure.
    pub async fn find(&self, name: &str) -> Result<Gameserver, HomeServerError> {
        self.list()
            .await?
            .into_iter()
            .find(|server| server.name == name)
            .ok_or_else(|| {
                self.ctx.fail(
                    "Game server",
                    NotFoundError {
                        entity: "game server",
                        id: name.to_string(),
                    },
                )
            })
    }

    /// Start, stop or restart `server` if its current state allows it.
    ///
    /// # Errors
    ///
    /// Returns [`HomeServerError::Validation`] without a request when the
    /// action is unavailable in the current state, or the backend failure.
    #[tracing::instrument(skip(self, server), fields(server = %server.name))]
    pub async fn control(
        &self,
        server: &Gameserver,
        action: GameserverAction,
    ) -> Result<String, HomeServerError> {
        server
            .ensure_allows(action)
            .map_err(|err| self.ctx.fail("Game server", err))?;
        let message = self
            .ctx
            .call(self.ctx.api().control_gameserver(&server.name, action))
            .await
            .map_err(|err| self.ctx.fail(&format!("Could not {action} {}", server.name), err))?;
        self.ctx
            .succeed(&message, &format!("{}: {action} executed", server.name));
        Ok(message)
    }

    /// # Errors
    ///
    /// Returns [`HomeServerError::Validation`] while the server is running,
    /// or the backend failure.
    #[tracing::instrument(skip(self, server), fields(server = %server.name))]
    pub async fn delete(&self, server: &Gameserver) -> Result<(), HomeServerError> {
        server
            .ensure_deletable()
            .map_err(|err| self.ctx.fail("Game server", err))?;
        let message = self
            .ctx
            .call(self.ctx.api().delete_gameserver(&server.name))
            .await
            .map_err(|err| self.ctx.fail(&format!("Could not delete {}", server.name), err))?;
        self.ctx
            .succeed(&message, &format!("{} deleted", server.name));
        Ok(())
    }

    /// # Errors
    ///
    /// Returns [`HomeServerError::Api`] when the request fails.
    pub async fn config(&self, name: &str) -> Result<GameserverConfig, HomeServerError> {
        self.ctx
            .call(self.ctx.api().gameserver_config(name))
            .await
            .map_err(|err| self.ctx.fail("Could not load configuration", err))
    }

    /// # Errors
    ///
    /// Returns [`HomeServerError::Api`] when the request fails.
    #[tracing::instrument(skip(self, content), fields(bytes = content.len()))]
    pub async fn save_config(&self, name: &str, content: &str) -> Result<(), HomeServerError> {
        let message = self
            .ctx
            .call(self.ctx.api().save_gameserver_config(name, content))
            .await
            .map_err(|err| self.ctx.fail("Could not save configuration", err))?;
        self.ctx.succeed(&message, "Configuration saved");
        Ok(())
    }

    /// # Errors
    ///
    /// Returns [`HomeServerError::Api`] when the request fails.
    pub async fn logs(&self, name: &str) -> Result<GameserverLogs, HomeServerError> {
        self.ctx
            .call(self.ctx.api().gameserver_logs(name))
            .await
            .map_err(|err| self.ctx.fail("Could not load logs", err))
    }
}
