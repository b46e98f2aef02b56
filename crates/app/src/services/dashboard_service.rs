//! Dashboard service: system stats, monitored services and their control.

use std::sync::Arc;
use std::time::Duration;

use homeserver_domain::error::{HomeServerError, ValidationError};
use homeserver_domain::service::{ServiceAction, ServiceInfo};
use homeserver_domain::stats::SystemStats;
use homeserver_domain::time::{Timestamp, now};
use tokio::sync::watch;

use crate::ports::{Notifier, SystemApi};
use crate::scheduler::ScheduledTask;
use crate::services::ServiceContext;

/// Interval between two dashboard reloads.
pub const DASHBOARD_REFRESH: Duration = Duration::from_secs(3);

/// What the dashboard currently shows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardSnapshot {
    pub stats: Option<SystemStats>,
    pub services: Vec<ServiceInfo>,
    /// Set while the backend is offline; cleared by the next stats load.
    pub dimmed: bool,
    pub updated_at: Option<Timestamp>,
}

pub struct DashboardService<A, N> {
    ctx: ServiceContext<A, N>,
    snapshot: Arc<watch::Sender<DashboardSnapshot>>,
}

impl<A, N> Clone for DashboardService<A, N> {
    fn clone(&self) -> Self {
        Self {
            ctx: self.ctx.clone(),
            snapshot: Arc::clone(&self.snapshot),
        }
    }
}

impl<A, N> DashboardService<A, N>
where
    A: SystemApi + 'static,
    N: Notifier + 'static,
{
    #[must_use]
    pub fn new(ctx: ServiceContext<A, N>) -> Self {
        let (snapshot, _) = watch::channel(DashboardSnapshot::default());
        Self {
            ctx,
            snapshot: Arc::new(snapshot),
        }
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<DashboardSnapshot> {
        self.snapshot.subscribe()
    }

    #[must_use]
    pub fn snapshot(&self) -> DashboardSnapshot {
        self.snapshot.borrow().clone()
    }

    /// Load system stats. A successful load un-dims the dashboard.
    ///
    /// Failures are logged but not notified: the offline banner covers them.
    ///
    /// # Errors
    ///
    /// Returns [`HomeServerError::Api`] when the request fails.
    pub async fn load_stats(&self) -> Result<SystemStats, HomeServerError> {
        let stats = self.ctx.call(self.ctx.api().system_stats()).await?;
        tracing::debug!(cpu = stats.cpu, ram = stats.ram, "system stats loaded");
        self.snapshot.send_modify(|snap| {
            snap.stats = Some(stats);
            snap.dimmed = false;
            snap.updated_at = Some(now());
        });
        Ok(stats)
    }

    /// # Errors
    ///
    /// Returns [`HomeServerError::Api`] when the request fails.
    pub async fn load_services(&self) -> Result<Vec<ServiceInfo>, HomeServerError> {
        let services = self.ctx.call(self.ctx.api().list_services()).await?;
        self.snapshot.send_modify(|snap| snap.services.clone_from(&services));
        Ok(services)
    }

    /// Reload stats and services.
    ///
    /// # Errors
    ///
    /// Returns the first failure; the other load is still attempted.
    pub async fn refresh(&self) -> Result<DashboardSnapshot, HomeServerError> {
        let stats = self.load_stats().await;
        let services = self.load_services().await;
        stats?;
        services?;
        Ok(self.snapshot())
    }

    /// Refresh immediately, then every [`DASHBOARD_REFRESH`] until the handle drops.
    #[must_use]
    pub fn start_auto_refresh(&self) -> ScheduledTask {
        self.start_auto_refresh_every(DASHBOARD_REFRESH)
    }

    #[must_use]
    pub fn start_auto_refresh_every(&self, period: Duration) -> ScheduledTask {
        let service = self.clone();
        ScheduledTask::periodic(Duration::ZERO, period, move || {
            let service = service.clone();
            async move {
                if let Err(err) = service.refresh().await {
                    tracing::debug!(error = %err, "dashboard refresh failed");
                }
            }
        })
    }

    /// Dim the dashboard whenever the backend goes offline.
    #[must_use]
    pub fn watch_liveness(&self) -> ScheduledTask {
        let mut online = self.ctx.gateway().liveness().subscribe();
        let snapshot = Arc::clone(&self.snapshot);
        ScheduledTask::spawn(async move {
            while online.changed().await.is_ok() {
                if !*online.borrow_and_update() {
                    snapshot.send_modify(|snap| snap.dimmed = true);
                }
            }
        })
    }

    /// Send `action` to `name`, then fetch the resulting status text.
    ///
    /// # Errors
    ///
    /// Returns [`HomeServerError::Validation`] for a blank name, or the
    /// backend failure of either request.
    #[tracing::instrument(skip(self))]
    pub async fn control_service(
        &self,
        name: &str,
        action: ServiceAction,
    ) -> Result<String, HomeServerError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(self
                .ctx
                .fail("Service control", ValidationError::EmptyField("service")));
        }
        let message = self
            .ctx
            .call(self.ctx.api().control_service(name, action))
            .await
            .map_err(|err| self.ctx.fail(&format!("Could not {action} {name}"), err))?;
        self.ctx
            .succeed(&message, &format!("Service {name}: {action} executed"));

        self.ctx
            .call(self.ctx.api().service_status(name))
            .await
            .map_err(|err| self.ctx.fail(&format!("Could not read status of {name}"), err))
    }
}
