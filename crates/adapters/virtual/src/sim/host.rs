//! Host level simulation: stats, services, DNS, Pi-hole, webspaces, power.

use homeserver_app::ports::{HostingApi, NetworkApi, PowerApi, SystemApi};
use homeserver_domain::dns::DnsEntry;
use homeserver_domain::error::ApiError;
use homeserver_domain::power::{MacAddress, PowerAction};
use homeserver_domain::service::{ServiceAction, ServiceInfo, ServiceState};
use homeserver_domain::stats::{PiholeStats, SystemStats};
use homeserver_domain::time::now;
use homeserver_domain::webspace::Webspace;

use crate::{VirtualBackend, bad_request, not_found};

const APACHE_LOG: &str = "\
[mpm_event:notice] AH00489: Apache/2.4.57 (Debian) configured -- resuming normal operations
[core:notice] AH00094: Command line: '/usr/sbin/apache2'
[core:warn] AH00558: apache2: Could not reliably determine the server's fully qualified domain name";

/// Service aliases accepted by the control endpoint.
fn canonical_service(name: &str) -> &str {
    match name {
        "dns" => "bind9",
        "pihole" => "pihole-FTL",
        other => other,
    }
}

#[allow(clippy::cast_precision_loss)]
fn drift(tick: u64, base: f64, spread: u64) -> f64 {
    base + (tick.wrapping_mul(7) % spread) as f64
}

impl SystemApi for VirtualBackend {
    async fn system_stats(&self) -> Result<SystemStats, ApiError> {
        self.with_state(|state| {
            state.ticks += 1;
            Ok(SystemStats {
                cpu: drift(state.ticks, 8.0, 30),
                ram: drift(state.ticks, 35.0, 10),
                disk: 42.0,
                temp: drift(state.ticks, 45.0, 8),
            })
        })
        .await
    }

    async fn list_services(&self) -> Result<Vec<ServiceInfo>, ApiError> {
        self.with_state(|state| {
            Ok(state
                .services
                .iter()
                .map(|(name, status)| ServiceInfo {
                    name: name.clone(),
                    status: *status,
                })
                .collect())
        })
        .await
    }

    async fn control_service(&self, name: &str, action: ServiceAction) -> Result<String, ApiError> {
        self.with_state(|state| {
            let name = canonical_service(name);
            let status = state
                .services
                .get_mut(name)
                .ok_or_else(|| bad_request("Invalid service or action"))?;
            match action {
                ServiceAction::Start | ServiceAction::Restart => *status = ServiceState::Running,
                ServiceAction::Stop => *status = ServiceState::Stopped,
                ServiceAction::Enable | ServiceAction::Disable => {}
            }
            tracing::debug!(service = name, %action, "virtual service controlled");
            Ok(String::new())
        })
        .await
    }

    async fn service_status(&self, name: &str) -> Result<String, ApiError> {
        self.with_state(|state| {
            let name = canonical_service(name);
            let status = state.services.get(name).ok_or_else(|| not_found("service"))?;
            let active = match status {
                ServiceState::Running => "active (running)",
                _ => "inactive (dead)",
            };
            Ok(format!("● {name}.service\n     Active: {active}"))
        })
        .await
    }
}

impl NetworkApi for VirtualBackend {
    async fn list_dns(&self) -> Result<Vec<DnsEntry>, ApiError> {
        self.with_state(|state| Ok(state.dns.clone())).await
    }

    async fn add_dns(&self, entry: &DnsEntry) -> Result<String, ApiError> {
        self.with_state(|state| {
            state.dns.retain(|existing| existing.domain != entry.domain);
            state.dns.push(DnsEntry {
                created: Some(now().to_rfc3339()),
                ..entry.clone()
            });
            Ok("DNS entry added".to_string())
        })
        .await
    }

    async fn delete_dns(&self, domain: &str) -> Result<String, ApiError> {
        self.with_state(|state| {
            state.dns.retain(|entry| entry.domain != domain);
            Ok("DNS entry deleted".to_string())
        })
        .await
    }

    async fn pihole_stats(&self) -> Result<PiholeStats, ApiError> {
        self.with_state(|state| {
            let blocked = 12_345 + state.blocklists.len() * 1_000;
            let total = 45_678;
            #[allow(clippy::cast_precision_loss)]
            let rate = blocked as f64 * 100.0 / f64::from(total);
            Ok(PiholeStats {
                blocked: blocked.to_string(),
                total: total.to_string(),
                block_rate: format!("{rate:.1}"),
            })
        })
        .await
    }

    async fn add_blocklist(&self, url: &str) -> Result<String, ApiError> {
        self.with_state(|state| {
            state.blocklists.push(url.to_string());
            Ok("Blocklist added".to_string())
        })
        .await
    }

    async fn update_gravity(&self) -> Result<String, ApiError> {
        self.with_state(|_| Ok("Gravity updated".to_string())).await
    }
}

impl HostingApi for VirtualBackend {
    async fn list_webspaces(&self) -> Result<Vec<Webspace>, ApiError> {
        self.with_state(|state| Ok(state.webspaces.clone())).await
    }

    async fn create_webspace(&self, webspace: &Webspace) -> Result<String, ApiError> {
        self.with_state(|state| {
            state
                .webspaces
                .retain(|existing| existing.domain != webspace.domain);
            state.webspaces.push(webspace.clone());
            Ok("Webspace created".to_string())
        })
        .await
    }

    async fn delete_webspace(&self, domain: &str) -> Result<String, ApiError> {
        self.with_state(|state| {
            state.webspaces.retain(|webspace| webspace.domain != domain);
            Ok("Webspace deleted".to_string())
        })
        .await
    }

    async fn apache_logs(&self) -> Result<String, ApiError> {
        self.with_state(|_| Ok(APACHE_LOG.to_string())).await
    }
}

impl PowerApi for VirtualBackend {
    async fn power(&self, action: PowerAction) -> Result<String, ApiError> {
        self.with_state(|_| {
            tracing::info!(%action, "virtual power action");
            Ok(match action {
                PowerAction::Shutdown => "System is shutting down...",
                PowerAction::Reboot => "System is rebooting...",
                PowerAction::Suspend => "System is suspending...",
            }
            .to_string())
        })
        .await
    }

    async fn wake(&self, mac: &MacAddress) -> Result<String, ApiError> {
        self.with_state(|_| Ok(format!("Wake-on-LAN packet sent to {mac}")))
            .await
    }
}
