//! Network port: local DNS records and Pi-hole.

use std::future::Future;

use homeserver_domain::dns::DnsEntry;
use homeserver_domain::error::ApiError;
use homeserver_domain::stats::PiholeStats;

pub trait NetworkApi: Send + Sync {
    /// `GET dns/list`.
    fn list_dns(&self) -> impl Future<Output = Result<Vec<DnsEntry>, ApiError>> + Send;

    /// `POST dns/add`.
    fn add_dns(&self, entry: &DnsEntry) -> impl Future<Output = Result<String, ApiError>> + Send;

    /// `DELETE dns/delete`.
    fn delete_dns(&self, domain: &str) -> impl Future<Output = Result<String, ApiError>> + Send;

    /// `GET pihole/stats`.
    fn pihole_stats(&self) -> impl Future<Output = Result<PiholeStats, ApiError>> + Send;

    /// `POST pihole/blocklist/add`.
    fn add_blocklist(&self, url: &str) -> impl Future<Output = Result<String, ApiError>> + Send;

    /// `POST pihole/gravity/update`.
    fn update_gravity(&self) -> impl Future<Output = Result<String, ApiError>> + Send;
}
