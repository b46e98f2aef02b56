//! `dns/*` and `pihole/*`.

use homeserver_app::ports::NetworkApi;
use homeserver_domain::dns::DnsEntry;
use homeserver_domain::error::ApiError;
use homeserver_domain::stats::PiholeStats;
use serde::Deserialize;
use serde_json::json;

use crate::client::HttpClient;

#[derive(Deserialize)]
struct DnsList {
    #[serde(default)]
    entries: Vec<DnsEntry>,
}

impl NetworkApi for HttpClient {
    async fn list_dns(&self) -> Result<Vec<DnsEntry>, ApiError> {
        let list: DnsList = self.fetch(self.get(&["dns", "list"])).await?;
        Ok(list.entries)
    }

    async fn add_dns(&self, entry: &DnsEntry) -> Result<String, ApiError> {
        self.acknowledge(self.post(&["dns", "add"]).json(entry)).await
    }

    async fn delete_dns(&self, domain: &str) -> Result<String, ApiError> {
        self.acknowledge(self.delete(&["dns", "delete"]).json(&json!({ "domain": domain })))
            .await
    }

    async fn pihole_stats(&self) -> Result<PiholeStats, ApiError> {
        self.fetch(self.get(&["pihole", "stats"])).await
    }

    async fn add_blocklist(&self, url: &str) -> Result<String, ApiError> {
        self.acknowledge(
            self.post(&["pihole", "blocklist", "add"])
                .json(&json!({ "url": url })),
        )
        .await
    }

    async fn update_gravity(&self) -> Result<String, ApiError> {
        self.acknowledge(self.post(&["pihole", "gravity", "update"]))
            .await
    }
}
