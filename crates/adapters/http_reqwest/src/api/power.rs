//! `power/{action}` and `power/wake`.

use homeserver_app::ports::PowerApi;
use homeserver_domain::error::ApiError;
use homeserver_domain::power::{MacAddress, PowerAction};
use serde_json::json;

use crate::client::HttpClient;

impl PowerApi for HttpClient {
    async fn power(&self, action: PowerAction) -> Result<String, ApiError> {
        self.acknowledge(self.post(&["power", action.as_str()]))
            .await
    }

    async fn wake(&self, mac: &MacAddress) -> Result<String, ApiError> {
        self.acknowledge(self.post(&["power", "wake"]).json(&json!({ "mac": mac })))
            .await
    }
}
