//! Power port.

use std::future::Future;

use homeserver_domain::error::ApiError;
use homeserver_domain::power::{MacAddress, PowerAction};

pub trait PowerApi: Send + Sync {
    /// `POST power/{action}`.
    fn power(&self, action: PowerAction) -> impl Future<Output = Result<String, ApiError>> + Send;

    /// `POST power/wake`.
    fn wake(&self, mac: &MacAddress) -> impl Future<Output = Result<String, ApiError>> + Send;
}
