//! Adapter construction errors and transport error mapping.

use std::time::Duration;

use homeserver_domain::error::ApiError;

/// Failure to build an [`HttpClient`](crate::HttpClient).
#[derive(Debug, thiserror::Error)]
pub enum HttpClientError {
    #[error("invalid base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("failed to build HTTP client")]
    Build(#[from] reqwest::Error),
}

/// Map a reqwest failure onto the port error.
pub(crate) fn transport_error(err: reqwest::Error, timeout: Duration) -> ApiError {
    if err.is_timeout() {
        ApiError::Timeout(timeout)
    } else if err.is_decode() {
        ApiError::Decode(Box::new(err))
    } else {
        ApiError::Network(Box::new(err))
    }
}
