//! Response envelope decoding.
//!
//! ```json
//! { "success": true, "message": "DNS entry added", "entries": [...] }
//! { "success": false, "error": "Server nicht gefunden" }
//! ```
//!
//! Payload fields are siblings of `success`, so each endpoint decodes the
//! whole body into its own small response struct.

use homeserver_domain::error::ApiError;
use reqwest::StatusCode;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Envelope {
    success: bool,
    error: Option<String>,
    message: Option<String>,
}

impl Envelope {
    /// `error` wins over `message`; blank strings count as absent.
    fn reason(self) -> Option<String> {
        self.error
            .into_iter()
            .chain(self.message)
            .find(|text| !text.trim().is_empty())
    }
}

/// Plain acknowledgement carrying only a message.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Ack {
    pub message: String,
}

/// Decode a JSON response body.
///
/// # Errors
///
/// - [`ApiError::Status`] for a non-2xx status, with the body's
///   `error` / `message` when there is one
/// - [`ApiError::Rejected`] for a 2xx body without `success: true`
/// - [`ApiError::Decode`] when the body is not the expected JSON
pub fn decode<T: DeserializeOwned>(status: StatusCode, body: &[u8]) -> Result<T, ApiError> {
    if !status.is_success() {
        return Err(status_error(status, body));
    }
    let value: Value = serde_json::from_slice(body)?;
    let envelope = Envelope::deserialize(&value)?;
    if !envelope.success {
        let reason = envelope
            .reason()
            .unwrap_or_else(|| "request failed".to_string());
        return Err(ApiError::Rejected(reason));
    }
    Ok(T::deserialize(&value)?)
}

/// Build the error for a non-2xx response.
pub fn status_error(status: StatusCode, body: &[u8]) -> ApiError {
    let message = serde_json::from_slice::<Envelope>(body)
        .ok()
        .and_then(Envelope::reason)
        .or_else(|| status.canonical_reason().map(str::to_string))
        .unwrap_or_default();
    ApiError::Status {
        status: status.as_u16(),
        message,
    }
}
