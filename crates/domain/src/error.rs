//! Common error types used across the workspace.
//!
//! Each layer defines its own typed errors and folds them into
//! [`HomeServerError`] via `#[from]`.

use std::time::Duration;

/// Boxed source error used where the concrete type lives in an adapter.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Top-level error returned by application services.
#[derive(Debug, thiserror::Error)]
pub enum HomeServerError {
    #[error("validation error")]
    Validation(#[from] ValidationError),

    #[error("not found")]
    NotFound(#[from] NotFoundError),

    #[error("backend request failed")]
    Api(#[from] ApiError),

    #[error("session error")]
    Session(#[from] SessionError),
}

impl HomeServerError {
    /// Human readable message suitable for a notification.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation(err) => err.to_string(),
            Self::NotFound(err) => err.to_string(),
            Self::Api(err) => err.to_string(),
            Self::Session(err) => err.to_string(),
        }
    }
}

/// Input rejected before any request is sent.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("{0} must not be empty")]
    EmptyField(&'static str),

    #[error("port must be non-zero")]
    ZeroPort,

    #[error("RAM must be at least 1 GB")]
    InsufficientRam,

    #[error("invalid MAC address '{0}' (expected format 00:11:22:33:44:55)")]
    InvalidMacAddress(String),

    #[error("unknown {kind} '{value}'")]
    UnknownVariant { kind: &'static str, value: String },

    #[error("cannot {action} '{target}' while it is {state}")]
    NotAllowed {
        action: &'static str,
        target: String,
        state: String,
    },
}

/// A handle the backend no longer knows about.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{entity} '{id}' not found")]
pub struct NotFoundError {
    pub entity: &'static str,
    pub id: String,
}

/// Errors local to the terminal session lifecycle.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error("no SSH connection")]
    NotConnected,

    #[error("already connected to {0}")]
    AlreadyConnected(String),

    #[error("no saved password available for auto-fill")]
    NoSavedPassword,
}

/// Failure of a single backend call.
///
/// Variants map onto the three error classes the client distinguishes:
/// transport (`Timeout`, `Network`), HTTP status (`Status`) and
/// application-level (`Rejected`, i.e. `success: false`).
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("request timed out after {}s", .0.as_secs())]
    Timeout(Duration),

    #[error("connection error")]
    Network(#[source] BoxError),

    #[error("HTTP {status}: {message}")]
    Status { status: u16, message: String },

    #[error("{0}")]
    Rejected(String),

    #[error("malformed response")]
    Decode(#[source] BoxError),
}

impl ApiError {
    /// Whether the call failed at the HTTP level (timeout, network, non-2xx).
    ///
    /// Only these failures count against backend liveness. An
    /// application-level rejection or an undecodable body still proves the
    /// backend answered.
    #[must_use]
    pub fn is_request_failure(&self) -> bool {
        matches!(
            self,
            Self::Timeout(_) | Self::Network(_) | Self::Status { .. }
        )
    }

    /// Whether the backend reported the addressed handle as unknown.
    #[must_use]
    pub fn is_stale_handle(&self) -> bool {
        matches!(self, Self::Status { status: 401 | 404 | 410, .. })
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(Box::new(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_classify_timeout_as_request_failure() {
        assert!(ApiError::Timeout(Duration::from_secs(10)).is_request_failure());
    }

    #[test]
    fn should_classify_non_2xx_as_request_failure() {
        let err = ApiError::Status {
            status: 500,
            message: "boom".to_string(),
        };
        assert!(err.is_request_failure());
    }

    #[test]
    fn should_not_classify_rejection_as_request_failure() {
        assert!(!ApiError::Rejected("nope".to_string()).is_request_failure());
    }

    #[test]
    fn should_detect_stale_handle_from_not_found_status() {
        let err = ApiError::Status {
            status: 404,
            message: "gone".to_string(),
        };
        assert!(err.is_stale_handle());
        assert!(!ApiError::Rejected("gone".to_string()).is_stale_handle());
    }

    #[test]
    fn should_display_timeout_in_seconds() {
        let err = ApiError::Timeout(Duration::from_secs(10));
        assert_eq!(err.to_string(), "request timed out after 10s");
    }

    #[test]
    fn should_use_inner_message_for_user_message() {
        let err: HomeServerError = ValidationError::EmptyField("domain").into();
        assert_eq!(err.user_message(), "domain must not be empty");
    }

    #[test]
    fn should_convert_json_error_into_decode() {
        let json_err = serde_json::from_str::<serde_json::Value>("{{bad").unwrap_err();
        let err: ApiError = json_err.into();
        assert!(matches!(err, ApiError::Decode(_)));
    }
}
