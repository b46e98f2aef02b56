//! Request gateway: the single path every backend call goes through.
//!
//! The gateway bounds each call with a timeout and feeds the outcome into
//! [`Liveness`]. It never retries.

use std::future::Future;
use std::time::Duration;

use homeserver_domain::error::ApiError;

use crate::liveness::Liveness;

/// Default bound on a single backend call.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Clone)]
pub struct RequestGateway {
    liveness: Liveness,
    timeout: Duration,
}

impl RequestGateway {
    #[must_use]
    pub fn new(liveness: Liveness, timeout: Duration) -> Self {
        Self { liveness, timeout }
    }

    #[must_use]
    pub fn liveness(&self) -> &Liveness {
        &self.liveness
    }

    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Await `request` for at most the configured timeout.
    ///
    /// Any answer from the backend, including an application-level
    /// rejection or an undecodable body, counts as a success for liveness.
    /// Timeouts, network errors and non-2xx statuses count as failures.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Timeout`] when the deadline passes, otherwise the
    /// error produced by `request`.
    pub async fn call<T, F>(&self, request: F) -> Result<T, ApiError>
    where
        F: Future<Output = Result<T, ApiError>>,
    {
        let outcome = tokio::time::timeout(self.timeout, request)
            .await
            .unwrap_or(Err(ApiError::Timeout(self.timeout)));

        match &outcome {
            Err(err) if err.is_request_failure() => {
                tracing::debug!(error = %err, "request failed");
                self.liveness.record_failure();
            }
            _ => self.liveness.record_success(),
        }
        outcome
    }
}

impl Default for RequestGateway {
    fn default() -> Self {
        Self::new(Liveness::new(), DEFAULT_REQUEST_TIMEOUT)
    }
}
