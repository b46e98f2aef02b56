//! Shared reqwest client and request plumbing.

use std::time::Duration;

use homeserver_domain::error::ApiError;
use reqwest::{Method, RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;

use crate::envelope;
use crate::error::{HttpClientError, transport_error};

/// Default backend address.
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000/api";

/// Connection settings for [`HttpClient`].
#[derive(Debug, Clone)]
pub struct HttpConfig {
    /// Base URL every endpoint path is appended to.
    pub base_url: String,
    /// Transport-level timeout per request.
    pub timeout: Duration,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(10),
        }
    }
}

/// REST client implementing every API port.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: reqwest::Client,
    base_url: Url,
    timeout: Duration,
}

impl HttpClient {
    /// # Errors
    ///
    /// Returns [`HttpClientError::InvalidBaseUrl`] when the base URL does not
    /// parse or is not `http(s)`, or [`HttpClientError::Build`] when the TLS
    /// backend cannot be initialised.
    pub fn new(config: &HttpConfig) -> Result<Self, HttpClientError> {
        let invalid = |reason: String| HttpClientError::InvalidBaseUrl {
            url: config.base_url.clone(),
            reason,
        };
        let base_url = Url::parse(&config.base_url).map_err(|err| invalid(err.to_string()))?;
        if !matches!(base_url.scheme(), "http" | "https") || base_url.cannot_be_a_base() {
            return Err(invalid("expected an http(s) URL".to_string()));
        }
        let client = reqwest::Client::builder().timeout(config.timeout).build()?;
        tracing::debug!(base_url = %base_url, timeout = ?config.timeout, "http client ready");
        Ok(Self {
            client,
            base_url,
            timeout: config.timeout,
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Endpoint URL for `segments`, each one percent-encoded.
    pub(crate) fn url(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    pub(crate) fn request(&self, method: Method, segments: &[&str]) -> RequestBuilder {
        self.client.request(method, self.url(segments))
    }

    pub(crate) fn get(&self, segments: &[&str]) -> RequestBuilder {
        self.request(Method::GET, segments)
    }

    pub(crate) fn post(&self, segments: &[&str]) -> RequestBuilder {
        self.request(Method::POST, segments)
    }

    pub(crate) fn delete(&self, segments: &[&str]) -> RequestBuilder {
        self.request(Method::DELETE, segments)
    }

    pub(crate) async fn send(&self, request: RequestBuilder) -> Result<Response, ApiError> {
        let response = request
            .send()
            .await
            .map_err(|err| transport_error(err, self.timeout))?;
        tracing::debug!(url = %response.url(), status = %response.status(), "backend answered");
        Ok(response)
    }

    /// Send `request` and decode the enveloped JSON answer.
    pub(crate) async fn fetch<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<T, ApiError> {
        let response = self.send(request).await?;
        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|err| transport_error(err, self.timeout))?;
        envelope::decode(status, &body)
    }

    /// Send `request` and return the acknowledgement message.
    pub(crate) async fn acknowledge(&self, request: RequestBuilder) -> Result<String, ApiError> {
        let ack: envelope::Ack = self.fetch(request).await?;
        Ok(ack.message)
    }
}
