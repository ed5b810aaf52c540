//! HTTP client for the feeder web interface
//!
//! Timed GET requests against a feeder base URL. Every call returns a
//! `Result`; the client never retries and never panics on bad responses.
//! Retrying is left to the poller's next tick.

use reqwest::{
    header::{HeaderMap, HeaderValue, ACCEPT},
    Client,
};
use serde_json::Value;
use std::time::Duration;

use crate::config::FeederConfig;
use crate::utils::error::FetchError;
use crate::utils::normalize_base_url;

/// Per-request timeout used when no configuration is given
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Feeder HTTP client
///
/// Cloning is cheap: clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct FeederClient {
    /// HTTP client with configured timeout and compression
    client: Client,

    /// Base URL without trailing slash, e.g. `http://adsb-feeder.local`
    base_url: String,
}

impl FeederClient {
    /// Create a client for `base_url` with the default timeout
    ///
    /// # Errors
    ///
    /// Returns `FetchError::InvalidUrl` if `base_url` is not an http(s) URL,
    /// or `FetchError::Http` if the HTTP client cannot be created
    pub fn new(base_url: &str) -> Result<Self, FetchError> {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT)
    }

    /// Create a client with a custom request timeout
    ///
    /// # Errors
    ///
    /// See [`FeederClient::new`]
    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self, FetchError> {
        let user_agent = format!("feederwatch/{}", env!("CARGO_PKG_VERSION"));
        Self::build(base_url, timeout, &user_agent)
    }

    /// Create a client from the feeder section of the configuration
    ///
    /// # Errors
    ///
    /// See [`FeederClient::new`]
    pub fn from_config(config: &FeederConfig) -> Result<Self, FetchError> {
        Self::build(
            &config.base_url,
            config.request_timeout(),
            &config.user_agent,
        )
    }

    fn build(base_url: &str, timeout: Duration, user_agent: &str) -> Result<Self, FetchError> {
        let base_url = normalize_base_url(base_url).map_err(FetchError::InvalidUrl)?;

        let client = Client::builder()
            .timeout(timeout)
            .gzip(true)
            .user_agent(user_agent)
            .build()
            .map_err(FetchError::Http)?;

        Ok(Self { client, base_url })
    }

    /// Same connection pool and timeout, different feeder
    ///
    /// # Errors
    ///
    /// Returns `FetchError::InvalidUrl` if `base_url` is not an http(s) URL
    pub fn with_base_url(&self, base_url: &str) -> Result<Self, FetchError> {
        let base_url = normalize_base_url(base_url).map_err(FetchError::InvalidUrl)?;
        Ok(Self {
            client: self.client.clone(),
            base_url,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL for an endpoint path such as `/api/stage2_stats`
    pub fn endpoint_url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{path}", self.base_url)
        } else {
            format!("{}/{path}", self.base_url)
        }
    }

    /// Fetch and decode a JSON endpoint
    ///
    /// # Errors
    ///
    /// Network failures, non-2xx statuses and malformed JSON all yield a
    /// `FetchError`
    pub async fn fetch_json(&self, path: &str) -> Result<Value, FetchError> {
        let url = self.endpoint_url(path);
        tracing::debug!(url = %url, "Fetching JSON endpoint");

        let response = self
            .client
            .get(&url)
            .headers(Self::json_headers())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Fetch an endpoint as text
    ///
    /// # Errors
    ///
    /// Network failures and non-2xx statuses yield a `FetchError`
    pub async fn fetch_text(&self, path: &str) -> Result<String, FetchError> {
        let url = self.endpoint_url(path);
        tracing::debug!(url = %url, "Fetching page");

        let response = self.client.get(&url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        Ok(response.text().await?)
    }

    fn json_headers() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers
    }
}
