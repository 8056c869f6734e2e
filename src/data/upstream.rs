//! Visual Crossing timeline API client
//!
//! This module issues the upstream HTTP request for a city's forecast and
//! hands back the raw JSON tree. It does no shape checking beyond "the body
//! is JSON"; interpreting the payload belongs to the normalizer.

use std::time::Duration;

use reqwest::Client;
use serde_json::Value;
use thiserror::Error;

/// Base URL for the Visual Crossing timeline API
const VISUAL_CROSSING_BASE_URL: &str =
    "https://weather.visualcrossing.com/VisualCrossingWebServices/rest/services/timeline";

/// Request timeout for upstream calls
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Errors that can occur when fetching forecast data
#[derive(Debug, Error)]
pub enum UpstreamError {
    /// HTTP request failed at the network level (DNS, connect, timeout)
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Provider answered with a non-success status
    #[error("upstream returned status {status}: {body}")]
    Status {
        /// HTTP status code of the response
        status: u16,
        /// Response body, kept for diagnostics
        body: String,
    },

    /// Response body was not valid JSON
    #[error("failed to decode upstream response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Client for fetching forecast data from Visual Crossing
///
/// Holds a single `reqwest::Client`; construct one at startup and reuse it
/// for every lookup rather than building a client per request.
#[derive(Debug, Clone)]
pub struct UpstreamClient {
    /// HTTP client for making requests
    client: Client,
    /// Base URL for the API (allows override for testing)
    base_url: String,
    /// Visual Crossing API key
    api_key: String,
}

impl UpstreamClient {
    /// Creates a new UpstreamClient for the production endpoint
    ///
    /// # Arguments
    /// * `api_key` - Visual Crossing API key
    ///
    /// # Returns
    /// * `Ok(UpstreamClient)` with a 10 second request timeout
    /// * `Err(UpstreamError)` if the underlying HTTP client cannot be built
    pub fn new(api_key: impl Into<String>) -> Result<Self, UpstreamError> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;

        Ok(Self {
            client,
            base_url: VISUAL_CROSSING_BASE_URL.to_string(),
            api_key: api_key.into(),
        })
    }

    /// Overrides the base URL, e.g. to point at a mock server in tests
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Fetches the raw forecast payload for a city
    ///
    /// The request asks for metric units, daily granularity and a JSON body.
    /// No retries are performed; callers that want retry behavior must wrap
    /// this at their own boundary.
    ///
    /// # Arguments
    /// * `city` - City name, used as the timeline location path segment
    ///
    /// # Returns
    /// * `Ok(Value)` - The decoded JSON tree, shape unchecked
    /// * `Err(UpstreamError)` - On network failure, non-2xx status, or a
    ///   non-JSON body
    pub async fn fetch(&self, city: &str) -> Result<Value, UpstreamError> {
        let url = format!("{}/{}", self.base_url, city);

        let response = self
            .client
            .get(&url)
            .query(&[
                ("unitGroup", "metric"),
                ("include", "days"),
                ("key", self.api_key.as_str()),
                ("contentType", "json"),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(UpstreamError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let text = response.text().await?;
        let payload: Value = serde_json::from_str(&text)?;

        Ok(payload)
    }
}
