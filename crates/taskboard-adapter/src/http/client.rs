/*
[INPUT]:  HTTP configuration (base URL, timeouts) and session cookies
[OUTPUT]: Configured reqwest client ready for API calls
[POS]:    HTTP layer - core client implementation
[UPDATE]: When adding connection options or changing client behavior
*/

use reqwest::{Client, Method, RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

use crate::http::{ApiError, Result};
use crate::types::ErrorBody;

/// Default backend origin used when nothing else is configured
pub const DEFAULT_BASE_URL: &str = "http://localhost:5000";

/// HTTP client configuration
///
/// `timeout` applies to every request sent through the client. It is `None`
/// by default: session and task calls wait for as long as the transport
/// allows, only connection establishment is bounded. Callers needing a hard
/// bound (the connectivity probe) wrap individual calls themselves.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub timeout: Option<Duration>,
    pub connect_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout: None,
            connect_timeout: Duration::from_secs(10),
        }
    }
}

/// Main HTTP client for the Taskboard API
///
/// Holds a cookie store, so the session cookie set by login/register is
/// replayed on every later request made through the same client (or a clone).
#[derive(Debug, Clone)]
pub struct ApiClient {
    http_client: Client,
    base_url: Url,
}

impl ApiClient {
    /// Create a new client for the default local backend
    pub fn new() -> Result<Self> {
        Self::with_config(ClientConfig::default(), DEFAULT_BASE_URL)
    }

    /// Create a new client with custom configuration and backend origin
    pub fn with_config(config: ClientConfig, base_url: &str) -> Result<Self> {
        let mut builder = Client::builder()
            .cookie_store(true)
            .connect_timeout(config.connect_timeout);
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let http_client = builder
            .build()
            .map_err(|e| ApiError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            http_client,
            base_url: Url::parse(base_url)?,
        })
    }

    /// Backend origin this client talks to
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Build full URL for an endpoint path
    pub(crate) fn url(&self, endpoint: &str) -> Result<Url> {
        Ok(self.base_url.join(endpoint)?)
    }

    /// Build full URL for `{collection}/{id}`, escaping the id as one path segment
    pub(crate) fn item_url(&self, collection: &str, id: &str) -> Result<Url> {
        let mut url = self.url(collection)?;
        url.path_segments_mut()
            .map_err(|_| ApiError::Config(format!("base URL cannot be a base: {}", self.base_url)))?
            .pop_if_empty()
            .push(id);
        Ok(url)
    }

    /// Build request builder for an endpoint path
    pub(crate) fn request(&self, method: Method, endpoint: &str) -> Result<RequestBuilder> {
        let url = self.url(endpoint)?;
        Ok(self.http_client.request(method, url))
    }

    /// Build request builder for an already resolved URL
    pub(crate) fn request_url(&self, method: Method, url: Url) -> RequestBuilder {
        self.http_client.request(method, url)
    }

    /// Send a request and decode a JSON success body
    pub(crate) async fn send_json<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T> {
        let response = self.send_checked(builder).await?;
        let bytes = response.bytes().await?;
        if bytes.is_empty() {
            return Err(ApiError::InvalidResponse("empty response body".to_string()));
        }
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Send a request whose success body is irrelevant
    pub(crate) async fn send_empty(&self, builder: RequestBuilder) -> Result<()> {
        self.send_checked(builder).await?;
        Ok(())
    }

    async fn send_checked(&self, builder: RequestBuilder) -> Result<Response> {
        let response = builder.send().await?;
        let status = response.status();
        debug!(status = status.as_u16(), url = %response.url(), "api response");

        if status.is_success() {
            return Ok(response);
        }

        // Error bodies are `{ "message": "..." }` when the server has anything to say.
        let message = response
            .bytes()
            .await
            .ok()
            .and_then(|bytes| serde_json::from_slice::<ErrorBody>(&bytes).ok())
            .and_then(|body| body.message);
        Err(ApiError::api_error(status, message))
    }
}
