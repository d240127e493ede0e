//! Shared HTTP plumbing for the resource clients.
//!
//! Provides:
//! - Connection pooling via reqwest
//! - Opt-in retry middleware with exponential backoff (off by default)
//! - A bearer token from the configured [`TokenProvider`] on every request
//! - Uniform mapping of non-success statuses to [`ForgeError::Transport`]

use std::sync::Arc;
use std::time::Duration;

use reqwest::{Client, Method};
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware, RequestBuilder};
use reqwest_retry::{RetryTransientMiddleware, policies::ExponentialBackoff};
use url::Url;

use crate::auth::TokenProvider;
use crate::config::{Config, api};
use crate::error::{ForgeError, ForgeResult};

/// Build the HTTP client shared by every SDK client.
pub(crate) fn build_http_client(config: &Config) -> ForgeResult<ClientWithMiddleware> {
    let client = Client::builder()
        .timeout(config.request_timeout)
        .connect_timeout(config.connect_timeout)
        .pool_max_idle_per_host(api::MAX_KEEPALIVE)
        .pool_idle_timeout(api::KEEPALIVE_EXPIRY)
        .gzip(true)
        .build()?;

    let mut builder = ClientBuilder::new(client);
    if config.max_retries > 0 {
        let retry_policy = ExponentialBackoff::builder()
            .retry_bounds(Duration::from_secs(1), Duration::from_secs(30))
            .build_with_max_retries(config.max_retries);
        builder = builder.with(RetryTransientMiddleware::new_with_policy(retry_policy));
    }

    Ok(builder.build())
}

/// Parse a base URL so relative paths resolve beneath it.
pub(crate) fn parse_base_url(base: &str) -> ForgeResult<Url> {
    if base.ends_with('/') {
        Ok(Url::parse(base)?)
    } else {
        Ok(Url::parse(&format!("{base}/"))?)
    }
}

/// Map a non-success response to a transport error carrying status and body.
pub(crate) async fn handle_response(response: reqwest::Response) -> ForgeResult<reqwest::Response> {
    let status = response.status();

    if status.is_success() {
        return Ok(response);
    }

    let text = response.text().await.unwrap_or_default();
    tracing::warn!(status = status.as_u16(), "Request failed");
    Err(ForgeError::transport(status.as_u16(), text))
}

/// Authenticated client bound to one API base URL.
///
/// Every request asks the token provider for a token covering the scopes it
/// needs, so a caching provider only hits the network when a token is missing
/// or expired.
#[derive(Clone)]
pub struct ApiClient {
    /// HTTP client with middleware.
    http: ClientWithMiddleware,

    /// Source of bearer tokens.
    tokens: Arc<dyn TokenProvider>,

    /// Base URL that relative endpoints resolve against.
    base_url: Url,
}

impl ApiClient {
    /// Create a client for `base_url`.
    ///
    /// # Errors
    ///
    /// Returns error if the base URL is invalid or HTTP client initialization fails.
    pub fn new(tokens: Arc<dyn TokenProvider>, base_url: &str, config: &Config) -> ForgeResult<Self> {
        Ok(Self { http: build_http_client(config)?, tokens, base_url: parse_base_url(base_url)? })
    }

    /// Base URL of this client.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolve an endpoint path (relative, absolute path, or full URL).
    pub fn endpoint(&self, path: &str) -> ForgeResult<Url> {
        Ok(self.base_url.join(path)?)
    }

    /// Start an authenticated request.
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        scopes: &[&str],
    ) -> ForgeResult<RequestBuilder> {
        let url = self.endpoint(path)?;
        let token = self.tokens.get_token(scopes).await?;
        Ok(self.http.request(method, url).bearer_auth(token))
    }

    /// Send a request and fail on non-success statuses.
    pub async fn send(&self, request: RequestBuilder) -> ForgeResult<reqwest::Response> {
        let response = request.send().await?;
        handle_response(response).await
    }

    /// Make an authenticated GET request.
    pub async fn get(&self, path: &str, scopes: &[&str]) -> ForgeResult<reqwest::Response> {
        let request = self.request(Method::GET, path, scopes).await?;
        self.send(request).await
    }

    /// Make an authenticated GET request and decode the JSON body.
    pub async fn get_json<T>(&self, path: &str, scopes: &[&str]) -> ForgeResult<T>
    where
        T: serde::de::DeserializeOwned,
    {
        let response = self.get(path, scopes).await?;
        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(ForgeError::from)
    }

    /// Make an authenticated POST request with a JSON body and decode the JSON response.
    pub async fn post_json<T>(
        &self,
        path: &str,
        body: &serde_json::Value,
        headers: &[(&str, String)],
        scopes: &[&str],
    ) -> ForgeResult<T>
    where
        T: serde::de::DeserializeOwned,
    {
        let body_str = serde_json::to_string(body)?;

        let mut request = self
            .request(Method::POST, path, scopes)
            .await?
            .header("Content-Type", "application/json");
        for (name, value) in headers {
            request = request.header(*name, value.as_str());
        }

        let response = self.send(request.body(body_str)).await?;
        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(ForgeError::from)
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient").field("base_url", &self.base_url.as_str()).finish()
    }
}
