//! Network exchanges against the authentication API.

use reqwest_middleware::ClientWithMiddleware;
use serde::de::DeserializeOwned;
use url::Url;

use super::types::{ThreeLeggedToken, TwoLeggedToken};
use crate::client::{build_http_client, parse_base_url};
use crate::config::Config;
use crate::error::{ForgeError, ForgeResult};

/// Client for the OAuth 2.0 token endpoints.
///
/// Each grant is one form-encoded POST to a fixed path under the base URL.
#[derive(Clone)]
pub struct AuthenticationClient {
    http: ClientWithMiddleware,
    base_url: Url,
}

impl AuthenticationClient {
    /// Create a client using the configured authentication base URL.
    ///
    /// # Errors
    ///
    /// Returns error if the base URL is invalid or HTTP client initialization fails.
    pub fn new(config: &Config) -> ForgeResult<Self> {
        Ok(Self { http: build_http_client(config)?, base_url: parse_base_url(&config.auth_base_url)? })
    }

    /// Create a client against a custom base URL with default settings.
    pub fn with_base_url(base_url: &str) -> ForgeResult<Self> {
        let config = Config { auth_base_url: base_url.to_string(), ..Config::default() };
        Self::new(&config)
    }

    /// Base URL the grant endpoints resolve against.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Client-credentials grant (`POST authenticate`).
    pub async fn authenticate(
        &self,
        client_id: &str,
        client_secret: &str,
        scopes: &[&str],
    ) -> ForgeResult<TwoLeggedToken> {
        require("client_id", client_id)?;
        require("client_secret", client_secret)?;

        let scope = scopes.join(" ");
        let params = [
            ("client_id", client_id),
            ("client_secret", client_secret),
            ("grant_type", "client_credentials"),
            ("scope", scope.as_str()),
        ];

        self.exchange("authenticate", &params).await
    }

    /// Authorization-code grant (`POST gettoken`).
    pub async fn get_token(
        &self,
        client_id: &str,
        client_secret: &str,
        code: &str,
        redirect_uri: &str,
    ) -> ForgeResult<ThreeLeggedToken> {
        require("client_id", client_id)?;
        require("client_secret", client_secret)?;
        require("code", code)?;

        let params = [
            ("client_id", client_id),
            ("client_secret", client_secret),
            ("grant_type", "authorization_code"),
            ("code", code),
            ("redirect_uri", redirect_uri),
        ];

        self.exchange("gettoken", &params).await
    }

    /// Refresh grant (`POST refreshtoken`).
    pub async fn refresh_token(
        &self,
        client_id: &str,
        client_secret: &str,
        refresh_token: &str,
        scopes: &[&str],
    ) -> ForgeResult<ThreeLeggedToken> {
        require("client_id", client_id)?;
        require("client_secret", client_secret)?;
        require("refresh_token", refresh_token)?;

        let scope = scopes.join(" ");
        let params = [
            ("client_id", client_id),
            ("client_secret", client_secret),
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token),
            ("scope", scope.as_str()),
        ];

        self.exchange("refreshtoken", &params).await
    }

    /// URL the user visits to start the authorization-code flow.
    ///
    /// The code delivered to `redirect_uri` is redeemed with [`Self::get_token`].
    pub fn authorize_url(
        &self,
        client_id: &str,
        redirect_uri: &str,
        scopes: &[&str],
    ) -> ForgeResult<Url> {
        require("client_id", client_id)?;
        require("redirect_uri", redirect_uri)?;

        let mut url = self.base_url.join("authorize")?;
        url.query_pairs_mut()
            .append_pair("response_type", "code")
            .append_pair("client_id", client_id)
            .append_pair("redirect_uri", redirect_uri)
            .append_pair("scope", &scopes.join(" "));
        Ok(url)
    }

    async fn exchange<T>(&self, endpoint: &str, params: &[(&str, &str)]) -> ForgeResult<T>
    where
        T: DeserializeOwned,
    {
        let url = self.base_url.join(endpoint)?;
        let body = serde_urlencoded::to_string(params)
            .map_err(|e| ForgeError::invalid_argument("form", e.to_string()))?;

        tracing::debug!(%url, "Requesting token");

        let response = self
            .http
            .post(url)
            .header("Content-Type", "application/x-www-form-urlencoded")
            .body(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            tracing::warn!(status = status.as_u16(), endpoint, "Token exchange rejected");
            return Err(ForgeError::authentication(Some(status.as_u16()), text));
        }

        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| {
            ForgeError::authentication(None, format!("Could not retrieve authentication data: {e}"))
        })
    }
}

fn require(field: &str, value: &str) -> ForgeResult<()> {
    if value.is_empty() {
        return Err(ForgeError::invalid_argument(field, "must not be empty"));
    }
    Ok(())
}

impl std::fmt::Debug for AuthenticationClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthenticationClient").field("base_url", &self.base_url.as_str()).finish()
    }
}
