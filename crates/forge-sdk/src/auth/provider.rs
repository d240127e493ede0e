//! Access token providers.
//!
//! ```text
//! TokenProvider (trait)
//!     |
//!     +-- StaticTokenProvider   (token obtained out-of-band)
//!     |
//!     +-- OAuthTokenProvider    (client-credentials grant, cached per scope key)
//! ```

use std::sync::Arc;

use async_trait::async_trait;
use moka::future::Cache;

use super::client::AuthenticationClient;
use super::types::{CachedToken, Clock, SystemClock};
use crate::config::Config;
use crate::error::{ForgeError, ForgeResult};

/// Separator used to build the cache key from a scope list.
const SCOPE_KEY_SEPARATOR: &str = "+";

/// Anything that can hand out a bearer token for a list of scopes.
#[async_trait]
pub trait TokenProvider: Send + Sync {
    /// Return a token valid for `scopes`.
    async fn get_token(&self, scopes: &[&str]) -> ForgeResult<String>;
}

/// Returns the same token for every request.
#[derive(Clone)]
pub struct StaticTokenProvider {
    access_token: String,
}

impl StaticTokenProvider {
    #[must_use]
    pub fn new(access_token: impl Into<String>) -> Self {
        Self { access_token: access_token.into() }
    }
}

#[async_trait]
impl TokenProvider for StaticTokenProvider {
    async fn get_token(&self, _scopes: &[&str]) -> ForgeResult<String> {
        Ok(self.access_token.clone())
    }
}

impl std::fmt::Debug for StaticTokenProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StaticTokenProvider").finish()
    }
}

/// Client-credentials token provider with an in-memory, expiry-aware cache.
///
/// Tokens are cached per scope key: the scopes joined with `+` in the order
/// the caller passed them, so `["a", "b"]` and `["b", "a"]` are separate
/// entries. Entries are only replaced after they expire and are never evicted
/// otherwise. The cache is owned by the provider and internally synchronized;
/// concurrent misses on the same key share a single exchange.
pub struct OAuthTokenProvider {
    client_id: String,
    client_secret: String,
    auth: AuthenticationClient,
    cache: Cache<String, CachedToken>,
    clock: Arc<dyn Clock>,
}

impl OAuthTokenProvider {
    /// Create a provider against the default authentication endpoint.
    ///
    /// # Errors
    ///
    /// Returns error if HTTP client initialization fails.
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> ForgeResult<Self> {
        let auth = AuthenticationClient::new(&Config::default())?;
        Ok(Self::with_authentication_client(client_id, client_secret, auth))
    }

    /// Create a provider from the credentials and endpoints in `config`.
    ///
    /// Missing credentials surface as [`ForgeError::Authentication`] on the
    /// first [`TokenProvider::get_token`] call, before any request is sent.
    /// Every other failed exchange is reported the same way, whether or not
    /// concurrent callers were waiting on it.
    pub fn from_config(config: &Config) -> ForgeResult<Self> {
        let auth = AuthenticationClient::new(config)?;
        Ok(Self::with_authentication_client(
            config.client_id.clone().unwrap_or_default(),
            config.client_secret.clone().unwrap_or_default(),
            auth,
        ))
    }

    /// Create a provider that exchanges credentials through `auth`.
    #[must_use]
    pub fn with_authentication_client(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        auth: AuthenticationClient,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            auth,
            cache: Cache::builder().build(),
            clock: Arc::new(SystemClock),
        }
    }

    /// Replace the clock used for expiry checks.
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// OAuth client identifier.
    #[must_use]
    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    /// Cache key for a scope list.
    #[must_use]
    pub fn cache_key(scopes: &[&str]) -> String {
        scopes.join(SCOPE_KEY_SEPARATOR)
    }

    /// Number of scope keys currently cached.
    pub async fn cached_entries(&self) -> u64 {
        self.cache.run_pending_tasks().await;
        self.cache.entry_count()
    }

    async fn fetch(&self, scopes: &[&str]) -> ForgeResult<CachedToken> {
        let grant = self
            .auth
            .authenticate(&self.client_id, &self.client_secret, scopes)
            .await
            .map_err(|e| match e {
                ForgeError::Authentication { .. } => e,
                ForgeError::InvalidArgument { field, message } => {
                    ForgeError::authentication(None, format!("{field} {message}"))
                }
                other => ForgeError::authentication(None, format!("token exchange failed: {other}")),
            })?;
        let issued_at = self.clock.now();
        Ok(CachedToken::new(grant.access_token, issued_at, grant.expires_in))
    }
}

#[async_trait]
impl TokenProvider for OAuthTokenProvider {
    async fn get_token(&self, scopes: &[&str]) -> ForgeResult<String> {
        let key = Self::cache_key(scopes);

        if let Some(cached) = self.cache.get(&key).await {
            if cached.is_fresh(self.clock.now()) {
                tracing::debug!(scopes = %key, "Token cache hit");
                return Ok(cached.access_token);
            }
            // A stale entry must be gone before the exchange starts.
            self.cache.invalidate(&key).await;
            tracing::debug!(scopes = %key, "Cached token expired");
        }

        tracing::debug!(scopes = %key, "Token cache miss");
        let token = self
            .cache
            .try_get_with(key, self.fetch(scopes))
            .await
            .map_err(ForgeError::from_shared)?;

        Ok(token.access_token)
    }
}

impl std::fmt::Debug for OAuthTokenProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OAuthTokenProvider")
            .field("client_id", &self.client_id)
            .field("auth", &self.auth)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_key_preserves_order() {
        assert_eq!(OAuthTokenProvider::cache_key(&["a", "b"]), "a+b");
        assert_eq!(OAuthTokenProvider::cache_key(&["b", "a"]), "b+a");
        assert_eq!(OAuthTokenProvider::cache_key(&[]), "");
    }

    #[tokio::test]
    async fn test_static_provider_ignores_scopes() {
        let provider = StaticTokenProvider::new("fixed");
        assert_eq!(provider.get_token(&["data:read"]).await.unwrap(), "fixed");
        assert_eq!(provider.get_token(&[]).await.unwrap(), "fixed");
    }

    #[tokio::test]
    async fn test_missing_credentials_fail_authentication() {
        let provider = OAuthTokenProvider::from_config(&Config::default()).unwrap();
        let err = provider.get_token(&["data:read"]).await.unwrap_err();
        assert!(matches!(err, ForgeError::Authentication { status: None, .. }));
        assert!(err.to_string().contains("client_id"));
        assert_eq!(provider.cached_entries().await, 0);
    }

    #[test]
    fn test_debug_hides_secret() {
        let provider = OAuthTokenProvider::new("id", "very-secret").unwrap();
        let debug = format!("{provider:?}");
        assert!(!debug.contains("very-secret"));
        assert!(debug.contains("id"));
    }
}
