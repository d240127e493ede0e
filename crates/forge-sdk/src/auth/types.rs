//! OAuth 2.0 token types.

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

/// Response of the client-credentials (2-legged) grant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TwoLeggedToken {
    pub token_type: String,
    pub access_token: String,
    /// Lifetime in seconds, counted from issuance.
    pub expires_in: u64,
}

/// Response of the authorization-code and refresh (3-legged) grants.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThreeLeggedToken {
    pub token_type: String,
    pub access_token: String,
    pub refresh_token: String,
    /// Lifetime in seconds, counted from issuance.
    pub expires_in: u64,
}

/// An access token held in the provider cache.
#[derive(Clone)]
pub struct CachedToken {
    pub access_token: String,
    pub expires_at: DateTime<Utc>,
}

impl CachedToken {
    /// Build a cache entry expiring `expires_in` seconds after `issued_at`.
    #[must_use]
    pub fn new(access_token: String, issued_at: DateTime<Utc>, expires_in: u64) -> Self {
        let lifetime = i64::try_from(expires_in)
            .ok()
            .and_then(TimeDelta::try_seconds)
            .unwrap_or(TimeDelta::MAX);
        let expires_at = issued_at.checked_add_signed(lifetime).unwrap_or(DateTime::<Utc>::MAX_UTC);
        Self { access_token, expires_at }
    }

    /// A token is usable only while its expiry is strictly after `now`.
    #[must_use]
    pub fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        self.expires_at > now
    }
}

impl std::fmt::Debug for CachedToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CachedToken").field("expires_at", &self.expires_at).finish()
    }
}

/// Source of the current time for expiry checks.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
