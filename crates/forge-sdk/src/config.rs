//! Configuration for the Forge SDK clients.

use std::time::Duration;

/// API configuration constants.
pub mod api {
    use std::time::Duration;

    /// Authentication API base (token endpoints live beneath it).
    pub const AUTH_BASE_URL: &str = "https://developer.api.autodesk.com/authentication/v1/";

    /// Object Storage Service (data management) base.
    pub const OSS_BASE_URL: &str = "https://developer.api.autodesk.com/oss/v2/";

    /// Host for the model derivative APIs, which use absolute paths.
    pub const DERIVATIVES_BASE_URL: &str = "https://developer.api.autodesk.com";

    /// Request timeout.
    pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(90);

    /// Connection timeout.
    pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

    /// Maximum keepalive connections.
    pub const MAX_KEEPALIVE: usize = 10;

    /// Keepalive expiry.
    pub const KEEPALIVE_EXPIRY: Duration = Duration::from_secs(30);

    /// One mebibyte.
    pub const MIB: u64 = 1024 * 1024;

    /// Objects larger than this must go through the resumable endpoint (100 MiB).
    pub const UPLOAD_THRESHOLD: u64 = 100 * MIB;

    /// Default resumable chunk size (5 MiB).
    pub const CHUNK_SIZE: u64 = 5 * MIB;
}

/// Scope sets requested by the SDK clients.
pub mod scopes {
    /// Listing buckets and objects.
    pub const READ: &[&str] = &["bucket:read", "data:read"];

    /// Full bucket management.
    pub const BUCKET_ALL: &[&str] = &["bucket:read", "bucket:create", "bucket:update", "bucket:delete"];

    /// Full data access (uploads, translation jobs).
    pub const DATA_ALL: &[&str] = &["data:read", "data:search", "data:create", "data:write"];

    /// Read-only data access.
    pub const DATA_READ: &[&str] = &["data:read"];

    /// Write-only data access.
    pub const DATA_WRITE: &[&str] = &["data:create", "data:write"];

    /// Token handed to a browser-side viewer.
    pub const VIEWABLES_READ: &[&str] = &["viewables:read"];
}

/// SDK configuration.
#[derive(Clone)]
pub struct Config {
    /// OAuth client identifier.
    pub client_id: Option<String>,

    /// OAuth client secret.
    pub client_secret: Option<String>,

    /// Base URL for the authentication API.
    pub auth_base_url: String,

    /// Base URL for the data management (OSS) API.
    pub oss_base_url: String,

    /// Base URL for the model derivative API.
    pub derivatives_base_url: String,

    /// Request timeout.
    pub request_timeout: Duration,

    /// Connection timeout.
    pub connect_timeout: Duration,

    /// Uploads strictly larger than this are chunked.
    pub upload_threshold: u64,

    /// Chunk size for resumable uploads.
    pub chunk_size: u64,

    /// Transient-failure retries. Zero disables the retry middleware.
    pub max_retries: u32,
}

impl Config {
    /// Create a new configuration with the given client credentials.
    #[must_use]
    pub fn new(client_id: Option<String>, client_secret: Option<String>) -> Self {
        Self {
            client_id,
            client_secret,
            auth_base_url: api::AUTH_BASE_URL.to_string(),
            oss_base_url: api::OSS_BASE_URL.to_string(),
            derivatives_base_url: api::DERIVATIVES_BASE_URL.to_string(),
            request_timeout: api::REQUEST_TIMEOUT,
            connect_timeout: api::CONNECT_TIMEOUT,
            upload_threshold: api::UPLOAD_THRESHOLD,
            chunk_size: api::CHUNK_SIZE,
            max_retries: 0,
        }
    }

    /// Create a test configuration with every base URL pointing at a mock server.
    #[must_use]
    pub fn for_testing(base_url: &str) -> Self {
        let base_url = base_url.trim_end_matches('/');
        Self {
            client_id: Some("test-client".to_string()),
            client_secret: Some("test-secret".to_string()),
            auth_base_url: format!("{}/authentication/v1/", base_url),
            oss_base_url: format!("{}/oss/v2/", base_url),
            derivatives_base_url: base_url.to_string(),
            request_timeout: Duration::from_secs(5),
            connect_timeout: Duration::from_secs(2),
            upload_threshold: api::UPLOAD_THRESHOLD,
            chunk_size: api::CHUNK_SIZE,
            max_retries: 0,
        }
    }

    /// Create configuration from environment variables.
    ///
    /// Reads `FORGE_CLIENT_ID` and `FORGE_CLIENT_SECRET`.
    ///
    /// # Errors
    ///
    /// Returns error if environment variables are invalid.
    pub fn from_env() -> anyhow::Result<Self> {
        let client_id = std::env::var("FORGE_CLIENT_ID").ok().filter(|v| !v.is_empty());
        let client_secret = std::env::var("FORGE_CLIENT_SECRET").ok().filter(|v| !v.is_empty());
        Ok(Self::new(client_id, client_secret))
    }

    /// Check if both client credentials are configured.
    #[must_use]
    pub fn has_credentials(&self) -> bool {
        self.client_id.as_deref().is_some_and(|v| !v.is_empty())
            && self.client_secret.as_deref().is_some_and(|v| !v.is_empty())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(None, None)
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("client_id", &self.client_id)
            .field("has_client_secret", &self.client_secret.is_some())
            .field("auth_base_url", &self.auth_base_url)
            .field("oss_base_url", &self.oss_base_url)
            .field("derivatives_base_url", &self.derivatives_base_url)
            .field("upload_threshold", &self.upload_threshold)
            .field("chunk_size", &self.chunk_size)
            .field("max_retries", &self.max_retries)
            .finish()
    }
}
