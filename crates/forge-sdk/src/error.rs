//! Error types for the Forge SDK.
//!
//! Uses `thiserror` for structured error handling with automatic `From` implementations.

use std::sync::Arc;

/// Errors surfaced by every client in this crate.
#[derive(thiserror::Error, Debug)]
pub enum ForgeError {
    /// A required credential or parameter was missing or empty.
    ///
    /// Always detected before any network call is made.
    #[error("Invalid argument '{field}': {message}")]
    InvalidArgument {
        /// Name of the offending parameter
        field: String,
        /// What was wrong with it
        message: String,
    },

    /// The token endpoint rejected the exchange or returned an unreadable body.
    #[error("Authentication failed{}: {message}", fmt_status(.status.as_ref()))]
    Authentication {
        /// HTTP status code, when the failure came from a response
        status: Option<u16>,
        /// Response body or parse failure
        message: String,
    },

    /// A resource call (listing, details, upload, translation) returned a non-success status.
    #[error("Request failed with status {status}: {message}")]
    Transport {
        /// HTTP status code
        status: u16,
        /// Response body, if any
        message: String,
    },

    /// A chunked upload was aborted or the stream did not match its declared size.
    #[error("Upload failed: {message}")]
    Upload {
        /// Description of the failure
        message: String,
    },

    /// HTTP transport error (connection, DNS, TLS, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Middleware error
    #[error("Middleware error: {0}")]
    Middleware(#[from] reqwest_middleware::Error),

    /// JSON parsing error
    #[error("Failed to parse response: {0}")]
    Parse(#[from] serde_json::Error),

    /// Reading the upload source failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A base URL or `next` cursor could not be resolved
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),
}

fn fmt_status(status: Option<&u16>) -> String {
    status.map(|s| format!(" ({s})")).unwrap_or_default()
}

impl ForgeError {
    /// Create an invalid argument error.
    #[must_use]
    pub fn invalid_argument(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidArgument { field: field.into(), message: message.into() }
    }

    /// Create an authentication error.
    #[must_use]
    pub fn authentication(status: Option<u16>, message: impl Into<String>) -> Self {
        Self::Authentication { status, message: message.into() }
    }

    /// Create a transport error.
    #[must_use]
    pub fn transport(status: u16, message: impl Into<String>) -> Self {
        Self::Transport { status, message: message.into() }
    }

    /// Create an upload error.
    #[must_use]
    pub fn upload(message: impl Into<String>) -> Self {
        Self::Upload { message: message.into() }
    }

    /// Returns true if this error came from the token exchange.
    #[must_use]
    pub const fn is_authentication(&self) -> bool {
        matches!(self, Self::Authentication { .. })
    }

    /// HTTP status code carried by this error, if any.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Authentication { status, .. } => *status,
            Self::Transport { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Recover an owned error from one shared between concurrent waiters.
    ///
    /// Token fetches only fail with [`Self::Authentication`], so every waiter
    /// sees the same variant, status and message.
    pub(crate) fn from_shared(err: Arc<Self>) -> Self {
        match Arc::try_unwrap(err) {
            Ok(err) => err,
            Err(shared) => match shared.as_ref() {
                Self::Authentication { status, message } => {
                    Self::authentication(*status, message.clone())
                }
                other => Self::authentication(None, other.to_string()),
            },
        }
    }
}

/// Result type alias for SDK operations.
pub type ForgeResult<T> = Result<T, ForgeError>;
