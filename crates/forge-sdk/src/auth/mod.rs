//! OAuth 2.0 authentication against the Forge authentication API.
//!
//! - [`AuthenticationClient`]: the raw client-credentials, authorization-code
//!   and refresh-token exchanges
//! - [`TokenProvider`]: the capability every resource client depends on, with a
//!   static and a caching client-credentials implementation

mod client;
mod provider;
mod types;

pub use client::AuthenticationClient;
pub use provider::{OAuthTokenProvider, StaticTokenProvider, TokenProvider};
pub use types::{CachedToken, Clock, SystemClock, ThreeLeggedToken, TwoLeggedToken};
