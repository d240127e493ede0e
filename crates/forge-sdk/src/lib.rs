//! Forge SDK
//!
//! Async client for the Autodesk Forge authentication, data management and
//! model derivative APIs.
//!
//! # Features
//!
//! - **Pluggable tokens**: every client depends only on [`TokenProvider`]; use a
//!   [`StaticTokenProvider`] for tokens obtained elsewhere or an
//!   [`OAuthTokenProvider`] that caches client-credentials tokens per scope set
//! - **Streaming pagination**: bucket and object listings follow `next` cursors lazily
//! - **Resumable uploads**: large objects are sent as sequential byte-range chunks
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use forge_sdk::{Config, DataManagementClient, OAuthTokenProvider};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env()?;
//!     let tokens = Arc::new(OAuthTokenProvider::from_config(&config)?);
//!     let oss = DataManagementClient::new(tokens, &config)?;
//!
//!     for bucket in oss.list_buckets().await? {
//!         println!("{}", bucket.bucket_key);
//!     }
//!     Ok(())
//! }
//! ```

pub mod auth;
pub mod client;
pub mod config;
pub mod derivatives;
pub mod error;
pub mod models;
pub mod oss;
pub mod upload;

pub use auth::{AuthenticationClient, OAuthTokenProvider, StaticTokenProvider, TokenProvider};
pub use config::Config;
pub use derivatives::DerivativesClient;
pub use error::{ForgeError, ForgeResult};
pub use oss::DataManagementClient;
