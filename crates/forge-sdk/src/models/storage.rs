//! Bucket and object models for the Object Storage Service.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde::{Deserialize, Serialize};

/// A storage bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bucket {
    pub bucket_key: String,

    /// Creation time in milliseconds since the Unix epoch.
    #[serde(default)]
    pub created_date: i64,

    /// Retention policy name (`transient`, `temporary`, `persistent`).
    pub policy_key: String,
}

/// An object stored in a bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Object {
    pub bucket_key: String,
    pub object_key: String,
    pub object_id: String,
    #[serde(default)]
    pub sha1: String,
    /// Size in bytes.
    pub size: u64,
    #[serde(default)]
    pub location: String,
}

impl Object {
    /// Identifier used by the viewer and the model derivative API.
    ///
    /// URL-safe base64 of the object id, without padding.
    #[must_use]
    pub fn urn(&self) -> String {
        URL_SAFE_NO_PAD.encode(self.object_id.as_bytes())
    }
}

/// One page of a listing. `next` points at the following page, if any.
#[derive(Debug, Clone, Deserialize)]
pub struct Page<T> {
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
    #[serde(default)]
    pub next: Option<String>,
}

impl<T> Page<T> {
    /// Path of the next page; empty cursors end the listing.
    #[must_use]
    pub fn next_page(&self) -> Option<&str> {
        self.next.as_deref().filter(|next| !next.is_empty())
    }
}
