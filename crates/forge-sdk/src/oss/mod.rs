//! Object Storage Service (data management) client.
//!
//! Listings are paginated: each page carries a `next` path that is fetched
//! only after the current page has been consumed.

mod upload;

use std::sync::Arc;

use async_stream::try_stream;
use futures::{Stream, TryStreamExt};
use serde::de::DeserializeOwned;

use crate::auth::TokenProvider;
use crate::client::ApiClient;
use crate::config::{Config, scopes};
use crate::error::{ForgeError, ForgeResult};
use crate::models::{Bucket, BucketPolicy, BucketRegion, Object, Page};

/// Client for buckets and objects.
#[derive(Clone)]
pub struct DataManagementClient {
    api: ApiClient,

    /// Uploads strictly larger than this use the resumable endpoint.
    upload_threshold: u64,

    /// Chunk size used by [`Self::upload_stream`] and [`Self::upload_file`].
    chunk_size: u64,
}

impl DataManagementClient {
    /// Create a client against the configured OSS base URL.
    ///
    /// # Errors
    ///
    /// Returns error if the base URL is invalid or HTTP client initialization fails.
    pub fn new(tokens: Arc<dyn TokenProvider>, config: &Config) -> ForgeResult<Self> {
        Ok(Self {
            api: ApiClient::new(tokens, &config.oss_base_url, config)?,
            upload_threshold: config.upload_threshold,
            chunk_size: config.chunk_size,
        })
    }

    /// Stream every bucket, one page at a time.
    pub fn enumerate_buckets(&self) -> impl Stream<Item = ForgeResult<Bucket>> + '_ {
        self.paginate("buckets".to_string())
    }

    /// Collect every bucket.
    pub async fn list_buckets(&self) -> ForgeResult<Vec<Bucket>> {
        self.enumerate_buckets().try_collect().await
    }

    /// Stream every object in a bucket, one page at a time.
    pub fn enumerate_objects(&self, bucket_key: &str) -> impl Stream<Item = ForgeResult<Object>> + '_ {
        self.paginate(format!("buckets/{bucket_key}/objects"))
    }

    /// Collect every object in a bucket.
    pub async fn list_objects(&self, bucket_key: &str) -> ForgeResult<Vec<Object>> {
        require("bucket_key", bucket_key)?;
        self.enumerate_objects(bucket_key).try_collect().await
    }

    /// Fetch the details of a single object.
    pub async fn get_object_details(&self, bucket_key: &str, object_key: &str) -> ForgeResult<Object> {
        require("bucket_key", bucket_key)?;
        require("object_key", object_key)?;

        let path = format!("buckets/{bucket_key}/objects/{object_key}/details");
        self.api.get_json(&path, scopes::READ).await
    }

    /// Create a bucket.
    pub async fn create_bucket(
        &self,
        bucket_key: &str,
        policy: BucketPolicy,
        region: BucketRegion,
    ) -> ForgeResult<Bucket> {
        require("bucket_key", bucket_key)?;

        let body = serde_json::json!({
            "bucketKey": bucket_key,
            "policyKey": policy.as_str(),
        });
        let headers = [("x-ads-region", region.header_value().to_string())];

        let bucket: Bucket = self.api.post_json("buckets", &body, &headers, scopes::BUCKET_ALL).await?;
        tracing::info!(bucket = %bucket.bucket_key, policy = %policy, region = %region, "Created bucket");
        Ok(bucket)
    }

    /// Follow `next` cursors starting at `first`, strictly in server order.
    fn paginate<'a, T>(&'a self, first: String) -> impl Stream<Item = ForgeResult<T>> + 'a
    where
        T: DeserializeOwned + 'a,
    {
        try_stream! {
            let mut next = Some(first);
            while let Some(path) = next.take() {
                tracing::debug!(%path, "Fetching page");
                let page: Page<T> = self.api.get_json(&path, scopes::READ).await?;
                next = page.next_page().map(str::to_string);
                for item in page.items {
                    yield item;
                }
            }
        }
    }
}

fn require(field: &str, value: &str) -> ForgeResult<()> {
    if value.is_empty() {
        return Err(ForgeError::invalid_argument(field, "must not be empty"));
    }
    Ok(())
}

impl std::fmt::Debug for DataManagementClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DataManagementClient")
            .field("api", &self.api)
            .field("upload_threshold", &self.upload_threshold)
            .field("chunk_size", &self.chunk_size)
            .finish()
    }
}
