//! Model derivative client: translation jobs and manifests.

use std::sync::Arc;

use crate::auth::TokenProvider;
use crate::client::ApiClient;
use crate::config::{Config, scopes};
use crate::error::{ForgeError, ForgeResult};
use crate::models::{BucketRegion, OutputFormat, TranslationJob, TranslationJobStatus};

const MANIFEST_ENDPOINT: &str = "/derivativeservice/v2/manifest";
const DESIGNDATA_US: &str = "/modelderivative/v2/designdata";
const DESIGNDATA_EMEA: &str = "/modelderivative/v2/regions/eu/designdata";

const fn designdata(region: BucketRegion) -> &'static str {
    match region {
        BucketRegion::Us => DESIGNDATA_US,
        BucketRegion::Emea => DESIGNDATA_EMEA,
    }
}

/// Client for submitting translations and reading their results.
#[derive(Debug, Clone)]
pub struct DerivativesClient {
    api: ApiClient,
}

impl DerivativesClient {
    /// Create a client against the configured derivatives host.
    ///
    /// # Errors
    ///
    /// Returns error if the base URL is invalid or HTTP client initialization fails.
    pub fn new(tokens: Arc<dyn TokenProvider>, config: &Config) -> ForgeResult<Self> {
        Ok(Self { api: ApiClient::new(tokens, &config.derivatives_base_url, config)? })
    }

    /// Translate an object to SVF.
    pub async fn translate_to_svf(
        &self,
        urn: &str,
        views: &[&str],
        region: BucketRegion,
    ) -> ForgeResult<TranslationJob> {
        self.translate(urn, &[OutputFormat::svf(views)], region).await
    }

    /// Translate an object to SVF2.
    pub async fn translate_to_svf2(
        &self,
        urn: &str,
        views: &[&str],
        region: BucketRegion,
    ) -> ForgeResult<TranslationJob> {
        self.translate(urn, &[OutputFormat::svf2(views)], region).await
    }

    /// Submit a translation job with arbitrary output formats.
    pub async fn translate(
        &self,
        urn: &str,
        formats: &[OutputFormat],
        region: BucketRegion,
    ) -> ForgeResult<TranslationJob> {
        if urn.is_empty() {
            return Err(ForgeError::invalid_argument("urn", "must not be empty"));
        }

        let payload = serde_json::json!({
            "input": { "urn": urn },
            "output": {
                "destination": { "region": region.as_str() },
                "formats": formats,
            }
        });

        let path = format!("{}/job", designdata(region));
        let job: TranslationJob = self.api.post_json(&path, &payload, &[], scopes::DATA_ALL).await?;

        tracing::info!(urn, result = %job.result, region = %region, "Submitted translation job");
        Ok(job)
    }

    /// Fetch the manifest summary of a translation.
    pub async fn check_translation_status(
        &self,
        urn: &str,
        region: BucketRegion,
    ) -> ForgeResult<TranslationJobStatus> {
        let path = format!("{}/{}/manifest", designdata(region), urn);
        self.api.get_json(&path, scopes::DATA_READ).await
    }

    /// Download the raw derivative manifest.
    pub async fn get_model(&self, urn: &str) -> ForgeResult<Vec<u8>> {
        let path = format!("{MANIFEST_ENDPOINT}/{urn}");
        let response = self.api.get(&path, scopes::DATA_READ).await?;
        Ok(response.bytes().await?.to_vec())
    }
}
