//! Model derivative (translation) models.

use serde::{Deserialize, Serialize};

use super::ConvertType;

/// One requested output of a translation job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputFormat {
    #[serde(rename = "type")]
    pub kind: ConvertType,
    pub views: Vec<String>,
}

impl OutputFormat {
    /// SVF output with the given views (`2d`, `3d`).
    #[must_use]
    pub fn svf(views: &[&str]) -> Self {
        Self { kind: ConvertType::Svf, views: views.iter().map(|v| (*v).to_string()).collect() }
    }

    /// SVF2 output with the given views (`2d`, `3d`).
    #[must_use]
    pub fn svf2(views: &[&str]) -> Self {
        Self { kind: ConvertType::Svf2, views: views.iter().map(|v| (*v).to_string()).collect() }
    }
}

/// Acknowledgement of a submitted translation job.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslationJob {
    pub result: String,
    pub urn: String,
}

/// Manifest summary of a translation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslationJobStatus {
    pub urn: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub progress: String,
    pub status: String,
    #[serde(default)]
    pub region: String,
    #[serde(default)]
    pub has_thumbnail: String,
}

impl TranslationJobStatus {
    /// True once the translation finished, successfully or not.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        matches!(self.status.as_str(), "success" | "failed" | "timeout")
    }
}
