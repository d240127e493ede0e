//! Enumeration types for API parameters.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Data center a bucket or derivative lives in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BucketRegion {
    #[default]
    Us,
    Emea,
}

impl BucketRegion {
    /// Lowercase name used in JSON payloads.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Us => "us",
            Self::Emea => "emea",
        }
    }

    /// Value of the `x-ads-region` header.
    #[must_use]
    pub const fn header_value(self) -> &'static str {
        match self {
            Self::Us => "US",
            Self::Emea => "EMEA",
        }
    }
}

impl fmt::Display for BucketRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BucketRegion {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "us" => Ok(Self::Us),
            "emea" | "eu" => Ok(Self::Emea),
            other => Err(format!("unknown region '{other}' (expected us or emea)")),
        }
    }
}

/// Retention policy of a bucket.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BucketPolicy {
    /// Objects are removed after 24 hours.
    #[default]
    Transient,
    /// Objects are removed after 30 days.
    Temporary,
    /// Objects are kept until deleted.
    Persistent,
}

impl BucketPolicy {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Transient => "transient",
            Self::Temporary => "temporary",
            Self::Persistent => "persistent",
        }
    }
}

impl fmt::Display for BucketPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BucketPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "transient" => Ok(Self::Transient),
            "temporary" => Ok(Self::Temporary),
            "persistent" => Ok(Self::Persistent),
            other => Err(format!("unknown bucket policy '{other}'")),
        }
    }
}

/// Output type of a translation job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConvertType {
    Dwg,
    Fbx,
    Ifc,
    Iges,
    Obj,
    Step,
    Stl,
    Svf,
    Svf2,
    Thumbnail,
}
