//! Data models for Forge API entities.
//!
//! Models use `#[serde(rename_all = "camelCase")]` to match API naming.

mod derivative;
mod enums;
mod storage;

pub use derivative::{OutputFormat, TranslationJob, TranslationJobStatus};
pub use enums::{BucketPolicy, BucketRegion, ConvertType};
pub use storage::{Bucket, Object, Page};
