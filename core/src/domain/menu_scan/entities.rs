use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// One stored menu photo.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct MenuScan {
    pub filename: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_filename: Option<String>,
    pub content_type: String,
    pub size_bytes: u64,
    pub storage_path: String,
    pub checksum_sha256: String,
    pub created_at: DateTime<Utc>,
}

/// What the image store knows about a file it holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredImage {
    pub path: String,
    pub size_bytes: u64,
    pub created_at: DateTime<Utc>,
}
