use axum::extract::Multipart;
use chrono::{DateTime, Utc};
use menulens_core::domain::menu_scan::{entities::MenuScan, value_objects::UploadMenuImageInput};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::application::http::server::api_entities::api_error::ApiError;

/// Multipart body accepted by the upload and analyze endpoints.
#[derive(Debug, ToSchema)]
#[allow(dead_code)]
pub struct MenuImageForm {
    /// JPEG, PNG or WebP photo of the menu
    #[schema(value_type = String, format = Binary)]
    pub file: Vec<u8>,
}

#[derive(Debug, Clone, Deserialize, Validate, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AnalyzeMenuQuery {
    /// Attach a dish image to each item (default true)
    #[serde(default = "default_enrich")]
    pub enrich: bool,

    /// Cuisine used to refine image lookups
    #[validate(length(min = 1, max = 64, message = "cuisine must be between 1 and 64 characters"))]
    pub cuisine: Option<String>,
}

fn default_enrich() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct MenuScanResponse {
    pub filename: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_filename: Option<String>,
    pub size: u64,
    pub content_type: String,
    pub file_path: String,
    pub checksum_sha256: String,
    pub created_at: DateTime<Utc>,
}

impl From<MenuScan> for MenuScanResponse {
    fn from(scan: MenuScan) -> Self {
        Self {
            filename: scan.filename,
            original_filename: scan.original_filename,
            size: scan.size_bytes,
            content_type: scan.content_type,
            file_path: scan.storage_path,
            checksum_sha256: scan.checksum_sha256,
            created_at: scan.created_at,
        }
    }
}

/// Reads the image part of a menu upload. The part may be named `file` or
/// `image`; other parts are ignored.
pub async fn read_menu_image(mut multipart: Multipart) -> Result<UploadMenuImageInput, ApiError> {
    while let Some(field) = multipart.next_field().await.map_err(|e| {
        tracing::warn!(error = %e, "Failed to read multipart field");
        ApiError::from(e)
    })? {
        let name = field.name().unwrap_or("").to_string();

        match name.as_str() {
            "file" | "image" => {
                let filename = field.file_name().map(str::to_string);
                let content_type = field.content_type().map(str::to_string);
                let data = field.bytes().await?;

                return Ok(UploadMenuImageInput {
                    data,
                    content_type,
                    filename,
                });
            }
            _ => {}
        }
    }

    Err(ApiError::BadRequest(
        "Missing 'file' field in multipart form".to_string(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cuisine_hint_length_is_validated() {
        let ok = AnalyzeMenuQuery {
            enrich: true,
            cuisine: Some("Thai".to_string()),
        };
        assert!(ok.validate().is_ok());

        let absent = AnalyzeMenuQuery {
            enrich: false,
            cuisine: None,
        };
        assert!(absent.validate().is_ok());

        let too_long = AnalyzeMenuQuery {
            enrich: true,
            cuisine: Some("x".repeat(65)),
        };
        assert!(too_long.validate().is_err());
    }
}
