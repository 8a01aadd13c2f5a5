use std::fmt;

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::common::{entities::app_errors::CoreError, generate_uuid_v7};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    Jpeg,
    Png,
    Webp,
}

impl ImageFormat {
    pub fn mime_type(&self) -> &'static str {
        match self {
            ImageFormat::Jpeg => "image/jpeg",
            ImageFormat::Png => "image/png",
            ImageFormat::Webp => "image/webp",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ImageFormat::Jpeg => "jpg",
            ImageFormat::Png => "png",
            ImageFormat::Webp => "webp",
        }
    }

    /// Parameters such as `; charset=` are ignored.
    pub fn from_mime(mime: &str) -> Option<Self> {
        let essence = mime.split(';').next().unwrap_or("").trim().to_ascii_lowercase();
        match essence.as_str() {
            "image/jpeg" | "image/jpg" | "image/pjpeg" => Some(ImageFormat::Jpeg),
            "image/png" => Some(ImageFormat::Png),
            "image/webp" => Some(ImageFormat::Webp),
            _ => None,
        }
    }

    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.trim_start_matches('.').to_ascii_lowercase().as_str() {
            "jpg" | "jpeg" => Some(ImageFormat::Jpeg),
            "png" => Some(ImageFormat::Png),
            "webp" => Some(ImageFormat::Webp),
            _ => None,
        }
    }

    pub fn from_filename(filename: &str) -> Option<Self> {
        let (_, ext) = filename.rsplit_once('.')?;
        Self::from_extension(ext)
    }
}

#[derive(Debug, Clone)]
pub struct UploadMenuImageInput {
    pub data: Bytes,
    pub content_type: Option<String>,
    pub filename: Option<String>,
}

/// A filename produced by intake: `<uuid>.<ext>`. Nothing else is accepted as a
/// lookup key, which keeps callers inside the upload directory.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StoredFilename {
    value: String,
    format: ImageFormat,
}

impl StoredFilename {
    pub fn generate(format: ImageFormat) -> Self {
        Self {
            value: format!("{}.{}", generate_uuid_v7(), format.extension()),
            format,
        }
    }

    pub fn parse(raw: &str) -> Result<Self, CoreError> {
        let invalid = || CoreError::Validation(format!("invalid filename: {raw}"));

        let (stem, ext) = raw.rsplit_once('.').ok_or_else(invalid)?;
        if stem.is_empty()
            || stem.len() > 64
            || !stem.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
        {
            return Err(invalid());
        }

        let format = match ext {
            "jpg" => ImageFormat::Jpeg,
            "png" => ImageFormat::Png,
            "webp" => ImageFormat::Webp,
            _ => return Err(invalid()),
        };

        Ok(Self {
            value: raw.to_string(),
            format,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.value
    }

    pub fn format(&self) -> ImageFormat {
        self.format
    }
}

impl fmt::Display for StoredFilename {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_mime_ignores_parameters_and_case() {
        assert_eq!(ImageFormat::from_mime("IMAGE/PNG"), Some(ImageFormat::Png));
        assert_eq!(
            ImageFormat::from_mime("image/jpeg; charset=binary"),
            Some(ImageFormat::Jpeg)
        );
        assert_eq!(ImageFormat::from_mime("image/gif"), None);
    }

    #[test]
    fn test_generated_filename_parses_back() {
        let generated = StoredFilename::generate(ImageFormat::Webp);
        let parsed = StoredFilename::parse(generated.as_str()).unwrap();
        assert_eq!(parsed, generated);
        assert_eq!(parsed.format(), ImageFormat::Webp);
    }

    #[test]
    fn test_parse_rejects_traversal_and_foreign_extensions() {
        for raw in ["../etc/passwd", "a/b.png", "menu.gif", ".png", "menu", "me nu.jpg"] {
            assert!(
                matches!(StoredFilename::parse(raw), Err(CoreError::Validation(_))),
                "{raw} should be rejected"
            );
        }
    }
}
