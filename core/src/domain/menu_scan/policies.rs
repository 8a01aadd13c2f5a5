use crate::domain::{
    common::entities::app_errors::CoreError,
    menu_scan::value_objects::{ImageFormat, UploadMenuImageInput},
};

pub const DEFAULT_MAX_UPLOAD_SIZE: u64 = 10 * 1024 * 1024;

/// Admission rules for uploaded menu photos.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadPolicy {
    pub max_upload_size: u64,
}

impl Default for UploadPolicy {
    fn default() -> Self {
        Self {
            max_upload_size: DEFAULT_MAX_UPLOAD_SIZE,
        }
    }
}

impl UploadPolicy {
    pub fn new(max_upload_size: u64) -> Self {
        Self { max_upload_size }
    }

    /// Size is checked before type so an oversized upload is rejected as too
    /// large whatever it claims to be.
    pub fn check(&self, input: &UploadMenuImageInput) -> Result<ImageFormat, CoreError> {
        let size = input.data.len() as u64;
        if size > self.max_upload_size {
            return Err(CoreError::FileTooLarge {
                size,
                max: self.max_upload_size,
            });
        }

        if size == 0 {
            return Err(CoreError::Validation("file cannot be empty".to_string()));
        }

        resolve_format(input.content_type.as_deref(), input.filename.as_deref())
    }
}

fn resolve_format(
    content_type: Option<&str>,
    filename: Option<&str>,
) -> Result<ImageFormat, CoreError> {
    let declared = content_type
        .map(str::trim)
        .filter(|ct| !ct.is_empty() && !ct.eq_ignore_ascii_case("application/octet-stream"));

    match declared {
        Some(ct) => ImageFormat::from_mime(ct)
            .ok_or_else(|| CoreError::UnsupportedContentType(ct.to_string())),
        // Generic or missing type: fall back to the declared extension.
        None => filename.and_then(ImageFormat::from_filename).ok_or_else(|| {
            CoreError::UnsupportedContentType(
                filename
                    .map(|f| format!("cannot infer image type from {f}"))
                    .unwrap_or_else(|| "missing content type".to_string()),
            )
        }),
    }
}

#[cfg(test)]
mod tests {
    use bytes::Bytes;

    use super::*;

    fn input(len: usize, content_type: Option<&str>, filename: Option<&str>) -> UploadMenuImageInput {
        UploadMenuImageInput {
            data: Bytes::from(vec![0xFFu8; len]),
            content_type: content_type.map(str::to_string),
            filename: filename.map(str::to_string),
        }
    }

    #[test]
    fn test_accepts_the_three_image_types() {
        let policy = UploadPolicy::default();
        assert_eq!(policy.check(&input(10, Some("image/jpeg"), None)), Ok(ImageFormat::Jpeg));
        assert_eq!(policy.check(&input(10, Some("image/png"), None)), Ok(ImageFormat::Png));
        assert_eq!(policy.check(&input(10, Some("image/webp"), None)), Ok(ImageFormat::Webp));
    }

    #[test]
    fn test_oversized_upload_fails_whatever_the_type() {
        let policy = UploadPolicy::new(8);
        for ct in [Some("image/png"), Some("text/plain"), None] {
            let err = policy.check(&input(9, ct, Some("menu.png"))).unwrap_err();
            assert_eq!(err, CoreError::FileTooLarge { size: 9, max: 8 });
            assert!(err.is_validation());
        }
        assert!(policy.check(&input(8, Some("image/png"), None)).is_ok());
    }

    #[test]
    fn test_rejects_other_declared_types() {
        let policy = UploadPolicy::default();
        let err = policy
            .check(&input(10, Some("image/gif"), Some("menu.png")))
            .unwrap_err();
        assert!(matches!(err, CoreError::UnsupportedContentType(_)));
    }

    #[test]
    fn test_octet_stream_falls_back_to_extension() {
        let policy = UploadPolicy::default();
        assert_eq!(
            policy.check(&input(10, Some("application/octet-stream"), Some("Menu.JPEG"))),
            Ok(ImageFormat::Jpeg)
        );
        assert!(policy.check(&input(10, None, Some("menu.pdf"))).is_err());
        assert!(policy.check(&input(10, None, None)).is_err());
    }

    #[test]
    fn test_rejects_empty_file() {
        let policy = UploadPolicy::default();
        assert!(matches!(
            policy.check(&input(0, Some("image/png"), None)),
            Err(CoreError::Validation(_))
        ));
    }
}
