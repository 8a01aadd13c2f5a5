use std::future::Future;

use sha2::{Digest, Sha256};
use tracing::instrument;

use crate::domain::{
    common::{entities::app_errors::CoreError, services::Service},
    image_enrichment::ports::ImageSearchPort,
    menu_analysis::ports::VisionClient,
    menu_scan::{
        entities::MenuScan,
        ports::MenuImageStore,
        value_objects::{StoredFilename, UploadMenuImageInput},
    },
};

/// Service trait for menu photo intake
#[cfg_attr(test, mockall::automock)]
pub trait MenuScanService: Send + Sync {
    /// Validate and store an uploaded photo
    fn upload_menu_image(
        &self,
        input: UploadMenuImageInput,
    ) -> impl Future<Output = Result<MenuScan, CoreError>> + Send;

    /// Re-read the metadata of a stored photo
    fn get_menu_scan(&self, filename: String)
    -> impl Future<Output = Result<MenuScan, CoreError>> + Send;

    /// Remove a stored photo. Absent files are not an error.
    fn delete_menu_scan(&self, filename: String)
    -> impl Future<Output = Result<(), CoreError>> + Send;
}

pub(crate) fn checksum(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

impl<V, IS, ST> Service<V, IS, ST>
where
    V: VisionClient,
    IS: ImageSearchPort,
    ST: MenuImageStore,
{
    /// Intake shared by upload and analyze.
    pub(crate) async fn store_menu_image(
        &self,
        input: UploadMenuImageInput,
    ) -> Result<MenuScan, CoreError> {
        let format = self.upload_policy.check(&input)?;
        let filename = StoredFilename::generate(format);
        let checksum_sha256 = checksum(&input.data);

        tracing::info!(
            filename = %filename,
            size = input.data.len(),
            content_type = %format.mime_type(),
            "Storing menu image"
        );

        let stored = self.image_store.write(&filename, input.data).await?;

        Ok(MenuScan {
            filename: filename.to_string(),
            original_filename: input.filename,
            content_type: format.mime_type().to_string(),
            size_bytes: stored.size_bytes,
            storage_path: stored.path,
            checksum_sha256,
            created_at: stored.created_at,
        })
    }
}

impl<V, IS, ST> MenuScanService for Service<V, IS, ST>
where
    V: VisionClient,
    IS: ImageSearchPort,
    ST: MenuImageStore,
{
    #[instrument(skip(self, input), fields(size = input.data.len()))]
    async fn upload_menu_image(&self, input: UploadMenuImageInput) -> Result<MenuScan, CoreError> {
        let scan = self.store_menu_image(input).await?;

        tracing::info!(filename = %scan.filename, "Menu image uploaded");

        Ok(scan)
    }

    #[instrument(skip(self))]
    async fn get_menu_scan(&self, filename: String) -> Result<MenuScan, CoreError> {
        let filename = StoredFilename::parse(&filename)?;

        let stored = self
            .image_store
            .stat(&filename)
            .await?
            .ok_or(CoreError::NotFound)?;
        let data = self.image_store.read(&filename).await?;

        Ok(MenuScan {
            filename: filename.to_string(),
            original_filename: None,
            content_type: filename.format().mime_type().to_string(),
            size_bytes: stored.size_bytes,
            storage_path: stored.path,
            checksum_sha256: checksum(&data),
            created_at: stored.created_at,
        })
    }

    #[instrument(skip(self))]
    async fn delete_menu_scan(&self, filename: String) -> Result<(), CoreError> {
        let filename = StoredFilename::parse(&filename)?;

        let removed = self.image_store.delete(&filename).await?;
        if removed {
            tracing::info!(filename = %filename, "Menu image deleted");
        } else {
            tracing::debug!(filename = %filename, "Menu image already absent");
        }

        Ok(())
    }
}
