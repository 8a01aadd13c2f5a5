use std::future::Future;

use bytes::Bytes;

use crate::domain::{
    common::entities::app_errors::CoreError,
    menu_scan::{entities::StoredImage, value_objects::StoredFilename},
};

/// Port for the upload directory.
#[cfg_attr(test, mockall::automock)]
pub trait MenuImageStore: Send + Sync {
    /// Write the full payload under `filename`.
    fn write(
        &self,
        filename: &StoredFilename,
        data: Bytes,
    ) -> impl Future<Output = Result<StoredImage, CoreError>> + Send;

    /// Read a stored image back. `CoreError::NotFound` if absent.
    fn read(
        &self,
        filename: &StoredFilename,
    ) -> impl Future<Output = Result<Bytes, CoreError>> + Send;

    fn stat(
        &self,
        filename: &StoredFilename,
    ) -> impl Future<Output = Result<Option<StoredImage>, CoreError>> + Send;

    /// Remove a stored image. Returns whether a file was actually removed.
    fn delete(
        &self,
        filename: &StoredFilename,
    ) -> impl Future<Output = Result<bool, CoreError>> + Send;

    fn is_writable(&self) -> impl Future<Output = bool> + Send;
}
