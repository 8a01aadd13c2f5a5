use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use bytes::Bytes;
use chrono::{DateTime, Utc};
use tokio::fs;

use crate::domain::{
    common::entities::app_errors::CoreError,
    menu_scan::{entities::StoredImage, ports::MenuImageStore, value_objects::StoredFilename},
};

const WRITE_CHECK_FILE: &str = ".menulens-write-check";

/// Stores menu photos as flat files in the upload directory.
#[derive(Debug, Clone)]
pub struct LocalImageStore {
    root: PathBuf,
}

impl LocalImageStore {
    /// Creates the upload directory if it does not exist yet.
    pub async fn new(root: impl Into<PathBuf>) -> Result<Self, CoreError> {
        let root = root.into();
        fs::create_dir_all(&root).await.map_err(|e| {
            tracing::error!(path = %root.display(), error = %e, "Failed to create upload directory");
            CoreError::Storage(format!("cannot create upload directory: {e}"))
        })?;

        tracing::info!(path = %root.display(), "Using local upload directory");
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, filename: &StoredFilename) -> PathBuf {
        self.root.join(filename.as_str())
    }

    async fn describe(&self, path: &Path) -> Result<StoredImage, std::io::Error> {
        let metadata = fs::metadata(path).await?;
        let created_at = metadata
            .created()
            .or_else(|_| metadata.modified())
            .map(DateTime::<Utc>::from)
            .unwrap_or_else(|_| Utc::now());

        Ok(StoredImage {
            path: path.display().to_string(),
            size_bytes: metadata.len(),
            created_at,
        })
    }
}

impl MenuImageStore for LocalImageStore {
    async fn write(&self, filename: &StoredFilename, data: Bytes) -> Result<StoredImage, CoreError> {
        fs::create_dir_all(&self.root).await?;

        let path = self.path_for(filename);
        fs::write(&path, &data).await.map_err(|e| {
            tracing::error!(path = %path.display(), error = %e, "Failed to write menu image");
            CoreError::from(e)
        })?;

        Ok(self.describe(&path).await?)
    }

    async fn read(&self, filename: &StoredFilename) -> Result<Bytes, CoreError> {
        match fs::read(self.path_for(filename)).await {
            Ok(data) => Ok(Bytes::from(data)),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(CoreError::NotFound),
            Err(e) => Err(e.into()),
        }
    }

    async fn stat(&self, filename: &StoredFilename) -> Result<Option<StoredImage>, CoreError> {
        match self.describe(&self.path_for(filename)).await {
            Ok(stored) => Ok(Some(stored)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn delete(&self, filename: &StoredFilename) -> Result<bool, CoreError> {
        match fs::remove_file(self.path_for(filename)).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    async fn is_writable(&self) -> bool {
        let check_file = self.root.join(WRITE_CHECK_FILE);
        let writable = fs::write(&check_file, b"ok").await.is_ok();
        if writable {
            let _ = fs::remove_file(&check_file).await;
        }
        writable
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::menu_scan::value_objects::ImageFormat;

    #[tokio::test]
    async fn test_write_read_stat_delete() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalImageStore::new(dir.path().join("uploads")).await.unwrap();
        let filename = StoredFilename::generate(ImageFormat::Webp);

        let stored = store
            .write(&filename, Bytes::from_static(b"RIFF....WEBP"))
            .await
            .unwrap();
        assert_eq!(stored.size_bytes, 12);
        assert!(stored.path.ends_with(filename.as_str()));

        assert_eq!(store.read(&filename).await.unwrap().as_ref(), b"RIFF....WEBP");
        assert_eq!(store.stat(&filename).await.unwrap().unwrap().size_bytes, 12);

        assert!(store.delete(&filename).await.unwrap());
        assert!(!store.delete(&filename).await.unwrap());
        assert_eq!(store.stat(&filename).await.unwrap(), None);
        assert_eq!(store.read(&filename).await.unwrap_err(), CoreError::NotFound);
    }

    #[tokio::test]
    async fn test_upload_dir_is_writable() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalImageStore::new(dir.path()).await.unwrap();

        assert!(store.is_writable().await);
        assert!(!dir.path().join(WRITE_CHECK_FILE).exists());
    }
}
