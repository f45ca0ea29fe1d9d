use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::fs;
use uuid::Uuid;

use super::{AssetKind, AssetStore, UploadedFile};
use crate::errors::ServiceError;

/// Filesystem-backed asset store.
///
/// Blobs live under `root/<prefix>/<uuid>.<ext>`; the HTTP layer serves
/// `root` at the configured public base URL, so `url_for` is pure string
/// concatenation.
pub struct FsAssetStore {
    root: PathBuf,
    public_base_url: String,
}

impl FsAssetStore {
    pub async fn new<P: Into<PathBuf>>(
        root: P,
        public_base_url: impl Into<String>,
    ) -> Result<Arc<Self>, ServiceError> {
        let root = root.into();
        fs::create_dir_all(&root)
            .await
            .map_err(|e| ServiceError::Storage(e.to_string()))?;
        let mut public_base_url = public_base_url.into();
        while public_base_url.ends_with('/') {
            public_base_url.pop();
        }
        Ok(Arc::new(Self { root, public_base_url }))
    }

    fn blob_path(&self, key: &str) -> PathBuf {
        self.root.join(key)
    }
}

#[async_trait]
impl AssetStore for FsAssetStore {
    async fn put(&self, kind: AssetKind, file: &UploadedFile) -> Result<String, ServiceError> {
        let ext = kind.check(&file.content_type, file.bytes.len())?;
        let key = format!("{}/{}.{}", kind.key_prefix(), Uuid::new_v4(), ext);
        let path = self.blob_path(&key);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| ServiceError::Storage(e.to_string()))?;
        }
        fs::write(&path, &file.bytes)
            .await
            .map_err(|e| ServiceError::Storage(e.to_string()))?;
        Ok(key)
    }

    async fn exists(&self, key: &str) -> bool {
        if key.is_empty() {
            return false;
        }
        fs::metadata(self.blob_path(key)).await.is_ok()
    }

    async fn delete(&self, key: &str) -> Result<(), ServiceError> {
        if key.is_empty() {
            return Ok(());
        }
        match fs::remove_file(self.blob_path(key)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(ServiceError::Storage(e.to_string())),
        }
    }

    fn url_for(&self, key: &str) -> Option<String> {
        if key.is_empty() {
            return None;
        }
        Some(format!("{}/{}", self.public_base_url, key))
    }
}
