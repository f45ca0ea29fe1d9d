use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use uuid::Uuid;

use super::{AssetKind, AssetStore, UploadedFile};
use crate::errors::ServiceError;

/// In-memory asset store for unit tests and doc examples.
///
/// Failure injection mirrors an unreachable backing store: `fail_puts`
/// makes `put` return `Storage`, `fail_deletes` does the same for `delete`.
#[derive(Default)]
pub struct MemoryAssetStore {
    blobs: Mutex<HashMap<String, Vec<u8>>>,
    pub fail_puts: AtomicBool,
    pub fail_deletes: AtomicBool,
}

impl MemoryAssetStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn set_fail_puts(&self, fail: bool) {
        self.fail_puts.store(fail, Ordering::Relaxed);
    }

    pub fn set_fail_deletes(&self, fail: bool) {
        self.fail_deletes.store(fail, Ordering::Relaxed);
    }

    pub fn keys(&self) -> Vec<String> {
        self.blobs.lock().unwrap().keys().cloned().collect()
    }

    pub fn blob_count(&self) -> usize {
        self.blobs.lock().unwrap().len()
    }
}

#[async_trait]
impl AssetStore for MemoryAssetStore {
    async fn put(&self, kind: AssetKind, file: &UploadedFile) -> Result<String, ServiceError> {
        let ext = kind.check(&file.content_type, file.bytes.len())?;
        if self.fail_puts.load(Ordering::Relaxed) {
            return Err(ServiceError::Storage("injected put failure".into()));
        }
        let key = format!("{}/{}.{}", kind.key_prefix(), Uuid::new_v4(), ext);
        self.blobs.lock().unwrap().insert(key.clone(), file.bytes.clone());
        Ok(key)
    }

    async fn exists(&self, key: &str) -> bool {
        !key.is_empty() && self.blobs.lock().unwrap().contains_key(key)
    }

    async fn delete(&self, key: &str) -> Result<(), ServiceError> {
        if self.fail_deletes.load(Ordering::Relaxed) {
            return Err(ServiceError::Storage("injected delete failure".into()));
        }
        self.blobs.lock().unwrap().remove(key);
        Ok(())
    }

    fn url_for(&self, key: &str) -> Option<String> {
        if key.is_empty() {
            return None;
        }
        Some(format!("http://assets.test/{key}"))
    }
}
