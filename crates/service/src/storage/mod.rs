//! Key-addressed blob storage for uploaded images.
//!
//! Records only ever hold asset keys (relative paths like
//! `shop_images/<uuid>.jpg`); public URLs are derived on the way out and
//! never stored. Blob lifetime is owned here, record lifetime by the
//! repositories; the lifecycle services are the only place the two meet.

use async_trait::async_trait;

use crate::errors::ServiceError;

pub mod fs_store;
pub mod memory;

pub use fs_store::FsAssetStore;
pub use memory::MemoryAssetStore;

const MIB: usize = 1024 * 1024;

/// Accepted image content types and the extension stored keys get.
const IMAGE_TYPES: &[(&str, &str)] = &[
    ("image/png", "png"),
    ("image/jpeg", "jpg"),
    ("image/gif", "gif"),
    ("image/webp", "webp"),
    ("image/bmp", "bmp"),
    ("image/svg+xml", "svg"),
];

/// Category icons are restricted to png/jpeg.
const ICON_TYPES: &[(&str, &str)] = &[("image/png", "png"), ("image/jpeg", "jpg")];

/// An upload decoded off a multipart form, not yet stored.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub filename: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// The three kinds of stored assets, each with its own key prefix,
/// size cap, and accepted content types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetKind {
    CategoryIcon,
    ShopImage,
    Banner,
}

impl AssetKind {
    pub fn key_prefix(self) -> &'static str {
        match self {
            AssetKind::CategoryIcon => "category_icons",
            AssetKind::ShopImage => "shop_images",
            AssetKind::Banner => "banners",
        }
    }

    pub fn max_bytes(self) -> usize {
        match self {
            AssetKind::CategoryIcon | AssetKind::ShopImage => 2 * MIB,
            AssetKind::Banner => 4 * MIB,
        }
    }

    fn accepted(self) -> &'static [(&'static str, &'static str)] {
        match self {
            AssetKind::CategoryIcon => ICON_TYPES,
            AssetKind::ShopImage | AssetKind::Banner => IMAGE_TYPES,
        }
    }

    /// Run `check` during field validation, accumulating into `errs`
    /// under the form field the upload arrived on.
    pub fn check_upload(self, errs: &mut crate::errors::FieldErrors, field: &str, file: &UploadedFile) {
        if let Err(ServiceError::InvalidAsset(msg)) = self.check(&file.content_type, file.bytes.len()) {
            errs.push(field, msg);
        }
    }

    /// Validate content type and size; returns the storage extension.
    pub fn check(self, content_type: &str, len: usize) -> Result<&'static str, ServiceError> {
        let ct = content_type
            .split(';')
            .next()
            .unwrap_or("")
            .trim()
            .to_ascii_lowercase();
        let ext = self
            .accepted()
            .iter()
            .find(|(t, _)| *t == ct)
            .map(|(_, e)| *e)
            .ok_or_else(|| {
                ServiceError::InvalidAsset(format!("unsupported content type '{content_type}'"))
            })?;
        if len > self.max_bytes() {
            return Err(ServiceError::InvalidAsset(format!(
                "file exceeds the {} byte limit",
                self.max_bytes()
            )));
        }
        Ok(ext)
    }
}

/// Blob store contract. Object-safe so server state can hold `Arc<dyn AssetStore>`.
#[async_trait]
pub trait AssetStore: Send + Sync {
    /// Store a validated upload under a fresh key rooted at the kind's prefix.
    /// Fails `InvalidAsset` on type/size violations before anything is written,
    /// `Storage` when the backing store cannot take the blob.
    async fn put(&self, kind: AssetKind, file: &UploadedFile) -> Result<String, ServiceError>;

    async fn exists(&self, key: &str) -> bool;

    /// Remove a blob; absent keys are a no-op. Callers treat failures as
    /// best-effort cleanup and never fail their own operation on them.
    async fn delete(&self, key: &str) -> Result<(), ServiceError>;

    /// Derive the public URL for a key without touching the blob.
    /// Empty keys derive to `None`.
    fn url_for(&self, key: &str) -> Option<String>;

    /// Existence-checked variant, for listings where a dead link is user-visible.
    async fn url_if_exists(&self, key: &str) -> Option<String> {
        if self.exists(key).await {
            self.url_for(key)
        } else {
            None
        }
    }
}
