use std::sync::Arc;

use serde::Serialize;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::banner::repository::BannerRepository;
use crate::errors::{FieldErrors, ServiceError};
use crate::storage::{AssetKind, AssetStore, UploadedFile};

/// Fields accepted when uploading a banner. The image is mandatory; a banner
/// without one is rejected before any store or database interaction.
pub struct CreateBanner {
    pub title: Option<String>,
    pub image: Option<UploadedFile>,
}

/// Public shape of a banner. `image` is a derived URL.
#[derive(Debug, Clone, Serialize)]
pub struct BannerView {
    pub id: Uuid,
    pub title: Option<String>,
    pub image: Option<String>,
}

/// Lifecycle manager for banners.
pub struct BannerService<R: BannerRepository> {
    repo: Arc<R>,
    assets: Arc<dyn AssetStore>,
}

impl<R: BannerRepository> BannerService<R> {
    pub fn new(repo: Arc<R>, assets: Arc<dyn AssetStore>) -> Self {
        Self { repo, assets }
    }

    /// All banners with existence-checked URLs: a banner is nothing but its
    /// image, so a dead link here is user-visible.
    pub async fn list(&self) -> Result<Vec<BannerView>, ServiceError> {
        let records = self.repo.list().await?;
        let mut views = Vec::with_capacity(records.len());
        for m in records {
            let image = self.assets.url_if_exists(&m.image).await;
            views.push(BannerView { id: m.id, title: m.title, image });
        }
        Ok(views)
    }

    pub async fn get(&self, id: Uuid) -> Result<BannerView, ServiceError> {
        let m = self
            .repo
            .find(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("banner"))?;
        let image = self.assets.url_for(&m.image);
        Ok(BannerView { id: m.id, title: m.title, image })
    }

    #[instrument(skip(self, input))]
    pub async fn create(&self, input: CreateBanner) -> Result<BannerView, ServiceError> {
        let mut errs = FieldErrors::new();
        if let Some(title) = &input.title {
            if title.chars().count() > models::banner::TITLE_MAX {
                errs.push("title", "must be at most 255 characters");
            }
        }
        match &input.image {
            Some(file) => AssetKind::Banner.check_upload(&mut errs, "image", file),
            None => errs.push("image", "an image is required"),
        }
        errs.into_result()?;

        let key = match &input.image {
            Some(file) => self.assets.put(AssetKind::Banner, file).await?,
            None => return Err(FieldErrors::single("image", "an image is required")),
        };
        let created = match self.repo.create(input.title.as_deref(), &key).await {
            Ok(m) => m,
            Err(e) => {
                // The stored blob is now orphaned; reconciliation is out of scope.
                warn!(key = %key, error = %e, "banner insert failed after image store");
                return Err(e);
            }
        };
        info!(id = %created.id, "banner_created");
        let image = self.assets.url_for(&created.image);
        Ok(BannerView { id: created.id, title: created.title, image })
    }

    #[instrument(skip(self), fields(id = %id))]
    pub async fn delete(&self, id: Uuid) -> Result<(), ServiceError> {
        let existing = self
            .repo
            .find(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("banner"))?;
        // Best-effort: an orphaned blob beats an undeletable record.
        if let Err(e) = self.assets.delete(&existing.image).await {
            warn!(key = %existing.image, error = %e, "failed to evict banner image");
        }
        if !self.repo.delete(id).await? {
            return Err(ServiceError::not_found("banner"));
        }
        info!(id = %id, "banner_deleted");
        Ok(())
    }
}
