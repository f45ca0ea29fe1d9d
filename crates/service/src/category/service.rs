use std::sync::Arc;

use serde::Serialize;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::category::repository::CategoryRepository;
use crate::errors::{FieldErrors, ServiceError};
use crate::storage::{AssetKind, AssetStore, UploadedFile};

/// Fields accepted when creating a category. The icon is mandatory at
/// creation; updates treat it as replace-or-keep.
pub struct CreateCategory {
    pub name: String,
    pub icon: Option<UploadedFile>,
}

/// Partial update: absent fields keep their stored values.
#[derive(Default)]
pub struct UpdateCategory {
    pub name: Option<String>,
    pub icon: Option<UploadedFile>,
}

/// Public shape of a category. `icon` is a derived URL; the stored asset key
/// never leaves the server.
#[derive(Debug, Clone, Serialize)]
pub struct CategoryView {
    pub id: Uuid,
    pub name: String,
    pub icon: Option<String>,
}

fn validate_name(errs: &mut FieldErrors, name: &str) {
    if name.trim().is_empty() {
        errs.push("name", "name is required");
    } else if name.chars().count() > models::category::NAME_MAX {
        errs.push("name", "must be at most 255 characters");
    }
}

/// Lifecycle manager for categories.
///
/// The only component allowed to write an icon key into a category record or
/// to evict an icon tied to one. Record and blob stores share no transaction;
/// consistency comes from operation ordering alone.
pub struct CategoryService<R: CategoryRepository> {
    repo: Arc<R>,
    assets: Arc<dyn AssetStore>,
}

impl<R: CategoryRepository> CategoryService<R> {
    pub fn new(repo: Arc<R>, assets: Arc<dyn AssetStore>) -> Self {
        Self { repo, assets }
    }

    fn view(&self, m: models::category::Model) -> CategoryView {
        CategoryView {
            id: m.id,
            name: m.name,
            icon: m.icon.as_deref().and_then(|key| self.assets.url_for(key)),
        }
    }

    pub async fn list(&self, name_filter: Option<&str>) -> Result<Vec<CategoryView>, ServiceError> {
        let records = self.repo.list(name_filter).await?;
        Ok(records.into_iter().map(|m| self.view(m)).collect())
    }

    pub async fn get(&self, id: Uuid) -> Result<CategoryView, ServiceError> {
        let record = self
            .repo
            .find(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("category"))?;
        Ok(self.view(record))
    }

    #[instrument(skip(self, input), fields(name = %input.name))]
    pub async fn create(&self, input: CreateCategory) -> Result<CategoryView, ServiceError> {
        let mut errs = FieldErrors::new();
        validate_name(&mut errs, &input.name);
        match &input.icon {
            Some(file) => AssetKind::CategoryIcon.check_upload(&mut errs, "icon", file),
            None => errs.push("icon", "an icon image is required"),
        }
        errs.into_result()?;

        let key = match &input.icon {
            Some(file) => self.assets.put(AssetKind::CategoryIcon, file).await?,
            None => return Err(FieldErrors::single("icon", "an icon image is required")),
        };
        let created = match self.repo.create(&input.name, Some(&key)).await {
            Ok(m) => m,
            Err(e) => {
                // The stored blob is now orphaned; reconciliation is out of scope.
                warn!(key = %key, error = %e, "category insert failed after icon store");
                return Err(e);
            }
        };
        info!(id = %created.id, "category_created");
        Ok(self.view(created))
    }

    #[instrument(skip(self, input), fields(id = %id))]
    pub async fn update(&self, id: Uuid, input: UpdateCategory) -> Result<CategoryView, ServiceError> {
        let existing = self
            .repo
            .find(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("category"))?;

        let mut errs = FieldErrors::new();
        if let Some(name) = &input.name {
            validate_name(&mut errs, name);
        }
        if let Some(file) = &input.icon {
            AssetKind::CategoryIcon.check_upload(&mut errs, "icon", file);
        }
        errs.into_result()?;

        // Store the replacement before evicting the old icon: if the store
        // step fails, the record keeps pointing at the still-present old key.
        let mut new_key = None;
        if let Some(file) = &input.icon {
            let key = self.assets.put(AssetKind::CategoryIcon, file).await?;
            if let Some(old) = &existing.icon {
                if let Err(e) = self.assets.delete(old).await {
                    warn!(key = %old, error = %e, "failed to evict replaced icon");
                }
            }
            new_key = Some(key);
        }

        let updated = self
            .repo
            .update(id, input.name.as_deref(), new_key.as_deref())
            .await?;
        info!(id = %updated.id, replaced_icon = new_key.is_some(), "category_updated");
        Ok(self.view(updated))
    }

    #[instrument(skip(self), fields(id = %id))]
    pub async fn delete(&self, id: Uuid) -> Result<(), ServiceError> {
        let existing = self
            .repo
            .find(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("category"))?;
        // Refuse before touching the blob: a cascade would orphan every
        // attached shop's image.
        if self.repo.has_shops(id).await? {
            return Err(ServiceError::Referential(
                "category still has shops attached".into(),
            ));
        }
        if let Some(key) = &existing.icon {
            // Best-effort: an orphaned blob beats an undeletable record.
            if let Err(e) = self.assets.delete(key).await {
                warn!(key = %key, error = %e, "failed to evict category icon");
            }
        }
        if !self.repo.delete(id).await? {
            return Err(ServiceError::not_found("category"));
        }
        info!(id = %id, "category_deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::category::repository::mock::MockCategoryRepository;
    use crate::storage::MemoryAssetStore;

    fn png(len: usize) -> UploadedFile {
        UploadedFile {
            filename: "icon.png".into(),
            content_type: "image/png".into(),
            bytes: vec![0u8; len],
        }
    }

    fn service() -> (Arc<MockCategoryRepository>, Arc<MemoryAssetStore>, CategoryService<MockCategoryRepository>) {
        let repo = Arc::new(MockCategoryRepository::default());
        let store = MemoryAssetStore::new();
        let svc = CategoryService::new(Arc::clone(&repo), store.clone() as Arc<dyn AssetStore>);
        (repo, store, svc)
    }

    #[tokio::test]
    async fn create_returns_derived_url_not_raw_key() {
        let (_, store, svc) = service();
        let view = svc
            .create(CreateCategory { name: "Gyms".into(), icon: Some(png(1024)) })
            .await
            .unwrap();
        let url = view.icon.expect("icon url");
        assert!(url.starts_with("http://assets.test/category_icons/"));
        assert_eq!(store.blob_count(), 1);
    }

    #[tokio::test]
    async fn oversized_icon_leaves_no_record_and_no_blob() {
        let (repo, store, svc) = service();
        let err = svc
            .create(CreateCategory { name: "X".into(), icon: Some(png(3 * 1024 * 1024)) })
            .await
            .unwrap_err();
        let ServiceError::Validation(errs) = err else { panic!("expected validation error") };
        assert!(errs.0.contains_key("icon"));
        assert_eq!(repo.record_count(), 0);
        assert_eq!(store.blob_count(), 0);
    }

    #[tokio::test]
    async fn create_without_icon_is_rejected() {
        let (repo, _, svc) = service();
        let err = svc.create(CreateCategory { name: "Cafes".into(), icon: None }).await.unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
        assert_eq!(repo.record_count(), 0);
    }

    #[tokio::test]
    async fn partial_update_keeps_unsupplied_fields() {
        let (_, store, svc) = service();
        let created = svc
            .create(CreateCategory { name: "Shops".into(), icon: Some(png(16)) })
            .await
            .unwrap();
        let before = store.keys();

        let updated = svc
            .update(created.id, UpdateCategory { name: Some("Stores".into()), icon: None })
            .await
            .unwrap();
        assert_eq!(updated.name, "Stores");
        // Icon untouched: same single blob, same derived URL
        assert_eq!(store.keys(), before);
        assert_eq!(updated.icon, created.icon);
    }

    #[tokio::test]
    async fn replacing_icon_evicts_the_old_blob() {
        let (_, store, svc) = service();
        let created = svc
            .create(CreateCategory { name: "Gyms".into(), icon: Some(png(16)) })
            .await
            .unwrap();
        let old_key = store.keys().pop().unwrap();

        let updated = svc
            .update(created.id, UpdateCategory { name: None, icon: Some(png(32)) })
            .await
            .unwrap();
        assert!(!store.exists(&old_key).await);
        assert_eq!(store.blob_count(), 1);
        assert_ne!(updated.icon, created.icon);
    }

    #[tokio::test]
    async fn failed_replacement_store_keeps_the_old_asset() {
        let (repo, store, svc) = service();
        let created = svc
            .create(CreateCategory { name: "Gyms".into(), icon: Some(png(16)) })
            .await
            .unwrap();
        let old_key = store.keys().pop().unwrap();

        store.set_fail_puts(true);
        let err = svc
            .update(created.id, UpdateCategory { name: None, icon: Some(png(32)) })
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Storage(_)));

        // Old blob intact, record still points at it
        assert!(store.exists(&old_key).await);
        let record = repo.find(created.id).await.unwrap().unwrap();
        assert_eq!(record.icon.as_deref(), Some(old_key.as_str()));
    }

    #[tokio::test]
    async fn delete_evicts_the_icon_blob() {
        let (repo, store, svc) = service();
        let created = svc
            .create(CreateCategory { name: "Salons".into(), icon: Some(png(16)) })
            .await
            .unwrap();
        let key = store.keys().pop().unwrap();

        svc.delete(created.id).await.unwrap();
        assert!(!store.exists(&key).await);
        assert_eq!(repo.record_count(), 0);
    }

    #[tokio::test]
    async fn delete_succeeds_even_when_eviction_fails() {
        let (repo, store, svc) = service();
        let created = svc
            .create(CreateCategory { name: "Salons".into(), icon: Some(png(16)) })
            .await
            .unwrap();

        store.set_fail_deletes(true);
        svc.delete(created.id).await.unwrap();
        assert_eq!(repo.record_count(), 0);
    }

    #[tokio::test]
    async fn delete_with_attached_shops_is_a_referential_error() {
        let (repo, store, svc) = service();
        let created = svc
            .create(CreateCategory { name: "Cafes".into(), icon: Some(png(16)) })
            .await
            .unwrap();
        repo.attach_shop(created.id);

        let err = svc.delete(created.id).await.unwrap_err();
        assert!(matches!(err, ServiceError::Referential(_)));
        // Nothing was torn down
        assert_eq!(repo.record_count(), 1);
        assert_eq!(store.blob_count(), 1);
    }

    #[tokio::test]
    async fn list_filter_is_case_insensitive_contains() {
        let (_, _, svc) = service();
        svc.create(CreateCategory { name: "Restaurants".into(), icon: Some(png(8)) })
            .await
            .unwrap();
        svc.create(CreateCategory { name: "Cafes".into(), icon: Some(png(8)) })
            .await
            .unwrap();

        let hits = svc.list(Some("RESTAU")).await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].name, "Restaurants");
    }

    #[tokio::test]
    async fn unknown_ids_are_not_found() {
        let (_, _, svc) = service();
        let missing = Uuid::new_v4();
        assert!(matches!(svc.get(missing).await, Err(ServiceError::NotFound(_))));
        assert!(matches!(svc.delete(missing).await, Err(ServiceError::NotFound(_))));
        assert!(matches!(
            svc.update(missing, UpdateCategory::default()).await,
            Err(ServiceError::NotFound(_))
        ));
    }
}
