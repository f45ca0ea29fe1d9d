use std::sync::Arc;

use serde::Serialize;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::errors::{FieldErrors, ServiceError};
use crate::pagination::{PageMeta, Paginated, Pagination};
use crate::shop::repository::ShopRepository;
use crate::storage::{AssetKind, AssetStore, UploadedFile};

/// Page size for the shops-in-a-category listing.
pub const CATEGORY_PAGE_SIZE: u32 = 10;
/// Page size for the global shop search.
pub const SEARCH_PAGE_SIZE: u32 = 20;

/// Fields accepted when creating a shop. Missing text fields arrive as empty
/// strings off the form and fail the required checks; the image is mandatory
/// at creation.
pub struct CreateShop {
    pub name: String,
    pub category_id: Option<Uuid>,
    pub description: String,
    pub image: Option<UploadedFile>,
    pub address: String,
    pub phone: String,
}

/// Partial update: absent fields keep their stored values.
#[derive(Default)]
pub struct UpdateShop {
    pub name: Option<String>,
    pub category_id: Option<Uuid>,
    pub description: Option<String>,
    pub image: Option<UploadedFile>,
    pub address: Option<String>,
    pub phone: Option<String>,
}

/// Public shape of a shop. `image` is a derived URL, null when unset.
#[derive(Debug, Clone, Serialize)]
pub struct ShopView {
    pub id: Uuid,
    pub name: String,
    pub category_id: Uuid,
    pub description: String,
    pub image: Option<String>,
    pub address: String,
    pub phone: String,
}

fn require(errs: &mut FieldErrors, field: &str, value: &str, max: Option<usize>) {
    if value.trim().is_empty() {
        errs.push(field, format!("{field} is required"));
    } else if let Some(max) = max {
        if value.chars().count() > max {
            errs.push(field, format!("must be at most {max} characters"));
        }
    }
}

fn check_len(errs: &mut FieldErrors, field: &str, value: &str, max: usize) {
    if value.chars().count() > max {
        errs.push(field, format!("must be at most {max} characters"));
    }
}

/// Lifecycle manager and query service for shops.
pub struct ShopService<R: ShopRepository> {
    repo: Arc<R>,
    assets: Arc<dyn AssetStore>,
}

impl<R: ShopRepository> ShopService<R> {
    pub fn new(repo: Arc<R>, assets: Arc<dyn AssetStore>) -> Self {
        Self { repo, assets }
    }

    fn view(&self, m: models::shop::Model) -> ShopView {
        ShopView {
            id: m.id,
            name: m.name,
            category_id: m.category_id,
            description: m.description,
            image: m.image.as_deref().and_then(|key| self.assets.url_for(key)),
            address: m.address,
            phone: m.phone,
        }
    }

    pub async fn get(&self, id: Uuid) -> Result<ShopView, ServiceError> {
        let record = self
            .repo
            .find(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("shop"))?;
        Ok(self.view(record))
    }

    /// Page of shops inside a category, ten per page, with the pagination
    /// metadata block. Unknown categories are a 404, not an empty page.
    pub async fn by_category(
        &self,
        category_id: Uuid,
        filter: Option<&str>,
        page: u32,
    ) -> Result<Paginated<ShopView>, ServiceError> {
        if !self.repo.category_exists(category_id).await? {
            return Err(ServiceError::not_found("category"));
        }
        let pagination = Pagination { page, per_page: CATEGORY_PAGE_SIZE };
        let (rows, total) = self.repo.list_by_category(category_id, filter, pagination).await?;
        let (page_idx, per_page) = pagination.normalize();
        let meta = PageMeta::compute(total, page_idx, per_page, rows.len() as u64);
        Ok(Paginated {
            items: rows.into_iter().map(|m| self.view(m)).collect(),
            pagination: meta,
        })
    }

    /// Global search over name/description, twenty per page. An empty query
    /// is a validation error; zero matches surface as not-found.
    pub async fn search(&self, query: &str, page: u32) -> Result<Paginated<ShopView>, ServiceError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(FieldErrors::single("q", "a search query is required"));
        }
        let pagination = Pagination { page, per_page: SEARCH_PAGE_SIZE };
        let (rows, total) = self.repo.search(query, pagination).await?;
        if total == 0 {
            return Err(ServiceError::NotFound("no shops matched the search".into()));
        }
        let (page_idx, per_page) = pagination.normalize();
        let meta = PageMeta::compute(total, page_idx, per_page, rows.len() as u64);
        Ok(Paginated {
            items: rows.into_iter().map(|m| self.view(m)).collect(),
            pagination: meta,
        })
    }

    #[instrument(skip(self, input), fields(name = %input.name))]
    pub async fn create(&self, input: CreateShop) -> Result<ShopView, ServiceError> {
        let mut errs = FieldErrors::new();
        require(&mut errs, "name", &input.name, Some(models::shop::NAME_MAX));
        if input.category_id.is_none() {
            errs.push("category_id", "category_id is required");
        }
        require(&mut errs, "description", &input.description, None);
        require(&mut errs, "address", &input.address, Some(models::shop::ADDRESS_MAX));
        require(&mut errs, "phone", &input.phone, Some(models::shop::PHONE_MAX));
        match &input.image {
            Some(file) => AssetKind::ShopImage.check_upload(&mut errs, "image", file),
            None => errs.push("image", "an image is required"),
        }
        errs.into_result()?;

        // Resolve the category before storing the blob so a dangling
        // reference never costs us an orphan.
        let category_id = input
            .category_id
            .ok_or_else(|| FieldErrors::single("category_id", "category_id is required"))?;
        if !self.repo.category_exists(category_id).await? {
            return Err(ServiceError::Referential(format!(
                "category {category_id} does not exist"
            )));
        }

        let key = match &input.image {
            Some(file) => self.assets.put(AssetKind::ShopImage, file).await?,
            None => return Err(FieldErrors::single("image", "an image is required")),
        };
        let created = match self
            .repo
            .create(&input.name, category_id, &input.description, Some(&key), &input.address, &input.phone)
            .await
        {
            Ok(m) => m,
            Err(e) => {
                // The stored blob is now orphaned; reconciliation is out of scope.
                warn!(key = %key, error = %e, "shop insert failed after image store");
                return Err(e);
            }
        };
        info!(id = %created.id, category_id = %created.category_id, "shop_created");
        Ok(self.view(created))
    }

    #[instrument(skip(self, input), fields(id = %id))]
    pub async fn update(&self, id: Uuid, input: UpdateShop) -> Result<ShopView, ServiceError> {
        let existing = self
            .repo
            .find(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("shop"))?;

        let mut errs = FieldErrors::new();
        if let Some(name) = &input.name {
            require(&mut errs, "name", name, Some(models::shop::NAME_MAX));
        }
        if let Some(address) = &input.address {
            check_len(&mut errs, "address", address, models::shop::ADDRESS_MAX);
        }
        if let Some(phone) = &input.phone {
            check_len(&mut errs, "phone", phone, models::shop::PHONE_MAX);
        }
        if let Some(file) = &input.image {
            AssetKind::ShopImage.check_upload(&mut errs, "image", file);
        }
        errs.into_result()?;

        if let Some(category_id) = input.category_id {
            if !self.repo.category_exists(category_id).await? {
                return Err(ServiceError::Referential(format!(
                    "category {category_id} does not exist"
                )));
            }
        }

        // Store the replacement before evicting the old image: if the store
        // step fails, the record keeps pointing at the still-present old key.
        let mut new_key = None;
        if let Some(file) = &input.image {
            let key = self.assets.put(AssetKind::ShopImage, file).await?;
            if let Some(old) = &existing.image {
                if let Err(e) = self.assets.delete(old).await {
                    warn!(key = %old, error = %e, "failed to evict replaced shop image");
                }
            }
            new_key = Some(key);
        }

        let updated = self
            .repo
            .update(
                id,
                input.name.as_deref(),
                input.category_id,
                input.description.as_deref(),
                new_key.as_deref(),
                input.address.as_deref(),
                input.phone.as_deref(),
            )
            .await?;
        info!(id = %updated.id, replaced_image = new_key.is_some(), "shop_updated");
        Ok(self.view(updated))
    }

    #[instrument(skip(self), fields(id = %id))]
    pub async fn delete(&self, id: Uuid) -> Result<(), ServiceError> {
        let existing = self
            .repo
            .find(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("shop"))?;
        if let Some(key) = &existing.image {
            // Best-effort: an orphaned blob beats an undeletable record.
            if let Err(e) = self.assets.delete(key).await {
                warn!(key = %key, error = %e, "failed to evict shop image");
            }
        }
        if !self.repo.delete(id).await? {
            return Err(ServiceError::not_found("shop"));
        }
        info!(id = %id, "shop_deleted");
        Ok(())
    }
}
