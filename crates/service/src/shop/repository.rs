use async_trait::async_trait;
use sea_orm::DatabaseConnection;
use uuid::Uuid;

use crate::errors::ServiceError;
use crate::pagination::Pagination;

/// Persistence contract for shops. Listing methods return the page rows plus
/// the total match count so callers can derive pagination metadata.
#[async_trait]
pub trait ShopRepository: Send + Sync {
    async fn find(&self, id: Uuid) -> Result<Option<models::shop::Model>, ServiceError>;
    async fn list_by_category(&self, category_id: Uuid, filter: Option<&str>, page: Pagination) -> Result<(Vec<models::shop::Model>, u64), ServiceError>;
    async fn search(&self, query: &str, page: Pagination) -> Result<(Vec<models::shop::Model>, u64), ServiceError>;
    async fn create(&self, name: &str, category_id: Uuid, description: &str, image: Option<&str>, address: &str, phone: &str) -> Result<models::shop::Model, ServiceError>;
    #[allow(clippy::too_many_arguments)]
    async fn update(&self, id: Uuid, name: Option<&str>, category_id: Option<Uuid>, description: Option<&str>, image: Option<&str>, address: Option<&str>, phone: Option<&str>) -> Result<models::shop::Model, ServiceError>;
    async fn delete(&self, id: Uuid) -> Result<bool, ServiceError>;
    async fn category_exists(&self, id: Uuid) -> Result<bool, ServiceError>;
}

/// SeaORM-backed repository implementation.
pub struct SeaOrmShopRepository {
    pub db: DatabaseConnection,
}

#[async_trait]
impl ShopRepository for SeaOrmShopRepository {
    async fn find(&self, id: Uuid) -> Result<Option<models::shop::Model>, ServiceError> {
        crate::db::shop_service::get_shop(&self.db, id).await
    }

    async fn list_by_category(&self, category_id: Uuid, filter: Option<&str>, page: Pagination) -> Result<(Vec<models::shop::Model>, u64), ServiceError> {
        let (page_idx, per_page) = page.normalize();
        crate::db::shop_service::list_shops_by_category(&self.db, category_id, filter, page_idx, per_page).await
    }

    async fn search(&self, query: &str, page: Pagination) -> Result<(Vec<models::shop::Model>, u64), ServiceError> {
        let (page_idx, per_page) = page.normalize();
        crate::db::shop_service::search_shops(&self.db, query, page_idx, per_page).await
    }

    async fn create(&self, name: &str, category_id: Uuid, description: &str, image: Option<&str>, address: &str, phone: &str) -> Result<models::shop::Model, ServiceError> {
        crate::db::shop_service::create_shop(&self.db, name, category_id, description, image, address, phone).await
    }

    async fn update(&self, id: Uuid, name: Option<&str>, category_id: Option<Uuid>, description: Option<&str>, image: Option<&str>, address: Option<&str>, phone: Option<&str>) -> Result<models::shop::Model, ServiceError> {
        crate::db::shop_service::update_shop(&self.db, id, name, category_id, description, image, address, phone).await
    }

    async fn delete(&self, id: Uuid) -> Result<bool, ServiceError> {
        crate::db::shop_service::delete_shop(&self.db, id).await
    }

    async fn category_exists(&self, id: Uuid) -> Result<bool, ServiceError> {
        crate::db::shop_service::category_exists(&self.db, id).await
    }
}

/// Simple in-memory mock repository for tests and doc examples
pub mod mock {
    use super::*;
    use chrono::Utc;
    use std::collections::HashSet;
    use std::sync::Mutex;

    #[derive(Default)]
    pub struct MockShopRepository {
        records: Mutex<Vec<models::shop::Model>>,
        categories: Mutex<HashSet<Uuid>>,
    }

    impl MockShopRepository {
        /// Register a category id that `category_exists` will resolve.
        pub fn add_category(&self, id: Uuid) {
            self.categories.lock().unwrap().insert(id);
        }

        pub fn record_count(&self) -> usize {
            self.records.lock().unwrap().len()
        }
    }

    fn page_of(rows: Vec<models::shop::Model>, page: Pagination) -> (Vec<models::shop::Model>, u64) {
        let (page_idx, per_page) = page.normalize();
        let total = rows.len() as u64;
        let start = (page_idx * per_page) as usize;
        let items = rows.into_iter().skip(start).take(per_page as usize).collect();
        (items, total)
    }

    fn matches(haystacks: &[&str], term: &str) -> bool {
        let term = term.to_lowercase();
        haystacks.iter().any(|h| h.to_lowercase().contains(&term))
    }

    #[async_trait]
    impl ShopRepository for MockShopRepository {
        async fn find(&self, id: Uuid) -> Result<Option<models::shop::Model>, ServiceError> {
            let records = self.records.lock().unwrap();
            Ok(records.iter().find(|s| s.id == id).cloned())
        }

        async fn list_by_category(&self, category_id: Uuid, filter: Option<&str>, page: Pagination) -> Result<(Vec<models::shop::Model>, u64), ServiceError> {
            let records = self.records.lock().unwrap();
            let rows: Vec<_> = records
                .iter()
                .filter(|s| s.category_id == category_id)
                .filter(|s| match filter {
                    Some(term) => matches(&[&s.name, &s.description, &s.address, &s.phone], term),
                    None => true,
                })
                .cloned()
                .collect();
            Ok(page_of(rows, page))
        }

        async fn search(&self, query: &str, page: Pagination) -> Result<(Vec<models::shop::Model>, u64), ServiceError> {
            let records = self.records.lock().unwrap();
            let rows: Vec<_> = records
                .iter()
                .filter(|s| matches(&[&s.name, &s.description], query))
                .cloned()
                .collect();
            Ok(page_of(rows, page))
        }

        async fn create(&self, name: &str, category_id: Uuid, description: &str, image: Option<&str>, address: &str, phone: &str) -> Result<models::shop::Model, ServiceError> {
            if !self.categories.lock().unwrap().contains(&category_id) {
                return Err(ServiceError::Referential("category does not exist".into()));
            }
            let now = Utc::now().into();
            let model = models::shop::Model {
                id: Uuid::new_v4(),
                name: name.to_string(),
                category_id,
                description: description.to_string(),
                image: image.map(|s| s.to_string()),
                address: address.to_string(),
                phone: phone.to_string(),
                created_at: now,
                updated_at: now,
            };
            self.records.lock().unwrap().push(model.clone());
            Ok(model)
        }

        async fn update(&self, id: Uuid, name: Option<&str>, category_id: Option<Uuid>, description: Option<&str>, image: Option<&str>, address: Option<&str>, phone: Option<&str>) -> Result<models::shop::Model, ServiceError> {
            let mut records = self.records.lock().unwrap();
            let record = records
                .iter_mut()
                .find(|s| s.id == id)
                .ok_or_else(|| ServiceError::not_found("shop"))?;
            if let Some(n) = name {
                record.name = n.to_string();
            }
            if let Some(cid) = category_id {
                record.category_id = cid;
            }
            if let Some(d) = description {
                record.description = d.to_string();
            }
            if let Some(key) = image {
                record.image = Some(key.to_string());
            }
            if let Some(a) = address {
                record.address = a.to_string();
            }
            if let Some(p) = phone {
                record.phone = p.to_string();
            }
            record.updated_at = Utc::now().into();
            Ok(record.clone())
        }

        async fn delete(&self, id: Uuid) -> Result<bool, ServiceError> {
            let mut records = self.records.lock().unwrap();
            let before = records.len();
            records.retain(|s| s.id != id);
            Ok(records.len() < before)
        }

        async fn category_exists(&self, id: Uuid) -> Result<bool, ServiceError> {
            Ok(self.categories.lock().unwrap().contains(&id))
        }
    }
}
