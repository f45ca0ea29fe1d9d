use async_trait::async_trait;
use sea_orm::DatabaseConnection;
use uuid::Uuid;

use crate::errors::ServiceError;

/// Persistence contract for categories. Records hold asset keys, never URLs;
/// partial updates leave `None` fields at their stored values.
#[async_trait]
pub trait CategoryRepository: Send + Sync {
    async fn find(&self, id: Uuid) -> Result<Option<models::category::Model>, ServiceError>;
    async fn list(&self, name_filter: Option<&str>) -> Result<Vec<models::category::Model>, ServiceError>;
    async fn create(&self, name: &str, icon: Option<&str>) -> Result<models::category::Model, ServiceError>;
    async fn update(&self, id: Uuid, name: Option<&str>, icon: Option<&str>) -> Result<models::category::Model, ServiceError>;
    async fn delete(&self, id: Uuid) -> Result<bool, ServiceError>;
    async fn has_shops(&self, id: Uuid) -> Result<bool, ServiceError>;
}

/// SeaORM-backed repository implementation.
pub struct SeaOrmCategoryRepository {
    pub db: DatabaseConnection,
}

#[async_trait]
impl CategoryRepository for SeaOrmCategoryRepository {
    async fn find(&self, id: Uuid) -> Result<Option<models::category::Model>, ServiceError> {
        crate::db::category_service::get_category(&self.db, id).await
    }

    async fn list(&self, name_filter: Option<&str>) -> Result<Vec<models::category::Model>, ServiceError> {
        crate::db::category_service::list_categories(&self.db, name_filter).await
    }

    async fn create(&self, name: &str, icon: Option<&str>) -> Result<models::category::Model, ServiceError> {
        crate::db::category_service::create_category(&self.db, name, icon).await
    }

    async fn update(&self, id: Uuid, name: Option<&str>, icon: Option<&str>) -> Result<models::category::Model, ServiceError> {
        crate::db::category_service::update_category(&self.db, id, name, icon).await
    }

    async fn delete(&self, id: Uuid) -> Result<bool, ServiceError> {
        crate::db::category_service::delete_category(&self.db, id).await
    }

    async fn has_shops(&self, id: Uuid) -> Result<bool, ServiceError> {
        crate::db::category_service::category_has_shops(&self.db, id).await
    }
}

/// Simple in-memory mock repository for tests and doc examples
pub mod mock {
    use super::*;
    use chrono::Utc;
    use std::collections::HashSet;
    use std::sync::Mutex;

    #[derive(Default)]
    pub struct MockCategoryRepository {
        records: Mutex<Vec<models::category::Model>>,
        with_shops: Mutex<HashSet<Uuid>>,
    }

    impl MockCategoryRepository {
        /// Mark a category as referenced by at least one shop.
        pub fn attach_shop(&self, id: Uuid) {
            self.with_shops.lock().unwrap().insert(id);
        }

        pub fn record_count(&self) -> usize {
            self.records.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl CategoryRepository for MockCategoryRepository {
        async fn find(&self, id: Uuid) -> Result<Option<models::category::Model>, ServiceError> {
            let records = self.records.lock().unwrap();
            Ok(records.iter().find(|c| c.id == id).cloned())
        }

        async fn list(&self, name_filter: Option<&str>) -> Result<Vec<models::category::Model>, ServiceError> {
            let records = self.records.lock().unwrap();
            Ok(records
                .iter()
                .filter(|c| match name_filter {
                    Some(term) => c.name.to_lowercase().contains(&term.to_lowercase()),
                    None => true,
                })
                .cloned()
                .collect())
        }

        async fn create(&self, name: &str, icon: Option<&str>) -> Result<models::category::Model, ServiceError> {
            let now = Utc::now().into();
            let model = models::category::Model {
                id: Uuid::new_v4(),
                name: name.to_string(),
                icon: icon.map(|s| s.to_string()),
                created_at: now,
                updated_at: now,
            };
            self.records.lock().unwrap().push(model.clone());
            Ok(model)
        }

        async fn update(&self, id: Uuid, name: Option<&str>, icon: Option<&str>) -> Result<models::category::Model, ServiceError> {
            let mut records = self.records.lock().unwrap();
            let record = records
                .iter_mut()
                .find(|c| c.id == id)
                .ok_or_else(|| ServiceError::not_found("category"))?;
            if let Some(n) = name {
                record.name = n.to_string();
            }
            if let Some(key) = icon {
                record.icon = Some(key.to_string());
            }
            record.updated_at = Utc::now().into();
            Ok(record.clone())
        }

        async fn delete(&self, id: Uuid) -> Result<bool, ServiceError> {
            let mut records = self.records.lock().unwrap();
            let before = records.len();
            records.retain(|c| c.id != id);
            Ok(records.len() < before)
        }

        async fn has_shops(&self, id: Uuid) -> Result<bool, ServiceError> {
            Ok(self.with_shops.lock().unwrap().contains(&id))
        }
    }
}
