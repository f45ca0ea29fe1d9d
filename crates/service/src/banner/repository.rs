use async_trait::async_trait;
use sea_orm::DatabaseConnection;
use uuid::Uuid;

use crate::errors::ServiceError;

/// Persistence contract for banners. No update: a banner is replaced by
/// deleting it and uploading a new one.
#[async_trait]
pub trait BannerRepository: Send + Sync {
    async fn find(&self, id: Uuid) -> Result<Option<models::banner::Model>, ServiceError>;
    async fn list(&self) -> Result<Vec<models::banner::Model>, ServiceError>;
    async fn create(&self, title: Option<&str>, image: &str) -> Result<models::banner::Model, ServiceError>;
    async fn delete(&self, id: Uuid) -> Result<bool, ServiceError>;
}

/// SeaORM-backed repository implementation.
pub struct SeaOrmBannerRepository {
    pub db: DatabaseConnection,
}

#[async_trait]
impl BannerRepository for SeaOrmBannerRepository {
    async fn find(&self, id: Uuid) -> Result<Option<models::banner::Model>, ServiceError> {
        crate::db::banner_service::get_banner(&self.db, id).await
    }

    async fn list(&self) -> Result<Vec<models::banner::Model>, ServiceError> {
        crate::db::banner_service::list_banners(&self.db).await
    }

    async fn create(&self, title: Option<&str>, image: &str) -> Result<models::banner::Model, ServiceError> {
        crate::db::banner_service::create_banner(&self.db, title, image).await
    }

    async fn delete(&self, id: Uuid) -> Result<bool, ServiceError> {
        crate::db::banner_service::delete_banner(&self.db, id).await
    }
}

/// Simple in-memory mock repository for tests and doc examples
pub mod mock {
    use super::*;
    use chrono::Utc;
    use std::sync::Mutex;

    #[derive(Default)]
    pub struct MockBannerRepository {
        records: Mutex<Vec<models::banner::Model>>,
    }

    impl MockBannerRepository {
        pub fn record_count(&self) -> usize {
            self.records.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl BannerRepository for MockBannerRepository {
        async fn find(&self, id: Uuid) -> Result<Option<models::banner::Model>, ServiceError> {
            let records = self.records.lock().unwrap();
            Ok(records.iter().find(|b| b.id == id).cloned())
        }

        async fn list(&self) -> Result<Vec<models::banner::Model>, ServiceError> {
            Ok(self.records.lock().unwrap().clone())
        }

        async fn create(&self, title: Option<&str>, image: &str) -> Result<models::banner::Model, ServiceError> {
            let now = Utc::now().into();
            let model = models::banner::Model {
                id: Uuid::new_v4(),
                title: title.map(|s| s.to_string()),
                image: image.to_string(),
                created_at: now,
                updated_at: now,
            };
            self.records.lock().unwrap().push(model.clone());
            Ok(model)
        }

        async fn delete(&self, id: Uuid) -> Result<bool, ServiceError> {
            let mut records = self.records.lock().unwrap();
            let before = records.len();
            records.retain(|b| b.id != id);
            Ok(records.len() < before)
        }
    }
}
