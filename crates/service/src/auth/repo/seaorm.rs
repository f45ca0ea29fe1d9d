use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};

use crate::auth::errors::AuthError;
use crate::auth::repository::AdminRepository;

pub struct SeaOrmAdminRepository {
    pub db: DatabaseConnection,
}

#[async_trait::async_trait]
impl AdminRepository for SeaOrmAdminRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<models::admin::Model>, AuthError> {
        models::admin::Entity::find()
            .filter(models::admin::Column::Email.eq(email.to_string()))
            .one(&self.db)
            .await
            .map_err(|e| AuthError::Repository(e.to_string()))
    }
}
