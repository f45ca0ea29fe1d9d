use chrono::Utc;
use models::banner;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, QueryOrder, Set};
use uuid::Uuid;

use crate::errors::ServiceError;

/// Create a banner. `image` is the stored asset key and is always present;
/// banners without an image are rejected before this layer.
pub async fn create_banner(
    db: &DatabaseConnection,
    title: Option<&str>,
    image: &str,
) -> Result<banner::Model, ServiceError> {
    let now = Utc::now().into();
    let am = banner::ActiveModel {
        id: Set(Uuid::new_v4()),
        title: Set(title.map(|s| s.to_string())),
        image: Set(image.to_string()),
        created_at: Set(now),
        updated_at: Set(now),
    };
    am.insert(db).await.map_err(|e| ServiceError::Db(e.to_string()))
}

/// Get banner by id.
pub async fn get_banner(
    db: &DatabaseConnection,
    id: Uuid,
) -> Result<Option<banner::Model>, ServiceError> {
    banner::Entity::find_by_id(id)
        .one(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))
}

/// All banners in creation order.
pub async fn list_banners(db: &DatabaseConnection) -> Result<Vec<banner::Model>, ServiceError> {
    banner::Entity::find()
        .order_by_asc(banner::Column::CreatedAt)
        .all(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))
}

/// Delete a banner; returns whether a row was removed.
pub async fn delete_banner(db: &DatabaseConnection, id: Uuid) -> Result<bool, ServiceError> {
    let res = banner::Entity::delete_by_id(id)
        .exec(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?;
    Ok(res.rows_affected > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::get_db;

    #[tokio::test]
    async fn banner_crud_service() -> Result<(), anyhow::Error> {
        if std::env::var("SKIP_DB_TESTS").is_ok() {
            return Ok(());
        }
        let db = get_db().await?;

        let created = create_banner(&db, Some("Summer Sale"), "banners/a.png").await?;
        let found = get_banner(&db, created.id).await?.unwrap();
        assert_eq!(found.title.as_deref(), Some("Summer Sale"));
        assert_eq!(found.image, "banners/a.png");

        let all = list_banners(&db).await?;
        assert!(all.iter().any(|b| b.id == created.id));

        assert!(delete_banner(&db, created.id).await?);
        assert!(!delete_banner(&db, created.id).await?);
        Ok(())
    }
}
