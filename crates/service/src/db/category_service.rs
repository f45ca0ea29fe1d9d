use chrono::Utc;
use models::category;
use sea_orm::sea_query::extension::postgres::PgExpr;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};
use uuid::Uuid;

use crate::errors::ServiceError;

/// Create a category. `icon` is the stored asset key, not a URL.
pub async fn create_category(
    db: &DatabaseConnection,
    name: &str,
    icon: Option<&str>,
) -> Result<category::Model, ServiceError> {
    let now = Utc::now().into();
    let am = category::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(name.to_string()),
        icon: Set(icon.map(|s| s.to_string())),
        created_at: Set(now),
        updated_at: Set(now),
    };
    am.insert(db).await.map_err(|e| ServiceError::Db(e.to_string()))
}

/// Get category by id.
pub async fn get_category(
    db: &DatabaseConnection,
    id: Uuid,
) -> Result<Option<category::Model>, ServiceError> {
    category::Entity::find_by_id(id)
        .one(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))
}

/// List categories in creation order, optionally filtered by a
/// case-insensitive substring of the name.
pub async fn list_categories(
    db: &DatabaseConnection,
    name_filter: Option<&str>,
) -> Result<Vec<category::Model>, ServiceError> {
    let mut q = category::Entity::find().order_by_asc(category::Column::CreatedAt);
    if let Some(term) = name_filter {
        q = q.filter(
            Expr::col((category::Entity, category::Column::Name)).ilike(format!("%{}%", term)),
        );
    }
    q.all(db).await.map_err(|e| ServiceError::Db(e.to_string()))
}

/// Partial update: `None` fields keep their stored values.
pub async fn update_category(
    db: &DatabaseConnection,
    id: Uuid,
    name: Option<&str>,
    icon: Option<&str>,
) -> Result<category::Model, ServiceError> {
    let mut am: category::ActiveModel = category::Entity::find_by_id(id)
        .one(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?
        .ok_or_else(|| ServiceError::not_found("category"))?
        .into();
    if let Some(n) = name {
        am.name = Set(n.to_string());
    }
    if let Some(key) = icon {
        am.icon = Set(Some(key.to_string()));
    }
    am.updated_at = Set(Utc::now().into());
    am.update(db).await.map_err(|e| ServiceError::Db(e.to_string()))
}

/// Delete a category; returns whether a row was removed.
pub async fn delete_category(db: &DatabaseConnection, id: Uuid) -> Result<bool, ServiceError> {
    let res = category::Entity::delete_by_id(id)
        .exec(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?;
    Ok(res.rows_affected > 0)
}

/// Whether any shop still references the category.
pub async fn category_has_shops(db: &DatabaseConnection, id: Uuid) -> Result<bool, ServiceError> {
    let count = models::shop::Entity::find()
        .filter(models::shop::Column::CategoryId.eq(id))
        .count(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?;
    Ok(count > 0)
}
