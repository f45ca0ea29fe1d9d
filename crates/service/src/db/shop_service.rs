use chrono::Utc;
use models::shop;
use sea_orm::sea_query::extension::postgres::PgExpr;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use crate::errors::ServiceError;

fn contains(col: shop::Column, term: &str) -> sea_orm::sea_query::SimpleExpr {
    Expr::col((shop::Entity, col)).ilike(format!("%{}%", term))
}

/// Create a shop. The caller has already checked that `category_id` resolves;
/// the FK constraint backs that up at the database layer.
pub async fn create_shop(
    db: &DatabaseConnection,
    name: &str,
    category_id: Uuid,
    description: &str,
    image: Option<&str>,
    address: &str,
    phone: &str,
) -> Result<shop::Model, ServiceError> {
    let now = Utc::now().into();
    let am = shop::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(name.to_string()),
        category_id: Set(category_id),
        description: Set(description.to_string()),
        image: Set(image.map(|s| s.to_string())),
        address: Set(address.to_string()),
        phone: Set(phone.to_string()),
        created_at: Set(now),
        updated_at: Set(now),
    };
    am.insert(db).await.map_err(|e| ServiceError::Db(e.to_string()))
}

/// Get shop by id.
pub async fn get_shop(
    db: &DatabaseConnection,
    id: Uuid,
) -> Result<Option<shop::Model>, ServiceError> {
    shop::Entity::find_by_id(id)
        .one(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))
}

/// Page of shops in a category plus the total match count.
///
/// The optional filter is a case-insensitive OR-contains over
/// name/description/address/phone.
pub async fn list_shops_by_category(
    db: &DatabaseConnection,
    category_id: Uuid,
    filter: Option<&str>,
    page_idx: u64,
    per_page: u64,
) -> Result<(Vec<shop::Model>, u64), ServiceError> {
    let mut q = shop::Entity::find()
        .filter(shop::Column::CategoryId.eq(category_id))
        .order_by_asc(shop::Column::CreatedAt);
    if let Some(term) = filter {
        q = q.filter(
            Condition::any()
                .add(contains(shop::Column::Name, term))
                .add(contains(shop::Column::Description, term))
                .add(contains(shop::Column::Address, term))
                .add(contains(shop::Column::Phone, term)),
        );
    }
    let paginator = q.paginate(db, per_page);
    let total = paginator.num_items().await.map_err(|e| ServiceError::Db(e.to_string()))?;
    let rows = paginator
        .fetch_page(page_idx)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?;
    Ok((rows, total))
}

/// Global search across all categories: OR-contains over name/description.
pub async fn search_shops(
    db: &DatabaseConnection,
    query: &str,
    page_idx: u64,
    per_page: u64,
) -> Result<(Vec<shop::Model>, u64), ServiceError> {
    let q = shop::Entity::find()
        .filter(
            Condition::any()
                .add(contains(shop::Column::Name, query))
                .add(contains(shop::Column::Description, query)),
        )
        .order_by_asc(shop::Column::CreatedAt);
    let paginator = q.paginate(db, per_page);
    let total = paginator.num_items().await.map_err(|e| ServiceError::Db(e.to_string()))?;
    let rows = paginator
        .fetch_page(page_idx)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?;
    Ok((rows, total))
}

/// Partial update: `None` fields keep their stored values.
#[allow(clippy::too_many_arguments)]
pub async fn update_shop(
    db: &DatabaseConnection,
    id: Uuid,
    name: Option<&str>,
    category_id: Option<Uuid>,
    description: Option<&str>,
    image: Option<&str>,
    address: Option<&str>,
    phone: Option<&str>,
) -> Result<shop::Model, ServiceError> {
    let mut am: shop::ActiveModel = shop::Entity::find_by_id(id)
        .one(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?
        .ok_or_else(|| ServiceError::not_found("shop"))?
        .into();
    if let Some(n) = name {
        am.name = Set(n.to_string());
    }
    if let Some(cid) = category_id {
        am.category_id = Set(cid);
    }
    if let Some(d) = description {
        am.description = Set(d.to_string());
    }
    if let Some(key) = image {
        am.image = Set(Some(key.to_string()));
    }
    if let Some(a) = address {
        am.address = Set(a.to_string());
    }
    if let Some(p) = phone {
        am.phone = Set(p.to_string());
    }
    am.updated_at = Set(Utc::now().into());
    am.update(db).await.map_err(|e| ServiceError::Db(e.to_string()))
}

/// Delete a shop; returns whether a row was removed.
pub async fn delete_shop(db: &DatabaseConnection, id: Uuid) -> Result<bool, ServiceError> {
    let res = shop::Entity::delete_by_id(id)
        .exec(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?;
    Ok(res.rows_affected > 0)
}

/// Whether a category row exists, for the FK check before shop writes.
pub async fn category_exists(db: &DatabaseConnection, id: Uuid) -> Result<bool, ServiceError> {
    let count = models::category::Entity::find_by_id(id)
        .count(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?;
    Ok(count > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::category_service;
    use crate::test_support::get_db;

    #[tokio::test]
    async fn shop_crud_and_search_service() -> Result<(), anyhow::Error> {
        if std::env::var("SKIP_DB_TESTS").is_ok() {
            return Ok(());
        }
        let db = get_db().await?;

        let cat = category_service::create_category(
            &db,
            &format!("svc_shop_cat_{}", Uuid::new_v4()),
            None,
        )
        .await?;
        assert!(category_exists(&db, cat.id).await?);

        let marker = Uuid::new_v4().simple().to_string();
        let name = format!("Pizza Palace {marker}");
        let shop = create_shop(
            &db,
            &name,
            cat.id,
            "The best pizza in town.",
            Some("shop_images/a.jpg"),
            "123 Main St, Cityville",
            "123-456-7890",
        )
        .await?;

        // Case-insensitive substring search over name/description
        let (found, total) = search_shops(&db, &marker.to_uppercase(), 0, 20).await?;
        assert_eq!(total, 1);
        assert_eq!(found[0].id, shop.id);

        let (in_cat, _) = list_shops_by_category(&db, cat.id, Some("pizza"), 0, 10).await?;
        assert_eq!(in_cat.len(), 1);

        // Partial update leaves everything unsupplied alone
        let updated = update_shop(&db, shop.id, None, None, None, None, Some("9 New Rd"), None)
            .await?;
        assert_eq!(updated.address, "9 New Rd");
        assert_eq!(updated.name, name);
        assert_eq!(updated.image.as_deref(), Some("shop_images/a.jpg"));

        assert!(delete_shop(&db, shop.id).await?);
        assert!(category_service::delete_category(&db, cat.id).await?);
        Ok(())
    }
}
