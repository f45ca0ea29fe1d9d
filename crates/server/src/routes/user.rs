use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;
use serde_json::json;
use tracing::info;
use uuid::Uuid;

use crate::errors::ApiError;
use crate::routes::auth::ServerState;
use crate::routes::{banners, categories, shops};

fn default_page() -> u32 {
    1
}

#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct CategoryListQuery {
    pub search: Option<String>,
}

#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct ShopListQuery {
    pub search: Option<String>,
    #[serde(default = "default_page")]
    pub page: u32,
}

#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct ShopSearchQuery {
    pub q: Option<String>,
    #[serde(default = "default_page")]
    pub page: u32,
}

#[utoipa::path(get, path = "/user/categories", tag = "user", params(CategoryListQuery), responses((status = 200, description = "List OK")))]
pub async fn list_categories(
    State(state): State<ServerState>,
    Query(q): Query<CategoryListQuery>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let list = categories(&state).list(q.search.as_deref()).await?;
    info!(count = list.len(), "list categories");
    Ok(Json(json!({ "categories": list })))
}

#[utoipa::path(get, path = "/user/{category_id}/shops", tag = "user", params(("category_id" = Uuid, Path, description = "Category ID"), ShopListQuery), responses((status = 200, description = "Page OK"), (status = 404, description = "Category Not Found")))]
pub async fn shops_by_category(
    State(state): State<ServerState>,
    Path(category_id): Path<Uuid>,
    Query(q): Query<ShopListQuery>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let page = shops(&state)
        .by_category(category_id, q.search.as_deref(), q.page)
        .await?;
    Ok(Json(json!({ "shops": page.items, "pagination": page.pagination })))
}

#[utoipa::path(get, path = "/user/shops/search", tag = "user", params(ShopSearchQuery), responses((status = 200, description = "Matches"), (status = 404, description = "No Matches"), (status = 422, description = "Missing Query")))]
pub async fn search_shops(
    State(state): State<ServerState>,
    Query(q): Query<ShopSearchQuery>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let page = shops(&state)
        .search(q.q.as_deref().unwrap_or(""), q.page)
        .await?;
    Ok(Json(json!({ "shops": page.items, "pagination": page.pagination })))
}

#[utoipa::path(get, path = "/user/shops/{shop_id}", tag = "user", params(("shop_id" = Uuid, Path, description = "Shop ID")), responses((status = 200, description = "OK"), (status = 404, description = "Shop Not Found")))]
pub async fn shop_detail(
    State(state): State<ServerState>,
    Path(shop_id): Path<Uuid>,
) -> Result<Json<service::shop::ShopView>, ApiError> {
    let view = shops(&state).get(shop_id).await?;
    Ok(Json(view))
}

#[utoipa::path(get, path = "/user/banners", tag = "user", responses((status = 200, description = "List OK")))]
pub async fn list_banners(
    State(state): State<ServerState>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let list = banners(&state).list().await?;
    Ok(Json(json!({ "banners": list })))
}
