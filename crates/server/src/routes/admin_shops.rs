use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use service::errors::FieldErrors;
use service::shop::{CreateShop, ShopView, UpdateShop};

use crate::errors::ApiError;
use crate::multipart::{parse_uuid_field, read_shop_form};
use crate::routes::auth::ServerState;
use crate::routes::shops;

fn default_page() -> u32 {
    1
}

#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct AdminShopListQuery {
    pub category_id: Option<Uuid>,
    pub search: Option<String>,
    #[serde(default = "default_page")]
    pub page: u32,
}

#[utoipa::path(get, path = "/admin/shops", tag = "admin", params(AdminShopListQuery), responses((status = 200, description = "Page OK"), (status = 404, description = "Category Not Found"), (status = 422, description = "Missing category_id")))]
pub async fn list(
    State(state): State<ServerState>,
    Query(q): Query<AdminShopListQuery>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let Some(category_id) = q.category_id else {
        let mut errs = FieldErrors::new();
        errs.push("category_id", "category_id is required");
        return Err(ApiError::Validation(errs));
    };
    let page = shops(&state)
        .by_category(category_id, q.search.as_deref(), q.page)
        .await?;
    Ok(Json(json!({ "shops": page.items, "pagination": page.pagination })))
}

#[utoipa::path(get, path = "/admin/shops/{id}", tag = "admin", params(("id" = Uuid, Path, description = "Shop ID")), responses((status = 200, description = "OK"), (status = 404, description = "Not Found")))]
pub async fn detail(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ShopView>, ApiError> {
    let view = shops(&state).get(id).await?;
    Ok(Json(view))
}

#[utoipa::path(post, path = "/admin/shops", tag = "admin", responses((status = 201, description = "Created"), (status = 409, description = "Unknown Category"), (status = 422, description = "Validation Error")))]
pub async fn create(
    State(state): State<ServerState>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<serde_json::Value>), ApiError> {
    let form = read_shop_form(multipart).await?;
    let category_id = parse_uuid_field(form.category_id.as_deref(), "category_id")?;
    let view = shops(&state)
        .create(CreateShop {
            name: form.name.unwrap_or_default(),
            category_id,
            description: form.description.unwrap_or_default(),
            image: form.image,
            address: form.address.unwrap_or_default(),
            phone: form.phone.unwrap_or_default(),
        })
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Shop created successfully", "shop": view })),
    ))
}

#[utoipa::path(put, path = "/admin/shops/{id}", tag = "admin", params(("id" = Uuid, Path, description = "Shop ID")), responses((status = 200, description = "Updated"), (status = 404, description = "Not Found"), (status = 409, description = "Unknown Category"), (status = 422, description = "Validation Error")))]
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    multipart: Multipart,
) -> Result<Json<serde_json::Value>, ApiError> {
    let form = read_shop_form(multipart).await?;
    let category_id = parse_uuid_field(form.category_id.as_deref(), "category_id")?;
    let view = shops(&state)
        .update(
            id,
            UpdateShop {
                name: form.name,
                category_id,
                description: form.description,
                image: form.image,
                address: form.address,
                phone: form.phone,
            },
        )
        .await?;
    Ok(Json(json!({ "message": "Shop updated successfully", "shop": view })))
}

#[utoipa::path(delete, path = "/admin/shops/{id}", tag = "admin", params(("id" = Uuid, Path, description = "Shop ID")), responses((status = 200, description = "Deleted"), (status = 404, description = "Not Found")))]
pub async fn destroy(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    shops(&state).delete(id).await?;
    Ok(Json(json!({ "message": "Shop deleted successfully" })))
}
