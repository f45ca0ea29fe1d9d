use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde_json::json;
use uuid::Uuid;

use service::category::{CategoryView, CreateCategory, UpdateCategory};

use crate::errors::ApiError;
use crate::multipart::read_category_form;
use crate::routes::auth::ServerState;
use crate::routes::categories;

#[utoipa::path(get, path = "/admin/categories/{id}", tag = "admin", params(("id" = Uuid, Path, description = "Category ID")), responses((status = 200, description = "OK"), (status = 404, description = "Not Found")))]
pub async fn detail(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<CategoryView>, ApiError> {
    let view = categories(&state).get(id).await?;
    Ok(Json(view))
}

#[utoipa::path(post, path = "/admin/categories", tag = "admin", responses((status = 201, description = "Created"), (status = 422, description = "Validation Error")))]
pub async fn create(
    State(state): State<ServerState>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<serde_json::Value>), ApiError> {
    let form = read_category_form(multipart).await?;
    let view = categories(&state)
        .create(CreateCategory { name: form.name.unwrap_or_default(), icon: form.icon })
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Category created successfully", "category": view })),
    ))
}

#[utoipa::path(post, path = "/admin/categories/{id}/update", tag = "admin", params(("id" = Uuid, Path, description = "Category ID")), responses((status = 200, description = "Updated"), (status = 404, description = "Not Found"), (status = 422, description = "Validation Error")))]
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    multipart: Multipart,
) -> Result<Json<serde_json::Value>, ApiError> {
    let form = read_category_form(multipart).await?;
    let view = categories(&state)
        .update(id, UpdateCategory { name: form.name, icon: form.icon })
        .await?;
    Ok(Json(json!({ "message": "Category updated successfully", "category": view })))
}

#[utoipa::path(delete, path = "/admin/categories/{id}", tag = "admin", params(("id" = Uuid, Path, description = "Category ID")), responses((status = 200, description = "Deleted"), (status = 404, description = "Not Found"), (status = 409, description = "Category Still Referenced")))]
pub async fn destroy(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    categories(&state).delete(id).await?;
    Ok(Json(json!({ "message": "Category deleted successfully" })))
}
