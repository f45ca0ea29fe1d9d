use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde_json::json;
use uuid::Uuid;

use service::banner::{BannerView, CreateBanner};

use crate::errors::ApiError;
use crate::multipart::read_banner_form;
use crate::routes::auth::ServerState;
use crate::routes::banners;

#[utoipa::path(get, path = "/admin/banners", tag = "admin", responses((status = 200, description = "List OK")))]
pub async fn list(State(state): State<ServerState>) -> Result<Json<serde_json::Value>, ApiError> {
    let list = banners(&state).list().await?;
    Ok(Json(json!({ "banners": list })))
}

#[utoipa::path(get, path = "/admin/banner/{id}", tag = "admin", params(("id" = Uuid, Path, description = "Banner ID")), responses((status = 200, description = "OK"), (status = 404, description = "Not Found")))]
pub async fn detail(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<BannerView>, ApiError> {
    let view = banners(&state).get(id).await?;
    Ok(Json(view))
}

#[utoipa::path(post, path = "/admin/banner/upload", tag = "admin", responses((status = 201, description = "Uploaded"), (status = 422, description = "Validation Error")))]
pub async fn upload(
    State(state): State<ServerState>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<serde_json::Value>), ApiError> {
    let form = read_banner_form(multipart).await?;
    let view = banners(&state)
        .create(CreateBanner { title: form.title, image: form.image })
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Banner uploaded successfully", "banner": view })),
    ))
}

#[utoipa::path(delete, path = "/admin/banners/{id}", tag = "admin", params(("id" = Uuid, Path, description = "Banner ID")), responses((status = 200, description = "Deleted"), (status = 404, description = "Not Found")))]
pub async fn destroy(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    banners(&state).delete(id).await?;
    Ok(Json(json!({ "message": "Banner deleted successfully" })))
}
