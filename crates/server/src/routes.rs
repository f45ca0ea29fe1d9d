use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::middleware;
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use tower_http::{
    cors::CorsLayer,
    services::ServeDir,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use common::types::Health;
use service::banner::{BannerService, SeaOrmBannerRepository};
use service::category::{CategoryService, SeaOrmCategoryRepository};
use service::shop::{SeaOrmShopRepository, ShopService};

use crate::admin;
use crate::routes::auth::ServerState;

pub mod admin_banners;
pub mod admin_categories;
pub mod admin_shops;
pub mod auth;
pub mod user;

/// Request bodies above this never reach the handlers. Large enough that an
/// over-cap upload still gets a per-field 422 from validation instead of a
/// bare 413 at the framework edge.
const MAX_BODY_BYTES: usize = 16 * 1024 * 1024;

#[utoipa::path(get, path = "/health", tag = "health", responses((status = 200, description = "OK", body = crate::openapi::HealthResponse)))]
pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

/// Handlers construct their service per request from the shared state; the
/// repositories hold a cheap clone of the pooled connection.
pub(crate) fn categories(state: &ServerState) -> CategoryService<SeaOrmCategoryRepository> {
    CategoryService::new(
        Arc::new(SeaOrmCategoryRepository { db: state.db.clone() }),
        state.assets.clone(),
    )
}

pub(crate) fn shops(state: &ServerState) -> ShopService<SeaOrmShopRepository> {
    ShopService::new(
        Arc::new(SeaOrmShopRepository { db: state.db.clone() }),
        state.assets.clone(),
    )
}

pub(crate) fn banners(state: &ServerState) -> BannerService<SeaOrmBannerRepository> {
    BannerService::new(
        Arc::new(SeaOrmBannerRepository { db: state.db.clone() }),
        state.assets.clone(),
    )
}

/// Build the full application router: public browse routes, the login
/// endpoint, bearer-guarded admin routes, the static asset mount, and docs.
pub fn build_router(state: ServerState, storage_root: &str, cors: CorsLayer) -> Router {
    let public = Router::new()
        .route("/health", get(health))
        .route("/user/categories", get(user::list_categories))
        .route("/user/:category_id/shops", get(user::shops_by_category))
        .route("/user/shops/search", get(user::search_shops))
        .route("/user/shops/:shop_id", get(user::shop_detail))
        .route("/user/banners", get(user::list_banners))
        .route("/admin/login", post(auth::login));

    let admin_routes = Router::new()
        .route("/admin/categories", post(admin_categories::create))
        .route(
            "/admin/categories/:id",
            get(admin_categories::detail).delete(admin_categories::destroy),
        )
        .route("/admin/categories/:id/update", post(admin_categories::update))
        .route("/admin/shops", get(admin_shops::list).post(admin_shops::create))
        .route(
            "/admin/shops/:id",
            get(admin_shops::detail).put(admin_shops::update).delete(admin_shops::destroy),
        )
        .route("/admin/banner/upload", post(admin_banners::upload))
        .route("/admin/banner/:id", get(admin_banners::detail))
        .route("/admin/banners", get(admin_banners::list))
        .route("/admin/banners/:id", delete(admin_banners::destroy))
        .route_layer(middleware::from_fn_with_state(state.clone(), admin::require_admin));

    public
        .merge(admin_routes)
        .nest_service("/storage", ServeDir::new(storage_root))
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", crate::openapi::ApiDoc::openapi()))
        .with_state(state)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
