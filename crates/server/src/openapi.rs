use utoipa::OpenApi;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(ToSchema)]
pub struct HealthResponse {
    pub status: String,
}

#[derive(utoipa::ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(utoipa::ToSchema)]
pub struct CategoryDoc {
    pub id: Uuid,
    pub name: String,
    /// Derived public URL of the icon, null when the blob is absent
    pub icon: Option<String>,
}

#[derive(utoipa::ToSchema)]
pub struct ShopDoc {
    pub id: Uuid,
    pub name: String,
    pub category_id: Uuid,
    pub description: String,
    pub image: Option<String>,
    pub address: String,
    pub phone: String,
}

#[derive(utoipa::ToSchema)]
pub struct BannerDoc {
    pub id: Uuid,
    pub title: Option<String>,
    pub image: Option<String>,
}

#[derive(utoipa::ToSchema)]
pub struct PaginationDoc {
    pub total: u64,
    pub per_page: u64,
    pub current_page: u64,
    pub last_page: u64,
    pub from: Option<u64>,
    pub to: Option<u64>,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::auth::login,
        crate::routes::user::list_categories,
        crate::routes::user::shops_by_category,
        crate::routes::user::search_shops,
        crate::routes::user::shop_detail,
        crate::routes::user::list_banners,
        crate::routes::admin_categories::detail,
        crate::routes::admin_categories::create,
        crate::routes::admin_categories::update,
        crate::routes::admin_categories::destroy,
        crate::routes::admin_shops::list,
        crate::routes::admin_shops::detail,
        crate::routes::admin_shops::create,
        crate::routes::admin_shops::update,
        crate::routes::admin_shops::destroy,
        crate::routes::admin_banners::list,
        crate::routes::admin_banners::detail,
        crate::routes::admin_banners::upload,
        crate::routes::admin_banners::destroy,
    ),
    components(
        schemas(
            HealthResponse,
            LoginRequest,
            CategoryDoc,
            ShopDoc,
            BannerDoc,
            PaginationDoc,
        )
    ),
    tags(
        (name = "health"),
        (name = "auth"),
        (name = "user"),
        (name = "admin")
    )
)]
pub struct ApiDoc;
