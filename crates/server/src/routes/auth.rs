use std::sync::Arc;

use axum::{extract::State, Json};
use sea_orm::DatabaseConnection;
use serde::Serialize;
use uuid::Uuid;

use service::auth::domain::LoginInput;
use service::auth::repo::seaorm::SeaOrmAdminRepository;
use service::auth::service::{AuthConfig, AuthService};
use service::storage::AssetStore;

use crate::errors::ApiError;

#[derive(Clone)]
pub struct ServerAuthConfig {
    pub jwt_secret: String,
    pub token_ttl_hours: i64,
}

#[derive(Clone)]
pub struct ServerState {
    pub db: DatabaseConnection,
    pub auth: ServerAuthConfig,
    pub assets: Arc<dyn AssetStore>,
}

#[derive(Serialize)]
pub struct LoginOutput {
    pub admin_id: Uuid,
    pub email: String,
    pub token: String,
}

#[utoipa::path(post, path = "/admin/login", tag = "auth", request_body = crate::openapi::LoginRequest, responses((status = 200, description = "Logged In"), (status = 401, description = "Invalid Credentials"), (status = 422, description = "Validation Error")))]
pub async fn login(
    State(state): State<ServerState>,
    Json(input): Json<LoginInput>,
) -> Result<Json<LoginOutput>, ApiError> {
    let repo = Arc::new(SeaOrmAdminRepository { db: state.db.clone() });
    let svc = AuthService::new(
        repo,
        AuthConfig {
            jwt_secret: state.auth.jwt_secret.clone(),
            token_ttl_hours: state.auth.token_ttl_hours,
        },
    );
    let session = svc.login(input).await?;
    Ok(Json(LoginOutput {
        admin_id: session.admin.id,
        email: session.admin.email,
        token: session.token,
    }))
}
