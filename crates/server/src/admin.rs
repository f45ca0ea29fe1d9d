use axum::extract::{Request, State};
use axum::http::{header, StatusCode};
use axum::middleware::Next;
use axum::response::Response;

use service::auth::service::decode_token;

use crate::routes::auth::ServerState;

/// Admin-route guard: requires `Authorization: Bearer <token>` carrying a
/// JWT we issued. Missing, malformed, expired, or forged tokens are all 401.
pub async fn require_admin(
    State(state): State<ServerState>,
    req: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let path = req.uri().path().to_string();

    let authz = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok());
    let Some(h) = authz else {
        tracing::warn!(path = %path, "missing Authorization header");
        return Err(StatusCode::UNAUTHORIZED);
    };
    let Some(token) = h.strip_prefix("Bearer ") else {
        tracing::warn!(path = %path, "invalid Authorization format (expect Bearer)");
        return Err(StatusCode::UNAUTHORIZED);
    };

    match decode_token(&state.auth.jwt_secret, token) {
        Ok(_claims) => Ok(next.run(req).await),
        Err(e) => {
            tracing::warn!(path = %path, err = %e, "token validation failed");
            Err(StatusCode::UNAUTHORIZED)
        }
    }
}
