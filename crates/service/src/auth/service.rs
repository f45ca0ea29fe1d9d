use std::sync::Arc;

use argon2::{password_hash::PasswordVerifier, Argon2, PasswordHash};
use jsonwebtoken::{
    decode, encode, Algorithm, DecodingKey, EncodingKey, Header as JwtHeader, Validation,
};
use tracing::{info, instrument, warn};

use super::domain::{AdminProfile, AdminSession, Claims, LoginInput};
use super::errors::AuthError;
use super::repository::AdminRepository;
use crate::errors::FieldErrors;

/// Auth service configuration
#[derive(Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub token_ttl_hours: i64,
}

/// Decode and validate a bearer token. Free function so the HTTP middleware
/// can verify without constructing a repository-backed service.
pub fn decode_token(jwt_secret: &str, token: &str) -> Result<Claims, AuthError> {
    let key = DecodingKey::from_secret(jwt_secret.as_bytes());
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = true;
    decode::<Claims>(token, &key, &validation)
        .map(|data| data.claims)
        .map_err(|e| AuthError::TokenError(e.to_string()))
}

fn looks_like_email(s: &str) -> bool {
    match s.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.')
        }
        None => false,
    }
}

/// Auth business service independent of web framework
pub struct AuthService<R: AdminRepository> {
    repo: Arc<R>,
    cfg: AuthConfig,
}

impl<R: AdminRepository> AuthService<R> {
    pub fn new(repo: Arc<R>, cfg: AuthConfig) -> Self {
        Self { repo, cfg }
    }

    /// Authenticate the admin and issue a bearer token.
    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn login(&self, input: LoginInput) -> Result<AdminSession, AuthError> {
        let mut errs = FieldErrors::new();
        if !looks_like_email(&input.email) {
            errs.push("email", "a valid email address is required");
        }
        if input.password.chars().count() < 6 {
            errs.push("password", "must be at least 6 characters");
        }
        if !errs.is_empty() {
            return Err(AuthError::Validation(errs));
        }

        let admin = self
            .repo
            .find_by_email(&input.email)
            .await?
            .ok_or(AuthError::Unauthorized)?;

        let parsed = PasswordHash::new(&admin.password_hash)
            .map_err(|e| AuthError::HashError(e.to_string()))?;
        if Argon2::default()
            .verify_password(input.password.as_bytes(), &parsed)
            .is_err()
        {
            warn!(email = %input.email, "admin_login_rejected");
            return Err(AuthError::Unauthorized);
        }

        let exp = (chrono::Utc::now() + chrono::Duration::hours(self.cfg.token_ttl_hours))
            .timestamp() as usize;
        let claims = Claims { sub: admin.email.clone(), uid: admin.id.to_string(), exp };
        let token = encode(
            &JwtHeader::default(),
            &claims,
            &EncodingKey::from_secret(self.cfg.jwt_secret.as_bytes()),
        )
        .map_err(|e| AuthError::TokenError(e.to_string()))?;

        info!(admin_id = %admin.id, "admin_logged_in");
        Ok(AdminSession {
            admin: AdminProfile { id: admin.id, email: admin.email },
            token,
        })
    }

    /// Validate a bearer token issued by `login`.
    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        decode_token(&self.cfg.jwt_secret, token)
    }
}
