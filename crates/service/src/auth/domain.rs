use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Login input
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginInput {
    pub email: String,
    pub password: String,
}

/// Admin profile (business view, never carries the password hash)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminProfile {
    pub id: Uuid,
    pub email: String,
}

/// Login result: the profile plus the issued bearer token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminSession {
    pub admin: AdminProfile,
    pub token: String,
}

/// JWT claims carried by the bearer token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub uid: String,
    pub exp: usize,
}
