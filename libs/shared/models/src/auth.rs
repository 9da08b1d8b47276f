use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Claims carried inside a signed session token.
#[derive(Debug, Serialize, Deserialize)]
pub struct SessionClaims {
    pub sub: String,
    pub username: String,
    pub role: String,
    pub doctor_id: Option<Uuid>,
    pub iat: i64,
    pub exp: i64,
}

/// The authenticated staff identity attached to a request after the session
/// middleware has validated the bearer token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminSession {
    pub user_id: String,
    pub username: String,
    pub role: String,
    pub doctor_id: Option<Uuid>,
    pub expires_at: DateTime<Utc>,
}

impl AdminSession {
    pub fn is_admin(&self) -> bool {
        self.role == "admin"
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SessionResponse {
    pub valid: bool,
    pub user_id: String,
    pub username: String,
    pub role: String,
    pub expires_at: DateTime<Utc>,
}
