use std::sync::Arc;

use axum::{
    extract::{Extension, State},
    Json,
};
use reqwest::Method;
use serde_json::{json, Value};
use tracing::{debug, warn};

use shared_config::AppConfig;
use shared_database::supabase::SupabaseClient;
use shared_models::auth::{AdminSession, SessionResponse};
use shared_models::error::AppError;
use shared_utils::session::issue_token;

use crate::models::{AdminUserRecord, LoginRequest, LoginResponse};
use crate::services::credentials::CredentialService;

/// Authenticate a staff user and issue a session token.
///
/// Unknown username, inactive account, and wrong password all produce the
/// same response so the login form leaks nothing; the log line tells them
/// apart for diagnostics.
#[axum::debug_handler]
pub async fn login(
    State(state): State<Arc<AppConfig>>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    debug!("Login attempt for username: {}", request.username);

    if request.username.trim().is_empty() || request.password.is_empty() {
        return Err(AppError::ValidationError("Username and password are required".to_string()));
    }

    let client = SupabaseClient::new(&state);

    let path = format!(
        "/rest/v1/admin_users?username=eq.{}&is_active=eq.true",
        request.username.trim()
    );
    let result: Vec<Value> = client.request(Method::GET, &path, None, None).await?;

    if result.is_empty() {
        warn!("Login rejected: unknown or inactive username {}", request.username);
        return Err(invalid_credentials());
    }

    let record: AdminUserRecord = serde_json::from_value(result[0].clone())
        .map_err(|e| AppError::Internal(e.to_string()))?;

    let verified = CredentialService::verify_password(&request.password, &record.password_hash)
        .map_err(|e| AppError::Internal(format!("Credential verification failed: {}", e)))?;

    if !verified {
        warn!("Login rejected: wrong password for {}", record.username);
        return Err(invalid_credentials());
    }

    let token = issue_token(
        &record.id.to_string(),
        &record.username,
        &record.role,
        record.doctor_id,
        &state.session_secret,
        state.session_ttl_hours,
    ).map_err(AppError::Internal)?;

    let expires_at = chrono::Utc::now() + chrono::Duration::hours(state.session_ttl_hours);

    debug!("Session issued for {} (role: {})", record.username, record.role);

    Ok(Json(LoginResponse {
        token,
        username: record.username,
        role: record.role,
        doctor_id: record.doctor_id,
        expires_at,
    }))
}

/// Echo the session attached by the auth middleware. Clients poll this to
/// decide whether a stored token is still usable.
#[axum::debug_handler]
pub async fn get_session(
    Extension(session): Extension<AdminSession>,
) -> Result<Json<SessionResponse>, AppError> {
    Ok(Json(SessionResponse {
        valid: true,
        user_id: session.user_id,
        username: session.username,
        role: session.role,
        expires_at: session.expires_at,
    }))
}

/// List staff accounts for the management screen. Credential hashes never
/// leave the data service.
#[axum::debug_handler]
pub async fn list_staff_users(
    State(state): State<Arc<AppConfig>>,
    Extension(session): Extension<AdminSession>,
) -> Result<Json<Value>, AppError> {
    if !session.is_admin() {
        return Err(AppError::Auth("Only administrators can list staff accounts".to_string()));
    }

    let client = SupabaseClient::new(&state);

    let path = "/rest/v1/admin_users?select=id,username,role,doctor_id,is_active,created_at&order=username.asc";
    let users: Vec<Value> = client.request(Method::GET, path, None, None).await?;

    Ok(Json(json!({
        "users": users,
        "total": users.len()
    })))
}

/// Hash a password for provisioning staff accounts. Admin-only.
#[axum::debug_handler]
pub async fn hash_credential(
    Extension(session): Extension<AdminSession>,
    Json(payload): Json<Value>,
) -> Result<Json<Value>, AppError> {
    if !session.is_admin() {
        return Err(AppError::Auth("Only administrators can provision credentials".to_string()));
    }

    let password = payload["password"].as_str()
        .ok_or_else(|| AppError::BadRequest("password field is required".to_string()))?;

    let hash = CredentialService::hash_password(password)
        .map_err(|e| AppError::Internal(format!("Hashing failed: {}", e)))?;

    Ok(Json(json!({ "password_hash": hash })))
}

fn invalid_credentials() -> AppError {
    AppError::Auth("Invalid username or password".to_string())
}
