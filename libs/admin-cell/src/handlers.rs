use std::sync::Arc;

use axum::{
    extract::{Extension, State},
    Json,
};
use serde_json::{json, Value};

use shared_config::AppConfig;
use shared_models::auth::AdminSession;
use shared_models::error::AppError;

use crate::models::UpdateSettingsRequest;
use crate::services::{settings::SettingsService, stats::StatsService};

#[axum::debug_handler]
pub async fn get_dashboard_stats(
    State(state): State<Arc<AppConfig>>,
    Extension(_session): Extension<AdminSession>,
) -> Result<Json<Value>, AppError> {
    let stats_service = StatsService::new(&state);

    let stats = stats_service.dashboard_stats().await?;

    Ok(Json(json!(stats)))
}

/// Public: the booking page reads the site title and contact links.
#[axum::debug_handler]
pub async fn get_settings_public(
    State(state): State<Arc<AppConfig>>,
) -> Result<Json<Value>, AppError> {
    let settings_service = SettingsService::new(&state);

    let settings = settings_service.get_settings().await?;

    Ok(Json(json!(settings)))
}

#[axum::debug_handler]
pub async fn update_settings(
    State(state): State<Arc<AppConfig>>,
    Extension(session): Extension<AdminSession>,
    Json(request): Json<UpdateSettingsRequest>,
) -> Result<Json<Value>, AppError> {
    if !session.is_admin() {
        return Err(AppError::Auth("Only administrators can change site settings".to_string()));
    }

    let settings_service = SettingsService::new(&state);

    let settings = settings_service.update_settings(request).await?;

    Ok(Json(json!(settings)))
}
