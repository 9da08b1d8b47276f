use reqwest::Method;
use serde_json::{json, Value};
use tracing::debug;

use shared_config::AppConfig;
use shared_database::supabase::SupabaseClient;
use shared_models::error::AppError;

use crate::models::{SiteSettings, UpdateSettingsRequest};

pub struct SettingsService {
    supabase: SupabaseClient,
}

impl SettingsService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
        }
    }

    /// The first active settings row is the site configuration.
    pub async fn get_settings(&self) -> Result<SiteSettings, AppError> {
        debug!("Fetching site settings");

        let path = "/rest/v1/settings?is_active=eq.true&order=created_at.asc&limit=1";
        let result: Vec<Value> = self.supabase.request(
            Method::GET,
            path,
            None,
            None,
        ).await?;

        if result.is_empty() {
            return Err(AppError::NotFound("Site settings not configured".to_string()));
        }

        serde_json::from_value(result[0].clone())
            .map_err(|e| AppError::Internal(e.to_string()))
    }

    pub async fn update_settings(
        &self,
        request: UpdateSettingsRequest,
    ) -> Result<SiteSettings, AppError> {
        debug!("Updating site settings");

        let current = self.get_settings().await?;

        let mut update_data = serde_json::Map::new();

        if let Some(site_title) = request.site_title {
            if site_title.trim().is_empty() {
                return Err(AppError::ValidationError("Site title cannot be empty".to_string()));
            }
            update_data.insert("site_title".to_string(), json!(site_title.trim()));
        }
        if let Some(site_description) = request.site_description {
            update_data.insert("site_description".to_string(), json!(site_description));
        }
        if let Some(recaptcha_key) = request.recaptcha_key {
            update_data.insert("recaptcha_key".to_string(), json!(recaptcha_key));
        }
        if let Some(whatsapp_number) = request.whatsapp_number {
            update_data.insert("whatsapp_number".to_string(), json!(whatsapp_number));
        }
        if let Some(mobile_app_link) = request.mobile_app_link {
            update_data.insert("mobile_app_link".to_string(), json!(mobile_app_link));
        }

        if update_data.is_empty() {
            return Ok(current);
        }

        let path = format!("/rest/v1/settings?id=eq.{}", current.id);
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert("Prefer", reqwest::header::HeaderValue::from_static("return=representation"));

        let result: Vec<Value> = self.supabase.request_with_headers(
            Method::PATCH,
            &path,
            None,
            Some(Value::Object(update_data)),
            Some(headers),
        ).await?;

        if result.is_empty() {
            return Err(AppError::Internal("Failed to update settings".to_string()));
        }

        serde_json::from_value(result[0].clone())
            .map_err(|e| AppError::Internal(e.to_string()))
    }
}
