use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Headline numbers for the staff dashboard.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DashboardStats {
    pub total_appointments: i64,
    pub pending_appointments: i64,
    pub confirmed_appointments: i64,
    pub today_appointments: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteSettings {
    pub id: Uuid,
    pub site_title: String,
    pub site_description: String,
    pub recaptcha_key: Option<String>,
    pub whatsapp_number: Option<String>,
    pub mobile_app_link: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateSettingsRequest {
    pub site_title: Option<String>,
    pub site_description: Option<String>,
    pub recaptcha_key: Option<String>,
    pub whatsapp_number: Option<String>,
    pub mobile_app_link: Option<String>,
}
