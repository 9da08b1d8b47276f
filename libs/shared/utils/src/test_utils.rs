use std::sync::Arc;
use chrono::Utc;
use serde_json::{json, Value};
use uuid::Uuid;

use shared_config::AppConfig;
use shared_models::auth::AdminSession;

use crate::session::issue_token;

pub struct TestConfig {
    pub session_secret: String,
    pub supabase_url: String,
    pub supabase_anon_key: String,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            session_secret: "test-secret-key-for-session-signing-must-be-long-enough".to_string(),
            supabase_url: "http://localhost:54321".to_string(),
            supabase_anon_key: "test-anon-key".to_string(),
        }
    }
}

impl TestConfig {
    pub fn with_url(url: &str) -> Self {
        Self {
            supabase_url: url.to_string(),
            ..Self::default()
        }
    }

    pub fn to_app_config(&self) -> AppConfig {
        AppConfig {
            supabase_url: self.supabase_url.clone(),
            supabase_anon_key: self.supabase_anon_key.clone(),
            session_secret: self.session_secret.clone(),
            session_ttl_hours: 12,
            data_service_timeout_secs: 5,
        }
    }

    pub fn to_arc(&self) -> Arc<AppConfig> {
        Arc::new(self.to_app_config())
    }
}

pub struct TestStaffUser {
    pub id: String,
    pub username: String,
    pub role: String,
    pub doctor_id: Option<Uuid>,
}

impl Default for TestStaffUser {
    fn default() -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            username: "reception".to_string(),
            role: "admin".to_string(),
            doctor_id: None,
        }
    }
}

impl TestStaffUser {
    pub fn admin(username: &str) -> Self {
        Self {
            username: username.to_string(),
            ..Self::default()
        }
    }

    pub fn doctor(username: &str, doctor_id: Uuid) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            username: username.to_string(),
            role: "doctor".to_string(),
            doctor_id: Some(doctor_id),
        }
    }

    pub fn bearer_token(&self, secret: &str) -> String {
        issue_token(&self.id, &self.username, &self.role, self.doctor_id, secret, 12)
            .expect("test token issuance should not fail")
    }

    pub fn to_session(&self) -> AdminSession {
        AdminSession {
            user_id: self.id.clone(),
            username: self.username.clone(),
            role: self.role.clone(),
            doctor_id: self.doctor_id,
            expires_at: Utc::now() + chrono::Duration::hours(12),
        }
    }
}

/// Canned data-service rows for wiremock-backed tests.
pub struct MockDataServiceRows;

impl MockDataServiceRows {
    pub fn doctor_row(id: &str, name: &str, working_hours: Value, duration: i32) -> Value {
        json!({
            "id": id,
            "name": name,
            "specialty": "Pediatrics",
            "phone": "+902121234567",
            "address": "Clinic St. 1",
            "working_hours": working_hours,
            "appointment_duration": duration,
            "is_active": true,
            "created_at": Utc::now().to_rfc3339()
        })
    }

    pub fn weekday_hours(day: &str, start: &str, end: &str) -> Value {
        json!({ day: [ { "start": start, "end": end } ] })
    }

    pub fn appointment_row(doctor_id: &str, date: &str, time: &str, status: &str) -> Value {
        json!({
            "id": Uuid::new_v4().to_string(),
            "full_name": "Test Patient",
            "phone": "+905321234567",
            "tc_number": "12345678901",
            "appointment_type": "new",
            "doctor_id": doctor_id,
            "appointment_date": date,
            "appointment_time": time,
            "status": status,
            "created_by": "web",
            "created_at": Utc::now().to_rfc3339()
        })
    }

    pub fn admin_user_row(username: &str, password_hash: &str) -> Value {
        json!({
            "id": Uuid::new_v4().to_string(),
            "username": username,
            "password_hash": password_hash,
            "role": "admin",
            "doctor_id": null,
            "is_active": true,
            "created_at": Utc::now().to_rfc3339()
        })
    }

    pub fn settings_row(site_title: &str) -> Value {
        json!({
            "id": Uuid::new_v4().to_string(),
            "site_title": site_title,
            "site_description": "Pediatric clinic appointment system",
            "recaptcha_key": null,
            "whatsapp_number": "+905001112233",
            "mobile_app_link": null,
            "is_active": true,
            "created_at": Utc::now().to_rfc3339()
        })
    }
}
