use reqwest::Method;
use serde_json::{json, Value};
use tracing::debug;
use uuid::Uuid;

use shared_config::AppConfig;
use shared_database::supabase::SupabaseClient;
use shared_models::error::AppError;

use crate::models::{CreateDoctorRequest, Doctor, DoctorError, UpdateDoctorRequest};

const DEFAULT_APPOINTMENT_DURATION: i32 = 30;

pub struct DoctorService {
    supabase: SupabaseClient,
}

impl DoctorService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
        }
    }

    /// List doctors, optionally restricted to those accepting appointments.
    pub async fn list_doctors(&self, active_only: bool) -> Result<Vec<Doctor>, AppError> {
        debug!("Fetching doctors (active_only: {})", active_only);

        let mut path = "/rest/v1/doctors?order=name.asc".to_string();
        if active_only {
            path.push_str("&is_active=eq.true");
        }

        let result: Vec<Value> = self.supabase.request(
            Method::GET,
            &path,
            None,
            None,
        ).await?;

        let doctors: Vec<Doctor> = result.into_iter()
            .map(serde_json::from_value)
            .collect::<Result<Vec<Doctor>, _>>()
            .map_err(|e| AppError::Internal(e.to_string()))?;

        Ok(doctors)
    }

    pub async fn get_doctor(&self, doctor_id: Uuid) -> Result<Doctor, AppError> {
        debug!("Fetching doctor: {}", doctor_id);

        let path = format!("/rest/v1/doctors?id=eq.{}", doctor_id);
        let result: Vec<Value> = self.supabase.request(
            Method::GET,
            &path,
            None,
            None,
        ).await?;

        if result.is_empty() {
            return Err(DoctorError::NotFound.into());
        }

        serde_json::from_value(result[0].clone())
            .map_err(|e| AppError::Internal(e.to_string()))
    }

    pub async fn create_doctor(&self, request: CreateDoctorRequest) -> Result<Doctor, AppError> {
        debug!("Creating doctor: {}", request.name);

        if request.name.trim().is_empty() {
            return Err(DoctorError::ValidationError("Doctor name is required".to_string()).into());
        }

        request.working_hours.validate()?;

        let duration = request.appointment_duration.unwrap_or(DEFAULT_APPOINTMENT_DURATION);
        if duration <= 0 {
            return Err(DoctorError::InvalidDuration(duration).into());
        }

        let doctor_data = json!({
            "name": request.name.trim(),
            "specialty": request.specialty,
            "phone": request.phone,
            "address": request.address,
            "working_hours": request.working_hours,
            "appointment_duration": duration,
            "is_active": true
        });

        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert("Prefer", reqwest::header::HeaderValue::from_static("return=representation"));

        let result: Vec<Value> = self.supabase.request_with_headers(
            Method::POST,
            "/rest/v1/doctors",
            None,
            Some(doctor_data),
            Some(headers),
        ).await?;

        if result.is_empty() {
            return Err(AppError::Internal("Failed to create doctor".to_string()));
        }

        let doctor: Doctor = serde_json::from_value(result[0].clone())
            .map_err(|e| AppError::Internal(e.to_string()))?;
        debug!("Doctor created with ID: {}", doctor.id);

        Ok(doctor)
    }

    pub async fn update_doctor(
        &self,
        doctor_id: Uuid,
        request: UpdateDoctorRequest,
    ) -> Result<Doctor, AppError> {
        debug!("Updating doctor: {}", doctor_id);

        if let Some(ref working_hours) = request.working_hours {
            working_hours.validate()?;
        }
        if let Some(duration) = request.appointment_duration {
            if duration <= 0 {
                return Err(DoctorError::InvalidDuration(duration).into());
            }
        }

        let mut update_data = serde_json::Map::new();

        if let Some(name) = request.name {
            if name.trim().is_empty() {
                return Err(DoctorError::ValidationError("Doctor name is required".to_string()).into());
            }
            update_data.insert("name".to_string(), json!(name.trim()));
        }
        if let Some(specialty) = request.specialty {
            update_data.insert("specialty".to_string(), json!(specialty));
        }
        if let Some(phone) = request.phone {
            update_data.insert("phone".to_string(), json!(phone));
        }
        if let Some(address) = request.address {
            update_data.insert("address".to_string(), json!(address));
        }
        if let Some(working_hours) = request.working_hours {
            update_data.insert("working_hours".to_string(), json!(working_hours));
        }
        if let Some(duration) = request.appointment_duration {
            update_data.insert("appointment_duration".to_string(), json!(duration));
        }
        if let Some(is_active) = request.is_active {
            update_data.insert("is_active".to_string(), json!(is_active));
        }

        if update_data.is_empty() {
            return self.get_doctor(doctor_id).await;
        }

        let path = format!("/rest/v1/doctors?id=eq.{}", doctor_id);
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
            return Err(DoctorError::NotFound.into());
        }

        serde_json::from_value(result[0].clone())
            .map_err(|e| AppError::Internal(e.to_string()))
    }

    /// Doctors are retired, not deleted, so their appointment history stays
    /// reachable.
    pub async fn deactivate_doctor(&self, doctor_id: Uuid) -> Result<Doctor, AppError> {
        debug!("Deactivating doctor: {}", doctor_id);

        self.update_doctor(doctor_id, UpdateDoctorRequest {
            name: None,
            specialty: None,
            phone: None,
            address: None,
            working_hours: None,
            appointment_duration: None,
            is_active: Some(false),
        }).await
    }
}
