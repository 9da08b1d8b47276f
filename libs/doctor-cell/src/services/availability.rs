use chrono::NaiveDate;
use reqwest::Method;
use serde_json::Value;
use tracing::debug;
use uuid::Uuid;

use shared_config::AppConfig;
use shared_database::supabase::{DataServiceError, SupabaseClient};
use shared_models::error::AppError;

use crate::models::{DaySlotsResponse, Doctor, DoctorError};
use crate::services::slots::{generate_slots, BookedTimes};

/// Availability queries for one doctor and date: fetches the booked set,
/// runs the slot engine over the doctor's working hours, and returns the
/// classified slots. Every availability consumer (public form, staff manual
/// entry, mobile) goes through this path, so the booked-time conflict
/// classification is never optional.
pub struct AvailabilityService {
    supabase: SupabaseClient,
}

impl AvailabilityService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
        }
    }

    /// All offerable slots for a doctor on a date, each marked free or booked.
    pub async fn get_day_slots(
        &self,
        doctor_id: Uuid,
        date: NaiveDate,
    ) -> Result<DaySlotsResponse, AppError> {
        debug!("Calculating slots for doctor {} on {}", doctor_id, date);

        let doctor = self.get_doctor(doctor_id).await?;

        if !doctor.is_active {
            return Err(DoctorError::Inactive.into());
        }
        if doctor.appointment_duration <= 0 {
            return Err(DoctorError::InvalidDuration(doctor.appointment_duration).into());
        }

        let booked = self.booked_times(doctor_id, date).await?;
        let slots = generate_slots(&doctor.working_hours, date, doctor.appointment_duration, &booked);

        debug!("Generated {} slots ({} booked)", slots.len(), booked.len());

        Ok(DaySlotsResponse {
            doctor_id,
            date,
            slots,
        })
    }

    /// The times already taken for a doctor on a date. Cancelled appointments
    /// do not occupy a slot and are excluded at the query.
    pub async fn booked_times(
        &self,
        doctor_id: Uuid,
        date: NaiveDate,
    ) -> Result<BookedTimes, DataServiceError> {
        let path = format!(
            "/rest/v1/appointments?doctor_id=eq.{}&appointment_date=eq.{}&status=neq.cancelled&select=appointment_time&order=appointment_time.asc",
            doctor_id, date
        );

        let result: Vec<Value> = self.supabase.request(
            Method::GET,
            &path,
            None,
            None,
        ).await?;

        let booked = BookedTimes::from_raw(
            result.iter().filter_map(|row| row["appointment_time"].as_str()),
        );

        Ok(booked)
    }

    async fn get_doctor(&self, doctor_id: Uuid) -> Result<Doctor, AppError> {
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
}
