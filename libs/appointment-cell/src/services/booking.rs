use chrono::Utc;
use reqwest::Method;
use serde_json::{json, Value};
use tracing::{debug, info, warn};
use uuid::Uuid;

use doctor_cell::services::availability::AvailabilityService;
use shared_config::AppConfig;
use shared_database::supabase::SupabaseClient;

use crate::models::{
    Appointment, AppointmentError, AppointmentSearchQuery, AppointmentStatus,
    BookAppointmentRequest, CreatedBy, ManualAppointmentRequest,
};
use crate::services::validation::{
    normalize_phone, normalize_tc_number, validate_booking_window, validate_full_name,
};

pub struct BookingService {
    supabase: SupabaseClient,
    availability: AvailabilityService,
}

impl BookingService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
            availability: AvailabilityService::new(config),
        }
    }

    /// Book from the public form. The appointment starts out pending and is
    /// confirmed by staff over the phone.
    pub async fn book_web(
        &self,
        request: BookAppointmentRequest,
    ) -> Result<Appointment, AppointmentError> {
        info!("Web booking for doctor {} on {} at {}",
              request.doctor_id, request.appointment_date, request.appointment_time);

        self.book(request, AppointmentStatus::Pending, CreatedBy::Web).await
    }

    /// Book on behalf of a patient from the staff dashboard or the doctor's
    /// own device.
    pub async fn book_manual(
        &self,
        request: ManualAppointmentRequest,
        created_by: CreatedBy,
    ) -> Result<Appointment, AppointmentError> {
        info!("Manual booking for doctor {} on {} at {} ({})",
              request.doctor_id, request.appointment_date, request.appointment_time, created_by);

        let status = request.status.unwrap_or(AppointmentStatus::Confirmed);
        if status == AppointmentStatus::Cancelled {
            return Err(AppointmentError::Validation(
                "New appointments cannot be created as cancelled".to_string(),
            ));
        }

        let booking_request = BookAppointmentRequest {
            full_name: request.full_name,
            phone: request.phone,
            tc_number: request.tc_number,
            appointment_type: request.appointment_type,
            doctor_id: request.doctor_id,
            appointment_date: request.appointment_date,
            appointment_time: request.appointment_time,
        };

        self.book(booking_request, status, created_by).await
    }

    async fn book(
        &self,
        request: BookAppointmentRequest,
        status: AppointmentStatus,
        created_by: CreatedBy,
    ) -> Result<Appointment, AppointmentError> {
        // Local validation happens before any remote call.
        let full_name = validate_full_name(&request.full_name)?;
        let phone = normalize_phone(&request.phone)?;
        let tc_number = normalize_tc_number(&request.tc_number)?;

        let today = Utc::now().date_naive();
        validate_booking_window(request.appointment_date, today)?;

        // Re-fetch the booked set at submission time rather than trusting the
        // snapshot the picker was rendered from. A booking that completed in
        // between shows up here and rejects cleanly; the narrow race that
        // remains is closed by the data service's uniqueness constraint, which
        // maps onto the same SlotTaken outcome.
        let booked = self.availability
            .booked_times(request.doctor_id, request.appointment_date)
            .await?;

        if booked.contains(request.appointment_time) {
            warn!("Slot {} on {} for doctor {} taken at submission time",
                  request.appointment_time, request.appointment_date, request.doctor_id);
            return Err(AppointmentError::SlotTaken);
        }

        let appointment_data = json!({
            "full_name": full_name,
            "phone": phone,
            "tc_number": tc_number,
            "appointment_type": request.appointment_type,
            "doctor_id": request.doctor_id,
            "appointment_date": request.appointment_date,
            "appointment_time": request.appointment_time,
            "status": status,
            "created_by": created_by
        });

        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert("Prefer", reqwest::header::HeaderValue::from_static("return=representation"));

        let result: Vec<Value> = self.supabase.request_with_headers(
            Method::POST,
            "/rest/v1/appointments",
            None,
            Some(appointment_data),
            Some(headers),
        ).await?;

        if result.is_empty() {
            return Err(AppointmentError::TransitionRejected(
                "Data service returned no created row".to_string(),
            ));
        }

        let appointment: Appointment = serde_json::from_value(result[0].clone())
            .map_err(|e| AppointmentError::Validation(format!("Unexpected row shape: {}", e)))?;

        info!("Appointment {} created ({} / {})", appointment.id, appointment.status, created_by);
        Ok(appointment)
    }

    pub async fn get_appointment(&self, appointment_id: Uuid) -> Result<Appointment, AppointmentError> {
        debug!("Fetching appointment: {}", appointment_id);

        let path = format!("/rest/v1/appointments?id=eq.{}", appointment_id);
        let result: Vec<Value> = self.supabase.request(
            Method::GET,
            &path,
            None,
            None,
        ).await?;

        if result.is_empty() {
            return Err(AppointmentError::NotFound);
        }

        serde_json::from_value(result[0].clone())
            .map_err(|e| AppointmentError::Validation(format!("Unexpected row shape: {}", e)))
    }

    /// Filtered listing, ordered by date then time.
    pub async fn list_appointments(
        &self,
        query: AppointmentSearchQuery,
    ) -> Result<Vec<Appointment>, AppointmentError> {
        let mut path = "/rest/v1/appointments?order=appointment_date.asc,appointment_time.asc"
            .to_string();

        if let Some(doctor_id) = query.doctor_id {
            path.push_str(&format!("&doctor_id=eq.{}", doctor_id));
        }
        if let Some(date) = query.date {
            path.push_str(&format!("&appointment_date=eq.{}", date));
        }
        if let Some(from_date) = query.from_date {
            path.push_str(&format!("&appointment_date=gte.{}", from_date));
        }
        if let Some(to_date) = query.to_date {
            path.push_str(&format!("&appointment_date=lte.{}", to_date));
        }
        if let Some(status) = query.status {
            path.push_str(&format!("&status=eq.{}", status));
        }
        if let Some(limit) = query.limit {
            path.push_str(&format!("&limit={}", limit));
        }
        if let Some(offset) = query.offset {
            path.push_str(&format!("&offset={}", offset));
        }

        debug!("Listing appointments: {}", path);

        let result: Vec<Value> = self.supabase.request(
            Method::GET,
            &path,
            None,
            None,
        ).await?;

        let appointments: Vec<Appointment> = result.into_iter()
            .map(serde_json::from_value)
            .collect::<Result<Vec<Appointment>, _>>()
            .map_err(|e| AppointmentError::Validation(format!("Unexpected row shape: {}", e)))?;

        Ok(appointments)
    }
}
