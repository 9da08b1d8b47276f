use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use doctor_cell::models::TimeOfDay;
use shared_database::supabase::DataServiceError;

// ==============================================================================
// CORE APPOINTMENT MODELS
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Appointment {
    pub id: Uuid,
    pub full_name: String,
    pub phone: String,
    pub tc_number: String,
    pub appointment_type: AppointmentType,
    pub doctor_id: Uuid,
    pub appointment_date: NaiveDate,
    pub appointment_time: TimeOfDay,
    pub status: AppointmentStatus,
    pub created_by: CreatedBy,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AppointmentStatus {
    Pending,
    Confirmed,
    Cancelled,
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppointmentStatus::Pending => write!(f, "pending"),
            AppointmentStatus::Confirmed => write!(f, "confirmed"),
            AppointmentStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// First visit or follow-up check, as chosen on the booking form.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AppointmentType {
    New,
    Control,
}

impl fmt::Display for AppointmentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppointmentType::New => write!(f, "new"),
            AppointmentType::Control => write!(f, "control"),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CreatedBy {
    Web,
    Admin,
    Doctor,
}

impl fmt::Display for CreatedBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CreatedBy::Web => write!(f, "web"),
            CreatedBy::Admin => write!(f, "admin"),
            CreatedBy::Doctor => write!(f, "doctor"),
        }
    }
}

// ==============================================================================
// REQUEST/RESPONSE MODELS
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookAppointmentRequest {
    pub full_name: String,
    pub phone: String,
    pub tc_number: String,
    pub appointment_type: AppointmentType,
    pub doctor_id: Uuid,
    pub appointment_date: NaiveDate,
    pub appointment_time: TimeOfDay,
}

/// Staff-entered booking. Unlike the public form the operator chooses the
/// initial status; walk-in entries are usually confirmed on the spot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManualAppointmentRequest {
    pub full_name: String,
    pub phone: String,
    pub tc_number: String,
    pub appointment_type: AppointmentType,
    pub doctor_id: Uuid,
    pub appointment_date: NaiveDate,
    pub appointment_time: TimeOfDay,
    pub status: Option<AppointmentStatus>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppointmentSearchQuery {
    pub doctor_id: Option<Uuid>,
    pub date: Option<NaiveDate>,
    pub from_date: Option<NaiveDate>,
    pub to_date: Option<NaiveDate>,
    pub status: Option<AppointmentStatus>,
    pub limit: Option<i32>,
    pub offset: Option<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusTransitionRequest {
    pub status: AppointmentStatus,
}

/// Result of the server-side atomic status transition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusTransitionOutcome {
    pub success: bool,
    pub status: Option<AppointmentStatus>,
    pub updated_at: Option<DateTime<Utc>>,
    pub error: Option<String>,
}

/// One row of the patient directory, aggregated from appointment history.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PatientSummary {
    pub full_name: String,
    pub phone: String,
    pub tc_number: String,
    pub total_appointments: usize,
    pub first_seen: DateTime<Utc>,
    pub last_appointment_date: NaiveDate,
}

// ==============================================================================
// ERRORS
// ==============================================================================

#[derive(Debug)]
pub enum AppointmentError {
    Validation(String),
    /// The selected time was taken between rendering and submission, or the
    /// data service rejected the insert on its uniqueness constraint.
    SlotTaken,
    NotFound,
    InvalidTargetStatus(AppointmentStatus),
    TransitionRejected(String),
    DataService(DataServiceError),
}

impl fmt::Display for AppointmentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppointmentError::Validation(msg) => write!(f, "Validation error: {}", msg),
            AppointmentError::SlotTaken => {
                write!(f, "The selected time is no longer available")
            }
            AppointmentError::NotFound => write!(f, "Appointment not found"),
            AppointmentError::InvalidTargetStatus(status) => {
                write!(f, "Appointments cannot be moved to status '{}'", status)
            }
            AppointmentError::TransitionRejected(reason) => {
                write!(f, "Status update rejected: {}", reason)
            }
            AppointmentError::DataService(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for AppointmentError {}

impl From<DataServiceError> for AppointmentError {
    fn from(err: DataServiceError) -> Self {
        if err.is_conflict() {
            // The losing writer of a booking race gets the same outcome as a
            // failed client-side re-check.
            AppointmentError::SlotTaken
        } else {
            AppointmentError::DataService(err)
        }
    }
}

impl From<AppointmentError> for shared_models::error::AppError {
    fn from(err: AppointmentError) -> Self {
        use shared_models::error::AppError;
        match err {
            AppointmentError::Validation(msg) => AppError::ValidationError(msg),
            AppointmentError::SlotTaken => {
                AppError::Conflict("The selected time is no longer available".to_string())
            }
            AppointmentError::NotFound => AppError::NotFound("Appointment not found".to_string()),
            AppointmentError::InvalidTargetStatus(_) => AppError::BadRequest(err.to_string()),
            AppointmentError::TransitionRejected(_) => AppError::BadRequest(err.to_string()),
            AppointmentError::DataService(inner) => inner.into(),
        }
    }
}
