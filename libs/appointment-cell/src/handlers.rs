use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query, State},
    Json,
};
use serde_json::{json, Value};
use uuid::Uuid;

use shared_config::AppConfig;
use shared_models::auth::AdminSession;
use shared_models::error::AppError;

use crate::models::{
    AppointmentSearchQuery, BookAppointmentRequest, CreatedBy,
    ManualAppointmentRequest, StatusTransitionRequest,
};
use crate::services::{
    booking::BookingService,
    patients::PatientDirectoryService,
    status::StatusTransitionService,
};

// ==============================================================================
// PUBLIC HANDLERS (NO AUTHENTICATION REQUIRED)
// ==============================================================================

#[axum::debug_handler]
pub async fn book_appointment_public(
    State(state): State<Arc<AppConfig>>,
    Json(request): Json<BookAppointmentRequest>,
) -> Result<Json<Value>, AppError> {
    let booking_service = BookingService::new(&state);

    let appointment = booking_service.book_web(request).await?;

    Ok(Json(json!({
        "appointment": appointment,
        "message": "Appointment received. You will be called shortly to confirm."
    })))
}

// ==============================================================================
// PROTECTED APPOINTMENT HANDLERS
// ==============================================================================

#[axum::debug_handler]
pub async fn list_appointments(
    State(state): State<Arc<AppConfig>>,
    Query(query): Query<AppointmentSearchQuery>,
    Extension(_session): Extension<AdminSession>,
) -> Result<Json<Value>, AppError> {
    let booking_service = BookingService::new(&state);

    let appointments = booking_service.list_appointments(query).await?;

    Ok(Json(json!({
        "appointments": appointments,
        "total": appointments.len()
    })))
}

#[axum::debug_handler]
pub async fn get_appointment(
    State(state): State<Arc<AppConfig>>,
    Path(appointment_id): Path<Uuid>,
    Extension(_session): Extension<AdminSession>,
) -> Result<Json<Value>, AppError> {
    let booking_service = BookingService::new(&state);

    let appointment = booking_service.get_appointment(appointment_id).await?;

    Ok(Json(json!(appointment)))
}

#[axum::debug_handler]
pub async fn create_manual_appointment(
    State(state): State<Arc<AppConfig>>,
    Extension(session): Extension<AdminSession>,
    Json(request): Json<ManualAppointmentRequest>,
) -> Result<Json<Value>, AppError> {
    let booking_service = BookingService::new(&state);

    let created_by = if session.role == "doctor" {
        CreatedBy::Doctor
    } else {
        CreatedBy::Admin
    };

    let appointment = booking_service.book_manual(request, created_by).await?;

    Ok(Json(json!(appointment)))
}

#[axum::debug_handler]
pub async fn transition_status(
    State(state): State<Arc<AppConfig>>,
    Path(appointment_id): Path<Uuid>,
    Extension(_session): Extension<AdminSession>,
    Json(request): Json<StatusTransitionRequest>,
) -> Result<Json<Value>, AppError> {
    let transition_service = StatusTransitionService::new(&state);

    let outcome = transition_service.transition(appointment_id, request.status).await?;

    Ok(Json(json!(outcome)))
}

#[axum::debug_handler]
pub async fn list_patients(
    State(state): State<Arc<AppConfig>>,
    Extension(_session): Extension<AdminSession>,
) -> Result<Json<Value>, AppError> {
    let directory_service = PatientDirectoryService::new(&state);

    let patients = directory_service.list_patients().await?;

    Ok(Json(json!({
        "patients": patients,
        "total": patients.len()
    })))
}
