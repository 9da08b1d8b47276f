use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query, State},
    Json,
};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use shared_config::AppConfig;
use shared_models::auth::AdminSession;
use shared_models::error::AppError;

use crate::models::{CreateDoctorRequest, UpdateDoctorRequest};
use crate::services::{
    availability::AvailabilityService,
    doctor::DoctorService,
};

#[derive(Debug, Deserialize)]
pub struct SlotQuery {
    pub date: NaiveDate,
}

#[derive(Debug, Deserialize)]
pub struct DoctorListQuery {
    pub include_inactive: Option<bool>,
}

// ==============================================================================
// PUBLIC HANDLERS (NO AUTHENTICATION REQUIRED)
// ==============================================================================

#[axum::debug_handler]
pub async fn list_doctors_public(
    State(state): State<Arc<AppConfig>>,
) -> Result<Json<Value>, AppError> {
    let doctor_service = DoctorService::new(&state);

    // The public booking form only ever sees doctors accepting appointments.
    let doctors = doctor_service.list_doctors(true).await?;

    Ok(Json(json!({
        "doctors": doctors,
        "total": doctors.len()
    })))
}

#[axum::debug_handler]
pub async fn get_doctor_public(
    State(state): State<Arc<AppConfig>>,
    Path(doctor_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let doctor_service = DoctorService::new(&state);

    let doctor = doctor_service.get_doctor(doctor_id).await?;

    Ok(Json(json!(doctor)))
}

#[axum::debug_handler]
pub async fn get_day_slots_public(
    State(state): State<Arc<AppConfig>>,
    Path(doctor_id): Path<Uuid>,
    Query(query): Query<SlotQuery>,
) -> Result<Json<Value>, AppError> {
    let availability_service = AvailabilityService::new(&state);

    let day = availability_service.get_day_slots(doctor_id, query.date).await?;

    Ok(Json(json!(day)))
}

// ==============================================================================
// PROTECTED DOCTOR MANAGEMENT HANDLERS
// ==============================================================================

#[axum::debug_handler]
pub async fn list_doctors(
    State(state): State<Arc<AppConfig>>,
    Query(query): Query<DoctorListQuery>,
    Extension(_session): Extension<AdminSession>,
) -> Result<Json<Value>, AppError> {
    let doctor_service = DoctorService::new(&state);

    let active_only = !query.include_inactive.unwrap_or(false);
    let doctors = doctor_service.list_doctors(active_only).await?;

    Ok(Json(json!({
        "doctors": doctors,
        "total": doctors.len()
    })))
}

#[axum::debug_handler]
pub async fn create_doctor(
    State(state): State<Arc<AppConfig>>,
    Extension(session): Extension<AdminSession>,
    Json(request): Json<CreateDoctorRequest>,
) -> Result<Json<Value>, AppError> {
    if !session.is_admin() {
        return Err(AppError::Auth("Only administrators can create doctor records".to_string()));
    }

    let doctor_service = DoctorService::new(&state);

    let doctor = doctor_service.create_doctor(request).await?;

    Ok(Json(json!(doctor)))
}

#[axum::debug_handler]
pub async fn update_doctor(
    State(state): State<Arc<AppConfig>>,
    Path(doctor_id): Path<Uuid>,
    Extension(session): Extension<AdminSession>,
    Json(request): Json<UpdateDoctorRequest>,
) -> Result<Json<Value>, AppError> {
    // Admins manage every doctor; a doctor account may update its own record.
    let is_own_record = session.doctor_id == Some(doctor_id);
    if !session.is_admin() && !is_own_record {
        return Err(AppError::Auth("Not authorized to update this doctor record".to_string()));
    }

    let doctor_service = DoctorService::new(&state);

    let doctor = doctor_service.update_doctor(doctor_id, request).await?;

    Ok(Json(json!(doctor)))
}

#[axum::debug_handler]
pub async fn deactivate_doctor(
    State(state): State<Arc<AppConfig>>,
    Path(doctor_id): Path<Uuid>,
    Extension(session): Extension<AdminSession>,
) -> Result<Json<Value>, AppError> {
    if !session.is_admin() {
        return Err(AppError::Auth("Only administrators can deactivate doctors".to_string()));
    }

    let doctor_service = DoctorService::new(&state);

    let doctor = doctor_service.deactivate_doctor(doctor_id).await?;

    Ok(Json(json!({
        "doctor": doctor,
        "success": true
    })))
}
