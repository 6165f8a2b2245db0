use std::sync::Arc;

use axum::{
    extract::{Path, Query, State, Extension},
    Json,
};
use axum_extra::TypedHeader;
use headers::{Authorization, authorization::Bearer};
use serde::Deserialize;
use serde_json::{json, Value};
use chrono::NaiveDate;

use shared_config::AppConfig;
use shared_models::auth::User;
use shared_models::error::AppError;

use crate::services::{
    doctor::DoctorService,
    availability::AvailabilityService,
};
use crate::models::{
    CreateDoctorRequest, UpdateDoctorRequest, ReplaceAvailabilityRequest, DoctorError,
};

#[derive(Debug, Deserialize)]
pub struct SlotsQuery {
    pub date: NaiveDate,
}

// Validation failures surface as 400s with the service's wording; anything
// else is an upstream failure.
fn map_service_error(e: anyhow::Error) -> AppError {
    if let Some(doctor_error) = e.downcast_ref::<DoctorError>() {
        AppError::BadRequest(doctor_error.to_string())
    } else {
        AppError::Internal(e.to_string())
    }
}

// ==============================================================================
// PUBLIC HANDLERS (NO AUTHENTICATION REQUIRED)
// ==============================================================================

#[axum::debug_handler]
pub async fn list_doctors(
    State(state): State<Arc<AppConfig>>,
) -> Result<Json<Value>, AppError> {
    let doctor_service = DoctorService::new(&state);

    let doctors = doctor_service.list_doctors().await
        .map_err(|e| AppError::Internal(e.to_string()))?;

    Ok(Json(json!({
        "doctors": doctors,
        "total": doctors.len()
    })))
}

#[axum::debug_handler]
pub async fn get_doctor(
    State(state): State<Arc<AppConfig>>,
    Path(doctor_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let doctor_service = DoctorService::new(&state);

    let doctor = doctor_service.get_doctor(&doctor_id).await
        .map_err(|_| AppError::NotFound("Doctor not found".to_string()))?;

    Ok(Json(json!(doctor)))
}

// ==============================================================================
// PROTECTED DOCTOR PROFILE HANDLERS
// ==============================================================================

#[axum::debug_handler]
pub async fn create_doctor(
    State(state): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
    Json(request): Json<CreateDoctorRequest>,
) -> Result<Json<Value>, AppError> {
    let token = auth.token();

    // Only admins can create doctor profiles
    if user.role.as_deref() != Some("admin") {
        return Err(AppError::Auth("Only administrators can create doctor profiles".to_string()));
    }

    let doctor_service = DoctorService::new(&state);

    let doctor = doctor_service.create_doctor(request, token).await
        .map_err(map_service_error)?;

    Ok(Json(json!(doctor)))
}

#[axum::debug_handler]
pub async fn update_doctor(
    State(state): State<Arc<AppConfig>>,
    Path(doctor_id): Path<String>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
    Json(request): Json<UpdateDoctorRequest>,
) -> Result<Json<Value>, AppError> {
    let token = auth.token();

    // Doctors may edit their own profile; admins may edit any
    if user.id != doctor_id && user.role.as_deref() != Some("admin") {
        return Err(AppError::Auth("Not authorized to update this doctor profile".to_string()));
    }

    let doctor_service = DoctorService::new(&state);

    let doctor = doctor_service.update_doctor(&doctor_id, request, token).await
        .map_err(map_service_error)?;

    Ok(Json(json!(doctor)))
}

// ==============================================================================
// AVAILABILITY HANDLERS
// ==============================================================================

#[axum::debug_handler]
pub async fn get_doctor_availability(
    State(state): State<Arc<AppConfig>>,
    Path(doctor_id): Path<String>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
) -> Result<Json<Value>, AppError> {
    let availability_service = AvailabilityService::new(&state);

    let availability = availability_service
        .get_doctor_availability(&doctor_id, auth.token()).await
        .map_err(|e| AppError::Internal(e.to_string()))?;

    Ok(Json(json!(availability)))
}

#[axum::debug_handler]
pub async fn replace_availability(
    State(state): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
    Json(request): Json<ReplaceAvailabilityRequest>,
) -> Result<Json<Value>, AppError> {
    // Doctors replace their own schedule; the path carries no id on purpose
    if !user.is_doctor() {
        return Err(AppError::Auth("Only doctors can set availability".to_string()));
    }

    let availability_service = AvailabilityService::new(&state);

    let availability = availability_service
        .replace_availability(&user.id, request, auth.token()).await
        .map_err(map_service_error)?;

    Ok(Json(json!({
        "availability": availability,
        "total": availability.len()
    })))
}

#[axum::debug_handler]
pub async fn get_bookable_slots(
    State(state): State<Arc<AppConfig>>,
    Path(doctor_id): Path<String>,
    Query(query): Query<SlotsQuery>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
) -> Result<Json<Value>, AppError> {
    let availability_service = AvailabilityService::new(&state);

    let response = availability_service
        .get_bookable_slots(&doctor_id, query.date, auth.token()).await
        .map_err(|e| AppError::Internal(e.to_string()))?;

    Ok(Json(json!(response)))
}

#[axum::debug_handler]
pub async fn get_bookable_days(
    State(state): State<Arc<AppConfig>>,
    Path(doctor_id): Path<String>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
) -> Result<Json<Value>, AppError> {
    let availability_service = AvailabilityService::new(&state);

    let days = availability_service
        .get_bookable_days(&doctor_id, auth.token()).await
        .map_err(|e| AppError::Internal(e.to_string()))?;

    Ok(Json(json!({
        "doctor_id": doctor_id,
        "bookable_days": days
    })))
}
