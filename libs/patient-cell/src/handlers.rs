use std::sync::Arc;

use axum::{
    extract::{Path, State, Extension},
    Json,
};
use axum_extra::TypedHeader;
use headers::{Authorization, authorization::Bearer};
use serde_json::{json, Value};

use shared_config::AppConfig;
use shared_models::auth::User;
use shared_models::error::AppError;

use crate::models::{CreateMedicalRecordRequest, PatientError, SavePatientProfileRequest};
use crate::services::{patient::PatientService, records::MedicalRecordService};

fn map_service_error(e: anyhow::Error) -> AppError {
    if let Some(patient_error) = e.downcast_ref::<PatientError>() {
        match patient_error {
            PatientError::NotFound => AppError::NotFound(patient_error.to_string()),
            PatientError::UnauthorizedAccess => AppError::Auth(patient_error.to_string()),
            PatientError::ValidationError(_) => AppError::BadRequest(patient_error.to_string()),
        }
    } else {
        AppError::Internal(e.to_string())
    }
}

#[axum::debug_handler]
pub async fn get_my_profile(
    State(state): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
) -> Result<Json<Value>, AppError> {
    let patient_service = PatientService::new(&state);

    let patient = patient_service.get_patient(&user.id, auth.token()).await
        .map_err(map_service_error)?;

    Ok(Json(json!(patient)))
}

#[axum::debug_handler]
pub async fn save_my_profile(
    State(state): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
    Json(request): Json<SavePatientProfileRequest>,
) -> Result<Json<Value>, AppError> {
    let patient_service = PatientService::new(&state);

    let patient = patient_service.save_profile(&user.id, request, auth.token()).await
        .map_err(map_service_error)?;

    Ok(Json(json!(patient)))
}

#[axum::debug_handler]
pub async fn get_patient(
    State(state): State<Arc<AppConfig>>,
    Path(patient_id): Path<String>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
) -> Result<Json<Value>, AppError> {
    // A patient may read their own profile; care-side roles may read any
    if user.id != patient_id && !user.is_doctor() && !user.is_admin() {
        return Err(AppError::Auth("Not authorized to view this patient".to_string()));
    }

    let patient_service = PatientService::new(&state);

    let patient = patient_service.get_patient(&patient_id, auth.token()).await
        .map_err(map_service_error)?;

    Ok(Json(json!(patient)))
}

// ==============================================================================
// MEDICAL RECORD HANDLERS
// ==============================================================================

#[axum::debug_handler]
pub async fn create_medical_record(
    State(state): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
    Json(request): Json<CreateMedicalRecordRequest>,
) -> Result<Json<Value>, AppError> {
    if !user.is_doctor() {
        return Err(AppError::Auth("Only doctors can write medical records".to_string()));
    }

    let record_service = MedicalRecordService::new(&state);

    let record = record_service.create_record(&user.id, request, auth.token()).await
        .map_err(map_service_error)?;

    Ok(Json(json!(record)))
}

#[axum::debug_handler]
pub async fn list_medical_records(
    State(state): State<Arc<AppConfig>>,
    Path(patient_id): Path<String>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
) -> Result<Json<Value>, AppError> {
    if user.id != patient_id && !user.is_doctor() && !user.is_admin() {
        return Err(AppError::Auth("Not authorized to view these medical records".to_string()));
    }

    let record_service = MedicalRecordService::new(&state);

    let records = record_service.list_for_patient(&patient_id, auth.token()).await
        .map_err(map_service_error)?;

    Ok(Json(json!({
        "records": records,
        "total": records.len()
    })))
}
