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

use crate::models::UploadReportRequest;
use crate::services::report::ReportService;

#[axum::debug_handler]
pub async fn upload_report(
    State(state): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
    Json(request): Json<UploadReportRequest>,
) -> Result<Json<Value>, AppError> {
    // Patients upload their own reports
    if user.is_doctor() || user.is_admin() {
        return Err(AppError::Auth("Only patients can upload reports".to_string()));
    }

    let report_service = ReportService::new(&state);

    let report = report_service.upload_report(&user.id, request, auth.token()).await
        .map_err(|e| AppError::Internal(e.to_string()))?;

    Ok(Json(json!(report)))
}

#[axum::debug_handler]
pub async fn list_reports(
    State(state): State<Arc<AppConfig>>,
    Path(patient_id): Path<String>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
) -> Result<Json<Value>, AppError> {
    if user.id != patient_id && !user.is_doctor() && !user.is_admin() {
        return Err(AppError::Auth("Not authorized to view these reports".to_string()));
    }

    let report_service = ReportService::new(&state);

    let reports = report_service.list_for_patient(&patient_id, auth.token()).await
        .map_err(|e| AppError::Internal(e.to_string()))?;

    Ok(Json(json!({
        "reports": reports,
        "total": reports.len()
    })))
}
