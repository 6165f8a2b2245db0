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

use crate::models::{AppointmentError, BookAppointmentRequest, UpdateStatusRequest};
use crate::services::booking::AppointmentBookingService;

fn map_booking_error(e: AppointmentError) -> AppError {
    match e {
        AppointmentError::MissingFields | AppointmentError::SlotUnavailable => {
            AppError::ValidationError(e.to_string())
        }
        AppointmentError::AlreadyBooked => AppError::Conflict(e.to_string()),
        AppointmentError::NotFound => AppError::NotFound(e.to_string()),
        AppointmentError::InvalidTransition(_, _) => AppError::BadRequest(e.to_string()),
        AppointmentError::Store(msg) => AppError::Internal(msg),
    }
}

#[axum::debug_handler]
pub async fn book_appointment(
    State(state): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
    Json(request): Json<BookAppointmentRequest>,
) -> Result<Json<Value>, AppError> {
    // Bookings are made by the authenticated patient; the identity comes
    // from the token, never from the request body.
    if user.is_doctor() || user.is_admin() {
        return Err(AppError::Auth("Only patients can book appointments".to_string()));
    }

    let booking_service = AppointmentBookingService::new(&state);

    let appointment = booking_service.book_appointment(&user, request, auth.token()).await
        .map_err(map_booking_error)?;

    Ok(Json(json!(appointment)))
}

#[axum::debug_handler]
pub async fn list_appointments(
    State(state): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
) -> Result<Json<Value>, AppError> {
    let booking_service = AppointmentBookingService::new(&state);

    let appointments = booking_service.list_for_user(&user, auth.token()).await
        .map_err(map_booking_error)?;

    Ok(Json(json!({
        "appointments": appointments,
        "total": appointments.len()
    })))
}

#[axum::debug_handler]
pub async fn get_appointment(
    State(state): State<Arc<AppConfig>>,
    Path(appointment_id): Path<String>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
) -> Result<Json<Value>, AppError> {
    let booking_service = AppointmentBookingService::new(&state);

    let appointment = booking_service.get_appointment(&appointment_id, auth.token()).await
        .map_err(map_booking_error)?;

    // Participants and admins only
    let is_participant = appointment.patient_id.to_string() == user.id
        || appointment.doctor_id.to_string() == user.id;
    if !is_participant && !user.is_admin() {
        return Err(AppError::Auth("Not authorized to view this appointment".to_string()));
    }

    Ok(Json(json!(appointment)))
}

#[axum::debug_handler]
pub async fn update_appointment_status(
    State(state): State<Arc<AppConfig>>,
    Path(appointment_id): Path<String>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
    Json(request): Json<UpdateStatusRequest>,
) -> Result<Json<Value>, AppError> {
    if !user.is_doctor() && !user.is_admin() {
        return Err(AppError::Auth("Only doctors can update appointment status".to_string()));
    }

    let booking_service = AppointmentBookingService::new(&state);

    // A doctor may only decide their own appointments
    if user.is_doctor() {
        let current = booking_service.get_appointment(&appointment_id, auth.token()).await
            .map_err(map_booking_error)?;
        if current.doctor_id.to_string() != user.id {
            return Err(AppError::Auth("Not authorized to update this appointment".to_string()));
        }
    }

    let appointment = booking_service
        .update_status(&appointment_id, request, auth.token()).await
        .map_err(map_booking_error)?;

    Ok(Json(json!(appointment)))
}
