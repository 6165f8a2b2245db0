use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc, NaiveDate};
use std::fmt;

// ==============================================================================
// CORE APPOINTMENT MODELS
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Appointment {
    pub id: Uuid,
    pub patient_id: Uuid,
    pub doctor_id: Uuid,
    pub appointment_date: NaiveDate,
    pub time_label: String,
    pub status: AppointmentStatus,
    pub patient_notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AppointmentStatus {
    Pending,
    Approved,
    Rejected,
    Completed,
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppointmentStatus::Pending => write!(f, "pending"),
            AppointmentStatus::Approved => write!(f, "approved"),
            AppointmentStatus::Rejected => write!(f, "rejected"),
            AppointmentStatus::Completed => write!(f, "completed"),
        }
    }
}

/// Booking submission. Fields are optional on purpose: presence is the
/// admission check's first gate, and a partial submission must come back
/// as a validation error rather than a deserialization failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookAppointmentRequest {
    pub doctor_id: Option<Uuid>,
    pub date: Option<NaiveDate>,
    pub time: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: AppointmentStatus,
}

/// Slim identity card embedded in appointment listings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PartySummary {
    pub id: Uuid,
    pub full_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub specialization: Option<String>,
}

/// Appointment with both parties resolved, as dashboards consume it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppointmentView {
    pub id: Uuid,
    pub appointment_date: NaiveDate,
    pub time_label: String,
    pub status: AppointmentStatus,
    pub doctor: Option<PartySummary>,
    pub patient: Option<PartySummary>,
    pub patient_notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

// Error types specific to appointment operations
#[derive(Debug)]
pub enum AppointmentError {
    MissingFields,
    SlotUnavailable,
    AlreadyBooked,
    NotFound,
    InvalidTransition(AppointmentStatus, AppointmentStatus),
    Store(String),
}

impl fmt::Display for AppointmentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppointmentError::MissingFields => write!(f, "Doctor, date and time are required"),
            AppointmentError::SlotUnavailable => write!(f, "The selected time is not available"),
            AppointmentError::AlreadyBooked => write!(f, "This time slot is already booked"),
            AppointmentError::NotFound => write!(f, "Appointment not found"),
            AppointmentError::InvalidTransition(from, to) => {
                write!(f, "Cannot move appointment from {} to {}", from, to)
            }
            AppointmentError::Store(msg) => write!(f, "Appointment store error: {}", msg),
        }
    }
}

impl std::error::Error for AppointmentError {}

impl From<anyhow::Error> for AppointmentError {
    fn from(err: anyhow::Error) -> Self {
        AppointmentError::Store(err.to_string())
    }
}
