use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc, NaiveTime};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Doctor {
    pub id: Uuid,
    pub full_name: String,
    pub email: String,
    pub specialization: String,
    pub bio: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateDoctorRequest {
    pub full_name: String,
    pub email: String,
    pub specialization: String,
    pub bio: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateDoctorRequest {
    pub full_name: Option<String>,
    pub specialization: Option<String>,
    pub bio: Option<String>,
    pub is_active: Option<bool>,
}

/// One weekly availability row: a single bookable window on one weekday.
/// One window per day is a structural invariant, not a convention; a
/// doctor's full schedule is at most seven of these.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DayAvailability {
    pub id: Uuid,
    pub doctor_id: Uuid,
    pub day: String,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One entry of a wholesale schedule replacement. Times arrive as the
/// client writes them: 24-hour "HH:MM" strings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvailabilityEntry {
    pub day: String,
    pub start_time: String,
    pub end_time: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplaceAvailabilityRequest {
    pub availability: Vec<AvailabilityEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookableSlotsResponse {
    pub doctor_id: Uuid,
    pub date: chrono::NaiveDate,
    pub eligible: bool,
    pub slots: Vec<String>,
}

// Error types specific to doctor operations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum DoctorError {
    NotFound,
    InvalidDay(String),
    InvalidTimeWindow(String),
    DuplicateDay(String),
    UnauthorizedAccess,
    ValidationError(String),
}

impl std::fmt::Display for DoctorError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DoctorError::NotFound => write!(f, "Doctor not found"),
            DoctorError::InvalidDay(day) => write!(f, "Unknown weekday: {}", day),
            DoctorError::InvalidTimeWindow(msg) => write!(f, "Invalid time window: {}", msg),
            DoctorError::DuplicateDay(day) => write!(f, "More than one window for {}", day),
            DoctorError::UnauthorizedAccess => write!(f, "Unauthorized access to doctor data"),
            DoctorError::ValidationError(msg) => write!(f, "Validation error: {}", msg),
        }
    }
}

impl std::error::Error for DoctorError {}
