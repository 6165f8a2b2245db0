use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc, NaiveDate};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Patient {
    pub id: Uuid,
    pub full_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Patient {
    pub fn age(&self) -> Option<i32> {
        let today = Utc::now().date_naive();
        self.date_of_birth
            .and_then(|dob| today.years_since(dob))
            .map(|years| years as i32)
    }
}

/// Profile save: creates the row on first submission, updates it after.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavePatientProfileRequest {
    pub full_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
}

/// Doctor-authored entry in a patient's medical history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MedicalRecord {
    pub id: Uuid,
    pub patient_id: Uuid,
    pub doctor_id: Uuid,
    pub diagnosis: String,
    pub prescription: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateMedicalRecordRequest {
    pub patient_id: Uuid,
    pub diagnosis: String,
    pub prescription: Option<String>,
    pub notes: Option<String>,
}

// Error types specific to patient operations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum PatientError {
    NotFound,
    UnauthorizedAccess,
    ValidationError(String),
}

impl std::fmt::Display for PatientError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PatientError::NotFound => write!(f, "Patient not found"),
            PatientError::UnauthorizedAccess => write!(f, "Unauthorized access to patient data"),
            PatientError::ValidationError(msg) => write!(f, "Validation error: {}", msg),
        }
    }
}

impl std::error::Error for PatientError {}
