use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};

/// Stored metadata for an uploaded report. The bytes live in object
/// storage; only the public URL is kept here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MedicalReport {
    pub id: Uuid,
    pub patient_id: Uuid,
    pub title: String,
    pub file_url: String,
    pub file_type: String,
    pub uploaded_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadReportRequest {
    pub title: String,
    /// Base64 payload, with or without a data-URL prefix.
    pub file_data: String,
    pub file_type: String,
}
