use anyhow::{Result, anyhow};
use reqwest::Method;
use serde_json::{json, Value};
use tracing::debug;
use chrono::Utc;

use shared_config::AppConfig;
use shared_database::supabase::SupabaseClient;

use crate::models::{CreateMedicalRecordRequest, MedicalRecord, PatientError};

pub struct MedicalRecordService {
    supabase: SupabaseClient,
}

impl MedicalRecordService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
        }
    }

    /// Add an entry to a patient's medical history. Authorship is the
    /// authenticated doctor, taken from the session, never the body.
    pub async fn create_record(
        &self,
        doctor_id: &str,
        request: CreateMedicalRecordRequest,
        auth_token: &str,
    ) -> Result<MedicalRecord> {
        debug!(
            "Creating medical record for patient {} by doctor {}",
            request.patient_id, doctor_id
        );

        if request.diagnosis.trim().is_empty() {
            return Err(PatientError::ValidationError("Diagnosis cannot be empty".to_string()).into());
        }

        let record_data = json!({
            "patient_id": request.patient_id,
            "doctor_id": doctor_id,
            "diagnosis": request.diagnosis,
            "prescription": request.prescription,
            "notes": request.notes,
            "created_at": Utc::now().to_rfc3339()
        });

        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert("Prefer", reqwest::header::HeaderValue::from_static("return=representation"));

        let result: Vec<Value> = self.supabase.request_with_headers(
            Method::POST,
            "/rest/v1/medical_records",
            Some(auth_token),
            Some(record_data),
            Some(headers),
        ).await?;

        if result.is_empty() {
            return Err(anyhow!("Failed to create medical record"));
        }

        let record: MedicalRecord = serde_json::from_value(result[0].clone())?;
        Ok(record)
    }

    pub async fn list_for_patient(
        &self,
        patient_id: &str,
        auth_token: &str,
    ) -> Result<Vec<MedicalRecord>> {
        debug!("Listing medical records for patient: {}", patient_id);

        let path = format!(
            "/rest/v1/medical_records?patient_id=eq.{}&order=created_at.desc",
            patient_id
        );
        let result: Vec<Value> = self.supabase.request(
            Method::GET,
            &path,
            Some(auth_token),
            None,
        ).await?;

        let records: Vec<MedicalRecord> = result.into_iter()
            .map(serde_json::from_value)
            .collect::<std::result::Result<Vec<MedicalRecord>, _>>()?;

        Ok(records)
    }
}
