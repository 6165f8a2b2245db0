use anyhow::{Result, anyhow};
use reqwest::Method;
use serde_json::{json, Value};
use tracing::debug;
use chrono::Utc;

use shared_config::AppConfig;
use shared_database::supabase::SupabaseClient;

use crate::models::{Patient, PatientError, SavePatientProfileRequest};

pub struct PatientService {
    supabase: SupabaseClient,
}

impl PatientService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
        }
    }

    pub async fn get_patient(
        &self,
        patient_id: &str,
        auth_token: &str,
    ) -> Result<Patient> {
        debug!("Fetching patient profile: {}", patient_id);

        let path = format!("/rest/v1/patients?id=eq.{}", patient_id);
        let result: Vec<Value> = self.supabase.request(
            Method::GET,
            &path,
            Some(auth_token),
            None,
        ).await?;

        if result.is_empty() {
            return Err(PatientError::NotFound.into());
        }

        let patient: Patient = serde_json::from_value(result[0].clone())?;
        Ok(patient)
    }

    /// Save the caller's profile. The row id is the authenticated user
    /// id, so the first save inserts and later saves update in place.
    pub async fn save_profile(
        &self,
        user_id: &str,
        request: SavePatientProfileRequest,
        auth_token: &str,
    ) -> Result<Patient> {
        debug!("Saving patient profile for user: {}", user_id);

        if request.full_name.trim().is_empty() {
            return Err(PatientError::ValidationError("Name cannot be empty".to_string()).into());
        }

        let existing_path = format!("/rest/v1/patients?id=eq.{}", user_id);
        let existing: Vec<Value> = self.supabase.request(
            Method::GET,
            &existing_path,
            Some(auth_token),
            None,
        ).await?;

        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert("Prefer", reqwest::header::HeaderValue::from_static("return=representation"));

        let result: Vec<Value> = if existing.is_empty() {
            let patient_data = json!({
                "id": user_id,
                "full_name": request.full_name,
                "email": request.email,
                "phone": request.phone,
                "date_of_birth": request.date_of_birth,
                "is_active": true,
                "created_at": Utc::now().to_rfc3339(),
                "updated_at": Utc::now().to_rfc3339()
            });

            self.supabase.request_with_headers(
                Method::POST,
                "/rest/v1/patients",
                Some(auth_token),
                Some(patient_data),
                Some(headers),
            ).await?
        } else {
            let patient_data = json!({
                "full_name": request.full_name,
                "email": request.email,
                "phone": request.phone,
                "date_of_birth": request.date_of_birth,
                "updated_at": Utc::now().to_rfc3339()
            });

            self.supabase.request_with_headers(
                Method::PATCH,
                &existing_path,
                Some(auth_token),
                Some(patient_data),
                Some(headers),
            ).await?
        };

        if result.is_empty() {
            return Err(anyhow!("Failed to save patient profile"));
        }

        let patient: Patient = serde_json::from_value(result[0].clone())?;
        debug!("Patient profile saved for {}", patient.id);

        Ok(patient)
    }
}
