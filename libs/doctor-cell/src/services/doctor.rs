use anyhow::{Result, anyhow};
use reqwest::Method;
use serde_json::{json, Value};
use tracing::debug;
use chrono::Utc;

use shared_config::AppConfig;
use shared_database::supabase::SupabaseClient;

use crate::models::{Doctor, CreateDoctorRequest, UpdateDoctorRequest};

pub struct DoctorService {
    supabase: SupabaseClient,
}

impl DoctorService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
        }
    }

    /// Public doctor directory: active doctors only, ordered by name.
    pub async fn list_doctors(&self) -> Result<Vec<Doctor>> {
        debug!("Listing active doctors");

        let path = "/rest/v1/doctors?is_active=eq.true&order=full_name.asc";
        let result: Vec<Value> = self.supabase.request(
            Method::GET,
            path,
            None,
            None,
        ).await?;

        let doctors: Vec<Doctor> = result.into_iter()
            .map(serde_json::from_value)
            .collect::<std::result::Result<Vec<Doctor>, _>>()?;

        Ok(doctors)
    }

    pub async fn get_doctor(&self, doctor_id: &str) -> Result<Doctor> {
        debug!("Fetching doctor: {}", doctor_id);

        let path = format!("/rest/v1/doctors?id=eq.{}", doctor_id);
        let result: Vec<Value> = self.supabase.request(
            Method::GET,
            &path,
            None,
            None,
        ).await?;

        if result.is_empty() {
            return Err(anyhow!("Doctor not found"));
        }

        let doctor: Doctor = serde_json::from_value(result[0].clone())?;
        Ok(doctor)
    }

    pub async fn create_doctor(
        &self,
        request: CreateDoctorRequest,
        auth_token: &str,
    ) -> Result<Doctor> {
        debug!("Creating doctor profile for {}", request.email);

        if request.full_name.trim().is_empty() {
            return Err(anyhow!("Doctor name cannot be empty"));
        }
        if request.specialization.trim().is_empty() {
            return Err(anyhow!("Specialization cannot be empty"));
        }

        let doctor_data = json!({
            "full_name": request.full_name,
            "email": request.email,
            "specialization": request.specialization,
            "bio": request.bio,
            "is_active": true,
            "created_at": Utc::now().to_rfc3339(),
            "updated_at": Utc::now().to_rfc3339()
        });

        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert("Prefer", reqwest::header::HeaderValue::from_static("return=representation"));

        let result: Vec<Value> = self.supabase.request_with_headers(
            Method::POST,
            "/rest/v1/doctors",
            Some(auth_token),
            Some(doctor_data),
            Some(headers),
        ).await?;

        if result.is_empty() {
            return Err(anyhow!("Failed to create doctor profile"));
        }

        let doctor: Doctor = serde_json::from_value(result[0].clone())?;
        debug!("Doctor profile created with ID: {}", doctor.id);

        Ok(doctor)
    }

    pub async fn update_doctor(
        &self,
        doctor_id: &str,
        request: UpdateDoctorRequest,
        auth_token: &str,
    ) -> Result<Doctor> {
        debug!("Updating doctor: {}", doctor_id);

        let mut update_data = serde_json::Map::new();

        if let Some(full_name) = request.full_name {
            update_data.insert("full_name".to_string(), json!(full_name));
        }
        if let Some(specialization) = request.specialization {
            update_data.insert("specialization".to_string(), json!(specialization));
        }
        if let Some(bio) = request.bio {
            update_data.insert("bio".to_string(), json!(bio));
        }
        if let Some(is_active) = request.is_active {
            update_data.insert("is_active".to_string(), json!(is_active));
        }

        update_data.insert("updated_at".to_string(), json!(Utc::now().to_rfc3339()));

        let path = format!("/rest/v1/doctors?id=eq.{}", doctor_id);
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert("Prefer", reqwest::header::HeaderValue::from_static("return=representation"));

        let result: Vec<Value> = self.supabase.request_with_headers(
            Method::PATCH,
            &path,
            Some(auth_token),
            Some(Value::Object(update_data)),
            Some(headers),
        ).await?;

        if result.is_empty() {
            return Err(anyhow!("Failed to update doctor profile"));
        }

        let doctor: Doctor = serde_json::from_value(result[0].clone())?;
        Ok(doctor)
    }
}
