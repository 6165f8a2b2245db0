use anyhow::{Result, anyhow};
use reqwest::Method;
use serde_json::{json, Value};
use tracing::{debug, info};
use chrono::Utc;

use shared_config::AppConfig;
use shared_database::supabase::SupabaseClient;

use crate::models::{UpdateUserStatusRequest, UserSummary};

pub struct UserAdministrationService {
    supabase: SupabaseClient,
}

impl UserAdministrationService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
        }
    }

    /// Doctors and patients merged into one directory, newest first.
    pub async fn list_users(&self, auth_token: &str) -> Result<Vec<UserSummary>> {
        debug!("Listing platform users");

        let doctors = self.fetch_role("doctors", "doctor", auth_token).await?;
        let patients = self.fetch_role("patients", "patient", auth_token).await?;

        let mut users = doctors;
        users.extend(patients);
        users.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        Ok(users)
    }

    /// Activate or deactivate an account. The role picks the table; a
    /// deactivated account stays out of the public directory.
    pub async fn update_user_status(
        &self,
        user_id: &str,
        request: UpdateUserStatusRequest,
        auth_token: &str,
    ) -> Result<UserSummary> {
        let table = match request.role.as_str() {
            "doctor" => "doctors",
            "patient" => "patients",
            other => return Err(anyhow!("Unknown role: {}", other)),
        };

        let path = format!("/rest/v1/{}?id=eq.{}", table, user_id);
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert("Prefer", reqwest::header::HeaderValue::from_static("return=representation"));

        let result: Vec<Value> = self.supabase.request_with_headers(
            Method::PATCH,
            &path,
            Some(auth_token),
            Some(json!({
                "is_active": request.is_active,
                "updated_at": Utc::now().to_rfc3339()
            })),
            Some(headers),
        ).await?;

        if result.is_empty() {
            return Err(anyhow!("User not found"));
        }

        let mut row = result[0].clone();
        row["role"] = json!(request.role);
        let user: UserSummary = serde_json::from_value(row)?;

        info!("User {} ({}) set to is_active={}", user_id, request.role, request.is_active);
        Ok(user)
    }

    async fn fetch_role(
        &self,
        table: &str,
        role: &str,
        auth_token: &str,
    ) -> Result<Vec<UserSummary>> {
        let path = format!(
            "/rest/v1/{}?select=id,full_name,email,is_active,created_at&order=created_at.desc",
            table
        );
        let result: Vec<Value> = self.supabase.request(
            Method::GET,
            &path,
            Some(auth_token),
            None,
        ).await?;

        result.into_iter()
            .map(|mut row| {
                row["role"] = json!(role);
                serde_json::from_value(row).map_err(Into::into)
            })
            .collect()
    }
}
