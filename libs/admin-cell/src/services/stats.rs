use anyhow::Result;
use reqwest::Method;
use serde_json::Value;
use tracing::debug;

use shared_config::AppConfig;
use shared_database::supabase::SupabaseClient;

use crate::models::{PlatformStats, RecentUser, RoleCount, StatusCount};

const APPOINTMENT_STATUSES: [&str; 4] = ["pending", "approved", "rejected", "completed"];

pub struct AdminStatsService {
    supabase: SupabaseClient,
}

impl AdminStatsService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
        }
    }

    /// Aggregate platform counters. Each figure is an exact count query;
    /// none of the underlying rows are fetched.
    pub async fn get_platform_stats(&self, auth_token: &str) -> Result<PlatformStats> {
        debug!("Computing platform statistics");

        let doctors = self.supabase.count("/rest/v1/doctors", Some(auth_token)).await?;
        let patients = self.supabase.count("/rest/v1/patients", Some(auth_token)).await?;
        let appointments = self.supabase.count("/rest/v1/appointments", Some(auth_token)).await?;

        let mut appointments_by_status = Vec::new();
        for status in APPOINTMENT_STATUSES {
            let count = self.supabase.count(
                &format!("/rest/v1/appointments?status=eq.{}", status),
                Some(auth_token),
            ).await?;
            appointments_by_status.push(StatusCount {
                status: status.to_string(),
                count,
            });
        }

        let pending_appointments = appointments_by_status
            .iter()
            .find(|entry| entry.status == "pending")
            .map(|entry| entry.count)
            .unwrap_or(0);

        let recent_path =
            "/rest/v1/patients?select=id,full_name,email,created_at&order=created_at.desc&limit=5";
        let recent_rows: Vec<Value> = self.supabase.request(
            Method::GET,
            recent_path,
            Some(auth_token),
            None,
        ).await?;

        let recent_users: Vec<RecentUser> = recent_rows.into_iter()
            .map(serde_json::from_value)
            .collect::<std::result::Result<Vec<RecentUser>, _>>()?;

        Ok(PlatformStats {
            total_users: doctors + patients,
            doctors,
            patients,
            appointments,
            pending_appointments,
            users_by_role: vec![
                RoleCount { role: "doctor".to_string(), count: doctors },
                RoleCount { role: "patient".to_string(), count: patients },
            ],
            appointments_by_status,
            recent_users,
        })
    }
}
