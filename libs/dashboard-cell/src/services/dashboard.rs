use anyhow::Result;
use chrono::Utc;
use reqwest::Method;
use serde_json::Value;
use tracing::debug;

use shared_config::AppConfig;
use shared_database::supabase::SupabaseClient;
use shared_models::auth::{User, UserRole};

use crate::models::{
    AdminDashboard, AppointmentBrief, DashboardView, DoctorDashboard, PatientDashboard,
};

pub struct DashboardService {
    supabase: SupabaseClient,
}

impl DashboardService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
        }
    }

    /// Compose the dashboard for whoever is asking. The role decides the
    /// variant; the data is a handful of count queries.
    pub async fn compose_for(&self, user: &User, auth_token: &str) -> Result<DashboardView> {
        debug!("Composing {} dashboard for user {}", user.platform_role().as_str(), user.id);

        match user.platform_role() {
            UserRole::Patient => self.patient_view(&user.id, auth_token).await,
            UserRole::Doctor => self.doctor_view(&user.id, auth_token).await,
            UserRole::Admin => self.admin_view(auth_token).await,
        }
    }

    async fn patient_view(&self, patient_id: &str, auth_token: &str) -> Result<DashboardView> {
        let today = Utc::now().date_naive();

        let upcoming = self.supabase.count(
            &format!(
                "/rest/v1/appointments?patient_id=eq.{}&appointment_date=gte.{}&status=neq.rejected",
                patient_id, today
            ),
            Some(auth_token),
        ).await?;

        let pending = self.supabase.count(
            &format!("/rest/v1/appointments?patient_id=eq.{}&status=eq.pending", patient_id),
            Some(auth_token),
        ).await?;

        let next_path = format!(
            "/rest/v1/appointments?patient_id=eq.{}&appointment_date=gte.{}&status=neq.rejected&select=appointment_date,time_label,status&order=appointment_date.asc&limit=1",
            patient_id, today
        );
        let next_rows: Vec<Value> = self.supabase.request(
            Method::GET,
            &next_path,
            Some(auth_token),
            None,
        ).await?;

        let next_appointment = next_rows
            .into_iter()
            .next()
            .map(serde_json::from_value::<AppointmentBrief>)
            .transpose()?;

        Ok(DashboardView::Patient(PatientDashboard {
            upcoming_appointments: upcoming,
            pending_appointments: pending,
            next_appointment,
        }))
    }

    async fn doctor_view(&self, doctor_id: &str, auth_token: &str) -> Result<DashboardView> {
        let today = Utc::now().date_naive();

        let todays = self.supabase.count(
            &format!(
                "/rest/v1/appointments?doctor_id=eq.{}&appointment_date=eq.{}&status=eq.approved",
                doctor_id, today
            ),
            Some(auth_token),
        ).await?;

        let pending = self.supabase.count(
            &format!("/rest/v1/appointments?doctor_id=eq.{}&status=eq.pending", doctor_id),
            Some(auth_token),
        ).await?;

        Ok(DashboardView::Doctor(DoctorDashboard {
            todays_appointments: todays,
            pending_requests: pending,
        }))
    }

    async fn admin_view(&self, auth_token: &str) -> Result<DashboardView> {
        let doctors = self.supabase.count("/rest/v1/doctors", Some(auth_token)).await?;
        let patients = self.supabase.count("/rest/v1/patients", Some(auth_token)).await?;
        let appointments = self.supabase.count("/rest/v1/appointments", Some(auth_token)).await?;
        let pending = self.supabase.count(
            "/rest/v1/appointments?status=eq.pending",
            Some(auth_token),
        ).await?;

        Ok(DashboardView::Admin(AdminDashboard {
            total_users: doctors + patients,
            total_appointments: appointments,
            pending_appointments: pending,
        }))
    }
}
