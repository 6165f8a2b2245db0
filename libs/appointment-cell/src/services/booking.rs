// libs/appointment-cell/src/services/booking.rs
use anyhow::anyhow;
use chrono::{Datelike, Utc};
use reqwest::Method;
use serde_json::{json, Value};
use tracing::{debug, info, warn};
use std::sync::Arc;

use shared_config::AppConfig;
use shared_database::supabase::SupabaseClient;
use shared_models::auth::User;
use doctor_cell::models::DayAvailability;
use doctor_cell::slots;

use crate::models::{
    Appointment, AppointmentError, AppointmentStatus, AppointmentView,
    BookAppointmentRequest, PartySummary, UpdateStatusRequest,
};
use crate::services::lifecycle::AppointmentLifecycleService;

pub struct AppointmentBookingService {
    supabase: Arc<SupabaseClient>,
    lifecycle: AppointmentLifecycleService,
}

impl AppointmentBookingService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: Arc::new(SupabaseClient::new(config)),
            lifecycle: AppointmentLifecycleService::new(),
        }
    }

    /// Admission check and insert. Checks run in a fixed order and fail
    /// fast: field presence, then slot membership against the doctor's
    /// schedule for that weekday, then the duplicate guard. Nothing is
    /// written unless every check passes, and the record always enters
    /// as `pending`.
    pub async fn book_appointment(
        &self,
        patient: &User,
        request: BookAppointmentRequest,
        auth_token: &str,
    ) -> Result<Appointment, AppointmentError> {
        // Step 1: all of doctor, date, time must be present
        let (doctor_id, date, time_label) = match (request.doctor_id, request.date, &request.time) {
            (Some(doctor_id), Some(date), Some(time)) if !time.is_empty() => {
                (doctor_id, date, time.clone())
            }
            _ => return Err(AppointmentError::MissingFields),
        };

        info!(
            "Booking request: patient {} with doctor {} on {} at {}",
            patient.id, doctor_id, date, time_label
        );

        // Step 2: the label must belong to the slot sequence derived for
        // that weekday, whenever that sequence is non-empty.
        let schedule = self.get_doctor_schedule(&doctor_id.to_string(), auth_token).await?;
        let day_slots = slots::slots_for_day(&schedule, date.weekday());

        if !day_slots.is_empty() && !day_slots.contains(&time_label) {
            warn!(
                "Rejected booking: {} is not a bookable slot for doctor {} on {}",
                time_label, doctor_id, date
            );
            return Err(AppointmentError::SlotUnavailable);
        }

        // Step 3: refuse a second booking for the same (doctor, date,
        // time) unless the earlier one was rejected. The store has no
        // uniqueness constraint, so this is a read-then-insert guard.
        let duplicate_path = format!(
            "/rest/v1/appointments?doctor_id=eq.{}&appointment_date=eq.{}&time_label=eq.{}&status=neq.rejected",
            doctor_id,
            date,
            time_label.replace(' ', "%20")
        );
        let duplicates: Vec<Value> = self.supabase.request(
            Method::GET,
            &duplicate_path,
            Some(auth_token),
            None,
        ).await?;

        if !duplicates.is_empty() {
            warn!(
                "Rejected booking: doctor {} already has an appointment on {} at {}",
                doctor_id, date, time_label
            );
            return Err(AppointmentError::AlreadyBooked);
        }

        // Step 4: insert in pending status
        let appointment_data = json!({
            "patient_id": patient.id,
            "doctor_id": doctor_id,
            "appointment_date": date,
            "time_label": time_label,
            "status": AppointmentStatus::Pending.to_string(),
            "patient_notes": request.notes,
            "created_at": Utc::now().to_rfc3339(),
            "updated_at": Utc::now().to_rfc3339()
        });

        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert("Prefer", reqwest::header::HeaderValue::from_static("return=representation"));

        let result: Vec<Value> = self.supabase.request_with_headers(
            Method::POST,
            "/rest/v1/appointments",
            Some(auth_token),
            Some(appointment_data),
            Some(headers),
        ).await?;

        if result.is_empty() {
            return Err(AppointmentError::Store("Failed to create appointment".to_string()));
        }

        let appointment: Appointment = serde_json::from_value(result[0].clone())
            .map_err(|e| AppointmentError::Store(e.to_string()))?;

        info!("Appointment {} created in pending status", appointment.id);
        Ok(appointment)
    }

    pub async fn get_appointment(
        &self,
        appointment_id: &str,
        auth_token: &str,
    ) -> Result<Appointment, AppointmentError> {
        debug!("Fetching appointment: {}", appointment_id);

        let path = format!("/rest/v1/appointments?id=eq.{}", appointment_id);
        let result: Vec<Value> = self.supabase.request(
            Method::GET,
            &path,
            Some(auth_token),
            None,
        ).await?;

        if result.is_empty() {
            return Err(AppointmentError::NotFound);
        }

        serde_json::from_value(result[0].clone())
            .map_err(|e| AppointmentError::Store(e.to_string()))
    }

    /// The caller's appointments with both parties resolved. Doctors see
    /// their consultations, patients their bookings, admins everything.
    pub async fn list_for_user(
        &self,
        user: &User,
        auth_token: &str,
    ) -> Result<Vec<AppointmentView>, AppointmentError> {
        let path = if user.is_admin() {
            "/rest/v1/appointments?order=appointment_date.asc".to_string()
        } else if user.is_doctor() {
            format!("/rest/v1/appointments?doctor_id=eq.{}&order=appointment_date.asc", user.id)
        } else {
            format!("/rest/v1/appointments?patient_id=eq.{}&order=appointment_date.asc", user.id)
        };

        let result: Vec<Value> = self.supabase.request(
            Method::GET,
            &path,
            Some(auth_token),
            None,
        ).await?;

        let appointments: Vec<Appointment> = result.into_iter()
            .map(serde_json::from_value)
            .collect::<std::result::Result<Vec<Appointment>, _>>()
            .map_err(|e| AppointmentError::Store(e.to_string()))?;

        if appointments.is_empty() {
            return Ok(vec![]);
        }

        let doctors = self.fetch_parties(
            "doctors",
            "id,full_name,specialization",
            appointments.iter().map(|apt| apt.doctor_id.to_string()),
            auth_token,
        ).await?;
        let patients = self.fetch_parties(
            "patients",
            "id,full_name",
            appointments.iter().map(|apt| apt.patient_id.to_string()),
            auth_token,
        ).await?;

        let views = appointments.into_iter()
            .map(|apt| {
                let doctor = doctors.iter().find(|d| d.id == apt.doctor_id).cloned();
                let patient = patients.iter().find(|p| p.id == apt.patient_id).cloned();
                AppointmentView {
                    id: apt.id,
                    appointment_date: apt.appointment_date,
                    time_label: apt.time_label,
                    status: apt.status,
                    doctor,
                    patient,
                    patient_notes: apt.patient_notes,
                    created_at: apt.created_at,
                }
            })
            .collect();

        Ok(views)
    }

    /// Move an appointment through its lifecycle. The transition is
    /// validated against the current stored status before the write.
    pub async fn update_status(
        &self,
        appointment_id: &str,
        request: UpdateStatusRequest,
        auth_token: &str,
    ) -> Result<Appointment, AppointmentError> {
        let current = self.get_appointment(appointment_id, auth_token).await?;

        self.lifecycle.validate_transition(current.status, request.status)?;

        let update_data = json!({
            "status": request.status.to_string(),
            "updated_at": Utc::now().to_rfc3339()
        });

        let path = format!("/rest/v1/appointments?id=eq.{}", appointment_id);
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert("Prefer", reqwest::header::HeaderValue::from_static("return=representation"));

        let result: Vec<Value> = self.supabase.request_with_headers(
            Method::PATCH,
            &path,
            Some(auth_token),
            Some(update_data),
            Some(headers),
        ).await?;

        if result.is_empty() {
            return Err(AppointmentError::Store("Failed to update appointment status".to_string()));
        }

        let appointment: Appointment = serde_json::from_value(result[0].clone())
            .map_err(|e| AppointmentError::Store(e.to_string()))?;

        info!("Appointment {} moved to {}", appointment.id, appointment.status);
        Ok(appointment)
    }

    // Private helper methods

    async fn get_doctor_schedule(
        &self,
        doctor_id: &str,
        auth_token: &str,
    ) -> Result<Vec<DayAvailability>, AppointmentError> {
        let path = format!("/rest/v1/doctor_availability?doctor_id=eq.{}", doctor_id);
        let result: Vec<Value> = self.supabase.request(
            Method::GET,
            &path,
            Some(auth_token),
            None,
        ).await?;

        result.into_iter()
            .map(serde_json::from_value)
            .collect::<std::result::Result<Vec<DayAvailability>, _>>()
            .map_err(|e| AppointmentError::Store(e.to_string()))
    }

    async fn fetch_parties(
        &self,
        table: &str,
        select: &str,
        ids: impl Iterator<Item = String>,
        auth_token: &str,
    ) -> Result<Vec<PartySummary>, AppointmentError> {
        let mut unique_ids: Vec<String> = ids.collect();
        unique_ids.sort();
        unique_ids.dedup();

        let path = format!(
            "/rest/v1/{}?id=in.({})&select={}",
            table,
            unique_ids.join(","),
            select
        );

        let result: Vec<Value> = self.supabase.request(
            Method::GET,
            &path,
            Some(auth_token),
            None,
        ).await.map_err(|e| anyhow!("Failed to resolve {}: {}", table, e))?;

        result.into_iter()
            .map(serde_json::from_value)
            .collect::<std::result::Result<Vec<PartySummary>, _>>()
            .map_err(|e| AppointmentError::Store(e.to_string()))
    }
}
