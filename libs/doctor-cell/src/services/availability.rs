use anyhow::Result;
use chrono::{Datelike, NaiveDate, Utc};
use reqwest::Method;
use serde_json::{json, Value};
use tracing::debug;

use shared_config::AppConfig;
use shared_database::supabase::SupabaseClient;

use crate::models::{
    DayAvailability, DoctorError, ReplaceAvailabilityRequest, BookableSlotsResponse,
};
use crate::slots;

pub struct AvailabilityService {
    supabase: SupabaseClient,
}

impl AvailabilityService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
        }
    }

    /// A doctor's weekly schedule, ordered Sunday through Saturday.
    pub async fn get_doctor_availability(
        &self,
        doctor_id: &str,
        auth_token: &str,
    ) -> Result<Vec<DayAvailability>> {
        debug!("Fetching availability for doctor: {}", doctor_id);

        let path = format!("/rest/v1/doctor_availability?doctor_id=eq.{}", doctor_id);
        let result: Vec<Value> = self.supabase.request(
            Method::GET,
            &path,
            Some(auth_token),
            None,
        ).await?;

        let mut availabilities: Vec<DayAvailability> = result.into_iter()
            .map(serde_json::from_value)
            .collect::<std::result::Result<Vec<DayAvailability>, _>>()?;

        availabilities.sort_by_key(|entry| slots::weekday_index(&entry.day).unwrap_or(7));

        Ok(availabilities)
    }

    /// Replace a doctor's schedule wholesale: the submitted set becomes
    /// the schedule, whatever was stored before is discarded. Validation
    /// runs before anything is touched so a bad request leaves the
    /// stored schedule intact.
    pub async fn replace_availability(
        &self,
        doctor_id: &str,
        request: ReplaceAvailabilityRequest,
        auth_token: &str,
    ) -> Result<Vec<DayAvailability>> {
        debug!(
            "Replacing availability for doctor {} with {} entries",
            doctor_id,
            request.availability.len()
        );

        let mut seen_days: Vec<&str> = Vec::new();
        let mut rows = Vec::new();

        for entry in &request.availability {
            if slots::weekday_index(&entry.day).is_none() {
                return Err(DoctorError::InvalidDay(entry.day.clone()).into());
            }
            if seen_days.contains(&entry.day.as_str()) {
                return Err(DoctorError::DuplicateDay(entry.day.clone()).into());
            }
            seen_days.push(&entry.day);

            let start = slots::parse_window_time(&entry.start_time)
                .map_err(|e| DoctorError::InvalidTimeWindow(e.to_string()))?;
            let end = slots::parse_window_time(&entry.end_time)
                .map_err(|e| DoctorError::InvalidTimeWindow(e.to_string()))?;

            if start >= end {
                return Err(DoctorError::InvalidTimeWindow(format!(
                    "start {} is not before end {}",
                    entry.start_time, entry.end_time
                ))
                .into());
            }

            rows.push(json!({
                "doctor_id": doctor_id,
                "day": entry.day,
                "start_time": start.format("%H:%M:%S").to_string(),
                "end_time": end.format("%H:%M:%S").to_string(),
                "created_at": Utc::now().to_rfc3339(),
                "updated_at": Utc::now().to_rfc3339()
            }));
        }

        // Wholesale replacement: clear, then insert the new set.
        let delete_path = format!("/rest/v1/doctor_availability?doctor_id=eq.{}", doctor_id);
        let _: Vec<Value> = self.supabase.request(
            Method::DELETE,
            &delete_path,
            Some(auth_token),
            None,
        ).await?;

        if rows.is_empty() {
            return Ok(vec![]);
        }

        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert("Prefer", reqwest::header::HeaderValue::from_static("return=representation"));

        let result: Vec<Value> = self.supabase.request_with_headers(
            Method::POST,
            "/rest/v1/doctor_availability",
            Some(auth_token),
            Some(Value::Array(rows)),
            Some(headers),
        ).await?;

        let mut inserted: Vec<DayAvailability> = result.into_iter()
            .map(serde_json::from_value)
            .collect::<std::result::Result<Vec<DayAvailability>, _>>()?;

        inserted.sort_by_key(|entry| slots::weekday_index(&entry.day).unwrap_or(7));

        debug!("Stored {} availability entries for doctor {}", inserted.len(), doctor_id);
        Ok(inserted)
    }

    /// Bookable labels for one calendar date. An ineligible date (in the
    /// past, or a weekday the doctor does not cover) reports empty slots
    /// rather than an error.
    pub async fn get_bookable_slots(
        &self,
        doctor_id: &str,
        date: NaiveDate,
        auth_token: &str,
    ) -> Result<BookableSlotsResponse> {
        debug!("Deriving bookable slots for doctor {} on {}", doctor_id, date);

        let schedule = self.get_doctor_availability(doctor_id, auth_token).await?;
        let today = Utc::now().date_naive();

        let eligible = slots::date_is_bookable(date, today, &schedule);
        let slot_labels = if eligible {
            slots::slots_for_day(&schedule, date.weekday())
        } else {
            debug!("Date {} is not bookable for doctor {}", date, doctor_id);
            vec![]
        };

        Ok(BookableSlotsResponse {
            doctor_id: doctor_id.parse()?,
            date,
            eligible,
            slots: slot_labels,
        })
    }

    /// Weekday names with at least one window, in calendar order. The
    /// booking calendar uses this to grey out uncovered days.
    pub async fn get_bookable_days(
        &self,
        doctor_id: &str,
        auth_token: &str,
    ) -> Result<Vec<String>> {
        let schedule = self.get_doctor_availability(doctor_id, auth_token).await?;

        let mut days: Vec<String> = schedule.into_iter().map(|entry| entry.day).collect();
        days.dedup();

        Ok(days)
    }
}
