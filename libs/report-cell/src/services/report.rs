use anyhow::{Result, anyhow};
use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use reqwest::Method;
use serde_json::{json, Value};
use tracing::debug;
use uuid::Uuid;
use chrono::Utc;

use shared_config::AppConfig;
use shared_database::supabase::SupabaseClient;

use crate::models::{MedicalReport, UploadReportRequest};

pub struct ReportService {
    supabase: SupabaseClient,
}

impl ReportService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
        }
    }

    /// Decode the payload, push the bytes into object storage, then
    /// record the metadata row pointing at the public URL.
    pub async fn upload_report(
        &self,
        patient_id: &str,
        request: UploadReportRequest,
        auth_token: &str,
    ) -> Result<MedicalReport> {
        debug!("Uploading report for patient: {}", patient_id);

        if request.title.trim().is_empty() {
            return Err(anyhow!("Report title cannot be empty"));
        }

        // Accept raw base64 or a full data URL
        let base64_data = if request.file_data.contains(";base64,") {
            request.file_data.split(";base64,").nth(1).unwrap_or(&request.file_data)
        } else {
            &request.file_data
        };

        let file_bytes = BASE64.decode(base64_data)
            .map_err(|e| anyhow!("Failed to decode base64 data: {}", e))?;

        let file_id = Uuid::new_v4().to_string();
        let file_ext = if request.file_type.contains('/') {
            request.file_type.split('/').next_back().unwrap_or("bin")
        } else {
            request.file_type.as_str()
        };

        let filename = format!("medical-reports/{}/{}.{}", patient_id, file_id, file_ext);

        let upload_path = format!("/storage/v1/object/medical-reports/{}", filename);
        debug!("Uploading {} bytes to storage path: {}", file_bytes.len(), upload_path);

        let _: Value = self.supabase.request(
            Method::POST,
            &upload_path,
            Some(auth_token),
            Some(json!({
                "data": file_bytes,
                "contentType": request.file_type
            })),
        ).await?;

        let storage_path = format!("/storage/v1/object/public/medical-reports/{}", filename);
        let public_url = self.supabase.get_public_url(&storage_path);

        let report_data = json!({
            "patient_id": patient_id,
            "title": request.title,
            "file_url": public_url,
            "file_type": request.file_type,
            "uploaded_at": Utc::now().to_rfc3339()
        });

        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert("Prefer", reqwest::header::HeaderValue::from_static("return=representation"));

        let result: Vec<Value> = self.supabase.request_with_headers(
            Method::POST,
            "/rest/v1/medical_reports",
            Some(auth_token),
            Some(report_data),
            Some(headers),
        ).await?;

        if result.is_empty() {
            return Err(anyhow!("Failed to create report record"));
        }

        let report: MedicalReport = serde_json::from_value(result[0].clone())?;
        debug!("Report {} stored for patient {}", report.id, patient_id);

        Ok(report)
    }

    pub async fn list_for_patient(
        &self,
        patient_id: &str,
        auth_token: &str,
    ) -> Result<Vec<MedicalReport>> {
        debug!("Listing reports for patient: {}", patient_id);

        let path = format!(
            "/rest/v1/medical_reports?patient_id=eq.{}&order=uploaded_at.desc",
            patient_id
        );
        let result: Vec<Value> = self.supabase.request(
            Method::GET,
            &path,
            Some(auth_token),
            None,
        ).await?;

        let reports: Vec<MedicalReport> = result.into_iter()
            .map(serde_json::from_value)
            .collect::<std::result::Result<Vec<MedicalReport>, _>>()?;

        Ok(reports)
    }
}
