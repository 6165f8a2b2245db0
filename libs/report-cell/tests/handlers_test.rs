// libs/report-cell/tests/handlers_test.rs

use std::sync::Arc;
use axum::{
    extract::{Extension, Path, State},
    Json,
};
use axum_extra::TypedHeader;
use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use headers::{Authorization, authorization::Bearer};
use serde_json::json;
use wiremock::{MockServer, Mock, ResponseTemplate};
use wiremock::matchers::{method, path_regex, path};
use chrono::Utc;
use uuid::Uuid;

use report_cell::handlers::*;
use report_cell::models::*;
use shared_config::AppConfig;
use shared_models::{auth::User, error::AppError};
use shared_utils::test_utils::{TestUser, JwtTestUtils};

fn mock_config(mock_server: &MockServer) -> AppConfig {
    AppConfig {
        supabase_url: mock_server.uri(),
        supabase_anon_key: "test-anon-key".to_string(),
        supabase_jwt_secret: "test-secret-key-for-jwt-validation-must-be-long-enough".to_string(),
    }
}

fn create_test_user_extension(role: &str, id: &str) -> Extension<User> {
    Extension(User {
        id: id.to_string(),
        email: Some(format!("{}@example.com", role)),
        role: Some(role.to_string()),
        metadata: None,
        created_at: Some(Utc::now()),
    })
}

fn create_auth_header(token: &str) -> TypedHeader<Authorization<Bearer>> {
    let auth = Authorization::bearer(token).unwrap();
    TypedHeader(auth)
}

#[tokio::test]
async fn test_upload_report_stores_file_and_metadata() {
    let mock_server = MockServer::start().await;
    let config = mock_config(&mock_server);

    let patient_user = TestUser::patient("patient@example.com");
    let token = JwtTestUtils::create_test_token(&patient_user, &config.supabase_jwt_secret, Some(24));

    Mock::given(method("POST"))
        .and(path_regex(r"^/storage/v1/object/medical-reports/.*$"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"Key": "ok"})))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/medical_reports"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([{
            "id": Uuid::new_v4(),
            "patient_id": patient_user.id,
            "title": "Blood work",
            "file_url": format!("{}/storage/v1/object/public/medical-reports/x.pdf", mock_server.uri()),
            "file_type": "application/pdf",
            "uploaded_at": Utc::now().to_rfc3339()
        }])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let request = UploadReportRequest {
        title: "Blood work".to_string(),
        file_data: BASE64.encode(b"%PDF-1.4 test"),
        file_type: "application/pdf".to_string(),
    };

    let result = upload_report(
        State(Arc::new(config)),
        create_auth_header(&token),
        create_test_user_extension("patient", &patient_user.id),
        Json(request)
    ).await;

    assert!(result.is_ok(), "Expected upload to succeed, but got error: {:?}", result.err());
    let response = result.unwrap().0;
    assert_eq!(response["title"], "Blood work");
}

#[tokio::test]
async fn test_upload_rejected_for_doctors() {
    let mock_server = MockServer::start().await;
    let config = mock_config(&mock_server);

    let doctor_user = TestUser::doctor("doctor@example.com");
    let token = JwtTestUtils::create_test_token(&doctor_user, &config.supabase_jwt_secret, Some(24));

    let request = UploadReportRequest {
        title: "Blood work".to_string(),
        file_data: BASE64.encode(b"data"),
        file_type: "application/pdf".to_string(),
    };

    let result = upload_report(
        State(Arc::new(config)),
        create_auth_header(&token),
        create_test_user_extension("doctor", &doctor_user.id),
        Json(request)
    ).await;

    assert!(result.is_err());
    match result.unwrap_err() {
        AppError::Auth(msg) => assert!(msg.contains("Only patients")),
        other => panic!("Expected Auth error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_doctor_can_list_patient_reports() {
    let mock_server = MockServer::start().await;
    let config = mock_config(&mock_server);

    let doctor_user = TestUser::doctor("doctor@example.com");
    let token = JwtTestUtils::create_test_token(&doctor_user, &config.supabase_jwt_secret, Some(24));
    let patient_id = Uuid::new_v4().to_string();

    Mock::given(method("GET"))
        .and(path("/rest/v1/medical_reports"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "id": Uuid::new_v4(),
            "patient_id": patient_id,
            "title": "Blood work",
            "file_url": "https://example.com/report.pdf",
            "file_type": "application/pdf",
            "uploaded_at": Utc::now().to_rfc3339()
        }])))
        .mount(&mock_server)
        .await;

    let result = list_reports(
        State(Arc::new(config)),
        Path(patient_id),
        create_auth_header(&token),
        create_test_user_extension("doctor", &doctor_user.id)
    ).await;

    assert!(result.is_ok());
    let response = result.unwrap().0;
    assert_eq!(response["total"], 1);
}
