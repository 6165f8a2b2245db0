// libs/patient-cell/tests/handlers_test.rs

use std::sync::Arc;
use axum::{
    extract::{Extension, Path, State},
    Json,
};
use axum_extra::TypedHeader;
use headers::{Authorization, authorization::Bearer};
use serde_json::json;
use wiremock::{MockServer, Mock, ResponseTemplate};
use wiremock::matchers::{method, path};
use chrono::Utc;
use uuid::Uuid;

use patient_cell::handlers::*;
use patient_cell::models::*;
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

fn patient_row(id: &str) -> serde_json::Value {
    json!({
        "id": id,
        "full_name": "Test Patient",
        "email": "patient@example.com",
        "phone": null,
        "date_of_birth": "1990-01-01",
        "is_active": true,
        "created_at": Utc::now().to_rfc3339(),
        "updated_at": Utc::now().to_rfc3339()
    })
}

#[tokio::test]
async fn test_first_profile_save_inserts() {
    let mock_server = MockServer::start().await;
    let config = mock_config(&mock_server);

    let patient_user = TestUser::patient("patient@example.com");
    let token = JwtTestUtils::create_test_token(&patient_user, &config.supabase_jwt_secret, Some(24));

    // No row yet, then an insert comes back
    Mock::given(method("GET"))
        .and(path("/rest/v1/patients"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/patients"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([patient_row(&patient_user.id)])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let request = SavePatientProfileRequest {
        full_name: "Test Patient".to_string(),
        email: "patient@example.com".to_string(),
        phone: None,
        date_of_birth: None,
    };

    let result = save_my_profile(
        State(Arc::new(config)),
        create_auth_header(&token),
        create_test_user_extension("patient", &patient_user.id),
        Json(request)
    ).await;

    assert!(result.is_ok(), "Expected profile save to succeed, but got error: {:?}", result.err());
}

#[tokio::test]
async fn test_patient_cannot_read_other_patient() {
    let mock_server = MockServer::start().await;
    let config = mock_config(&mock_server);

    let patient_user = TestUser::patient("patient@example.com");
    let token = JwtTestUtils::create_test_token(&patient_user, &config.supabase_jwt_secret, Some(24));

    let result = get_patient(
        State(Arc::new(config)),
        Path(Uuid::new_v4().to_string()),
        create_auth_header(&token),
        create_test_user_extension("patient", &patient_user.id)
    ).await;

    assert!(result.is_err());
    match result.unwrap_err() {
        AppError::Auth(msg) => assert!(msg.contains("Not authorized")),
        _ => panic!("Expected Auth error"),
    }
}

#[tokio::test]
async fn test_create_medical_record_requires_doctor() {
    let mock_server = MockServer::start().await;
    let config = mock_config(&mock_server);

    let patient_user = TestUser::patient("patient@example.com");
    let token = JwtTestUtils::create_test_token(&patient_user, &config.supabase_jwt_secret, Some(24));

    let request = CreateMedicalRecordRequest {
        patient_id: Uuid::new_v4(),
        diagnosis: "Seasonal allergy".to_string(),
        prescription: None,
        notes: None,
    };

    let result = create_medical_record(
        State(Arc::new(config)),
        create_auth_header(&token),
        create_test_user_extension("patient", &patient_user.id),
        Json(request)
    ).await;

    assert!(result.is_err());
    match result.unwrap_err() {
        AppError::Auth(msg) => assert!(msg.contains("Only doctors")),
        _ => panic!("Expected Auth error"),
    }
}

#[tokio::test]
async fn test_doctor_writes_record_for_patient() {
    let mock_server = MockServer::start().await;
    let config = mock_config(&mock_server);

    let doctor_user = TestUser::doctor("doctor@example.com");
    let token = JwtTestUtils::create_test_token(&doctor_user, &config.supabase_jwt_secret, Some(24));
    let patient_id = Uuid::new_v4();

    Mock::given(method("POST"))
        .and(path("/rest/v1/medical_records"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([{
            "id": Uuid::new_v4(),
            "patient_id": patient_id,
            "doctor_id": doctor_user.id,
            "diagnosis": "Seasonal allergy",
            "prescription": "Antihistamine",
            "notes": null,
            "created_at": Utc::now().to_rfc3339()
        }])))
        .mount(&mock_server)
        .await;

    let request = CreateMedicalRecordRequest {
        patient_id,
        diagnosis: "Seasonal allergy".to_string(),
        prescription: Some("Antihistamine".to_string()),
        notes: None,
    };

    let result = create_medical_record(
        State(Arc::new(config)),
        create_auth_header(&token),
        create_test_user_extension("doctor", &doctor_user.id),
        Json(request)
    ).await;

    assert!(result.is_ok(), "Expected record creation to succeed, but got error: {:?}", result.err());
    let response = result.unwrap().0;
    assert_eq!(response["diagnosis"], "Seasonal allergy");
}
