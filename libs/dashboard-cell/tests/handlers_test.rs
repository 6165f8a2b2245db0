// libs/dashboard-cell/tests/handlers_test.rs

use std::sync::Arc;
use axum::extract::{Extension, State};
use axum_extra::TypedHeader;
use headers::{Authorization, authorization::Bearer};
use serde_json::json;
use wiremock::{MockServer, Mock, ResponseTemplate};
use wiremock::matchers::method;
use chrono::Utc;

use dashboard_cell::handlers::get_dashboard;
use shared_config::AppConfig;
use shared_models::auth::User;
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

async fn mount_counts_and_reads(mock_server: &MockServer, total: u64) {
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(206)
                .insert_header("Content-Range", format!("0-0/{}", total).as_str())
                .set_body_json(json!([])),
        )
        .mount(mock_server)
        .await;
}

#[tokio::test]
async fn test_doctor_gets_doctor_view() {
    let mock_server = MockServer::start().await;
    let config = mock_config(&mock_server);

    let doctor_user = TestUser::doctor("doctor@example.com");
    let token = JwtTestUtils::create_test_token(&doctor_user, &config.supabase_jwt_secret, Some(24));

    mount_counts_and_reads(&mock_server, 2).await;

    let result = get_dashboard(
        State(Arc::new(config)),
        create_auth_header(&token),
        create_test_user_extension("doctor", &doctor_user.id)
    ).await;

    assert!(result.is_ok(), "Expected dashboard to compose, but got error: {:?}", result.err());
    let response = result.unwrap().0;
    assert_eq!(response["view"]["role"], "doctor");
    assert!(response["headline"].as_str().unwrap().contains("consultations today"));
    assert!(response["actions"].as_array().unwrap().len() >= 2);
}

#[tokio::test]
async fn test_admin_gets_admin_view() {
    let mock_server = MockServer::start().await;
    let config = mock_config(&mock_server);

    let admin_user = TestUser::admin("admin@example.com");
    let token = JwtTestUtils::create_test_token(&admin_user, &config.supabase_jwt_secret, Some(24));

    mount_counts_and_reads(&mock_server, 5).await;

    let result = get_dashboard(
        State(Arc::new(config)),
        create_auth_header(&token),
        create_test_user_extension("admin", &admin_user.id)
    ).await;

    assert!(result.is_ok());
    let response = result.unwrap().0;
    assert_eq!(response["view"]["role"], "admin");
    assert_eq!(response["view"]["total_users"], 10);
}

#[tokio::test]
async fn test_patient_gets_patient_view() {
    let mock_server = MockServer::start().await;
    let config = mock_config(&mock_server);

    let patient_user = TestUser::patient("patient@example.com");
    let token = JwtTestUtils::create_test_token(&patient_user, &config.supabase_jwt_secret, Some(24));

    mount_counts_and_reads(&mock_server, 0).await;

    let result = get_dashboard(
        State(Arc::new(config)),
        create_auth_header(&token),
        create_test_user_extension("patient", &patient_user.id)
    ).await;

    assert!(result.is_ok());
    let response = result.unwrap().0;
    assert_eq!(response["view"]["role"], "patient");
    assert_eq!(response["headline"], "No upcoming appointments");
}
