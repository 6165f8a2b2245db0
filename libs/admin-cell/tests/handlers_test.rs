// libs/admin-cell/tests/handlers_test.rs

use std::sync::Arc;
use axum::{
    extract::{Extension, State},
    Json,
};
use axum_extra::TypedHeader;
use headers::{Authorization, authorization::Bearer};
use serde_json::json;
use wiremock::{MockServer, Mock, ResponseTemplate};
use wiremock::matchers::{method, path, header};
use chrono::Utc;
use uuid::Uuid;

use admin_cell::handlers::*;
use admin_cell::models::*;
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

fn count_response(total: u64) -> ResponseTemplate {
    ResponseTemplate::new(206)
        .insert_header("Content-Range", format!("0-0/{}", total).as_str())
        .set_body_json(json!([]))
}

#[tokio::test]
async fn test_stats_require_admin() {
    let mock_server = MockServer::start().await;
    let config = mock_config(&mock_server);

    let doctor_user = TestUser::doctor("doctor@example.com");
    let token = JwtTestUtils::create_test_token(&doctor_user, &config.supabase_jwt_secret, Some(24));

    let result = get_platform_stats(
        State(Arc::new(config)),
        create_auth_header(&token),
        create_test_user_extension("doctor", &doctor_user.id)
    ).await;

    assert!(result.is_err());
    match result.unwrap_err() {
        AppError::Auth(msg) => assert!(msg.contains("Administrator access required")),
        _ => panic!("Expected Auth error"),
    }
}

#[tokio::test]
async fn test_platform_stats_aggregates_counts() {
    let mock_server = MockServer::start().await;
    let config = mock_config(&mock_server);

    let admin_user = TestUser::admin("admin@example.com");
    let token = JwtTestUtils::create_test_token(&admin_user, &config.supabase_jwt_secret, Some(24));

    // Count queries carry Prefer: count=exact; the recent-users read does not
    Mock::given(method("GET"))
        .and(path("/rest/v1/doctors"))
        .and(header("Prefer", "count=exact"))
        .respond_with(count_response(3))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/patients"))
        .and(header("Prefer", "count=exact"))
        .respond_with(count_response(10))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/appointments"))
        .and(header("Prefer", "count=exact"))
        .respond_with(count_response(7))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/patients"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "id": Uuid::new_v4(),
            "full_name": "Newest Patient",
            "email": "new@example.com",
            "created_at": Utc::now().to_rfc3339()
        }])))
        .mount(&mock_server)
        .await;

    let result = get_platform_stats(
        State(Arc::new(config)),
        create_auth_header(&token),
        create_test_user_extension("admin", &admin_user.id)
    ).await;

    assert!(result.is_ok(), "Expected stats to succeed, but got error: {:?}", result.err());
    let response = result.unwrap().0;
    assert_eq!(response["total_users"], 13);
    assert_eq!(response["doctors"], 3);
    assert_eq!(response["patients"], 10);
    assert_eq!(response["appointments"], 7);
    assert_eq!(response["recent_users"][0]["full_name"], "Newest Patient");
}

#[tokio::test]
async fn test_update_user_status_unknown_role() {
    let mock_server = MockServer::start().await;
    let config = mock_config(&mock_server);

    let admin_user = TestUser::admin("admin@example.com");
    let token = JwtTestUtils::create_test_token(&admin_user, &config.supabase_jwt_secret, Some(24));

    let request = UpdateUserStatusRequest {
        role: "superuser".to_string(),
        is_active: false,
    };

    let result = update_user_status(
        State(Arc::new(config)),
        axum::extract::Path(Uuid::new_v4().to_string()),
        create_auth_header(&token),
        create_test_user_extension("admin", &admin_user.id),
        Json(request)
    ).await;

    assert!(result.is_err());
    match result.unwrap_err() {
        AppError::Internal(msg) => assert!(msg.contains("Unknown role")),
        other => panic!("Expected Internal error, got {:?}", other),
    }
}
