// libs/doctor-cell/tests/services_test.rs
// Service-level coverage for the availability replacement flow.

use serde_json::json;
use wiremock::{MockServer, Mock, ResponseTemplate};
use wiremock::matchers::{method, path};
use chrono::Utc;
use uuid::Uuid;

use doctor_cell::models::{AvailabilityEntry, ReplaceAvailabilityRequest};
use doctor_cell::services::availability::AvailabilityService;
use shared_config::AppConfig;

fn mock_config(mock_server: &MockServer) -> AppConfig {
    AppConfig {
        supabase_url: mock_server.uri(),
        supabase_anon_key: "test-anon-key".to_string(),
        supabase_jwt_secret: "test-secret-key-for-jwt-validation-must-be-long-enough".to_string(),
    }
}

fn entry(day: &str, start: &str, end: &str) -> AvailabilityEntry {
    AvailabilityEntry {
        day: day.to_string(),
        start_time: start.to_string(),
        end_time: end.to_string(),
    }
}

#[tokio::test]
async fn replace_rejects_unknown_weekday_before_touching_store() {
    let mock_server = MockServer::start().await;
    let service = AvailabilityService::new(&mock_config(&mock_server));

    let request = ReplaceAvailabilityRequest {
        availability: vec![entry("Funday", "09:00", "17:00")],
    };

    // No mocks mounted: a store call would fail loudly, so an Err here
    // with zero received requests proves validation ran first.
    let result = service.replace_availability(&Uuid::new_v4().to_string(), request, "token").await;

    assert!(result.is_err());
    assert!(result.unwrap_err().to_string().contains("Unknown weekday"));
    assert!(mock_server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn replace_rejects_duplicate_day() {
    let mock_server = MockServer::start().await;
    let service = AvailabilityService::new(&mock_config(&mock_server));

    let request = ReplaceAvailabilityRequest {
        availability: vec![
            entry("Monday", "09:00", "12:00"),
            entry("Monday", "14:00", "17:00"),
        ],
    };

    let result = service.replace_availability(&Uuid::new_v4().to_string(), request, "token").await;

    assert!(result.is_err());
    assert!(result.unwrap_err().to_string().contains("More than one window"));
}

#[tokio::test]
async fn replace_with_empty_set_clears_schedule() {
    let mock_server = MockServer::start().await;
    let service = AvailabilityService::new(&mock_config(&mock_server));

    Mock::given(method("DELETE"))
        .and(path("/rest/v1/doctor_availability"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let request = ReplaceAvailabilityRequest { availability: vec![] };

    let result = service.replace_availability(&Uuid::new_v4().to_string(), request, "token").await;

    assert!(result.is_ok());
    assert!(result.unwrap().is_empty());
}

#[tokio::test]
async fn schedule_is_returned_in_calendar_order() {
    let mock_server = MockServer::start().await;
    let service = AvailabilityService::new(&mock_config(&mock_server));
    let doctor_id = Uuid::new_v4().to_string();

    let row = |day: &str| {
        json!({
            "id": Uuid::new_v4(),
            "doctor_id": doctor_id,
            "day": day,
            "start_time": "09:00:00",
            "end_time": "17:00:00",
            "created_at": Utc::now().to_rfc3339(),
            "updated_at": Utc::now().to_rfc3339()
        })
    };

    Mock::given(method("GET"))
        .and(path("/rest/v1/doctor_availability"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            row("Saturday"), row("Sunday"), row("Wednesday")
        ])))
        .mount(&mock_server)
        .await;

    let schedule = service.get_doctor_availability(&doctor_id, "token").await.unwrap();

    let days: Vec<&str> = schedule.iter().map(|entry| entry.day.as_str()).collect();
    assert_eq!(days, vec!["Sunday", "Wednesday", "Saturday"]);
}
