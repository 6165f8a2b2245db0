use std::sync::Arc;

use axum::{
    Router,
    routing::get,
};

use auth_cell::router::auth_routes;
use doctor_cell::router::{doctor_routes, availability_routes};
use appointment_cell::router::appointment_routes;
use patient_cell::router::{patient_routes, medical_record_routes};
use messaging_cell::router::message_routes;
use report_cell::router::report_routes;
use admin_cell::router::admin_routes;
use dashboard_cell::router::dashboard_routes;
use shared_config::AppConfig;

pub fn create_router(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/", get(|| async { "Telemed API is running!" }))
        .nest("/auth", auth_routes(state.clone()))
        .nest("/doctors", doctor_routes(state.clone()))
        .nest("/availability", availability_routes(state.clone()))
        .nest("/appointments", appointment_routes(state.clone()))
        .nest("/patients", patient_routes(state.clone()))
        .nest("/medical-records", medical_record_routes(state.clone()))
        .nest("/messages", message_routes(state.clone()))
        .nest("/reports", report_routes(state.clone()))
        .nest("/admin", admin_routes(state.clone()))
        .nest("/dashboard", dashboard_routes(state))
}
