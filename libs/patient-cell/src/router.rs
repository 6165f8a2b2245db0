use std::sync::Arc;
use axum::{middleware, routing::{get, post, put}, Router};
use shared_config::AppConfig;
use shared_utils::extractor::auth_middleware;

use crate::handlers;

pub fn patient_routes(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/me", get(handlers::get_my_profile))
        .route("/me", put(handlers::save_my_profile))
        .route("/{patient_id}", get(handlers::get_patient))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware))
        .with_state(state)
}

pub fn medical_record_routes(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/", post(handlers::create_medical_record))
        .route("/{patient_id}", get(handlers::list_medical_records))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware))
        .with_state(state)
}
