use std::sync::Arc;
use axum::{middleware, routing::{get, patch}, Router};
use shared_config::AppConfig;
use shared_utils::extractor::auth_middleware;

use crate::handlers;

pub fn admin_routes(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/stats", get(handlers::get_platform_stats))
        .route("/users", get(handlers::list_users))
        .route("/users/{user_id}/status", patch(handlers::update_user_status))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware))
        .with_state(state)
}
