use std::sync::Arc;
use axum::{middleware, routing::{get, post, patch}, Router};
use shared_config::AppConfig;
use shared_utils::extractor::auth_middleware;

use crate::handlers;

pub fn message_routes(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/", post(handlers::send_message))
        .route("/{peer_id}", get(handlers::get_conversation))
        .route("/{peer_id}/read", patch(handlers::mark_conversation_read))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware))
        .with_state(state)
}
