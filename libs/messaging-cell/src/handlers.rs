use std::sync::Arc;

use axum::{
    extract::{Path, State, Extension},
    Json,
};
use axum_extra::TypedHeader;
use headers::{Authorization, authorization::Bearer};
use serde_json::{json, Value};

use shared_config::AppConfig;
use shared_models::auth::User;
use shared_models::error::AppError;

use crate::models::{MessagingError, SendMessageRequest};
use crate::services::messaging::MessagingService;

fn map_service_error(e: anyhow::Error) -> AppError {
    if let Some(messaging_error) = e.downcast_ref::<MessagingError>() {
        AppError::BadRequest(messaging_error.to_string())
    } else {
        AppError::Internal(e.to_string())
    }
}

#[axum::debug_handler]
pub async fn send_message(
    State(state): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
    Json(request): Json<SendMessageRequest>,
) -> Result<Json<Value>, AppError> {
    let messaging_service = MessagingService::new(&state);

    let message = messaging_service.send_message(&user.id, request, auth.token()).await
        .map_err(map_service_error)?;

    Ok(Json(json!(message)))
}

#[axum::debug_handler]
pub async fn get_conversation(
    State(state): State<Arc<AppConfig>>,
    Path(peer_id): Path<String>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
) -> Result<Json<Value>, AppError> {
    let messaging_service = MessagingService::new(&state);

    let messages = messaging_service.get_conversation(&user.id, &peer_id, auth.token()).await
        .map_err(map_service_error)?;

    Ok(Json(json!({
        "messages": messages,
        "total": messages.len()
    })))
}

#[axum::debug_handler]
pub async fn mark_conversation_read(
    State(state): State<Arc<AppConfig>>,
    Path(peer_id): Path<String>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
) -> Result<Json<Value>, AppError> {
    let messaging_service = MessagingService::new(&state);

    messaging_service.mark_conversation_read(&user.id, &peer_id, auth.token()).await
        .map_err(map_service_error)?;

    Ok(Json(json!({ "updated": true })))
}
