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

use crate::models::UpdateUserStatusRequest;
use crate::services::{stats::AdminStatsService, users::UserAdministrationService};

fn require_admin(user: &User) -> Result<(), AppError> {
    if !user.is_admin() {
        return Err(AppError::Auth("Administrator access required".to_string()));
    }
    Ok(())
}

#[axum::debug_handler]
pub async fn get_platform_stats(
    State(state): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
) -> Result<Json<Value>, AppError> {
    require_admin(&user)?;

    let stats_service = AdminStatsService::new(&state);

    let stats = stats_service.get_platform_stats(auth.token()).await
        .map_err(|e| AppError::Internal(e.to_string()))?;

    Ok(Json(json!(stats)))
}

#[axum::debug_handler]
pub async fn list_users(
    State(state): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
) -> Result<Json<Value>, AppError> {
    require_admin(&user)?;

    let user_service = UserAdministrationService::new(&state);

    let users = user_service.list_users(auth.token()).await
        .map_err(|e| AppError::Internal(e.to_string()))?;

    Ok(Json(json!({
        "users": users,
        "total": users.len()
    })))
}

#[axum::debug_handler]
pub async fn update_user_status(
    State(state): State<Arc<AppConfig>>,
    Path(user_id): Path<String>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
    Json(request): Json<UpdateUserStatusRequest>,
) -> Result<Json<Value>, AppError> {
    require_admin(&user)?;

    let user_service = UserAdministrationService::new(&state);

    let updated = user_service.update_user_status(&user_id, request, auth.token()).await
        .map_err(|e| AppError::Internal(e.to_string()))?;

    Ok(Json(json!(updated)))
}
