use std::sync::Arc;

use axum::{
    extract::{State, Extension},
    Json,
};
use axum_extra::TypedHeader;
use headers::{Authorization, authorization::Bearer};
use serde_json::{json, Value};

use shared_config::AppConfig;
use shared_models::auth::User;
use shared_models::error::AppError;

use crate::models::DashboardSummary;
use crate::services::dashboard::DashboardService;

#[axum::debug_handler]
pub async fn get_dashboard(
    State(state): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
) -> Result<Json<Value>, AppError> {
    let dashboard_service = DashboardService::new(&state);

    let view = dashboard_service.compose_for(&user, auth.token()).await
        .map_err(|e| AppError::Internal(e.to_string()))?;

    Ok(Json(json!({
        "headline": view.headline(),
        "actions": view.actions(),
        "view": view
    })))
}
