use std::sync::Arc;

use axum::{
    extract::{State, Extension},
    http::HeaderMap,
    Json,
};
use serde_json::{json, Value};
use reqwest::Method;
use tracing::debug;

use shared_config::AppConfig;
use shared_database::supabase::SupabaseClient;
use shared_models::auth::{TokenResponse, User};
use shared_models::error::AppError;
use shared_utils::jwt::validate_token;

// Helper function to extract token
fn extract_bearer_token(headers: &HeaderMap) -> Result<String, AppError> {
    let auth_header = headers
        .get("Authorization")
        .ok_or_else(|| AppError::Auth("Missing authorization header".to_string()))?;

    let auth_value = auth_header
        .to_str()
        .map_err(|_| AppError::Auth("Invalid authorization header format".to_string()))?;

    if !auth_value.starts_with("Bearer ") {
        return Err(AppError::Auth("Invalid authorization header format".to_string()));
    }

    Ok(auth_value[7..].to_string())
}

#[axum::debug_handler]
pub async fn validate(
    State(config): State<Arc<AppConfig>>,
    headers: HeaderMap,
) -> Result<Json<TokenResponse>, AppError> {
    debug!("Validating token");

    let token = extract_bearer_token(&headers)?;

    match validate_token(&token, &config.supabase_jwt_secret) {
        Ok(user) => {
            let response = TokenResponse {
                valid: true,
                user_id: user.id,
                email: user.email,
                role: user.role,
            };

            Ok(Json(response))
        },
        Err(err) => {
            Err(AppError::Auth(err))
        }
    }
}

#[axum::debug_handler]
pub async fn verify(
    State(config): State<Arc<AppConfig>>,
    headers: HeaderMap,
) -> Result<Json<Value>, AppError> {
    debug!("Verifying token");

    let token = extract_bearer_token(&headers)?;

    match validate_token(&token, &config.supabase_jwt_secret) {
        Ok(_) => Ok(Json(json!({ "valid": true }))),
        Err(_) => Ok(Json(json!({ "valid": false }))),
    }
}

/// The caller's identity plus the role-side profile row, when one has
/// been created.
#[axum::debug_handler]
pub async fn get_profile(
    State(config): State<Arc<AppConfig>>,
    headers: HeaderMap,
    Extension(user): Extension<User>,
) -> Result<Json<Value>, AppError> {
    debug!("Getting profile for user: {}", user.id);

    let token = extract_bearer_token(&headers)?;

    let client = SupabaseClient::new(&config);

    let auth_profile = client.get_user_profile(&user.id, &token)
        .await
        .map_err(|e| AppError::ExternalService(e.to_string()))?;

    let profile_table = if user.is_doctor() { "doctors" } else { "patients" };
    let path = format!("/rest/v1/{}?id=eq.{}", profile_table, user.id);
    let rows: Vec<Value> = client.request(
        Method::GET,
        &path,
        Some(&token),
        None,
    ).await.map_err(|e| AppError::ExternalService(e.to_string()))?;

    let role_profile = rows.into_iter().next().unwrap_or(Value::Null);

    Ok(Json(json!({
        "auth": auth_profile,
        "role": user.role,
        "profile": role_profile
    })))
}
