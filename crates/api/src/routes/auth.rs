//! Registration and login.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::info;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::metrics::record_user_registered;
use crate::services::AuthService;

/// Request body for user registration.
///
/// Missing fields deserialize as empty strings and fail validation.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(default)]
pub struct RegisterRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 1, max = 128, message = "Password must be 1-128 characters"))]
    pub password: String,

    #[validate(
        custom(function = "shared::validation::validate_not_blank"),
        length(max = 100, message = "Nickname must be at most 100 characters")
    )]
    pub nickname: String,
}

/// Request body for login.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(default)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "Email is required"))]
    pub email: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Session token returned by register and login.
#[derive(Debug, Clone, Serialize)]
pub struct TokenResponse {
    pub jwt: String,
}

/// POST /api/auth/register
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    request.validate()?;

    let auth_service = AuthService::new(state.pool.clone(), state.jwt.clone());
    let result = auth_service
        .register(&request.email, &request.password, &request.nickname)
        .await?;

    record_user_registered();
    info!(user_id = %result.user_id, "User registered");

    Ok(Json(TokenResponse { jwt: result.token }))
}

/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    request.validate()?;

    let auth_service = AuthService::new(state.pool.clone(), state.jwt.clone());
    let result = auth_service.login(&request.email, &request.password).await?;

    info!(user_id = %result.user_id, "User logged in");

    Ok(Json(TokenResponse { jwt: result.token }))
}
