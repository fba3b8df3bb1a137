//! Account handlers: signup, login, me.

use axum::extract::State;
use axum::Json;

use acadhub_core::error::AppError;
use acadhub_service::account::SignupRequest;

use crate::dto::request::LoginRequest;
use crate::dto::response::{ApiResponse, AuthResponse, UserResponse};
use crate::extractors::AuthUser;
use crate::state::AppState;

/// POST /user/signup
pub async fn signup(
    State(state): State<AppState>,
    Json(req): Json<SignupRequest>,
) -> Result<Json<ApiResponse<AuthResponse>>, AppError> {
    let (user, token) = state.account_service.signup(req).await?;
    Ok(Json(ApiResponse::ok(AuthResponse {
        token,
        user: user.into(),
    })))
}

/// POST /user/login
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<ApiResponse<AuthResponse>>, AppError> {
    let (user, token) = state.account_service.login(&req.email, &req.password).await?;
    Ok(Json(ApiResponse::ok(AuthResponse {
        token,
        user: user.into(),
    })))
}

/// GET /user/me
pub async fn me(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<UserResponse>>, AppError> {
    let user = state.account_service.me(auth.context()).await?;
    Ok(Json(ApiResponse::ok(user.into())))
}
