//! Authentication handlers
//!
//! Endpoints for user registration, login, logout, and token refresh.

use axum::{extract::State, Json};
use clipchat_service::{
    LoginRequest, LogoutRequest, LogoutResponse, RefreshTokenRequest, RegisterRequest,
    SessionService, TokenPairResponse, UserResponse,
};

use crate::extractors::{AuthUser, ValidatedJson};
use crate::response::{ApiResult, Created};
use crate::state::AppState;

/// Register a new user
///
/// POST /auth/register
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<RegisterRequest>,
) -> ApiResult<Created<Json<UserResponse>>> {
    let service = SessionService::new(state.service_context());
    let response = service.register(request).await?;
    Ok(Created(Json(response)))
}

/// Login with email and password
///
/// POST /auth/login
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<LoginRequest>,
) -> ApiResult<Json<TokenPairResponse>> {
    let service = SessionService::new(state.service_context());
    let response = service.login(request).await?;
    Ok(Json(response))
}

/// Rotate a refresh token into a fresh pair
///
/// POST /auth/refresh
pub async fn refresh_token(
    State(state): State<AppState>,
    Json(request): Json<RefreshTokenRequest>,
) -> ApiResult<Json<TokenPairResponse>> {
    let service = SessionService::new(state.service_context());
    let response = service.rotate_on_refresh(&request.refresh_token).await?;
    Ok(Json(response))
}

/// Logout by revoking the presented refresh token
///
/// POST /auth/logout
///
/// Always reports success, even for unknown tokens.
pub async fn logout(
    State(state): State<AppState>,
    Json(request): Json<LogoutRequest>,
) -> ApiResult<Json<LogoutResponse>> {
    let service = SessionService::new(state.service_context());
    service.revoke(&request.refresh_token).await?;
    Ok(Json(LogoutResponse::default()))
}

/// Get the authenticated user's own profile
///
/// GET /auth/me
pub async fn me(auth: AuthUser) -> Json<UserResponse> {
    Json(UserResponse::from(auth.user))
}
