//! User handlers
//!
//! Endpoints for user listing, profiles, watch history, and account deletion.

use axum::{
    extract::{Path, State},
    Json,
};
use clipchat_service::{UserResponse, UserService, WatchHistoryResponse};

use crate::extractors::{AuthUser, Pagination, UserIdPath};
use crate::response::{ApiResult, NoContent};
use crate::state::AppState;

/// List users
///
/// GET /users
pub async fn list_users(
    State(state): State<AppState>,
    _auth: AuthUser,
    pagination: Pagination,
) -> ApiResult<Json<Vec<UserResponse>>> {
    let service = UserService::new(state.service_context());
    let users = service.list(pagination.page()).await?;
    Ok(Json(users))
}

/// Get a user's profile
///
/// GET /users/:user_id
pub async fn get_user(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(path): Path<UserIdPath>,
) -> ApiResult<Json<UserResponse>> {
    let service = UserService::new(state.service_context());
    let user = service.get(path.user_id()?).await?;
    Ok(Json(user))
}

/// List a user's watch history; self only
///
/// GET /users/:user_id/history
pub async fn get_user_history(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(path): Path<UserIdPath>,
    pagination: Pagination,
) -> ApiResult<Json<Vec<WatchHistoryResponse>>> {
    let service = UserService::new(state.service_context());
    let history = service
        .watch_history(auth.user_id(), path.user_id()?, pagination.page())
        .await?;
    Ok(Json(history))
}

/// Delete the authenticated user's own account
///
/// DELETE /users/me
pub async fn delete_me(State(state): State<AppState>, auth: AuthUser) -> ApiResult<NoContent> {
    let service = UserService::new(state.service_context());
    service.delete_account(auth.user_id()).await?;
    Ok(NoContent)
}
