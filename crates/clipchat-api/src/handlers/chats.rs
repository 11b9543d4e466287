//! Chat handlers
//!
//! All chat endpoints require a session; access is participant-gated.

use axum::{
    extract::{Path, State},
    Json,
};
use clipchat_service::{ChatDetailResponse, ChatResponse, ChatService};

use crate::extractors::{AuthUser, ChatIdPath, OtherUserIdPath, Pagination};
use crate::response::{ApiResult, NoContent};
use crate::state::AppState;

/// List the caller's chats, most recently active first
///
/// GET /chats/my
pub async fn list_my_chats(
    State(state): State<AppState>,
    auth: AuthUser,
    pagination: Pagination,
) -> ApiResult<Json<Vec<ChatResponse>>> {
    let service = ChatService::new(state.service_context());
    let chats = service.list_mine(&auth.user, pagination.page()).await?;
    Ok(Json(chats))
}

/// Open (or create) the chat with another user
///
/// GET /chats/with/:other_user_id
pub async fn get_or_create_chat(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(path): Path<OtherUserIdPath>,
) -> ApiResult<Json<ChatDetailResponse>> {
    let service = ChatService::new(state.service_context());
    let chat = service
        .get_or_create(&auth.user, path.other_user_id()?)
        .await?;
    Ok(Json(chat))
}

/// Delete a chat; participants only
///
/// DELETE /chats/:chat_id
pub async fn delete_chat(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(path): Path<ChatIdPath>,
) -> ApiResult<NoContent> {
    let service = ChatService::new(state.service_context());
    service.delete(auth.user_id(), path.chat_id()?).await?;
    Ok(NoContent)
}
