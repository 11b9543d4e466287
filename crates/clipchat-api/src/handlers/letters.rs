//! Letter handlers
//!
//! Direct messages within a chat. Fetching letters as the recipient marks
//! them read.

use axum::{
    extract::{Path, State},
    Json,
};
use clipchat_service::{LetterContentRequest, LetterResponse, LetterService};

use crate::extractors::{AuthUser, ChatIdPath, LetterIdPath, Pagination, ValidatedJson};
use crate::response::{ApiResult, Created, NoContent};
use crate::state::AppState;

/// List a chat's letters, newest first
///
/// GET /chats/:chat_id/letters
pub async fn list_letters(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(path): Path<ChatIdPath>,
    pagination: Pagination,
) -> ApiResult<Json<Vec<LetterResponse>>> {
    let service = LetterService::new(state.service_context());
    let letters = service
        .list(&auth.user, path.chat_id()?, pagination.page())
        .await?;
    Ok(Json(letters))
}

/// Send a letter
///
/// POST /chats/:chat_id/letters
pub async fn create_letter(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(path): Path<ChatIdPath>,
    ValidatedJson(request): ValidatedJson<LetterContentRequest>,
) -> ApiResult<Created<Json<LetterResponse>>> {
    let service = LetterService::new(state.service_context());
    let letter = service.create(&auth.user, path.chat_id()?, request).await?;
    Ok(Created(Json(letter)))
}

/// Total unread letters across all the caller's chats
///
/// GET /chats/letters/unread/count
pub async fn unread_count(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<i64>> {
    let service = LetterService::new(state.service_context());
    let count = service.unread_count(auth.user_id()).await?;
    Ok(Json(count))
}

/// Fetch one letter; reading it as the recipient marks it read
///
/// GET /chats/:chat_id/letters/:letter_id
pub async fn get_letter(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(path): Path<LetterIdPath>,
) -> ApiResult<Json<LetterResponse>> {
    let service = LetterService::new(state.service_context());
    let letter = service
        .get(&auth.user, path.chat_id()?, path.letter_id()?)
        .await?;
    Ok(Json(letter))
}

/// Edit a letter; author only
///
/// PUT /chats/:chat_id/letters/:letter_id
pub async fn update_letter(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(path): Path<LetterIdPath>,
    ValidatedJson(request): ValidatedJson<LetterContentRequest>,
) -> ApiResult<Json<LetterResponse>> {
    let service = LetterService::new(state.service_context());
    let letter = service
        .update(&auth.user, path.chat_id()?, path.letter_id()?, request)
        .await?;
    Ok(Json(letter))
}

/// Delete a letter; author only
///
/// DELETE /chats/:chat_id/letters/:letter_id
pub async fn delete_letter(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(path): Path<LetterIdPath>,
) -> ApiResult<NoContent> {
    let service = LetterService::new(state.service_context());
    service
        .delete(auth.user_id(), path.chat_id()?, path.letter_id()?)
        .await?;
    Ok(NoContent)
}

/// Explicitly mark a letter read; rejected for its own author
///
/// POST /chats/:chat_id/letters/:letter_id/read
pub async fn mark_letter_read(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(path): Path<LetterIdPath>,
) -> ApiResult<Json<LetterResponse>> {
    let service = LetterService::new(state.service_context());
    let letter = service
        .mark_read(&auth.user, path.chat_id()?, path.letter_id()?)
        .await?;
    Ok(Json(letter))
}
