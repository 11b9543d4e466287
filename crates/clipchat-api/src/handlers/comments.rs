//! Comment handlers
//!
//! Listing is anonymous; writing requires a session and mutation is
//! author-gated.

use axum::{
    extract::{Path, State},
    Json,
};
use clipchat_service::{CommentContentRequest, CommentResponse, CommentService};

use crate::extractors::{AuthUser, CommentIdPath, Pagination, ValidatedJson, VideoIdPath};
use crate::response::{ApiResult, Created, NoContent};
use crate::state::AppState;

/// List a video's comments (anonymous)
///
/// GET /videos/:video_id/comments
pub async fn list_comments(
    State(state): State<AppState>,
    Path(path): Path<VideoIdPath>,
    pagination: Pagination,
) -> ApiResult<Json<Vec<CommentResponse>>> {
    let service = CommentService::new(state.service_context());
    let comments = service.list(path.video_id()?, pagination.page()).await?;
    Ok(Json(comments))
}

/// Comment on a video
///
/// POST /videos/:video_id/comments
pub async fn create_comment(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(path): Path<VideoIdPath>,
    ValidatedJson(request): ValidatedJson<CommentContentRequest>,
) -> ApiResult<Created<Json<CommentResponse>>> {
    let service = CommentService::new(state.service_context());
    let comment = service
        .create(&auth.user, path.video_id()?, request)
        .await?;
    Ok(Created(Json(comment)))
}

/// Edit a comment; author only
///
/// PUT /videos/:video_id/comments/:comment_id
pub async fn update_comment(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(path): Path<CommentIdPath>,
    ValidatedJson(request): ValidatedJson<CommentContentRequest>,
) -> ApiResult<Json<CommentResponse>> {
    let service = CommentService::new(state.service_context());
    let comment = service
        .update(&auth.user, path.video_id()?, path.comment_id()?, request)
        .await?;
    Ok(Json(comment))
}

/// Delete a comment; author only
///
/// DELETE /videos/:video_id/comments/:comment_id
pub async fn delete_comment(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(path): Path<CommentIdPath>,
) -> ApiResult<NoContent> {
    let service = CommentService::new(state.service_context());
    service
        .delete(auth.user_id(), path.video_id()?, path.comment_id()?)
        .await?;
    Ok(NoContent)
}
