//! Video handlers
//!
//! Listing and detail are anonymous; everything else requires a session.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use clipchat_core::{SortOrder, VideoQuery, VideoSortKey};
use clipchat_service::{
    CreateVideoRequest, TrackWatchRequest, UpdateVideoRequest, VideoListItemResponse,
    VideoResponse, VideoService,
};
use serde::Deserialize;

use crate::extractors::{AuthUser, Pagination, ValidatedJson, VideoIdPath};
use crate::response::{ApiError, ApiResult, Created, NoContent};
use crate::state::AppState;

/// Raw listing query parameters
#[derive(Debug, Deserialize)]
pub struct ListVideosParams {
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub sort_by: Option<String>,
    #[serde(default)]
    pub order: Option<String>,
}

impl ListVideosParams {
    fn into_query(self, pagination: Pagination) -> Result<VideoQuery, ApiError> {
        let sort_by = match self.sort_by.as_deref() {
            None | Some("created_at") => VideoSortKey::CreatedAt,
            Some("views_count") => VideoSortKey::ViewsCount,
            Some("title") => VideoSortKey::Title,
            Some(other) => {
                return Err(ApiError::invalid_query(format!(
                    "unknown sort key: {other}"
                )))
            }
        };

        let order = match self.order.as_deref() {
            None | Some("desc") => SortOrder::Desc,
            Some("asc") => SortOrder::Asc,
            Some(other) => {
                return Err(ApiError::invalid_query(format!(
                    "unknown sort order: {other}"
                )))
            }
        };

        Ok(VideoQuery {
            search: self.search.filter(|s| !s.is_empty()),
            sort_by,
            order,
            page: pagination.page(),
        })
    }
}

/// List videos (anonymous)
///
/// GET /videos
pub async fn list_videos(
    State(state): State<AppState>,
    Query(params): Query<ListVideosParams>,
    pagination: Pagination,
) -> ApiResult<Json<Vec<VideoListItemResponse>>> {
    let query = params.into_query(pagination)?;
    let service = VideoService::new(state.service_context());
    let videos = service.list(query).await?;
    Ok(Json(videos))
}

/// Get one video, counting the view (anonymous)
///
/// GET /videos/:video_id
pub async fn get_video(
    State(state): State<AppState>,
    Path(path): Path<VideoIdPath>,
) -> ApiResult<Json<VideoResponse>> {
    let service = VideoService::new(state.service_context());
    let video = service.get(path.video_id()?).await?;
    Ok(Json(video))
}

/// Import video metadata (a link to an already hosted video)
///
/// POST /videos/import
pub async fn import_video(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(request): ValidatedJson<CreateVideoRequest>,
) -> ApiResult<Created<Json<VideoResponse>>> {
    let service = VideoService::new(state.service_context());
    let video = service.create(&auth.user, request).await?;
    Ok(Created(Json(video)))
}

/// Upload video metadata
///
/// POST /videos/upload
///
/// The media file itself is expected at `video_url`; only metadata is stored.
pub async fn upload_video(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(request): ValidatedJson<CreateVideoRequest>,
) -> ApiResult<Created<Json<VideoResponse>>> {
    let service = VideoService::new(state.service_context());
    let video = service.create(&auth.user, request).await?;
    Ok(Created(Json(video)))
}

/// Update video metadata; author only
///
/// PUT /videos/:video_id
pub async fn update_video(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(path): Path<VideoIdPath>,
    ValidatedJson(request): ValidatedJson<UpdateVideoRequest>,
) -> ApiResult<Json<VideoResponse>> {
    let service = VideoService::new(state.service_context());
    let video = service.update(&auth.user, path.video_id()?, request).await?;
    Ok(Json(video))
}

/// Delete a video; author only
///
/// DELETE /videos/:video_id
pub async fn delete_video(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(path): Path<VideoIdPath>,
) -> ApiResult<NoContent> {
    let service = VideoService::new(state.service_context());
    service.delete(auth.user_id(), path.video_id()?).await?;
    Ok(NoContent)
}

/// Record watch progress for a video
///
/// POST /videos/:video_id/watch
pub async fn track_watch(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(path): Path<VideoIdPath>,
    ValidatedJson(request): ValidatedJson<TrackWatchRequest>,
) -> ApiResult<Json<serde_json::Value>> {
    let service = VideoService::new(state.service_context());
    service
        .track_watch(auth.user_id(), path.video_id()?, request)
        .await?;
    Ok(Json(serde_json::json!({ "message": "Watch history updated" })))
}
