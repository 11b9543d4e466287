//! Video service
//!
//! Listing, detail, metadata import/upload, author-gated mutation, and
//! watch tracking.

use clipchat_core::entities::{User, Video, WatchHistory};
use clipchat_core::error::DomainError;
use clipchat_core::{Snowflake, VideoQuery};
use tracing::{info, instrument};

use crate::dto::{
    CreateVideoRequest, TrackWatchRequest, UpdateVideoRequest, VideoListItemResponse,
    VideoResponse,
};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// Video service
pub struct VideoService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> VideoService<'a> {
    /// Create a new VideoService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// List videos; open to anonymous callers
    #[instrument(skip(self))]
    pub async fn list(&self, query: VideoQuery) -> ServiceResult<Vec<VideoListItemResponse>> {
        let listings = self.ctx.video_repo().list(&query).await?;
        Ok(listings
            .into_iter()
            .map(VideoListItemResponse::from)
            .collect())
    }

    /// Fetch one video, counting the view
    #[instrument(skip(self))]
    pub async fn get(&self, video_id: Snowflake) -> ServiceResult<VideoResponse> {
        let mut video = self
            .ctx
            .video_repo()
            .find_by_id(video_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Video", video_id.to_string()))?;

        video.views_count = self.ctx.video_repo().increment_views(video_id).await?;

        let author_name = self
            .ctx
            .user_repo()
            .find_by_id(video.author_id)
            .await?
            .map(|u| u.username)
            .unwrap_or_default();

        let comments_count = self.ctx.video_repo().comment_count(video_id).await?;

        Ok(VideoResponse::from_parts(video, author_name, comments_count))
    }

    /// Create a video record (backs both the import and upload endpoints;
    /// the media itself already lives behind the given URL)
    #[instrument(skip(self, author, request), fields(author_id = %author.id))]
    pub async fn create(
        &self,
        author: &User,
        request: CreateVideoRequest,
    ) -> ServiceResult<VideoResponse> {
        let mut video = Video::new(
            self.ctx.generate_id(),
            request.title,
            request.video_url,
            author.id,
        );
        video.description = request.description;
        video.thumbnail_url = request.thumbnail_url;
        video.duration = request.duration;

        self.ctx.video_repo().create(&video).await?;

        info!(video_id = %video.id, "Video created");

        Ok(VideoResponse::from_parts(
            video,
            author.username.clone(),
            0,
        ))
    }

    /// Update video metadata; author only
    #[instrument(skip(self, author, request), fields(author_id = %author.id))]
    pub async fn update(
        &self,
        author: &User,
        video_id: Snowflake,
        request: UpdateVideoRequest,
    ) -> ServiceResult<VideoResponse> {
        let mut video = self
            .ctx
            .video_repo()
            .find_by_id(video_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Video", video_id.to_string()))?;

        if !video.is_author(author.id) {
            return Err(ServiceError::Domain(DomainError::NotVideoAuthor));
        }

        if let Some(title) = request.title {
            video.title = title;
        }
        if let Some(description) = request.description {
            video.description = Some(description);
        }
        if let Some(video_url) = request.video_url {
            video.video_url = video_url;
        }
        if let Some(thumbnail_url) = request.thumbnail_url {
            video.thumbnail_url = Some(thumbnail_url);
        }
        if let Some(duration) = request.duration {
            video.duration = Some(duration);
        }

        self.ctx.video_repo().update(&video).await?;

        let comments_count = self.ctx.video_repo().comment_count(video_id).await?;

        Ok(VideoResponse::from_parts(
            video,
            author.username.clone(),
            comments_count,
        ))
    }

    /// Delete a video; author only, dependent comments cascade
    #[instrument(skip(self))]
    pub async fn delete(&self, author_id: Snowflake, video_id: Snowflake) -> ServiceResult<()> {
        let video = self
            .ctx
            .video_repo()
            .find_by_id(video_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Video", video_id.to_string()))?;

        if !video.is_author(author_id) {
            return Err(ServiceError::Domain(DomainError::NotVideoAuthor));
        }

        self.ctx.video_repo().delete(video_id).await?;

        info!(%video_id, "Video deleted");
        Ok(())
    }

    /// Record or update the caller's watch-history row for a video
    #[instrument(skip(self, request))]
    pub async fn track_watch(
        &self,
        user_id: Snowflake,
        video_id: Snowflake,
        request: TrackWatchRequest,
    ) -> ServiceResult<()> {
        if self.ctx.video_repo().find_by_id(video_id).await?.is_none() {
            return Err(ServiceError::not_found("Video", video_id.to_string()));
        }

        let entry = WatchHistory::new(
            self.ctx.generate_id(),
            user_id,
            video_id,
            request.watch_duration,
            request.completed,
        );
        self.ctx.watch_history_repo().upsert(&entry).await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dto::{RegisterRequest, UserResponse};
    use crate::services::session::SessionService;
    use crate::services::testing::test_context;
    use crate::services::user::UserService;
    use clipchat_core::Page;

    async fn register(ctx: &ServiceContext, email: &str, username: &str) -> User {
        let profile: UserResponse = SessionService::new(ctx)
            .register(RegisterRequest {
                email: email.to_string(),
                username: username.to_string(),
                password: "secret1".to_string(),
            })
            .await
            .unwrap();
        ctx.user_repo().find_by_id(profile.id).await.unwrap().unwrap()
    }

    fn video_request(title: &str) -> CreateVideoRequest {
        CreateVideoRequest {
            title: title.to_string(),
            description: Some("a lesson".to_string()),
            video_url: "https://cdn.example.com/v.mp4".to_string(),
            thumbnail_url: None,
            duration: Some(300),
        }
    }

    #[tokio::test]
    async fn test_detail_counts_views() {
        let ctx = test_context();
        let alice = register(&ctx, "a@x.com", "alice").await;
        let service = VideoService::new(&ctx);

        let created = service.create(&alice, video_request("Intro")).await.unwrap();
        assert_eq!(created.views_count, 0);

        let first = service.get(created.id).await.unwrap();
        let second = service.get(created.id).await.unwrap();
        assert_eq!(first.views_count, 1);
        assert_eq!(second.views_count, 2);
        assert_eq!(second.author_name, "alice");
    }

    #[tokio::test]
    async fn test_only_author_may_delete() {
        let ctx = test_context();
        let alice = register(&ctx, "a@x.com", "alice").await;
        let bob = register(&ctx, "b@x.com", "bob").await;
        let service = VideoService::new(&ctx);

        let video = service.create(&alice, video_request("Intro")).await.unwrap();

        let denied = service.delete(bob.id, video.id).await;
        assert_eq!(denied.unwrap_err().status_code(), 403);

        service.delete(alice.id, video.id).await.unwrap();
        assert_eq!(
            service.get(video.id).await.unwrap_err().status_code(),
            404
        );
    }

    #[tokio::test]
    async fn test_only_author_may_update() {
        let ctx = test_context();
        let alice = register(&ctx, "a@x.com", "alice").await;
        let bob = register(&ctx, "b@x.com", "bob").await;
        let service = VideoService::new(&ctx);

        let video = service.create(&alice, video_request("Intro")).await.unwrap();

        let request = UpdateVideoRequest {
            title: Some("Renamed".to_string()),
            description: None,
            video_url: None,
            thumbnail_url: None,
            duration: None,
        };
        let denied = service.update(&bob, video.id, request.clone()).await;
        assert_eq!(denied.unwrap_err().status_code(), 403);

        let updated = service.update(&alice, video.id, request).await.unwrap();
        assert_eq!(updated.title, "Renamed");
        // Untouched fields survive a partial update
        assert_eq!(updated.duration, Some(300));
    }

    #[tokio::test]
    async fn test_listing_search_filters_by_title() {
        let ctx = test_context();
        let alice = register(&ctx, "a@x.com", "alice").await;
        let service = VideoService::new(&ctx);

        service.create(&alice, video_request("Rust intro")).await.unwrap();
        service.create(&alice, video_request("Cooking show")).await.unwrap();

        let query = VideoQuery {
            search: Some("rust".to_string()),
            ..VideoQuery::default()
        };
        let hits = service.list(query).await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].title, "Rust intro");
    }

    #[tokio::test]
    async fn test_track_watch_upserts_single_row() {
        let ctx = test_context();
        let alice = register(&ctx, "a@x.com", "alice").await;
        let service = VideoService::new(&ctx);

        let video = service.create(&alice, video_request("Intro")).await.unwrap();

        service
            .track_watch(
                alice.id,
                video.id,
                TrackWatchRequest {
                    watch_duration: 30,
                    completed: false,
                },
            )
            .await
            .unwrap();
        service
            .track_watch(
                alice.id,
                video.id,
                TrackWatchRequest {
                    watch_duration: 290,
                    completed: true,
                },
            )
            .await
            .unwrap();

        let history = UserService::new(&ctx)
            .watch_history(alice.id, alice.id, Page::default())
            .await
            .unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].watch_duration, 290);
        assert!(history[0].completed);
        assert_eq!(history[0].video_title, "Intro");
    }
}
