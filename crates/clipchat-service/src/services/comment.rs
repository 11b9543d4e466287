//! Comment service
//!
//! Comment listing is anonymous; creation requires a session and
//! mutation/deletion is author-gated.

use clipchat_core::entities::{Comment, User};
use clipchat_core::error::DomainError;
use clipchat_core::{Page, Snowflake};
use tracing::{info, instrument};

use crate::dto::{CommentContentRequest, CommentResponse};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// Comment service
pub struct CommentService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> CommentService<'a> {
    /// Create a new CommentService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// List a video's comments, newest first
    #[instrument(skip(self))]
    pub async fn list(
        &self,
        video_id: Snowflake,
        page: Page,
    ) -> ServiceResult<Vec<CommentResponse>> {
        if self.ctx.video_repo().find_by_id(video_id).await?.is_none() {
            return Err(ServiceError::not_found("Video", video_id.to_string()));
        }

        let comments = self.ctx.comment_repo().find_by_video(video_id, page).await?;

        Ok(comments
            .into_iter()
            .map(|(comment, author_name)| CommentResponse::from_parts(comment, author_name))
            .collect())
    }

    /// Create a comment on a video
    #[instrument(skip(self, author, request), fields(author_id = %author.id))]
    pub async fn create(
        &self,
        author: &User,
        video_id: Snowflake,
        request: CommentContentRequest,
    ) -> ServiceResult<CommentResponse> {
        if self.ctx.video_repo().find_by_id(video_id).await?.is_none() {
            return Err(ServiceError::not_found("Video", video_id.to_string()));
        }

        let comment = Comment::new(self.ctx.generate_id(), video_id, author.id, request.content);
        self.ctx.comment_repo().create(&comment).await?;

        info!(comment_id = %comment.id, %video_id, "Comment created");

        Ok(CommentResponse::from_parts(comment, author.username.clone()))
    }

    /// Edit a comment; author only
    #[instrument(skip(self, author, request), fields(author_id = %author.id))]
    pub async fn update(
        &self,
        author: &User,
        video_id: Snowflake,
        comment_id: Snowflake,
        request: CommentContentRequest,
    ) -> ServiceResult<CommentResponse> {
        let mut comment = self.find_in_video(video_id, comment_id).await?;

        if !comment.is_author(author.id) {
            return Err(ServiceError::Domain(DomainError::NotCommentAuthor));
        }

        comment.edit(request.content);
        self.ctx.comment_repo().update(&comment).await?;

        Ok(CommentResponse::from_parts(comment, author.username.clone()))
    }

    /// Delete a comment; author only
    #[instrument(skip(self))]
    pub async fn delete(
        &self,
        author_id: Snowflake,
        video_id: Snowflake,
        comment_id: Snowflake,
    ) -> ServiceResult<()> {
        let comment = self.find_in_video(video_id, comment_id).await?;

        if !comment.is_author(author_id) {
            return Err(ServiceError::Domain(DomainError::NotCommentAuthor));
        }

        self.ctx.comment_repo().delete(comment_id).await?;

        info!(%comment_id, "Comment deleted");
        Ok(())
    }

    /// Resolve a comment and require it to belong to the routed video
    async fn find_in_video(
        &self,
        video_id: Snowflake,
        comment_id: Snowflake,
    ) -> ServiceResult<Comment> {
        let comment = self
            .ctx
            .comment_repo()
            .find_by_id(comment_id)
            .await?
            .filter(|c| c.video_id == video_id)
            .ok_or_else(|| ServiceError::not_found("Comment", comment_id.to_string()))?;

        Ok(comment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dto::{CreateVideoRequest, RegisterRequest};
    use crate::services::session::SessionService;
    use crate::services::testing::test_context;
    use crate::services::video::VideoService;

    async fn register(ctx: &ServiceContext, email: &str, username: &str) -> User {
        let profile = SessionService::new(ctx)
            .register(RegisterRequest {
                email: email.to_string(),
                username: username.to_string(),
                password: "secret1".to_string(),
            })
            .await
            .unwrap();
        ctx.user_repo().find_by_id(profile.id).await.unwrap().unwrap()
    }

    async fn create_video(ctx: &ServiceContext, author: &User) -> Snowflake {
        VideoService::new(ctx)
            .create(
                author,
                CreateVideoRequest {
                    title: "Intro".to_string(),
                    description: None,
                    video_url: "https://cdn.example.com/v.mp4".to_string(),
                    thumbnail_url: None,
                    duration: None,
                },
            )
            .await
            .unwrap()
            .id
    }

    fn content(text: &str) -> CommentContentRequest {
        CommentContentRequest {
            content: text.to_string(),
        }
    }

    #[tokio::test]
    async fn test_listing_carries_author_names() {
        let ctx = test_context();
        let alice = register(&ctx, "a@x.com", "alice").await;
        let bob = register(&ctx, "b@x.com", "bob").await;
        let video_id = create_video(&ctx, &alice).await;
        let service = CommentService::new(&ctx);

        service.create(&alice, video_id, content("first")).await.unwrap();
        service.create(&bob, video_id, content("second")).await.unwrap();

        let comments = service.list(video_id, Page::default()).await.unwrap();
        assert_eq!(comments.len(), 2);
        let names: Vec<&str> = comments.iter().map(|c| c.author_name.as_str()).collect();
        assert!(names.contains(&"alice"));
        assert!(names.contains(&"bob"));
    }

    #[tokio::test]
    async fn test_only_author_may_edit_or_delete() {
        let ctx = test_context();
        let alice = register(&ctx, "a@x.com", "alice").await;
        let bob = register(&ctx, "b@x.com", "bob").await;
        let video_id = create_video(&ctx, &alice).await;
        let service = CommentService::new(&ctx);

        let comment = service.create(&alice, video_id, content("mine")).await.unwrap();

        let edit = service
            .update(&bob, video_id, comment.id, content("stolen"))
            .await;
        assert_eq!(edit.unwrap_err().status_code(), 403);

        let delete = service.delete(bob.id, video_id, comment.id).await;
        assert_eq!(delete.unwrap_err().status_code(), 403);

        let edited = service
            .update(&alice, video_id, comment.id, content("fixed"))
            .await
            .unwrap();
        assert_eq!(edited.content, "fixed");

        service.delete(alice.id, video_id, comment.id).await.unwrap();
    }

    #[tokio::test]
    async fn test_comment_must_belong_to_routed_video() {
        let ctx = test_context();
        let alice = register(&ctx, "a@x.com", "alice").await;
        let first = create_video(&ctx, &alice).await;
        let second = create_video(&ctx, &alice).await;
        let service = CommentService::new(&ctx);

        let comment = service.create(&alice, first, content("hi")).await.unwrap();

        let result = service
            .update(&alice, second, comment.id, content("nope"))
            .await;
        assert_eq!(result.unwrap_err().status_code(), 404);
    }

    #[tokio::test]
    async fn test_commenting_on_missing_video_fails() {
        let ctx = test_context();
        let alice = register(&ctx, "a@x.com", "alice").await;
        let service = CommentService::new(&ctx);

        let result = service
            .create(&alice, Snowflake::new(999), content("hello"))
            .await;
        assert_eq!(result.unwrap_err().status_code(), 404);
    }
}
