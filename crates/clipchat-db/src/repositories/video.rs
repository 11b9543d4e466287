//! PostgreSQL implementation of VideoRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use clipchat_core::entities::Video;
use clipchat_core::traits::{
    RepoResult, SortOrder, VideoListing, VideoQuery, VideoRepository, VideoSortKey,
};
use clipchat_core::value_objects::Snowflake;

use crate::models::{VideoListingModel, VideoModel};

use super::error::{map_db_error, video_not_found};

/// PostgreSQL implementation of VideoRepository
#[derive(Clone)]
pub struct PgVideoRepository {
    pool: PgPool,
}

impl PgVideoRepository {
    /// Create a new PgVideoRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Map the sort key to the column it orders by. Keys are a closed enum, so
/// the interpolation below never sees untrusted input.
fn sort_column(key: VideoSortKey) -> &'static str {
    match key {
        VideoSortKey::CreatedAt => "created_at",
        VideoSortKey::ViewsCount => "views_count",
        VideoSortKey::Title => "title",
    }
}

fn sort_direction(order: SortOrder) -> &'static str {
    match order {
        SortOrder::Asc => "ASC",
        SortOrder::Desc => "DESC",
    }
}

#[async_trait]
impl VideoRepository for PgVideoRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Video>> {
        let result = sqlx::query_as::<_, VideoModel>(
            r"
            SELECT id, title, description, video_url, thumbnail_url, duration,
                   author_id, views_count, likes_count, created_at, updated_at
            FROM videos
            WHERE id = $1
            ",
        )
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Video::from))
    }

    #[instrument(skip(self))]
    async fn list(&self, query: &VideoQuery) -> RepoResult<Vec<VideoListing>> {
        let sql = format!(
            r"
            SELECT v.id, v.title, v.description, v.video_url, v.thumbnail_url, v.duration,
                   v.author_id, v.views_count, v.likes_count, v.created_at, v.updated_at,
                   u.username AS author_name,
                   COUNT(c.id) AS comments_count
            FROM videos v
            JOIN users u ON u.id = v.author_id
            LEFT JOIN comments c ON c.video_id = v.id
            WHERE ($1::text IS NULL OR v.title ILIKE '%' || $1 || '%')
            GROUP BY v.id, u.username
            ORDER BY v.{} {}
            OFFSET $2 LIMIT $3
            ",
            sort_column(query.sort_by),
            sort_direction(query.order),
        );

        let results = sqlx::query_as::<_, VideoListingModel>(&sql)
            .bind(query.search.as_deref())
            .bind(query.page.offset)
            .bind(query.page.limit)
            .fetch_all(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(results
            .into_iter()
            .map(|row| VideoListing {
                video: Video::from(row.video),
                author_name: row.author_name,
                comments_count: row.comments_count,
            })
            .collect())
    }

    #[instrument(skip(self, video), fields(video_id = %video.id))]
    async fn create(&self, video: &Video) -> RepoResult<()> {
        sqlx::query(
            r"
            INSERT INTO videos (id, title, description, video_url, thumbnail_url, duration,
                                author_id, views_count, likes_count, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            ",
        )
        .bind(video.id.into_inner())
        .bind(&video.title)
        .bind(&video.description)
        .bind(&video.video_url)
        .bind(&video.thumbnail_url)
        .bind(video.duration)
        .bind(video.author_id.into_inner())
        .bind(video.views_count)
        .bind(video.likes_count)
        .bind(video.created_at)
        .bind(video.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self, video), fields(video_id = %video.id))]
    async fn update(&self, video: &Video) -> RepoResult<()> {
        let result = sqlx::query(
            r"
            UPDATE videos
            SET title = $2, description = $3, video_url = $4, thumbnail_url = $5,
                duration = $6, updated_at = NOW()
            WHERE id = $1
            ",
        )
        .bind(video.id.into_inner())
        .bind(&video.title)
        .bind(&video.description)
        .bind(&video.video_url)
        .bind(&video.thumbnail_url)
        .bind(video.duration)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(video_not_found(video.id));
        }

        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: Snowflake) -> RepoResult<()> {
        let result = sqlx::query(
            r"
            DELETE FROM videos WHERE id = $1
            ",
        )
        .bind(id.into_inner())
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(video_not_found(id));
        }

        Ok(())
    }

    #[instrument(skip(self))]
    async fn increment_views(&self, id: Snowflake) -> RepoResult<i32> {
        let views = sqlx::query_scalar::<_, i32>(
            r"
            UPDATE videos SET views_count = views_count + 1
            WHERE id = $1
            RETURNING views_count
            ",
        )
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        views.ok_or_else(|| video_not_found(id))
    }

    #[instrument(skip(self))]
    async fn comment_count(&self, id: Snowflake) -> RepoResult<i64> {
        let count = sqlx::query_scalar::<_, i64>(
            r"
            SELECT COUNT(*) FROM comments WHERE video_id = $1
            ",
        )
        .bind(id.into_inner())
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(count)
    }
}
