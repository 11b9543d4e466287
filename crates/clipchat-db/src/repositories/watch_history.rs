//! PostgreSQL implementation of WatchHistoryRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use clipchat_core::entities::WatchHistory;
use clipchat_core::traits::{Page, RepoResult, WatchHistoryRepository};
use clipchat_core::value_objects::Snowflake;

use crate::models::WatchHistoryWithTitleModel;

use super::error::map_db_error;

/// PostgreSQL implementation of WatchHistoryRepository
#[derive(Clone)]
pub struct PgWatchHistoryRepository {
    pool: PgPool,
}

impl PgWatchHistoryRepository {
    /// Create a new PgWatchHistoryRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl WatchHistoryRepository for PgWatchHistoryRepository {
    #[instrument(skip(self, entry), fields(user_id = %entry.user_id, video_id = %entry.video_id))]
    async fn upsert(&self, entry: &WatchHistory) -> RepoResult<()> {
        sqlx::query(
            r"
            INSERT INTO watch_history (id, user_id, video_id, watched_at, watch_duration, completed)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (user_id, video_id)
            DO UPDATE SET watched_at = EXCLUDED.watched_at,
                          watch_duration = EXCLUDED.watch_duration,
                          completed = EXCLUDED.completed
            ",
        )
        .bind(entry.id.into_inner())
        .bind(entry.user_id.into_inner())
        .bind(entry.video_id.into_inner())
        .bind(entry.watched_at)
        .bind(entry.watch_duration)
        .bind(entry.completed)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn find_by_user(
        &self,
        user_id: Snowflake,
        page: Page,
    ) -> RepoResult<Vec<(WatchHistory, String)>> {
        let results = sqlx::query_as::<_, WatchHistoryWithTitleModel>(
            r"
            SELECT h.id, h.user_id, h.video_id, h.watched_at, h.watch_duration, h.completed,
                   v.title AS video_title
            FROM watch_history h
            JOIN videos v ON v.id = h.video_id
            WHERE h.user_id = $1
            ORDER BY h.watched_at DESC
            OFFSET $2 LIMIT $3
            ",
        )
        .bind(user_id.into_inner())
        .bind(page.offset)
        .bind(page.limit)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(results
            .into_iter()
            .map(|row| (WatchHistory::from(row.entry), row.video_title))
            .collect())
    }
}
