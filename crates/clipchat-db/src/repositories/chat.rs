//! PostgreSQL implementation of ChatRepository
//!
//! Participant pairs are stored normalized (lower id first), so lookups only
//! need one orientation.

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use clipchat_core::entities::Chat;
use clipchat_core::traits::{ChatRepository, Page, RepoResult};
use clipchat_core::value_objects::Snowflake;

use crate::models::ChatModel;

use super::error::{chat_not_found, map_db_error};

/// PostgreSQL implementation of ChatRepository
#[derive(Clone)]
pub struct PgChatRepository {
    pool: PgPool,
}

impl PgChatRepository {
    /// Create a new PgChatRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ChatRepository for PgChatRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Chat>> {
        let result = sqlx::query_as::<_, ChatModel>(
            r"
            SELECT id, user_a_id, user_b_id, created_at, updated_at
            FROM chats
            WHERE id = $1
            ",
        )
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Chat::from))
    }

    #[instrument(skip(self))]
    async fn find_between(
        &self,
        first: Snowflake,
        second: Snowflake,
    ) -> RepoResult<Option<Chat>> {
        let (user_a, user_b) = Chat::normalize_pair(first, second);

        let result = sqlx::query_as::<_, ChatModel>(
            r"
            SELECT id, user_a_id, user_b_id, created_at, updated_at
            FROM chats
            WHERE user_a_id = $1 AND user_b_id = $2
            ",
        )
        .bind(user_a.into_inner())
        .bind(user_b.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Chat::from))
    }

    #[instrument(skip(self))]
    async fn find_by_user(&self, user_id: Snowflake, page: Page) -> RepoResult<Vec<Chat>> {
        let results = sqlx::query_as::<_, ChatModel>(
            r"
            SELECT id, user_a_id, user_b_id, created_at, updated_at
            FROM chats
            WHERE user_a_id = $1 OR user_b_id = $1
            ORDER BY updated_at DESC
            OFFSET $2 LIMIT $3
            ",
        )
        .bind(user_id.into_inner())
        .bind(page.offset)
        .bind(page.limit)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(Chat::from).collect())
    }

    #[instrument(skip(self, chat), fields(chat_id = %chat.id))]
    async fn create(&self, chat: &Chat) -> RepoResult<()> {
        sqlx::query(
            r"
            INSERT INTO chats (id, user_a_id, user_b_id, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5)
            ",
        )
        .bind(chat.id.into_inner())
        .bind(chat.user_a_id.into_inner())
        .bind(chat.user_b_id.into_inner())
        .bind(chat.created_at)
        .bind(chat.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn touch(&self, id: Snowflake) -> RepoResult<()> {
        sqlx::query(
            r"
            UPDATE chats SET updated_at = NOW() WHERE id = $1
            ",
        )
        .bind(id.into_inner())
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: Snowflake) -> RepoResult<()> {
        let result = sqlx::query(
            r"
            DELETE FROM chats WHERE id = $1
            ",
        )
        .bind(id.into_inner())
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(chat_not_found(id));
        }

        Ok(())
    }
}
