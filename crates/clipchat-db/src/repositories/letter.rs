//! PostgreSQL implementation of LetterRepository
//!
//! Unread counts are derived on demand from the read flag; no counter column
//! exists anywhere.

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use clipchat_core::entities::Letter;
use clipchat_core::traits::{LetterRepository, Page, RepoResult};
use clipchat_core::value_objects::Snowflake;

use crate::models::LetterModel;

use super::error::{letter_not_found, map_db_error};

/// PostgreSQL implementation of LetterRepository
#[derive(Clone)]
pub struct PgLetterRepository {
    pool: PgPool,
}

impl PgLetterRepository {
    /// Create a new PgLetterRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LetterRepository for PgLetterRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Letter>> {
        let result = sqlx::query_as::<_, LetterModel>(
            r"
            SELECT id, chat_id, author_id, content, read, created_at
            FROM letters
            WHERE id = $1
            ",
        )
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Letter::from))
    }

    #[instrument(skip(self))]
    async fn find_by_chat(&self, chat_id: Snowflake, page: Page) -> RepoResult<Vec<Letter>> {
        let results = sqlx::query_as::<_, LetterModel>(
            r"
            SELECT id, chat_id, author_id, content, read, created_at
            FROM letters
            WHERE chat_id = $1
            ORDER BY created_at DESC
            OFFSET $2 LIMIT $3
            ",
        )
        .bind(chat_id.into_inner())
        .bind(page.offset)
        .bind(page.limit)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(Letter::from).collect())
    }

    #[instrument(skip(self))]
    async fn last_in_chat(&self, chat_id: Snowflake) -> RepoResult<Option<Letter>> {
        let result = sqlx::query_as::<_, LetterModel>(
            r"
            SELECT id, chat_id, author_id, content, read, created_at
            FROM letters
            WHERE chat_id = $1
            ORDER BY created_at DESC
            LIMIT 1
            ",
        )
        .bind(chat_id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Letter::from))
    }

    #[instrument(skip(self, letter), fields(letter_id = %letter.id, chat_id = %letter.chat_id))]
    async fn create(&self, letter: &Letter) -> RepoResult<()> {
        sqlx::query(
            r"
            INSERT INTO letters (id, chat_id, author_id, content, read, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            ",
        )
        .bind(letter.id.into_inner())
        .bind(letter.chat_id.into_inner())
        .bind(letter.author_id.into_inner())
        .bind(&letter.content)
        .bind(letter.read)
        .bind(letter.created_at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self, content))]
    async fn update_content(&self, id: Snowflake, content: &str) -> RepoResult<()> {
        let result = sqlx::query(
            r"
            UPDATE letters SET content = $2 WHERE id = $1
            ",
        )
        .bind(id.into_inner())
        .bind(content)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(letter_not_found(id));
        }

        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: Snowflake) -> RepoResult<()> {
        let result = sqlx::query(
            r"
            DELETE FROM letters WHERE id = $1
            ",
        )
        .bind(id.into_inner())
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(letter_not_found(id));
        }

        Ok(())
    }

    #[instrument(skip(self))]
    async fn mark_read(&self, id: Snowflake) -> RepoResult<()> {
        let result = sqlx::query(
            r"
            UPDATE letters SET read = TRUE WHERE id = $1
            ",
        )
        .bind(id.into_inner())
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(letter_not_found(id));
        }

        Ok(())
    }

    #[instrument(skip(self))]
    async fn mark_chat_read(&self, chat_id: Snowflake, reader_id: Snowflake) -> RepoResult<u64> {
        let result = sqlx::query(
            r"
            UPDATE letters
            SET read = TRUE
            WHERE chat_id = $1 AND author_id <> $2 AND read = FALSE
            ",
        )
        .bind(chat_id.into_inner())
        .bind(reader_id.into_inner())
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.rows_affected())
    }

    #[instrument(skip(self))]
    async fn unread_count_in_chat(
        &self,
        chat_id: Snowflake,
        user_id: Snowflake,
    ) -> RepoResult<i64> {
        let count = sqlx::query_scalar::<_, i64>(
            r"
            SELECT COUNT(*)
            FROM letters
            WHERE chat_id = $1 AND author_id <> $2 AND read = FALSE
            ",
        )
        .bind(chat_id.into_inner())
        .bind(user_id.into_inner())
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(count)
    }

    #[instrument(skip(self))]
    async fn unread_count_for_user(&self, user_id: Snowflake) -> RepoResult<i64> {
        // Full scan over the user's chat set, recomputed per call
        let count = sqlx::query_scalar::<_, i64>(
            r"
            SELECT COUNT(*)
            FROM letters l
            JOIN chats c ON c.id = l.chat_id
            WHERE (c.user_a_id = $1 OR c.user_b_id = $1)
              AND l.author_id <> $1
              AND l.read = FALSE
            ",
        )
        .bind(user_id.into_inner())
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(count)
    }
}
