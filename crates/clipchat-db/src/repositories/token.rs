//! PostgreSQL implementation of TokenRepository (the token ledger)
//!
//! Ledger rows are append-only apart from the revoked flag; nothing here
//! deletes rows. Expired rows linger until the session layer revokes them
//! on next presentation.

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use clipchat_core::entities::AuthToken;
use clipchat_core::traits::{RepoResult, TokenRepository};
use clipchat_core::value_objects::Snowflake;

use crate::models::TokenModel;

use super::error::map_db_error;

/// PostgreSQL implementation of TokenRepository
#[derive(Clone)]
pub struct PgTokenRepository {
    pool: PgPool,
}

impl PgTokenRepository {
    /// Create a new PgTokenRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TokenRepository for PgTokenRepository {
    #[instrument(skip(self, token), fields(token_id = %token.id, user_id = %token.user_id))]
    async fn insert(&self, token: &AuthToken) -> RepoResult<()> {
        sqlx::query(
            r"
            INSERT INTO tokens (id, token, kind, user_id, expires_at, created_at, revoked)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ",
        )
        .bind(token.id.into_inner())
        .bind(&token.token)
        .bind(token.kind.as_str())
        .bind(token.user_id.into_inner())
        .bind(token.expires_at)
        .bind(token.created_at)
        .bind(token.revoked)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self, raw))]
    async fn find_by_token(&self, raw: &str) -> RepoResult<Option<AuthToken>> {
        let result = sqlx::query_as::<_, TokenModel>(
            r"
            SELECT id, token, kind, user_id, expires_at, created_at, revoked
            FROM tokens
            WHERE token = $1
            ",
        )
        .bind(raw)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        result.map(AuthToken::try_from).transpose()
    }

    #[instrument(skip(self))]
    async fn revoke(&self, id: Snowflake) -> RepoResult<()> {
        sqlx::query(
            r"
            UPDATE tokens SET revoked = TRUE WHERE id = $1
            ",
        )
        .bind(id.into_inner())
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn revoke_access_for_user(&self, user_id: Snowflake) -> RepoResult<u64> {
        let result = sqlx::query(
            r"
            UPDATE tokens
            SET revoked = TRUE
            WHERE user_id = $1 AND kind = 'access' AND revoked = FALSE
            ",
        )
        .bind(user_id.into_inner())
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.rows_affected())
    }

    #[instrument(skip(self))]
    async fn revoke_all_for_user(&self, user_id: Snowflake) -> RepoResult<u64> {
        let result = sqlx::query(
            r"
            UPDATE tokens SET revoked = TRUE WHERE user_id = $1
            ",
        )
        .bind(user_id.into_inner())
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.rows_affected())
    }
}
