//! User service
//!
//! Profile lookups, user listing, watch history, and account deletion.

use clipchat_core::{Page, Snowflake};
use tracing::{info, instrument};

use crate::dto::{UserResponse, WatchHistoryResponse};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// User service
pub struct UserService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> UserService<'a> {
    /// Create a new UserService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// List users
    #[instrument(skip(self))]
    pub async fn list(&self, page: Page) -> ServiceResult<Vec<UserResponse>> {
        let users = self.ctx.user_repo().list(page).await?;
        Ok(users.into_iter().map(UserResponse::from).collect())
    }

    /// Get a user's profile by id
    #[instrument(skip(self))]
    pub async fn get(&self, user_id: Snowflake) -> ServiceResult<UserResponse> {
        let user = self
            .ctx
            .user_repo()
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("User", user_id.to_string()))?;

        Ok(UserResponse::from(user))
    }

    /// List a user's watch history; only the user themselves may read it
    #[instrument(skip(self))]
    pub async fn watch_history(
        &self,
        current_user_id: Snowflake,
        target_user_id: Snowflake,
        page: Page,
    ) -> ServiceResult<Vec<WatchHistoryResponse>> {
        if current_user_id != target_user_id {
            return Err(ServiceError::forbidden(
                "You can only view your own watch history",
            ));
        }

        let entries = self
            .ctx
            .watch_history_repo()
            .find_by_user(target_user_id, page)
            .await?;

        Ok(entries
            .into_iter()
            .map(|(entry, title)| WatchHistoryResponse::from_parts(entry, title))
            .collect())
    }

    /// Delete the user's own account; every owned row cascades with it
    #[instrument(skip(self))]
    pub async fn delete_account(&self, user_id: Snowflake) -> ServiceResult<()> {
        // Dead sessions first, then the row graph
        self.ctx.token_repo().revoke_all_for_user(user_id).await?;
        self.ctx.user_repo().delete(user_id).await?;

        info!(%user_id, "Account deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dto::RegisterRequest;
    use crate::services::session::SessionService;
    use crate::services::testing::test_context;

    async fn register(ctx: &ServiceContext, email: &str, username: &str) -> UserResponse {
        SessionService::new(ctx)
            .register(RegisterRequest {
                email: email.to_string(),
                username: username.to_string(),
                password: "secret1".to_string(),
            })
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_get_unknown_user_is_not_found() {
        let ctx = test_context();
        let result = UserService::new(&ctx).get(Snowflake::new(99)).await;
        assert_eq!(result.unwrap_err().status_code(), 404);
    }

    #[tokio::test]
    async fn test_watch_history_is_private() {
        let ctx = test_context();
        let alice = register(&ctx, "a@x.com", "alice").await;
        let bob = register(&ctx, "b@x.com", "bob").await;

        let service = UserService::new(&ctx);
        let result = service
            .watch_history(alice.id, bob.id, Page::default())
            .await;
        assert_eq!(result.unwrap_err().status_code(), 403);

        let own = service
            .watch_history(alice.id, alice.id, Page::default())
            .await
            .unwrap();
        assert!(own.is_empty());
    }

    #[tokio::test]
    async fn test_delete_account_removes_user() {
        let ctx = test_context();
        let alice = register(&ctx, "a@x.com", "alice").await;

        let service = UserService::new(&ctx);
        service.delete_account(alice.id).await.unwrap();
        assert_eq!(service.get(alice.id).await.unwrap_err().status_code(), 404);
    }
}
