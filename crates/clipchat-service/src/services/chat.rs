//! Chat service
//!
//! Get-or-create semantics over the normalized participant pair, the chat
//! listing with per-chat unread counts, and participant-gated deletion.

use clipchat_core::entities::{Chat, User};
use clipchat_core::error::DomainError;
use clipchat_core::{Page, Snowflake};
use tracing::{info, instrument};

use crate::dto::{ChatDetailResponse, ChatResponse, LetterResponse, UserSummary};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// Chat service
pub struct ChatService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> ChatService<'a> {
    /// Create a new ChatService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// List the caller's chats, most recently active first
    ///
    /// Each entry carries the other participant, the latest letter, and the
    /// unread count recomputed from the read flags.
    #[instrument(skip(self, user), fields(user_id = %user.id))]
    pub async fn list_mine(&self, user: &User, page: Page) -> ServiceResult<Vec<ChatResponse>> {
        let chats = self.ctx.chat_repo().find_by_user(user.id, page).await?;

        let mut responses = Vec::with_capacity(chats.len());
        for chat in chats {
            let other = self.other_participant(&chat, user.id).await?;

            let unread_count = self
                .ctx
                .letter_repo()
                .unread_count_in_chat(chat.id, user.id)
                .await?;

            let last_letter = match self.ctx.letter_repo().last_in_chat(chat.id).await? {
                Some(letter) => {
                    let author = if letter.author_id == user.id {
                        UserSummary::from(user)
                    } else {
                        other.clone()
                    };
                    Some(LetterResponse::from_parts(letter, author))
                }
                None => None,
            };

            responses.push(ChatResponse {
                id: chat.id,
                other_user: other,
                created_at: chat.created_at,
                updated_at: chat.updated_at,
                last_letter,
                unread_count,
            });
        }

        Ok(responses)
    }

    /// Open the chat with another user, creating it on first contact
    ///
    /// The same pair in either order resolves to the same row. Returning the
    /// full history counts as a fetch, so unread letters from the other
    /// participant are marked read here.
    #[instrument(skip(self, user), fields(user_id = %user.id))]
    pub async fn get_or_create(
        &self,
        user: &User,
        other_user_id: Snowflake,
    ) -> ServiceResult<ChatDetailResponse> {
        if user.id == other_user_id {
            return Err(ServiceError::Domain(DomainError::SelfChat));
        }

        let other = self
            .ctx
            .user_repo()
            .find_by_id(other_user_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("User", other_user_id.to_string()))?;

        let chat = match self
            .ctx
            .chat_repo()
            .find_between(user.id, other_user_id)
            .await?
        {
            Some(existing) => existing,
            None => {
                let chat = Chat::new(self.ctx.generate_id(), user.id, other_user_id);
                self.ctx.chat_repo().create(&chat).await?;
                info!(chat_id = %chat.id, "Chat created");
                chat
            }
        };

        self.ctx
            .letter_repo()
            .mark_chat_read(chat.id, user.id)
            .await?;

        // Full history, oldest first
        let mut letters = self
            .ctx
            .letter_repo()
            .find_by_chat(chat.id, Page { offset: 0, limit: i64::MAX })
            .await?;
        letters.reverse();

        let me = UserSummary::from(user);
        let other_summary = UserSummary::from(&other);
        let letters = letters
            .into_iter()
            .map(|letter| {
                let author = if letter.author_id == user.id {
                    me.clone()
                } else {
                    other_summary.clone()
                };
                LetterResponse::from_parts(letter, author)
            })
            .collect();

        let unread_count = self
            .ctx
            .letter_repo()
            .unread_count_in_chat(chat.id, user.id)
            .await?;

        Ok(ChatDetailResponse {
            id: chat.id,
            other_user: other_summary,
            created_at: chat.created_at,
            updated_at: chat.updated_at,
            letters,
            unread_count,
        })
    }

    /// Delete a chat; participants only, letters cascade
    #[instrument(skip(self))]
    pub async fn delete(&self, user_id: Snowflake, chat_id: Snowflake) -> ServiceResult<()> {
        let chat = self
            .ctx
            .chat_repo()
            .find_by_id(chat_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Chat", chat_id.to_string()))?;

        if !chat.has_participant(user_id) {
            return Err(ServiceError::Domain(DomainError::NotChatParticipant));
        }

        self.ctx.chat_repo().delete(chat_id).await?;

        info!(%chat_id, "Chat deleted");
        Ok(())
    }

    async fn other_participant(
        &self,
        chat: &Chat,
        user_id: Snowflake,
    ) -> ServiceResult<UserSummary> {
        let other_id = chat
            .other_participant(user_id)
            .ok_or_else(|| ServiceError::Domain(DomainError::NotChatParticipant))?;

        let other = self
            .ctx
            .user_repo()
            .find_by_id(other_id)
            .await?
            .ok_or_else(|| ServiceError::internal("chat participant no longer exists"))?;

        Ok(UserSummary::from(other))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dto::RegisterRequest;
    use crate::services::session::SessionService;
    use crate::services::testing::test_context;

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

    #[tokio::test]
    async fn test_get_or_create_is_order_independent() {
        let ctx = test_context();
        let alice = register(&ctx, "a@x.com", "alice").await;
        let bob = register(&ctx, "b@x.com", "bob").await;
        let service = ChatService::new(&ctx);

        let from_alice = service.get_or_create(&alice, bob.id).await.unwrap();
        let from_bob = service.get_or_create(&bob, alice.id).await.unwrap();

        // Exactly one row exists regardless of who opened the chat
        assert_eq!(from_alice.id, from_bob.id);
        assert_eq!(
            service.list_mine(&alice, Page::default()).await.unwrap().len(),
            1
        );
    }

    #[tokio::test]
    async fn test_self_chat_is_rejected() {
        let ctx = test_context();
        let alice = register(&ctx, "a@x.com", "alice").await;
        let service = ChatService::new(&ctx);

        let result = service.get_or_create(&alice, alice.id).await;
        assert_eq!(result.unwrap_err().status_code(), 400);
    }

    #[tokio::test]
    async fn test_chat_with_unknown_user_is_not_found() {
        let ctx = test_context();
        let alice = register(&ctx, "a@x.com", "alice").await;
        let service = ChatService::new(&ctx);

        let result = service.get_or_create(&alice, Snowflake::new(404)).await;
        assert_eq!(result.unwrap_err().status_code(), 404);
    }

    #[tokio::test]
    async fn test_only_participants_may_delete() {
        let ctx = test_context();
        let alice = register(&ctx, "a@x.com", "alice").await;
        let bob = register(&ctx, "b@x.com", "bob").await;
        let carol = register(&ctx, "c@x.com", "carol").await;
        let service = ChatService::new(&ctx);

        let chat = service.get_or_create(&alice, bob.id).await.unwrap();

        let denied = service.delete(carol.id, chat.id).await;
        assert_eq!(denied.unwrap_err().status_code(), 403);

        service.delete(bob.id, chat.id).await.unwrap();
        assert!(service
            .list_mine(&alice, Page::default())
            .await
            .unwrap()
            .is_empty());
    }
}
