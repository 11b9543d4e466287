//! Letter service
//!
//! Letters inside a chat: participant-gated reads and writes, read-on-fetch
//! semantics, author-gated edits, and the derived unread count.

use clipchat_core::entities::{Letter, User};
use clipchat_core::error::DomainError;
use clipchat_core::{Page, Snowflake};
use tracing::{info, instrument};

use crate::dto::{LetterContentRequest, LetterResponse, UserSummary};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// Letter service
pub struct LetterService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> LetterService<'a> {
    /// Create a new LetterService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// List a chat's letters, newest first; participants only
    ///
    /// Fetching is what flips the read flag: every returned letter written
    /// by the other participant is marked read by this call.
    #[instrument(skip(self, user), fields(user_id = %user.id))]
    pub async fn list(
        &self,
        user: &User,
        chat_id: Snowflake,
        page: Page,
    ) -> ServiceResult<Vec<LetterResponse>> {
        let chat = self.require_participant(chat_id, user.id).await?;

        let mut letters = self.ctx.letter_repo().find_by_chat(chat_id, page).await?;

        // Read-on-fetch applies to exactly the letters being returned
        for letter in letters
            .iter_mut()
            .filter(|l| !l.is_author(user.id) && !l.read)
        {
            self.ctx.letter_repo().mark_read(letter.id).await?;
            letter.read = true;
        }

        self.assemble(user, &chat, letters).await
    }

    /// Fetch one letter; reading it as the recipient marks it read
    #[instrument(skip(self, user), fields(user_id = %user.id))]
    pub async fn get(
        &self,
        user: &User,
        chat_id: Snowflake,
        letter_id: Snowflake,
    ) -> ServiceResult<LetterResponse> {
        let chat = self.require_participant(chat_id, user.id).await?;
        let mut letter = self.find_in_chat(chat_id, letter_id).await?;

        if !letter.is_author(user.id) && !letter.read {
            self.ctx.letter_repo().mark_read(letter_id).await?;
            letter.read = true;
        }

        let author = self.author_of(user, &chat, &letter).await?;
        Ok(LetterResponse::from_parts(letter, author))
    }

    /// Write a letter into a chat; participants only
    ///
    /// Bumps the chat's activity timestamp so the listing reorders.
    #[instrument(skip(self, user, request), fields(user_id = %user.id))]
    pub async fn create(
        &self,
        user: &User,
        chat_id: Snowflake,
        request: LetterContentRequest,
    ) -> ServiceResult<LetterResponse> {
        self.require_participant(chat_id, user.id).await?;

        let letter = Letter::new(self.ctx.generate_id(), chat_id, user.id, request.content);
        self.ctx.letter_repo().create(&letter).await?;
        self.ctx.chat_repo().touch(chat_id).await?;

        info!(letter_id = %letter.id, %chat_id, "Letter sent");

        Ok(LetterResponse::from_parts(letter, UserSummary::from(user)))
    }

    /// Edit a letter's content; author only
    #[instrument(skip(self, user, request), fields(user_id = %user.id))]
    pub async fn update(
        &self,
        user: &User,
        chat_id: Snowflake,
        letter_id: Snowflake,
        request: LetterContentRequest,
    ) -> ServiceResult<LetterResponse> {
        self.require_chat(chat_id).await?;
        let mut letter = self.find_in_chat(chat_id, letter_id).await?;

        if !letter.is_author(user.id) {
            return Err(ServiceError::Domain(DomainError::NotLetterAuthor));
        }

        letter.edit(request.content);
        self.ctx
            .letter_repo()
            .update_content(letter_id, &letter.content)
            .await?;

        Ok(LetterResponse::from_parts(letter, UserSummary::from(user)))
    }

    /// Delete a letter; author only
    #[instrument(skip(self))]
    pub async fn delete(
        &self,
        user_id: Snowflake,
        chat_id: Snowflake,
        letter_id: Snowflake,
    ) -> ServiceResult<()> {
        self.require_chat(chat_id).await?;
        let letter = self.find_in_chat(chat_id, letter_id).await?;

        if !letter.is_author(user_id) {
            return Err(ServiceError::Domain(DomainError::NotLetterAuthor));
        }

        self.ctx.letter_repo().delete(letter_id).await?;

        info!(%letter_id, "Letter deleted");
        Ok(())
    }

    /// Explicitly mark a letter read; rejected for the letter's own author
    #[instrument(skip(self, user), fields(user_id = %user.id))]
    pub async fn mark_read(
        &self,
        user: &User,
        chat_id: Snowflake,
        letter_id: Snowflake,
    ) -> ServiceResult<LetterResponse> {
        let chat = self.require_participant(chat_id, user.id).await?;
        let mut letter = self.find_in_chat(chat_id, letter_id).await?;

        if letter.is_author(user.id) {
            return Err(ServiceError::Domain(DomainError::OwnLetterReadReceipt));
        }

        self.ctx.letter_repo().mark_read(letter_id).await?;
        letter.read = true;

        let author = self.author_of(user, &chat, &letter).await?;
        Ok(LetterResponse::from_parts(letter, author))
    }

    /// Unread letters addressed to the caller across all their chats
    ///
    /// Derived on every call from the read flags; no counter is maintained.
    #[instrument(skip(self))]
    pub async fn unread_count(&self, user_id: Snowflake) -> ServiceResult<i64> {
        Ok(self.ctx.letter_repo().unread_count_for_user(user_id).await?)
    }

    async fn require_chat(
        &self,
        chat_id: Snowflake,
    ) -> ServiceResult<clipchat_core::entities::Chat> {
        self.ctx
            .chat_repo()
            .find_by_id(chat_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Chat", chat_id.to_string()))
    }

    async fn require_participant(
        &self,
        chat_id: Snowflake,
        user_id: Snowflake,
    ) -> ServiceResult<clipchat_core::entities::Chat> {
        let chat = self.require_chat(chat_id).await?;
        if !chat.has_participant(user_id) {
            return Err(ServiceError::Domain(DomainError::NotChatParticipant));
        }
        Ok(chat)
    }

    /// Resolve the author summary for a single letter
    async fn author_of(
        &self,
        user: &User,
        chat: &clipchat_core::entities::Chat,
        letter: &Letter,
    ) -> ServiceResult<UserSummary> {
        if letter.is_author(user.id) {
            return Ok(UserSummary::from(user));
        }

        let other_id = chat
            .other_participant(user.id)
            .ok_or_else(|| ServiceError::Domain(DomainError::NotChatParticipant))?;
        let other = self
            .ctx
            .user_repo()
            .find_by_id(other_id)
            .await?
            .ok_or_else(|| ServiceError::internal("chat participant no longer exists"))?;

        Ok(UserSummary::from(other))
    }

    /// Attach author summaries to a batch of letters from one chat
    async fn assemble(
        &self,
        user: &User,
        chat: &clipchat_core::entities::Chat,
        letters: Vec<Letter>,
    ) -> ServiceResult<Vec<LetterResponse>> {
        let me = UserSummary::from(user);
        let other_summary = match chat.other_participant(user.id) {
            Some(other_id) => self
                .ctx
                .user_repo()
                .find_by_id(other_id)
                .await?
                .map(|u| UserSummary::from(&u)),
            None => None,
        };

        Ok(letters
            .into_iter()
            .map(|letter| {
                let author = if letter.author_id == user.id {
                    me.clone()
                } else {
                    other_summary.clone().unwrap_or_else(|| UserSummary {
                        id: letter.author_id,
                        username: String::new(),
                    })
                };
                LetterResponse::from_parts(letter, author)
            })
            .collect())
    }

    async fn find_in_chat(
        &self,
        chat_id: Snowflake,
        letter_id: Snowflake,
    ) -> ServiceResult<Letter> {
        self.ctx
            .letter_repo()
            .find_by_id(letter_id)
            .await?
            .filter(|l| l.chat_id == chat_id)
            .ok_or_else(|| ServiceError::not_found("Letter", letter_id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dto::RegisterRequest;
    use crate::services::chat::ChatService;
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

    async fn open_chat(ctx: &ServiceContext, a: &User, b: &User) -> Snowflake {
        ChatService::new(ctx).get_or_create(a, b.id).await.unwrap().id
    }

    fn content(text: &str) -> LetterContentRequest {
        LetterContentRequest {
            content: text.to_string(),
        }
    }

    #[tokio::test]
    async fn test_unread_count_matches_unfetched_letters() {
        let ctx = test_context();
        let alice = register(&ctx, "a@x.com", "alice").await;
        let bob = register(&ctx, "b@x.com", "bob").await;
        let chat_id = open_chat(&ctx, &alice, &bob).await;
        let service = LetterService::new(&ctx);

        service.create(&bob, chat_id, content("one")).await.unwrap();
        service.create(&bob, chat_id, content("two")).await.unwrap();
        service.create(&alice, chat_id, content("reply")).await.unwrap();

        // Bob's two letters are unread for alice; her own never counts
        assert_eq!(service.unread_count(alice.id).await.unwrap(), 2);
        assert_eq!(service.unread_count(bob.id).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_fetching_letters_drives_unread_to_zero() {
        let ctx = test_context();
        let alice = register(&ctx, "a@x.com", "alice").await;
        let bob = register(&ctx, "b@x.com", "bob").await;
        let chat_id = open_chat(&ctx, &alice, &bob).await;
        let service = LetterService::new(&ctx);

        service.create(&bob, chat_id, content("one")).await.unwrap();
        service.create(&bob, chat_id, content("two")).await.unwrap();
        assert_eq!(service.unread_count(alice.id).await.unwrap(), 2);

        let letters = service.list(&alice, chat_id, Page::default()).await.unwrap();
        assert!(letters.iter().all(|l| l.read));

        assert_eq!(service.unread_count(alice.id).await.unwrap(), 0);
        // Reading as alice does not touch bob's view
        assert_eq!(service.unread_count(bob.id).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_fetching_single_letter_marks_it_read() {
        let ctx = test_context();
        let alice = register(&ctx, "a@x.com", "alice").await;
        let bob = register(&ctx, "b@x.com", "bob").await;
        let chat_id = open_chat(&ctx, &alice, &bob).await;
        let service = LetterService::new(&ctx);

        let sent = service.create(&bob, chat_id, content("hello")).await.unwrap();
        assert!(!sent.read);

        let fetched = service.get(&alice, chat_id, sent.id).await.unwrap();
        assert!(fetched.read);
        assert_eq!(service.unread_count(alice.id).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_author_fetch_does_not_mark_read() {
        let ctx = test_context();
        let alice = register(&ctx, "a@x.com", "alice").await;
        let bob = register(&ctx, "b@x.com", "bob").await;
        let chat_id = open_chat(&ctx, &alice, &bob).await;
        let service = LetterService::new(&ctx);

        let sent = service.create(&bob, chat_id, content("hello")).await.unwrap();
        let refetched = service.get(&bob, chat_id, sent.id).await.unwrap();
        assert!(!refetched.read);
        assert_eq!(service.unread_count(alice.id).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_non_participant_is_forbidden() {
        let ctx = test_context();
        let alice = register(&ctx, "a@x.com", "alice").await;
        let bob = register(&ctx, "b@x.com", "bob").await;
        let carol = register(&ctx, "c@x.com", "carol").await;
        let chat_id = open_chat(&ctx, &alice, &bob).await;
        let service = LetterService::new(&ctx);

        let list = service.list(&carol, chat_id, Page::default()).await;
        assert_eq!(list.unwrap_err().status_code(), 403);

        let create = service.create(&carol, chat_id, content("intruding")).await;
        assert_eq!(create.unwrap_err().status_code(), 403);
    }

    #[tokio::test]
    async fn test_only_author_may_edit_and_delete() {
        let ctx = test_context();
        let alice = register(&ctx, "a@x.com", "alice").await;
        let bob = register(&ctx, "b@x.com", "bob").await;
        let chat_id = open_chat(&ctx, &alice, &bob).await;
        let service = LetterService::new(&ctx);

        let sent = service.create(&bob, chat_id, content("original")).await.unwrap();

        let edit = service
            .update(&alice, chat_id, sent.id, content("tampered"))
            .await;
        assert_eq!(edit.unwrap_err().status_code(), 403);

        let delete = service.delete(alice.id, chat_id, sent.id).await;
        assert_eq!(delete.unwrap_err().status_code(), 403);

        let edited = service
            .update(&bob, chat_id, sent.id, content("fixed"))
            .await
            .unwrap();
        assert_eq!(edited.content, "fixed");

        service.delete(bob.id, chat_id, sent.id).await.unwrap();
    }

    #[tokio::test]
    async fn test_cannot_mark_own_letter_read() {
        let ctx = test_context();
        let alice = register(&ctx, "a@x.com", "alice").await;
        let bob = register(&ctx, "b@x.com", "bob").await;
        let chat_id = open_chat(&ctx, &alice, &bob).await;
        let service = LetterService::new(&ctx);

        let sent = service.create(&bob, chat_id, content("mine")).await.unwrap();

        let own = service.mark_read(&bob, chat_id, sent.id).await;
        assert_eq!(own.unwrap_err().status_code(), 400);

        let marked = service.mark_read(&alice, chat_id, sent.id).await.unwrap();
        assert!(marked.read);
    }

    #[tokio::test]
    async fn test_sending_bumps_chat_activity() {
        let ctx = test_context();
        let alice = register(&ctx, "a@x.com", "alice").await;
        let bob = register(&ctx, "b@x.com", "bob").await;
        let chat_id = open_chat(&ctx, &alice, &bob).await;

        let before = ctx.chat_repo().find_by_id(chat_id).await.unwrap().unwrap();
        LetterService::new(&ctx)
            .create(&alice, chat_id, content("ping"))
            .await
            .unwrap();
        let after = ctx.chat_repo().find_by_id(chat_id).await.unwrap().unwrap();

        assert!(after.updated_at >= before.updated_at);
    }
}
