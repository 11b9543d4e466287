//! In-memory repository implementations for service tests
//!
//! All collections live behind one mutex so cross-entity behavior (cascades,
//! unread counts) can be exercised without a database.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use clipchat_common::auth::JwtService;
use clipchat_core::entities::{AuthToken, Chat, Comment, Letter, TokenKind, User, Video, WatchHistory};
use clipchat_core::error::DomainError;
use clipchat_core::traits::{
    ChatRepository, CommentRepository, LetterRepository, Page, RepoResult, SortOrder,
    TokenRepository, UserRepository, VideoListing, VideoQuery, VideoRepository, VideoSortKey,
    WatchHistoryRepository,
};
use clipchat_core::{Snowflake, SnowflakeGenerator};

use super::context::{ServiceContext, ServiceContextBuilder};

#[derive(Default)]
struct State {
    users: Vec<(User, String)>,
    tokens: Vec<AuthToken>,
    videos: Vec<Video>,
    comments: Vec<Comment>,
    history: Vec<WatchHistory>,
    chats: Vec<Chat>,
    letters: Vec<Letter>,
}

#[derive(Default)]
struct MemStore {
    state: Mutex<State>,
}

impl MemStore {
    fn lock(&self) -> std::sync::MutexGuard<'_, State> {
        self.state.lock().unwrap()
    }
}

fn window<T: Clone>(items: &[T], page: Page) -> Vec<T> {
    items
        .iter()
        .skip(page.offset.max(0) as usize)
        .take(page.limit.max(0) as usize)
        .cloned()
        .collect()
}

// ============================================================================
// Users
// ============================================================================

#[derive(Clone)]
struct MemUserRepo(Arc<MemStore>);

#[async_trait]
impl UserRepository for MemUserRepo {
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<User>> {
        Ok(self
            .0
            .lock()
            .users
            .iter()
            .find(|(u, _)| u.id == id)
            .map(|(u, _)| u.clone()))
    }

    async fn find_by_email(&self, email: &str) -> RepoResult<Option<User>> {
        Ok(self
            .0
            .lock()
            .users
            .iter()
            .find(|(u, _)| u.email == email)
            .map(|(u, _)| u.clone()))
    }

    async fn email_exists(&self, email: &str) -> RepoResult<bool> {
        Ok(self.0.lock().users.iter().any(|(u, _)| u.email == email))
    }

    async fn username_exists(&self, username: &str) -> RepoResult<bool> {
        Ok(self
            .0
            .lock()
            .users
            .iter()
            .any(|(u, _)| u.username == username))
    }

    async fn list(&self, page: Page) -> RepoResult<Vec<User>> {
        let users: Vec<User> = self.0.lock().users.iter().map(|(u, _)| u.clone()).collect();
        Ok(window(&users, page))
    }

    async fn create(&self, user: &User, password_hash: &str) -> RepoResult<()> {
        let mut state = self.0.lock();
        if state.users.iter().any(|(u, _)| u.email == user.email) {
            return Err(DomainError::EmailAlreadyExists);
        }
        if state.users.iter().any(|(u, _)| u.username == user.username) {
            return Err(DomainError::UsernameAlreadyExists);
        }
        state.users.push((user.clone(), password_hash.to_string()));
        Ok(())
    }

    async fn get_password_hash(&self, id: Snowflake) -> RepoResult<Option<String>> {
        Ok(self
            .0
            .lock()
            .users
            .iter()
            .find(|(u, _)| u.id == id)
            .map(|(_, h)| h.clone()))
    }

    async fn delete(&self, id: Snowflake) -> RepoResult<()> {
        let mut state = self.0.lock();
        let before = state.users.len();
        state.users.retain(|(u, _)| u.id != id);
        if state.users.len() == before {
            return Err(DomainError::UserNotFound(id));
        }

        // Cascade like the FK graph does
        state.tokens.retain(|t| t.user_id != id);
        let doomed_videos: Vec<Snowflake> = state
            .videos
            .iter()
            .filter(|v| v.author_id == id)
            .map(|v| v.id)
            .collect();
        state.videos.retain(|v| v.author_id != id);
        state
            .comments
            .retain(|c| c.author_id != id && !doomed_videos.contains(&c.video_id));
        state
            .history
            .retain(|h| h.user_id != id && !doomed_videos.contains(&h.video_id));
        let doomed_chats: Vec<Snowflake> = state
            .chats
            .iter()
            .filter(|c| c.has_participant(id))
            .map(|c| c.id)
            .collect();
        state.chats.retain(|c| !c.has_participant(id));
        state
            .letters
            .retain(|l| l.author_id != id && !doomed_chats.contains(&l.chat_id));
        Ok(())
    }
}

// ============================================================================
// Tokens
// ============================================================================

#[derive(Clone)]
struct MemTokenRepo(Arc<MemStore>);

#[async_trait]
impl TokenRepository for MemTokenRepo {
    async fn insert(&self, token: &AuthToken) -> RepoResult<()> {
        let mut state = self.0.lock();
        if state.tokens.iter().any(|t| t.token == token.token) {
            return Err(DomainError::DatabaseError(
                "duplicate token string".to_string(),
            ));
        }
        state.tokens.push(token.clone());
        Ok(())
    }

    async fn find_by_token(&self, raw: &str) -> RepoResult<Option<AuthToken>> {
        Ok(self.0.lock().tokens.iter().find(|t| t.token == raw).cloned())
    }

    async fn revoke(&self, id: Snowflake) -> RepoResult<()> {
        let mut state = self.0.lock();
        if let Some(t) = state.tokens.iter_mut().find(|t| t.id == id) {
            t.revoked = true;
        }
        Ok(())
    }

    async fn revoke_access_for_user(&self, user_id: Snowflake) -> RepoResult<u64> {
        let mut state = self.0.lock();
        let mut revoked = 0;
        for t in state
            .tokens
            .iter_mut()
            .filter(|t| t.user_id == user_id && t.kind == TokenKind::Access && !t.revoked)
        {
            t.revoked = true;
            revoked += 1;
        }
        Ok(revoked)
    }

    async fn revoke_all_for_user(&self, user_id: Snowflake) -> RepoResult<u64> {
        let mut state = self.0.lock();
        let mut revoked = 0;
        for t in state.tokens.iter_mut().filter(|t| t.user_id == user_id) {
            t.revoked = true;
            revoked += 1;
        }
        Ok(revoked)
    }
}

// ============================================================================
// Videos
// ============================================================================

#[derive(Clone)]
struct MemVideoRepo(Arc<MemStore>);

#[async_trait]
impl VideoRepository for MemVideoRepo {
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Video>> {
        Ok(self.0.lock().videos.iter().find(|v| v.id == id).cloned())
    }

    async fn list(&self, query: &VideoQuery) -> RepoResult<Vec<VideoListing>> {
        let state = self.0.lock();
        let mut rows: Vec<VideoListing> = state
            .videos
            .iter()
            .filter(|v| match &query.search {
                Some(needle) => v.title.to_lowercase().contains(&needle.to_lowercase()),
                None => true,
            })
            .map(|v| VideoListing {
                video: v.clone(),
                author_name: state
                    .users
                    .iter()
                    .find(|(u, _)| u.id == v.author_id)
                    .map(|(u, _)| u.username.clone())
                    .unwrap_or_default(),
                comments_count: state
                    .comments
                    .iter()
                    .filter(|c| c.video_id == v.id)
                    .count() as i64,
            })
            .collect();

        rows.sort_by(|a, b| {
            let ord = match query.sort_by {
                VideoSortKey::CreatedAt => a.video.created_at.cmp(&b.video.created_at),
                VideoSortKey::ViewsCount => a.video.views_count.cmp(&b.video.views_count),
                VideoSortKey::Title => a.video.title.cmp(&b.video.title),
            };
            match query.order {
                SortOrder::Asc => ord,
                SortOrder::Desc => ord.reverse(),
            }
        });

        Ok(window(&rows, query.page))
    }

    async fn create(&self, video: &Video) -> RepoResult<()> {
        self.0.lock().videos.push(video.clone());
        Ok(())
    }

    async fn update(&self, video: &Video) -> RepoResult<()> {
        let mut state = self.0.lock();
        match state.videos.iter_mut().find(|v| v.id == video.id) {
            Some(existing) => {
                *existing = video.clone();
                existing.updated_at = Utc::now();
                Ok(())
            }
            None => Err(DomainError::VideoNotFound(video.id)),
        }
    }

    async fn delete(&self, id: Snowflake) -> RepoResult<()> {
        let mut state = self.0.lock();
        let before = state.videos.len();
        state.videos.retain(|v| v.id != id);
        if state.videos.len() == before {
            return Err(DomainError::VideoNotFound(id));
        }
        state.comments.retain(|c| c.video_id != id);
        state.history.retain(|h| h.video_id != id);
        Ok(())
    }

    async fn increment_views(&self, id: Snowflake) -> RepoResult<i32> {
        let mut state = self.0.lock();
        match state.videos.iter_mut().find(|v| v.id == id) {
            Some(v) => {
                v.views_count += 1;
                Ok(v.views_count)
            }
            None => Err(DomainError::VideoNotFound(id)),
        }
    }

    async fn comment_count(&self, id: Snowflake) -> RepoResult<i64> {
        Ok(self
            .0
            .lock()
            .comments
            .iter()
            .filter(|c| c.video_id == id)
            .count() as i64)
    }
}

// ============================================================================
// Watch history
// ============================================================================

#[derive(Clone)]
struct MemWatchHistoryRepo(Arc<MemStore>);

#[async_trait]
impl WatchHistoryRepository for MemWatchHistoryRepo {
    async fn upsert(&self, entry: &WatchHistory) -> RepoResult<()> {
        let mut state = self.0.lock();
        match state
            .history
            .iter_mut()
            .find(|h| h.user_id == entry.user_id && h.video_id == entry.video_id)
        {
            Some(existing) => {
                existing.watched_at = entry.watched_at;
                existing.watch_duration = entry.watch_duration;
                existing.completed = entry.completed;
            }
            None => state.history.push(entry.clone()),
        }
        Ok(())
    }

    async fn find_by_user(
        &self,
        user_id: Snowflake,
        page: Page,
    ) -> RepoResult<Vec<(WatchHistory, String)>> {
        let state = self.0.lock();
        let mut rows: Vec<(WatchHistory, String)> = state
            .history
            .iter()
            .filter(|h| h.user_id == user_id)
            .map(|h| {
                let title = state
                    .videos
                    .iter()
                    .find(|v| v.id == h.video_id)
                    .map(|v| v.title.clone())
                    .unwrap_or_default();
                (h.clone(), title)
            })
            .collect();
        rows.sort_by(|a, b| b.0.watched_at.cmp(&a.0.watched_at));
        Ok(window(&rows, page))
    }
}

// ============================================================================
// Comments
// ============================================================================

#[derive(Clone)]
struct MemCommentRepo(Arc<MemStore>);

#[async_trait]
impl CommentRepository for MemCommentRepo {
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Comment>> {
        Ok(self.0.lock().comments.iter().find(|c| c.id == id).cloned())
    }

    async fn find_by_video(
        &self,
        video_id: Snowflake,
        page: Page,
    ) -> RepoResult<Vec<(Comment, String)>> {
        let state = self.0.lock();
        let mut rows: Vec<(Comment, String)> = state
            .comments
            .iter()
            .filter(|c| c.video_id == video_id)
            .map(|c| {
                let name = state
                    .users
                    .iter()
                    .find(|(u, _)| u.id == c.author_id)
                    .map(|(u, _)| u.username.clone())
                    .unwrap_or_default();
                (c.clone(), name)
            })
            .collect();
        rows.sort_by(|a, b| b.0.created_at.cmp(&a.0.created_at));
        Ok(window(&rows, page))
    }

    async fn create(&self, comment: &Comment) -> RepoResult<()> {
        self.0.lock().comments.push(comment.clone());
        Ok(())
    }

    async fn update(&self, comment: &Comment) -> RepoResult<()> {
        let mut state = self.0.lock();
        match state.comments.iter_mut().find(|c| c.id == comment.id) {
            Some(existing) => {
                existing.content = comment.content.clone();
                existing.updated_at = Utc::now();
                Ok(())
            }
            None => Err(DomainError::CommentNotFound(comment.id)),
        }
    }

    async fn delete(&self, id: Snowflake) -> RepoResult<()> {
        let mut state = self.0.lock();
        let before = state.comments.len();
        state.comments.retain(|c| c.id != id);
        if state.comments.len() == before {
            return Err(DomainError::CommentNotFound(id));
        }
        Ok(())
    }
}

// ============================================================================
// Chats
// ============================================================================

#[derive(Clone)]
struct MemChatRepo(Arc<MemStore>);

#[async_trait]
impl ChatRepository for MemChatRepo {
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Chat>> {
        Ok(self.0.lock().chats.iter().find(|c| c.id == id).cloned())
    }

    async fn find_between(
        &self,
        first: Snowflake,
        second: Snowflake,
    ) -> RepoResult<Option<Chat>> {
        let (a, b) = Chat::normalize_pair(first, second);
        Ok(self
            .0
            .lock()
            .chats
            .iter()
            .find(|c| c.user_a_id == a && c.user_b_id == b)
            .cloned())
    }

    async fn find_by_user(&self, user_id: Snowflake, page: Page) -> RepoResult<Vec<Chat>> {
        let mut rows: Vec<Chat> = self
            .0
            .lock()
            .chats
            .iter()
            .filter(|c| c.has_participant(user_id))
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(window(&rows, page))
    }

    async fn create(&self, chat: &Chat) -> RepoResult<()> {
        let mut state = self.0.lock();
        if state
            .chats
            .iter()
            .any(|c| c.user_a_id == chat.user_a_id && c.user_b_id == chat.user_b_id)
        {
            return Err(DomainError::DatabaseError("duplicate chat pair".to_string()));
        }
        state.chats.push(chat.clone());
        Ok(())
    }

    async fn touch(&self, id: Snowflake) -> RepoResult<()> {
        let mut state = self.0.lock();
        if let Some(c) = state.chats.iter_mut().find(|c| c.id == id) {
            c.updated_at = Utc::now();
        }
        Ok(())
    }

    async fn delete(&self, id: Snowflake) -> RepoResult<()> {
        let mut state = self.0.lock();
        let before = state.chats.len();
        state.chats.retain(|c| c.id != id);
        if state.chats.len() == before {
            return Err(DomainError::ChatNotFound(id));
        }
        state.letters.retain(|l| l.chat_id != id);
        Ok(())
    }
}

// ============================================================================
// Letters
// ============================================================================

#[derive(Clone)]
struct MemLetterRepo(Arc<MemStore>);

#[async_trait]
impl LetterRepository for MemLetterRepo {
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Letter>> {
        Ok(self.0.lock().letters.iter().find(|l| l.id == id).cloned())
    }

    async fn find_by_chat(&self, chat_id: Snowflake, page: Page) -> RepoResult<Vec<Letter>> {
        let mut rows: Vec<Letter> = self
            .0
            .lock()
            .letters
            .iter()
            .filter(|l| l.chat_id == chat_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(window(&rows, page))
    }

    async fn last_in_chat(&self, chat_id: Snowflake) -> RepoResult<Option<Letter>> {
        Ok(self
            .0
            .lock()
            .letters
            .iter()
            .filter(|l| l.chat_id == chat_id)
            .max_by_key(|l| l.created_at)
            .cloned())
    }

    async fn create(&self, letter: &Letter) -> RepoResult<()> {
        self.0.lock().letters.push(letter.clone());
        Ok(())
    }

    async fn update_content(&self, id: Snowflake, content: &str) -> RepoResult<()> {
        let mut state = self.0.lock();
        match state.letters.iter_mut().find(|l| l.id == id) {
            Some(l) => {
                l.content = content.to_string();
                Ok(())
            }
            None => Err(DomainError::LetterNotFound(id)),
        }
    }

    async fn delete(&self, id: Snowflake) -> RepoResult<()> {
        let mut state = self.0.lock();
        let before = state.letters.len();
        state.letters.retain(|l| l.id != id);
        if state.letters.len() == before {
            return Err(DomainError::LetterNotFound(id));
        }
        Ok(())
    }

    async fn mark_read(&self, id: Snowflake) -> RepoResult<()> {
        let mut state = self.0.lock();
        match state.letters.iter_mut().find(|l| l.id == id) {
            Some(l) => {
                l.read = true;
                Ok(())
            }
            None => Err(DomainError::LetterNotFound(id)),
        }
    }

    async fn mark_chat_read(&self, chat_id: Snowflake, reader_id: Snowflake) -> RepoResult<u64> {
        let mut state = self.0.lock();
        let mut marked = 0;
        for l in state
            .letters
            .iter_mut()
            .filter(|l| l.chat_id == chat_id && l.author_id != reader_id && !l.read)
        {
            l.read = true;
            marked += 1;
        }
        Ok(marked)
    }

    async fn unread_count_in_chat(
        &self,
        chat_id: Snowflake,
        user_id: Snowflake,
    ) -> RepoResult<i64> {
        Ok(self
            .0
            .lock()
            .letters
            .iter()
            .filter(|l| l.chat_id == chat_id && l.author_id != user_id && !l.read)
            .count() as i64)
    }

    async fn unread_count_for_user(&self, user_id: Snowflake) -> RepoResult<i64> {
        let state = self.0.lock();
        let chat_ids: Vec<Snowflake> = state
            .chats
            .iter()
            .filter(|c| c.has_participant(user_id))
            .map(|c| c.id)
            .collect();
        Ok(state
            .letters
            .iter()
            .filter(|l| chat_ids.contains(&l.chat_id) && l.author_id != user_id && !l.read)
            .count() as i64)
    }
}

// ============================================================================
// Context assembly
// ============================================================================

/// Build a ServiceContext backed entirely by in-memory repositories
pub(crate) fn test_context() -> ServiceContext {
    let store = Arc::new(MemStore::default());

    // Never connected; present only because the context carries a pool
    let pool = clipchat_db::PgPool::connect_lazy("postgresql://localhost/unused")
        .expect("lazy pool construction cannot fail");

    ServiceContextBuilder::new()
        .pool(pool)
        .user_repo(Arc::new(MemUserRepo(store.clone())))
        .token_repo(Arc::new(MemTokenRepo(store.clone())))
        .video_repo(Arc::new(MemVideoRepo(store.clone())))
        .watch_history_repo(Arc::new(MemWatchHistoryRepo(store.clone())))
        .comment_repo(Arc::new(MemCommentRepo(store.clone())))
        .chat_repo(Arc::new(MemChatRepo(store.clone())))
        .letter_repo(Arc::new(MemLetterRepo(store)))
        .jwt_service(Arc::new(JwtService::new(
            "test-secret-key-that-is-long-enough",
            1800,
            604800,
        )))
        .snowflake_generator(Arc::new(SnowflakeGenerator::new(0)))
        .build()
        .expect("test context is fully populated")
}
