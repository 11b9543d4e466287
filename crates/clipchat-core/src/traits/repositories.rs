//! Repository traits (ports) - define the interface for data access
//!
//! The domain layer defines what it needs, and the infrastructure layer
//! provides the implementation.

use async_trait::async_trait;

use crate::entities::{AuthToken, Chat, Comment, Letter, User, Video, WatchHistory};
use crate::error::DomainError;
use crate::value_objects::Snowflake;

/// Result type for repository operations
pub type RepoResult<T> = Result<T, DomainError>;

/// Offset/limit window for list queries
#[derive(Debug, Clone, Copy)]
pub struct Page {
    pub offset: i64,
    pub limit: i64,
}

impl Default for Page {
    fn default() -> Self {
        Self {
            offset: 0,
            limit: 50,
        }
    }
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

/// Sortable video listing columns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VideoSortKey {
    #[default]
    CreatedAt,
    ViewsCount,
    Title,
}

/// Query options for the video listing
#[derive(Debug, Clone, Default)]
pub struct VideoQuery {
    /// Case-insensitive title substring filter
    pub search: Option<String>,
    pub sort_by: VideoSortKey,
    pub order: SortOrder,
    pub page: Page,
}

/// Read model for the video listing: the video plus the denormalized fields
/// every listing response needs
#[derive(Debug, Clone)]
pub struct VideoListing {
    pub video: Video,
    pub author_name: String,
    pub comments_count: i64,
}

// ============================================================================
// User Repository
// ============================================================================

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find user by ID
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<User>>;

    /// Find user by email
    async fn find_by_email(&self, email: &str) -> RepoResult<Option<User>>;

    /// Check if email is already taken
    async fn email_exists(&self, email: &str) -> RepoResult<bool>;

    /// Check if username is already taken
    async fn username_exists(&self, username: &str) -> RepoResult<bool>;

    /// List users
    async fn list(&self, page: Page) -> RepoResult<Vec<User>>;

    /// Create a new user
    async fn create(&self, user: &User, password_hash: &str) -> RepoResult<()>;

    /// Get password hash for authentication
    async fn get_password_hash(&self, id: Snowflake) -> RepoResult<Option<String>>;

    /// Hard delete a user; owned rows cascade
    async fn delete(&self, id: Snowflake) -> RepoResult<()>;
}

// ============================================================================
// Token Repository (the token ledger)
// ============================================================================

#[async_trait]
pub trait TokenRepository: Send + Sync {
    /// Persist a freshly issued token
    async fn insert(&self, token: &AuthToken) -> RepoResult<()>;

    /// Look up a ledger row by its raw token string
    async fn find_by_token(&self, raw: &str) -> RepoResult<Option<AuthToken>>;

    /// Mark one ledger row revoked by its row id
    async fn revoke(&self, id: Snowflake) -> RepoResult<()>;

    /// Mark every non-revoked access token of a user revoked
    async fn revoke_access_for_user(&self, user_id: Snowflake) -> RepoResult<u64>;

    /// Mark every token of a user revoked, regardless of kind
    async fn revoke_all_for_user(&self, user_id: Snowflake) -> RepoResult<u64>;
}

// ============================================================================
// Video Repository
// ============================================================================

#[async_trait]
pub trait VideoRepository: Send + Sync {
    /// Find video by ID
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Video>>;

    /// List videos with author names and comment counts
    async fn list(&self, query: &VideoQuery) -> RepoResult<Vec<VideoListing>>;

    /// Create a new video
    async fn create(&self, video: &Video) -> RepoResult<()>;

    /// Update mutable metadata fields
    async fn update(&self, video: &Video) -> RepoResult<()>;

    /// Hard delete a video; its comments cascade
    async fn delete(&self, id: Snowflake) -> RepoResult<()>;

    /// Bump the view counter, returning the new count
    async fn increment_views(&self, id: Snowflake) -> RepoResult<i32>;

    /// Count comments on a video
    async fn comment_count(&self, id: Snowflake) -> RepoResult<i64>;
}

// ============================================================================
// Watch History Repository
// ============================================================================

#[async_trait]
pub trait WatchHistoryRepository: Send + Sync {
    /// Insert or update the (user, video) history row
    async fn upsert(&self, entry: &WatchHistory) -> RepoResult<()>;

    /// List a user's history with video titles, most recent first
    async fn find_by_user(&self, user_id: Snowflake, page: Page)
        -> RepoResult<Vec<(WatchHistory, String)>>;
}

// ============================================================================
// Comment Repository
// ============================================================================

#[async_trait]
pub trait CommentRepository: Send + Sync {
    /// Find comment by ID
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Comment>>;

    /// List comments on a video with author usernames, newest first
    async fn find_by_video(
        &self,
        video_id: Snowflake,
        page: Page,
    ) -> RepoResult<Vec<(Comment, String)>>;

    /// Create a new comment
    async fn create(&self, comment: &Comment) -> RepoResult<()>;

    /// Update comment content
    async fn update(&self, comment: &Comment) -> RepoResult<()>;

    /// Hard delete a comment
    async fn delete(&self, id: Snowflake) -> RepoResult<()>;
}

// ============================================================================
// Chat Repository
// ============================================================================

#[async_trait]
pub trait ChatRepository: Send + Sync {
    /// Find chat by ID
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Chat>>;

    /// Find the chat between two users, in either participant order
    async fn find_between(&self, first: Snowflake, second: Snowflake)
        -> RepoResult<Option<Chat>>;

    /// List a user's chats, most recently active first
    async fn find_by_user(&self, user_id: Snowflake, page: Page) -> RepoResult<Vec<Chat>>;

    /// Create a new chat
    async fn create(&self, chat: &Chat) -> RepoResult<()>;

    /// Bump the chat's updated_at to now
    async fn touch(&self, id: Snowflake) -> RepoResult<()>;

    /// Hard delete a chat; its letters cascade
    async fn delete(&self, id: Snowflake) -> RepoResult<()>;
}

// ============================================================================
// Letter Repository
// ============================================================================

#[async_trait]
pub trait LetterRepository: Send + Sync {
    /// Find letter by ID
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Letter>>;

    /// List letters in a chat, newest first
    async fn find_by_chat(&self, chat_id: Snowflake, page: Page) -> RepoResult<Vec<Letter>>;

    /// The most recent letter in a chat, if any
    async fn last_in_chat(&self, chat_id: Snowflake) -> RepoResult<Option<Letter>>;

    /// Create a new letter
    async fn create(&self, letter: &Letter) -> RepoResult<()>;

    /// Update letter content
    async fn update_content(&self, id: Snowflake, content: &str) -> RepoResult<()>;

    /// Hard delete a letter
    async fn delete(&self, id: Snowflake) -> RepoResult<()>;

    /// Mark one letter read
    async fn mark_read(&self, id: Snowflake) -> RepoResult<()>;

    /// Mark every unread letter in a chat not authored by the reader as read
    async fn mark_chat_read(&self, chat_id: Snowflake, reader_id: Snowflake) -> RepoResult<u64>;

    /// Unread letters in one chat addressed to the given user
    async fn unread_count_in_chat(
        &self,
        chat_id: Snowflake,
        user_id: Snowflake,
    ) -> RepoResult<i64>;

    /// Unread letters addressed to the user across all their chats
    ///
    /// Recomputed on every call; there is no maintained counter.
    async fn unread_count_for_user(&self, user_id: Snowflake) -> RepoResult<i64>;
}
