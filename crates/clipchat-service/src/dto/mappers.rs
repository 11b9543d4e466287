//! Entity to DTO mappers
//!
//! Implements `From` conversions from domain entities to response DTOs.

use clipchat_core::entities::{Comment, Letter, User, Video, WatchHistory};
use clipchat_core::traits::VideoListing;

use super::responses::{
    CommentResponse, LetterResponse, UserResponse, UserSummary, VideoListItemResponse,
    VideoResponse, WatchHistoryResponse,
};

// ============================================================================
// User Mappers
// ============================================================================

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            username: user.username.clone(),
            active: user.active,
            created_at: user.created_at,
        }
    }
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self::from(&user)
    }
}

impl From<&User> for UserSummary {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
        }
    }
}

impl From<User> for UserSummary {
    fn from(user: User) -> Self {
        Self::from(&user)
    }
}

// ============================================================================
// Video Mappers
// ============================================================================

impl From<VideoListing> for VideoListItemResponse {
    fn from(listing: VideoListing) -> Self {
        Self {
            id: listing.video.id,
            title: listing.video.title,
            thumbnail_url: listing.video.thumbnail_url,
            duration: listing.video.duration,
            author_name: listing.author_name,
            views_count: listing.video.views_count,
            created_at: listing.video.created_at,
            comments_count: listing.comments_count,
        }
    }
}

impl VideoResponse {
    /// Assemble the full detail response from its parts
    pub fn from_parts(video: Video, author_name: String, comments_count: i64) -> Self {
        Self {
            id: video.id,
            title: video.title,
            description: video.description,
            video_url: video.video_url,
            thumbnail_url: video.thumbnail_url,
            duration: video.duration,
            author_id: video.author_id,
            author_name,
            views_count: video.views_count,
            likes_count: video.likes_count,
            created_at: video.created_at,
            updated_at: video.updated_at,
            comments_count,
        }
    }
}

// ============================================================================
// Comment Mappers
// ============================================================================

impl CommentResponse {
    /// Pair a comment with its author's username
    pub fn from_parts(comment: Comment, author_name: String) -> Self {
        Self {
            id: comment.id,
            video_id: comment.video_id,
            author_id: comment.author_id,
            author_name,
            content: comment.content,
            created_at: comment.created_at,
            updated_at: comment.updated_at,
        }
    }
}

// ============================================================================
// Watch History Mappers
// ============================================================================

impl WatchHistoryResponse {
    /// Pair a history entry with its video title
    pub fn from_parts(entry: WatchHistory, video_title: String) -> Self {
        Self {
            id: entry.id,
            video_id: entry.video_id,
            video_title,
            watched_at: entry.watched_at,
            watch_duration: entry.watch_duration,
            completed: entry.completed,
        }
    }
}

// ============================================================================
// Letter Mappers
// ============================================================================

impl LetterResponse {
    /// Pair a letter with its author reference
    pub fn from_parts(letter: Letter, author: UserSummary) -> Self {
        Self {
            id: letter.id,
            chat_id: letter.chat_id,
            author,
            content: letter.content,
            read: letter.read,
            created_at: letter.created_at,
        }
    }
}
