//! Video and watch history database models

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for videos table
#[derive(Debug, Clone, FromRow)]
pub struct VideoModel {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub video_url: String,
    pub thumbnail_url: Option<String>,
    pub duration: Option<i32>,
    pub author_id: i64,
    pub views_count: i32,
    pub likes_count: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Video row joined with its author's username and comment count
#[derive(Debug, Clone, FromRow)]
pub struct VideoListingModel {
    #[sqlx(flatten)]
    pub video: VideoModel,
    pub author_name: String,
    pub comments_count: i64,
}

/// Database model for watch_history table
#[derive(Debug, Clone, FromRow)]
pub struct WatchHistoryModel {
    pub id: i64,
    pub user_id: i64,
    pub video_id: i64,
    pub watched_at: DateTime<Utc>,
    pub watch_duration: i32,
    pub completed: bool,
}

/// Watch history row joined with the video title
#[derive(Debug, Clone, FromRow)]
pub struct WatchHistoryWithTitleModel {
    #[sqlx(flatten)]
    pub entry: WatchHistoryModel,
    pub video_title: String,
}
