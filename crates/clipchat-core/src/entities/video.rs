//! Video entity - uploaded or imported video metadata
//!
//! The platform stores metadata only; the media itself lives behind
//! `video_url`.

use chrono::{DateTime, Utc};

use crate::value_objects::Snowflake;

/// Video entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Video {
    pub id: Snowflake,
    pub title: String,
    pub description: Option<String>,
    pub video_url: String,
    pub thumbnail_url: Option<String>,
    /// Duration in seconds
    pub duration: Option<i32>,
    pub author_id: Snowflake,
    pub views_count: i32,
    pub likes_count: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Video {
    /// Create a new Video with zeroed counters
    pub fn new(id: Snowflake, title: String, video_url: String, author_id: Snowflake) -> Self {
        let now = Utc::now();
        Self {
            id,
            title,
            description: None,
            video_url,
            thumbnail_url: None,
            duration: None,
            author_id,
            views_count: 0,
            likes_count: 0,
            created_at: now,
            updated_at: now,
        }
    }

    /// Check whether a user may modify or delete this video
    #[inline]
    pub fn is_author(&self, user_id: Snowflake) -> bool {
        self.author_id == user_id
    }
}

/// Watch history entry - one row per (user, video), updated in place
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchHistory {
    pub id: Snowflake,
    pub user_id: Snowflake,
    pub video_id: Snowflake,
    pub watched_at: DateTime<Utc>,
    /// Seconds watched so far
    pub watch_duration: i32,
    pub completed: bool,
}

impl WatchHistory {
    /// Create a new history entry
    pub fn new(
        id: Snowflake,
        user_id: Snowflake,
        video_id: Snowflake,
        watch_duration: i32,
        completed: bool,
    ) -> Self {
        Self {
            id,
            user_id,
            video_id,
            watched_at: Utc::now(),
            watch_duration,
            completed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_video_counters_start_at_zero() {
        let video = Video::new(
            Snowflake::new(1),
            "Intro".to_string(),
            "https://cdn.example.com/intro.mp4".to_string(),
            Snowflake::new(7),
        );
        assert_eq!(video.views_count, 0);
        assert_eq!(video.likes_count, 0);
    }

    #[test]
    fn test_is_author() {
        let video = Video::new(
            Snowflake::new(1),
            "Intro".to_string(),
            "https://cdn.example.com/intro.mp4".to_string(),
            Snowflake::new(7),
        );
        assert!(video.is_author(Snowflake::new(7)));
        assert!(!video.is_author(Snowflake::new(8)));
    }
}
