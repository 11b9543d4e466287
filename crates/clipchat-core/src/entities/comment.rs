//! Comment entity - a comment on a video

use chrono::{DateTime, Utc};

use crate::value_objects::Snowflake;

/// Comment entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    pub id: Snowflake,
    pub video_id: Snowflake,
    pub author_id: Snowflake,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Comment {
    /// Create a new Comment
    pub fn new(id: Snowflake, video_id: Snowflake, author_id: Snowflake, content: String) -> Self {
        let now = Utc::now();
        Self {
            id,
            video_id,
            author_id,
            content,
            created_at: now,
            updated_at: now,
        }
    }

    /// Check whether a user may edit or delete this comment
    #[inline]
    pub fn is_author(&self, user_id: Snowflake) -> bool {
        self.author_id == user_id
    }

    /// Replace the content, stamping the update time
    pub fn edit(&mut self, content: String) {
        self.content = content;
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edit_updates_content() {
        let mut comment = Comment::new(
            Snowflake::new(1),
            Snowflake::new(2),
            Snowflake::new(3),
            "first".to_string(),
        );
        comment.edit("second".to_string());
        assert_eq!(comment.content, "second");
    }

    #[test]
    fn test_is_author() {
        let comment = Comment::new(
            Snowflake::new(1),
            Snowflake::new(2),
            Snowflake::new(3),
            "hi".to_string(),
        );
        assert!(comment.is_author(Snowflake::new(3)));
        assert!(!comment.is_author(Snowflake::new(4)));
    }
}
