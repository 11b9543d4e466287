//! Letter entity - a single direct message inside a chat

use chrono::{DateTime, Utc};

use crate::value_objects::Snowflake;

/// Letter entity
///
/// Immutable once written, except for the read flag and content edits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Letter {
    pub id: Snowflake,
    pub chat_id: Snowflake,
    pub author_id: Snowflake,
    pub content: String,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

impl Letter {
    /// Create a new unread Letter
    pub fn new(id: Snowflake, chat_id: Snowflake, author_id: Snowflake, content: String) -> Self {
        Self {
            id,
            chat_id,
            author_id,
            content,
            read: false,
            created_at: Utc::now(),
        }
    }

    /// Check whether a user wrote this letter
    #[inline]
    pub fn is_author(&self, user_id: Snowflake) -> bool {
        self.author_id == user_id
    }

    /// Mark as read. Reading your own letter is a no-op: the flag tracks
    /// whether the *other* participant has seen it.
    pub fn mark_read_by(&mut self, reader_id: Snowflake) {
        if !self.is_author(reader_id) {
            self.read = true;
        }
    }

    /// Replace the content
    pub fn edit(&mut self, content: String) {
        self.content = content;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn letter() -> Letter {
        Letter::new(
            Snowflake::new(1),
            Snowflake::new(2),
            Snowflake::new(3),
            "hello".to_string(),
        )
    }

    #[test]
    fn test_new_letter_is_unread() {
        assert!(!letter().read);
    }

    #[test]
    fn test_recipient_read_sets_flag() {
        let mut l = letter();
        l.mark_read_by(Snowflake::new(4));
        assert!(l.read);
    }

    #[test]
    fn test_author_read_is_noop() {
        let mut l = letter();
        l.mark_read_by(Snowflake::new(3));
        assert!(!l.read);
    }
}
