//! Chat entity - a direct-message conversation between two users
//!
//! The participant pair is unordered: the lower Snowflake is always stored
//! first, so one row exists per pair regardless of who opened the chat.

use chrono::{DateTime, Utc};

use crate::value_objects::Snowflake;

/// Chat entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chat {
    pub id: Snowflake,
    /// Lower participant id of the normalized pair
    pub user_a_id: Snowflake,
    /// Higher participant id of the normalized pair
    pub user_b_id: Snowflake,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Chat {
    /// Create a new Chat between two distinct users, normalizing the pair
    ///
    /// # Panics
    /// Panics if both participants are the same user; callers must reject
    /// self-chats before construction.
    pub fn new(id: Snowflake, first: Snowflake, second: Snowflake) -> Self {
        assert_ne!(first, second, "a chat needs two distinct participants");
        let (user_a_id, user_b_id) = Self::normalize_pair(first, second);
        let now = Utc::now();
        Self {
            id,
            user_a_id,
            user_b_id,
            created_at: now,
            updated_at: now,
        }
    }

    /// Order a participant pair so lookups are order-independent
    pub fn normalize_pair(first: Snowflake, second: Snowflake) -> (Snowflake, Snowflake) {
        if first <= second {
            (first, second)
        } else {
            (second, first)
        }
    }

    /// Check whether a user participates in this chat
    #[inline]
    pub fn has_participant(&self, user_id: Snowflake) -> bool {
        self.user_a_id == user_id || self.user_b_id == user_id
    }

    /// Get the other participant for a given member of the chat
    pub fn other_participant(&self, user_id: Snowflake) -> Option<Snowflake> {
        if self.user_a_id == user_id {
            Some(self.user_b_id)
        } else if self.user_b_id == user_id {
            Some(self.user_a_id)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pair_is_normalized() {
        let a = Chat::new(Snowflake::new(1), Snowflake::new(20), Snowflake::new(10));
        let b = Chat::new(Snowflake::new(2), Snowflake::new(10), Snowflake::new(20));
        assert_eq!(a.user_a_id, b.user_a_id);
        assert_eq!(a.user_b_id, b.user_b_id);
    }

    #[test]
    fn test_has_participant() {
        let chat = Chat::new(Snowflake::new(1), Snowflake::new(10), Snowflake::new(20));
        assert!(chat.has_participant(Snowflake::new(10)));
        assert!(chat.has_participant(Snowflake::new(20)));
        assert!(!chat.has_participant(Snowflake::new(30)));
    }

    #[test]
    fn test_other_participant() {
        let chat = Chat::new(Snowflake::new(1), Snowflake::new(10), Snowflake::new(20));
        assert_eq!(
            chat.other_participant(Snowflake::new(10)),
            Some(Snowflake::new(20))
        );
        assert_eq!(
            chat.other_participant(Snowflake::new(20)),
            Some(Snowflake::new(10))
        );
        assert_eq!(chat.other_participant(Snowflake::new(30)), None);
    }

    #[test]
    #[should_panic(expected = "two distinct participants")]
    fn test_self_chat_is_rejected() {
        let _ = Chat::new(Snowflake::new(1), Snowflake::new(10), Snowflake::new(10));
    }
}
