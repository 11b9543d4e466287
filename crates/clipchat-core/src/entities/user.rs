//! User entity - represents a platform account

use chrono::{DateTime, Utc};

use crate::value_objects::Snowflake;

/// User entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: Snowflake,
    pub email: String,
    pub username: String,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Create a new active User
    pub fn new(id: Snowflake, email: String, username: String) -> Self {
        Self {
            id,
            email,
            username,
            active: true,
            created_at: Utc::now(),
        }
    }

    /// Check if the account can log in
    #[inline]
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Deactivate the account
    pub fn deactivate(&mut self) {
        self.active = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_user_is_active() {
        let user = User::new(
            Snowflake::new(1),
            "alice@example.com".to_string(),
            "alice".to_string(),
        );
        assert!(user.is_active());
    }

    #[test]
    fn test_deactivate() {
        let mut user = User::new(
            Snowflake::new(1),
            "alice@example.com".to_string(),
            "alice".to_string(),
        );
        user.deactivate();
        assert!(!user.is_active());
    }
}
