//! Auth token entity - a ledger row for an issued access or refresh token
//!
//! Rows are only ever mutated by flipping the `revoked` flag. Expired rows
//! are not swept; they are revoked lazily when next presented.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::value_objects::Snowflake;

/// Discriminates the two token roles. The roles are never interchangeable
/// during validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenKind {
    Access,
    Refresh,
}

impl TokenKind {
    /// Database/string representation
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Access => "access",
            Self::Refresh => "refresh",
        }
    }

    /// Parse from the database representation
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "access" => Some(Self::Access),
            "refresh" => Some(Self::Refresh),
            _ => None,
        }
    }
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ledger entry for an issued token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthToken {
    pub id: Snowflake,
    /// Raw signed token string (unique)
    pub token: String,
    pub kind: TokenKind,
    pub user_id: Snowflake,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub revoked: bool,
}

impl AuthToken {
    /// Create a new (not yet persisted) ledger entry
    pub fn new(
        id: Snowflake,
        token: String,
        kind: TokenKind,
        user_id: Snowflake,
        expires_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            token,
            kind,
            user_id,
            expires_at,
            created_at: Utc::now(),
            revoked: false,
        }
    }

    /// Check whether the stored expiry has passed
    #[inline]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at < now
    }

    /// Check whether this entry still counts for validation
    #[inline]
    pub fn is_usable(&self, now: DateTime<Utc>) -> bool {
        !self.revoked && !self.is_expired(now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn token(expires_in: Duration) -> AuthToken {
        AuthToken::new(
            Snowflake::new(1),
            "raw-token".to_string(),
            TokenKind::Access,
            Snowflake::new(10),
            Utc::now() + expires_in,
        )
    }

    #[test]
    fn test_kind_roundtrip() {
        assert_eq!(TokenKind::parse("access"), Some(TokenKind::Access));
        assert_eq!(TokenKind::parse("refresh"), Some(TokenKind::Refresh));
        assert_eq!(TokenKind::parse("other"), None);
        assert_eq!(TokenKind::Access.as_str(), "access");
    }

    #[test]
    fn test_fresh_token_is_usable() {
        let t = token(Duration::minutes(15));
        assert!(t.is_usable(Utc::now()));
    }

    #[test]
    fn test_expired_token_is_not_usable() {
        let t = token(Duration::minutes(-1));
        assert!(t.is_expired(Utc::now()));
        assert!(!t.is_usable(Utc::now()));
    }

    #[test]
    fn test_revoked_token_is_not_usable() {
        let mut t = token(Duration::minutes(15));
        t.revoked = true;
        assert!(!t.is_usable(Utc::now()));
    }
}
