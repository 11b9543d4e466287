//! Domain errors - error types for the domain layer

use thiserror::Error;

use crate::value_objects::Snowflake;

/// Domain layer errors
#[derive(Debug, Error)]
pub enum DomainError {
    // =========================================================================
    // Not Found Errors
    // =========================================================================
    #[error("User not found: {0}")]
    UserNotFound(Snowflake),

    #[error("Video not found: {0}")]
    VideoNotFound(Snowflake),

    #[error("Comment not found: {0}")]
    CommentNotFound(Snowflake),

    #[error("Chat not found: {0}")]
    ChatNotFound(Snowflake),

    #[error("Letter not found: {0}")]
    LetterNotFound(Snowflake),

    // =========================================================================
    // Validation Errors
    // =========================================================================
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Cannot mark your own letter as read")]
    OwnLetterReadReceipt,

    // =========================================================================
    // Authorization Errors
    // =========================================================================
    #[error("Not the video author")]
    NotVideoAuthor,

    #[error("Not the comment author")]
    NotCommentAuthor,

    #[error("Not the letter author")]
    NotLetterAuthor,

    #[error("Not a participant of this chat")]
    NotChatParticipant,

    // =========================================================================
    // Conflict Errors
    // =========================================================================
    #[error("Email already registered")]
    EmailAlreadyExists,

    #[error("Username already taken")]
    UsernameAlreadyExists,

    #[error("Cannot create a chat with yourself")]
    SelfChat,

    // =========================================================================
    // Infrastructure Errors (wrapped)
    // =========================================================================
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl DomainError {
    /// Get an error code string for API responses
    pub fn code(&self) -> &'static str {
        match self {
            // Not Found
            Self::UserNotFound(_) => "UNKNOWN_USER",
            Self::VideoNotFound(_) => "UNKNOWN_VIDEO",
            Self::CommentNotFound(_) => "UNKNOWN_COMMENT",
            Self::ChatNotFound(_) => "UNKNOWN_CHAT",
            Self::LetterNotFound(_) => "UNKNOWN_LETTER",

            // Validation
            Self::ValidationError(_) => "VALIDATION_ERROR",
            Self::OwnLetterReadReceipt => "OWN_LETTER_READ_RECEIPT",

            // Authorization
            Self::NotVideoAuthor => "NOT_VIDEO_AUTHOR",
            Self::NotCommentAuthor => "NOT_COMMENT_AUTHOR",
            Self::NotLetterAuthor => "NOT_LETTER_AUTHOR",
            Self::NotChatParticipant => "NOT_CHAT_PARTICIPANT",

            // Conflict
            Self::EmailAlreadyExists => "EMAIL_ALREADY_EXISTS",
            Self::UsernameAlreadyExists => "USERNAME_ALREADY_TAKEN",
            Self::SelfChat => "SELF_CHAT",

            // Infrastructure
            Self::DatabaseError(_) => "DATABASE_ERROR",
            Self::InternalError(_) => "INTERNAL_ERROR",
        }
    }

    /// Check if this is a not-found error
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::UserNotFound(_)
                | Self::VideoNotFound(_)
                | Self::CommentNotFound(_)
                | Self::ChatNotFound(_)
                | Self::LetterNotFound(_)
        )
    }

    /// Check if this is an authorization error
    pub fn is_authorization(&self) -> bool {
        matches!(
            self,
            Self::NotVideoAuthor
                | Self::NotCommentAuthor
                | Self::NotLetterAuthor
                | Self::NotChatParticipant
        )
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::ValidationError(_) | Self::OwnLetterReadReceipt)
    }

    /// Check if this is a conflict error
    ///
    /// Conflicts surface to clients as 400 responses (duplicate
    /// email/username and self-chat attempts are rejected with Bad Request).
    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            Self::EmailAlreadyExists | Self::UsernameAlreadyExists | Self::SelfChat
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_classification() {
        assert!(DomainError::VideoNotFound(Snowflake::new(1)).is_not_found());
        assert!(!DomainError::NotVideoAuthor.is_not_found());
    }

    #[test]
    fn test_authorization_classification() {
        assert!(DomainError::NotChatParticipant.is_authorization());
        assert!(!DomainError::SelfChat.is_authorization());
    }

    #[test]
    fn test_conflict_classification() {
        assert!(DomainError::EmailAlreadyExists.is_conflict());
        assert!(DomainError::UsernameAlreadyExists.is_conflict());
        assert!(DomainError::SelfChat.is_conflict());
    }

    #[test]
    fn test_codes() {
        assert_eq!(
            DomainError::EmailAlreadyExists.code(),
            "EMAIL_ALREADY_EXISTS"
        );
        assert_eq!(
            DomainError::UserNotFound(Snowflake::new(1)).code(),
            "UNKNOWN_USER"
        );
    }
}
