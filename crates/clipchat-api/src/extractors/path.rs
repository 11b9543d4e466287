//! Path parameter extractors
//!
//! Type-safe extraction of Snowflake IDs from path parameters.

use clipchat_core::Snowflake;

use crate::response::ApiError;

/// Path parameters with user_id
#[derive(Debug, serde::Deserialize)]
pub struct UserIdPath {
    pub user_id: String,
}

impl UserIdPath {
    /// Parse user_id as Snowflake
    pub fn user_id(&self) -> Result<Snowflake, ApiError> {
        self.user_id
            .parse()
            .map_err(|_| ApiError::invalid_path("Invalid user_id format"))
    }
}

/// Path parameters with other_user_id
#[derive(Debug, serde::Deserialize)]
pub struct OtherUserIdPath {
    pub other_user_id: String,
}

impl OtherUserIdPath {
    /// Parse other_user_id as Snowflake
    pub fn other_user_id(&self) -> Result<Snowflake, ApiError> {
        self.other_user_id
            .parse()
            .map_err(|_| ApiError::invalid_path("Invalid other_user_id format"))
    }
}

/// Path parameters with video_id
#[derive(Debug, serde::Deserialize)]
pub struct VideoIdPath {
    pub video_id: String,
}

impl VideoIdPath {
    /// Parse video_id as Snowflake
    pub fn video_id(&self) -> Result<Snowflake, ApiError> {
        self.video_id
            .parse()
            .map_err(|_| ApiError::invalid_path("Invalid video_id format"))
    }
}

/// Path parameters with video_id and comment_id
#[derive(Debug, serde::Deserialize)]
pub struct CommentIdPath {
    pub video_id: String,
    pub comment_id: String,
}

impl CommentIdPath {
    /// Parse video_id as Snowflake
    pub fn video_id(&self) -> Result<Snowflake, ApiError> {
        self.video_id
            .parse()
            .map_err(|_| ApiError::invalid_path("Invalid video_id format"))
    }

    /// Parse comment_id as Snowflake
    pub fn comment_id(&self) -> Result<Snowflake, ApiError> {
        self.comment_id
            .parse()
            .map_err(|_| ApiError::invalid_path("Invalid comment_id format"))
    }
}

/// Path parameters with chat_id
#[derive(Debug, serde::Deserialize)]
pub struct ChatIdPath {
    pub chat_id: String,
}

impl ChatIdPath {
    /// Parse chat_id as Snowflake
    pub fn chat_id(&self) -> Result<Snowflake, ApiError> {
        self.chat_id
            .parse()
            .map_err(|_| ApiError::invalid_path("Invalid chat_id format"))
    }
}

/// Path parameters with chat_id and letter_id
#[derive(Debug, serde::Deserialize)]
pub struct LetterIdPath {
    pub chat_id: String,
    pub letter_id: String,
}

impl LetterIdPath {
    /// Parse chat_id as Snowflake
    pub fn chat_id(&self) -> Result<Snowflake, ApiError> {
        self.chat_id
            .parse()
            .map_err(|_| ApiError::invalid_path("Invalid chat_id format"))
    }

    /// Parse letter_id as Snowflake
    pub fn letter_id(&self) -> Result<Snowflake, ApiError> {
        self.letter_id
            .parse()
            .map_err(|_| ApiError::invalid_path("Invalid letter_id format"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_ids_parse() {
        let path = VideoIdPath {
            video_id: "123456".to_string(),
        };
        assert_eq!(path.video_id().unwrap(), Snowflake::new(123456));
    }

    #[test]
    fn test_invalid_ids_are_rejected() {
        let path = ChatIdPath {
            chat_id: "not-a-number".to_string(),
        };
        assert!(path.chat_id().is_err());
    }
}
