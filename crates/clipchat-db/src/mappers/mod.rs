//! Entity to model mappers
//!
//! Conversions between domain entities (clipchat-core) and database rows.
//! `From<Model> for Entity` converts fetched rows into domain objects;
//! inserts bind entity fields directly in the repositories.

use clipchat_core::entities::{AuthToken, Chat, Comment, Letter, TokenKind, User, Video, WatchHistory};
use clipchat_core::error::DomainError;
use clipchat_core::value_objects::Snowflake;

use crate::models::{
    ChatModel, CommentModel, LetterModel, TokenModel, UserModel, VideoModel, WatchHistoryModel,
};

impl From<UserModel> for User {
    fn from(model: UserModel) -> Self {
        User {
            id: Snowflake::new(model.id),
            email: model.email,
            username: model.username,
            active: model.active,
            created_at: model.created_at,
        }
    }
}

impl TryFrom<TokenModel> for AuthToken {
    type Error = DomainError;

    fn try_from(model: TokenModel) -> Result<Self, Self::Error> {
        let kind = TokenKind::parse(&model.kind).ok_or_else(|| {
            DomainError::InternalError(format!("unknown token kind in ledger: {}", model.kind))
        })?;

        Ok(AuthToken {
            id: Snowflake::new(model.id),
            token: model.token,
            kind,
            user_id: Snowflake::new(model.user_id),
            expires_at: model.expires_at,
            created_at: model.created_at,
            revoked: model.revoked,
        })
    }
}

impl From<VideoModel> for Video {
    fn from(model: VideoModel) -> Self {
        Video {
            id: Snowflake::new(model.id),
            title: model.title,
            description: model.description,
            video_url: model.video_url,
            thumbnail_url: model.thumbnail_url,
            duration: model.duration,
            author_id: Snowflake::new(model.author_id),
            views_count: model.views_count,
            likes_count: model.likes_count,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

impl From<CommentModel> for Comment {
    fn from(model: CommentModel) -> Self {
        Comment {
            id: Snowflake::new(model.id),
            video_id: Snowflake::new(model.video_id),
            author_id: Snowflake::new(model.author_id),
            content: model.content,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

impl From<WatchHistoryModel> for WatchHistory {
    fn from(model: WatchHistoryModel) -> Self {
        WatchHistory {
            id: Snowflake::new(model.id),
            user_id: Snowflake::new(model.user_id),
            video_id: Snowflake::new(model.video_id),
            watched_at: model.watched_at,
            watch_duration: model.watch_duration,
            completed: model.completed,
        }
    }
}

impl From<ChatModel> for Chat {
    fn from(model: ChatModel) -> Self {
        Chat {
            id: Snowflake::new(model.id),
            user_a_id: Snowflake::new(model.user_a_id),
            user_b_id: Snowflake::new(model.user_b_id),
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

impl From<LetterModel> for Letter {
    fn from(model: LetterModel) -> Self {
        Letter {
            id: Snowflake::new(model.id),
            chat_id: Snowflake::new(model.chat_id),
            author_id: Snowflake::new(model.author_id),
            content: model.content,
            read: model.read,
            created_at: model.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_token_model_with_unknown_kind_fails() {
        let model = TokenModel {
            id: 1,
            token: "raw".to_string(),
            kind: "session".to_string(),
            user_id: 2,
            expires_at: Utc::now(),
            created_at: Utc::now(),
            revoked: false,
        };
        assert!(AuthToken::try_from(model).is_err());
    }

    #[test]
    fn test_token_model_roundtrip() {
        let model = TokenModel {
            id: 1,
            token: "raw".to_string(),
            kind: "refresh".to_string(),
            user_id: 2,
            expires_at: Utc::now(),
            created_at: Utc::now(),
            revoked: true,
        };
        let entity = AuthToken::try_from(model).unwrap();
        assert_eq!(entity.kind, TokenKind::Refresh);
        assert!(entity.revoked);
    }
}
