//! Response DTOs for API endpoints
//!
//! All response DTOs implement `Serialize` for JSON output.
//! Snowflake IDs serialize as strings for JavaScript compatibility.

use chrono::{DateTime, Utc};
use clipchat_core::Snowflake;
use serde::Serialize;

// ============================================================================
// Auth Responses
// ============================================================================

/// Token pair returned by login and refresh
#[derive(Debug, Serialize)]
pub struct TokenPairResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    /// Access token lifetime in seconds
    pub expires_in: i64,
}

impl TokenPairResponse {
    pub fn new(access_token: String, refresh_token: String, expires_in: i64) -> Self {
        Self {
            access_token,
            refresh_token,
            token_type: "bearer".to_string(),
            expires_in,
        }
    }
}

/// Acknowledgement for logout; reported regardless of whether the token existed
#[derive(Debug, Serialize)]
pub struct LogoutResponse {
    pub message: String,
}

impl Default for LogoutResponse {
    fn default() -> Self {
        Self {
            message: "Successfully logged out".to_string(),
        }
    }
}

// ============================================================================
// User Responses
// ============================================================================

/// Full user profile (own profile and user listings)
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub id: Snowflake,
    pub email: String,
    pub username: String,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

/// Minimal user reference embedded in chat and letter responses
#[derive(Debug, Clone, Serialize)]
pub struct UserSummary {
    pub id: Snowflake,
    pub username: String,
}

/// Watch history entry with its video title
#[derive(Debug, Serialize)]
pub struct WatchHistoryResponse {
    pub id: Snowflake,
    pub video_id: Snowflake,
    pub video_title: String,
    pub watched_at: DateTime<Utc>,
    pub watch_duration: i32,
    pub completed: bool,
}

// ============================================================================
// Video Responses
// ============================================================================

/// Compact entry for the video listing
#[derive(Debug, Serialize)]
pub struct VideoListItemResponse {
    pub id: Snowflake,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<i32>,
    pub author_name: String,
    pub views_count: i32,
    pub created_at: DateTime<Utc>,
    pub comments_count: i64,
}

/// Full video detail
#[derive(Debug, Serialize)]
pub struct VideoResponse {
    pub id: Snowflake,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub video_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<i32>,
    pub author_id: Snowflake,
    pub author_name: String,
    pub views_count: i32,
    pub likes_count: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub comments_count: i64,
}

// ============================================================================
// Comment Responses
// ============================================================================

/// Comment with its author's username
#[derive(Debug, Serialize)]
pub struct CommentResponse {
    pub id: Snowflake,
    pub video_id: Snowflake,
    pub author_id: Snowflake,
    pub author_name: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ============================================================================
// Chat / Letter Responses
// ============================================================================

/// Letter with its author reference
#[derive(Debug, Clone, Serialize)]
pub struct LetterResponse {
    pub id: Snowflake,
    pub chat_id: Snowflake,
    pub author: UserSummary,
    pub content: String,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

/// Chat summary for the chat listing
#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub id: Snowflake,
    /// The requesting user's conversation partner
    pub other_user: UserSummary,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_letter: Option<LetterResponse>,
    pub unread_count: i64,
}

/// Chat with its full letter history
#[derive(Debug, Serialize)]
pub struct ChatDetailResponse {
    pub id: Snowflake,
    pub other_user: UserSummary,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Oldest first
    pub letters: Vec<LetterResponse>,
    pub unread_count: i64,
}

// ============================================================================
// Health Responses
// ============================================================================

/// Health check response
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
}

impl HealthResponse {
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: Utc::now(),
        }
    }
}

/// Readiness check response
#[derive(Debug, Clone, Serialize)]
pub struct ReadinessResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub checks: HealthChecks,
}

/// Health check status for each dependency
#[derive(Debug, Clone, Serialize)]
pub struct HealthChecks {
    pub database: String,
}

impl ReadinessResponse {
    pub fn ready(database_healthy: bool) -> Self {
        Self {
            status: if database_healthy { "ready" } else { "not_ready" }.to_string(),
            timestamp: Utc::now(),
            checks: HealthChecks {
                database: if database_healthy { "healthy" } else { "unhealthy" }.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_pair_response_serialization() {
        let pair = TokenPairResponse::new(
            "access_token_here".to_string(),
            "refresh_token_here".to_string(),
            1800,
        );

        let json = serde_json::to_string(&pair).unwrap();
        assert!(json.contains("\"token_type\":\"bearer\""));
        assert!(json.contains("\"expires_in\":1800"));
    }

    #[test]
    fn test_readiness_response_statuses() {
        let ready = ReadinessResponse::ready(true);
        assert_eq!(ready.status, "ready");
        assert_eq!(ready.checks.database, "healthy");

        let not_ready = ReadinessResponse::ready(false);
        assert_eq!(not_ready.status, "not_ready");
        assert_eq!(not_ready.checks.database, "unhealthy");
    }

    #[test]
    fn test_snowflake_ids_serialize_as_strings() {
        let summary = UserSummary {
            id: Snowflake::new(42),
            username: "alice".to_string(),
        };
        let json = serde_json::to_string(&summary).unwrap();
        assert!(json.contains("\"id\":\"42\""));
    }
}
