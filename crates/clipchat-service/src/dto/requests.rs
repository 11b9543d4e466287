//! Request DTOs for API endpoints
//!
//! All request DTOs implement `Deserialize` and `Validate` for input validation.

use serde::Deserialize;
use validator::Validate;

// ============================================================================
// Auth Requests
// ============================================================================

/// User registration request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 3, max = 50, message = "Username must be 3-50 characters"))]
    pub username: String,

    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
}

/// User login request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    pub password: String,
}

/// Token refresh request
#[derive(Debug, Clone, Deserialize)]
pub struct RefreshTokenRequest {
    pub refresh_token: String,
}

/// Logout request: the refresh token to revoke
#[derive(Debug, Clone, Deserialize)]
pub struct LogoutRequest {
    pub refresh_token: String,
}

// ============================================================================
// Video Requests
// ============================================================================

/// Create (import or upload) video metadata
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateVideoRequest {
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: String,

    #[validate(length(max = 5000, message = "Description must be at most 5000 characters"))]
    pub description: Option<String>,

    #[validate(url(message = "Invalid video URL"))]
    pub video_url: String,

    pub thumbnail_url: Option<String>,

    /// Duration in seconds
    #[validate(range(min = 0, message = "Duration must be non-negative"))]
    pub duration: Option<i32>,
}

/// Partial video metadata update
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateVideoRequest {
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: Option<String>,

    #[validate(length(max = 5000, message = "Description must be at most 5000 characters"))]
    pub description: Option<String>,

    #[validate(url(message = "Invalid video URL"))]
    pub video_url: Option<String>,

    pub thumbnail_url: Option<String>,

    #[validate(range(min = 0, message = "Duration must be non-negative"))]
    pub duration: Option<i32>,
}

/// Record a watch-history entry for a video
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct TrackWatchRequest {
    /// Seconds watched so far
    #[validate(range(min = 0, message = "Watch duration must be non-negative"))]
    pub watch_duration: i32,

    #[serde(default)]
    pub completed: bool,
}

// ============================================================================
// Comment Requests
// ============================================================================

/// Create or update a comment
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CommentContentRequest {
    #[validate(length(min = 1, max = 2000, message = "Content must be 1-2000 characters"))]
    pub content: String,
}

// ============================================================================
// Letter Requests
// ============================================================================

/// Create or edit a letter
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LetterContentRequest {
    #[validate(length(min = 1, max = 5000, message = "Content must be 1-5000 characters"))]
    pub content: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_request_validation() {
        let ok = RegisterRequest {
            email: "a@x.com".to_string(),
            username: "alice".to_string(),
            password: "secret1".to_string(),
        };
        assert!(ok.validate().is_ok());

        let short_password = RegisterRequest {
            password: "abc".to_string(),
            ..ok.clone()
        };
        assert!(short_password.validate().is_err());

        let bad_email = RegisterRequest {
            email: "not-an-email".to_string(),
            ..ok
        };
        assert!(bad_email.validate().is_err());
    }

    #[test]
    fn test_create_video_request_validation() {
        let ok = CreateVideoRequest {
            title: "Intro".to_string(),
            description: None,
            video_url: "https://cdn.example.com/intro.mp4".to_string(),
            thumbnail_url: None,
            duration: Some(120),
        };
        assert!(ok.validate().is_ok());

        let bad_url = CreateVideoRequest {
            video_url: "not a url".to_string(),
            ..ok.clone()
        };
        assert!(bad_url.validate().is_err());

        let negative_duration = CreateVideoRequest {
            duration: Some(-1),
            ..ok
        };
        assert!(negative_duration.validate().is_err());
    }

    #[test]
    fn test_letter_content_validation() {
        let empty = LetterContentRequest {
            content: String::new(),
        };
        assert!(empty.validate().is_err());

        let ok = LetterContentRequest {
            content: "hello".to_string(),
        };
        assert!(ok.validate().is_ok());
    }
}
