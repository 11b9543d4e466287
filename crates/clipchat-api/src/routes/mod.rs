//! Route definitions
//!
//! All API routes organized by domain and mounted under /api/v1. Video
//! listing/detail and comment listing are open; everything else behind the
//! auth extractor.

use axum::{
    routing::{delete, get, post, put},
    Router,
};

use crate::handlers::{auth, chats, comments, health, letters, users, videos};
use crate::state::AppState;

/// Create the main API router with all routes
pub fn create_router() -> Router<AppState> {
    Router::new()
        // API v1 endpoints
        .nest("/api/v1", api_v1_routes())
}

/// Health check routes (exported separately, outside the version prefix)
pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
}

/// API v1 routes
fn api_v1_routes() -> Router<AppState> {
    Router::new()
        .merge(auth_routes())
        .merge(user_routes())
        .merge(video_routes())
        .merge(chat_routes())
}

/// Authentication routes
fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/auth/refresh", post(auth::refresh_token))
        .route("/auth/logout", post(auth::logout))
        .route("/auth/me", get(auth::me))
}

/// User routes
fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(users::list_users))
        .route("/users/me", delete(users::delete_me))
        .route("/users/:user_id", get(users::get_user))
        .route("/users/:user_id/history", get(users::get_user_history))
}

/// Video routes (comments nested under their video)
fn video_routes() -> Router<AppState> {
    Router::new()
        // Video CRUD
        .route("/videos", get(videos::list_videos))
        .route("/videos/import", post(videos::import_video))
        .route("/videos/upload", post(videos::upload_video))
        .route("/videos/:video_id", get(videos::get_video))
        .route("/videos/:video_id", put(videos::update_video))
        .route("/videos/:video_id", delete(videos::delete_video))
        // Watch tracking
        .route("/videos/:video_id/watch", post(videos::track_watch))
        // Comments
        .route("/videos/:video_id/comments", get(comments::list_comments))
        .route("/videos/:video_id/comments", post(comments::create_comment))
        .route(
            "/videos/:video_id/comments/:comment_id",
            put(comments::update_comment),
        )
        .route(
            "/videos/:video_id/comments/:comment_id",
            delete(comments::delete_comment),
        )
}

/// Chat routes (letters nested under their chat)
fn chat_routes() -> Router<AppState> {
    Router::new()
        // Chats
        .route("/chats/my", get(chats::list_my_chats))
        .route("/chats/with/:other_user_id", get(chats::get_or_create_chat))
        .route("/chats/:chat_id", delete(chats::delete_chat))
        // Aggregate unread count across all chats
        .route("/chats/letters/unread/count", get(letters::unread_count))
        // Letters
        .route("/chats/:chat_id/letters", get(letters::list_letters))
        .route("/chats/:chat_id/letters", post(letters::create_letter))
        .route(
            "/chats/:chat_id/letters/:letter_id",
            get(letters::get_letter),
        )
        .route(
            "/chats/:chat_id/letters/:letter_id",
            put(letters::update_letter),
        )
        .route(
            "/chats/:chat_id/letters/:letter_id",
            delete(letters::delete_letter),
        )
        .route(
            "/chats/:chat_id/letters/:letter_id/read",
            post(letters::mark_letter_read),
        )
}
