//! # clipchat-service
//!
//! Application layer containing business logic, services, and DTOs.

pub mod dto;
pub mod services;

// Re-export commonly used types at crate root
pub use dto::{
    ChatDetailResponse, ChatResponse, CommentContentRequest, CommentResponse, CreateVideoRequest,
    HealthResponse, LetterContentRequest, LetterResponse, LoginRequest, LogoutRequest,
    LogoutResponse, ReadinessResponse, RefreshTokenRequest, RegisterRequest, TokenPairResponse,
    TrackWatchRequest, UpdateVideoRequest, UserResponse, UserSummary, VideoListItemResponse,
    VideoResponse, WatchHistoryResponse,
};
pub use services::{
    ChatService, CommentService, LetterService, ServiceContext, ServiceContextBuilder,
    ServiceError, ServiceResult, SessionService, UserService, VideoService,
};
