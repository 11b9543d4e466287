//! Repository traits

mod repositories;

pub use repositories::{
    ChatRepository, CommentRepository, LetterRepository, Page, RepoResult, SortOrder,
    TokenRepository, UserRepository, VideoListing, VideoQuery, VideoRepository, VideoSortKey,
    WatchHistoryRepository,
};
