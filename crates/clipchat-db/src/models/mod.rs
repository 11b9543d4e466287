//! Database models - SQLx-compatible structs for PostgreSQL tables

mod chat;
mod comment;
mod letter;
mod token;
mod user;
mod video;

pub use chat::ChatModel;
pub use comment::{CommentModel, CommentWithAuthorModel};
pub use letter::LetterModel;
pub use token::TokenModel;
pub use user::UserModel;
pub use video::{VideoListingModel, VideoModel, WatchHistoryModel, WatchHistoryWithTitleModel};
