//! PostgreSQL repository implementations

mod chat;
mod comment;
mod error;
mod letter;
mod token;
mod user;
mod video;
mod watch_history;

pub use chat::PgChatRepository;
pub use comment::PgCommentRepository;
pub use letter::PgLetterRepository;
pub use token::PgTokenRepository;
pub use user::PgUserRepository;
pub use video::PgVideoRepository;
pub use watch_history::PgWatchHistoryRepository;
