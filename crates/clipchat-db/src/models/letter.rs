//! Letter database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for letters table
#[derive(Debug, Clone, FromRow)]
pub struct LetterModel {
    pub id: i64,
    pub chat_id: i64,
    pub author_id: i64,
    pub content: String,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}
