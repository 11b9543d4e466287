//! Chat database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for chats table
///
/// The pair is stored normalized: user_a_id < user_b_id.
#[derive(Debug, Clone, FromRow)]
pub struct ChatModel {
    pub id: i64,
    pub user_a_id: i64,
    pub user_b_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
