//! Token ledger database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for tokens table
#[derive(Debug, Clone, FromRow)]
pub struct TokenModel {
    pub id: i64,
    pub token: String,
    pub kind: String,
    pub user_id: i64,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub revoked: bool,
}
