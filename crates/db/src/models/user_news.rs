//! Assignment rows linking users to news items.

use serde::Serialize;
use sqlx::FromRow;
use veritas_core::types::{DbId, Timestamp};

/// Assignment row from the `user_news` table.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct UserNews {
    pub id: DbId,
    pub news_id: DbId,
    pub user_id: DbId,
    /// Email of the crew member who created the assignment manually,
    /// `None` for assignments made by the intake processor.
    pub assigned_by_email: Option<String>,
    pub created_at: Timestamp,
}
