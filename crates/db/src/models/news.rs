//! News entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use veritas_core::types::{DbId, Timestamp};

/// Published/in-review news item from the `news` table.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct News {
    pub id: DbId,
    pub url: String,
    pub screenshot_url: String,
    pub reporter_email: String,
    pub text: String,
    pub comment: String,
    pub origin: String,
    pub is_sensitive: bool,
    pub is_pinned: bool,
    pub is_published: bool,
    pub deleted: bool,
    pub reported_at: Timestamp,
    pub created_at: Timestamp,
}

/// DTO for admin edits. Only non-`None` fields are applied.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateNews {
    pub url: Option<String>,
    pub text: Option<String>,
    pub comment: Option<String>,
    pub is_sensitive: Option<bool>,
    pub deleted: Option<bool>,
}
