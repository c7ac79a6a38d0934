//! Draft submissions awaiting assignment.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use veritas_core::types::{DbId, Timestamp};

/// Raw submission row from the `news_drafts` table.
///
/// Drafts are append-only: processing stamps `processing_result`
/// instead of deleting the row.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct NewsDraft {
    pub id: DbId,
    pub url: String,
    pub screenshot_url: String,
    pub reporter_email: String,
    pub text: String,
    pub comment: String,
    pub origin: String,
    pub reported_at: Timestamp,
    /// `None` until the intake processor picks the draft up.
    pub processing_result: Option<String>,
    pub created_at: Timestamp,
}

/// DTO for creating a draft from an intake request.
#[derive(Debug, Deserialize)]
pub struct CreateNewsDraft {
    pub url: String,
    pub screenshot_url: String,
    pub reporter_email: String,
    pub text: String,
    pub comment: String,
    pub origin: String,
    pub reported_at: Timestamp,
}
