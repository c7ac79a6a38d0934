//! Invitation entity model.

use chrono::NaiveDate;
use serde::Serialize;
use sqlx::FromRow;
use veritas_core::types::{DbId, Timestamp};

/// Invitation row from the `invitations` table.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Invitation {
    pub id: DbId,
    pub email: String,
    /// Opaque token embedded in the signup link. Never log this.
    #[serde(skip_serializing)]
    pub token: String,
    pub status: String,
    pub user_role: String,
    /// Date the invitation email went out, `None` if delivery failed.
    pub sent_at: Option<NaiveDate>,
    pub created_at: Timestamp,
}

pub const INVITATION_STATUS_WAITING: &str = "waiting";
pub const INVITATION_STATUS_USED: &str = "used";
