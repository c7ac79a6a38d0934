//! Shared shape for the name-only lookup tables.
//!
//! `domains`, `tags` and `sensitive_keywords` all carry the same
//! columns, so one model serves the three repositories.

use serde::Serialize;
use sqlx::FromRow;
use veritas_core::types::{DbId, Timestamp};

/// Row from one of the name-unique lookup tables.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Keyword {
    pub id: DbId,
    pub name: String,
    pub created_at: Timestamp,
}
