//! Opinion entity model and DTOs.
//!
//! Fact-checker and expert opinions share one table, discriminated by
//! the `kind` column. A partial unique index guarantees at most one
//! expert opinion per news item.

use serde::Serialize;
use sqlx::FromRow;
use veritas_core::opinion::OpinionFields;
use veritas_core::types::{DbId, Timestamp};
use veritas_core::verdict::{OpinionFacts, Verdict};

/// Opinion row from the `opinions` table.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Opinion {
    pub id: DbId,
    pub news_id: DbId,
    pub judge_id: DbId,
    /// `"fact_checker"` or `"expert"`.
    pub kind: String,
    pub verdict: Option<String>,
    pub title: String,
    pub comment: String,
    pub confirmation_sources: String,
    pub is_duplicate: bool,
    pub duplicate_reference: Option<DbId>,
    pub created_at: Timestamp,
}

impl Opinion {
    /// Reduce this row to the facts the verdict aggregation consumes.
    ///
    /// A verdict string that fails to parse is treated as absent rather
    /// than failing the whole aggregation.
    pub fn facts(&self) -> OpinionFacts {
        OpinionFacts {
            verdict: self.verdict.as_deref().and_then(Verdict::parse),
            is_duplicate: self.is_duplicate,
        }
    }

    pub fn is_expert(&self) -> bool {
        self.kind == "expert"
    }
}

/// DTO for inserting a validated opinion.
#[derive(Debug)]
pub struct CreateOpinion {
    pub news_id: DbId,
    pub judge_id: DbId,
    pub kind: String,
    pub fields: OpinionFields,
}
