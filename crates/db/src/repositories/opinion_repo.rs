//! Repository for the `opinions` table.

use sqlx::PgPool;
use veritas_core::opinion::OpinionFields;
use veritas_core::types::DbId;

use crate::models::opinion::{CreateOpinion, Opinion};

const COLUMNS: &str = "id, news_id, judge_id, kind, verdict, title, comment, \
                        confirmation_sources, is_duplicate, duplicate_reference, created_at";

/// Provides operations for judge opinions.
pub struct OpinionRepo;

impl OpinionRepo {
    /// Insert an opinion, returning the created row.
    ///
    /// Bubbles the raw error so callers can classify 23505 violations
    /// on `uq_opinions_news_judge` (one opinion per judge per news) and
    /// `uq_opinions_one_expert_per_news`.
    pub async fn create(pool: &PgPool, input: &CreateOpinion) -> Result<Opinion, sqlx::Error> {
        let query = format!(
            "INSERT INTO opinions (news_id, judge_id, kind, verdict, title, comment,
                                   confirmation_sources, is_duplicate, duplicate_reference)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Opinion>(&query)
            .bind(input.news_id)
            .bind(input.judge_id)
            .bind(&input.kind)
            .bind(input.fields.verdict.map(|v| v.as_str()))
            .bind(&input.fields.title)
            .bind(&input.fields.comment)
            .bind(&input.fields.confirmation_sources)
            .bind(input.fields.is_duplicate)
            .bind(input.fields.duplicate_reference)
            .fetch_one(pool)
            .await
    }

    /// Find an opinion by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Opinion>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM opinions WHERE id = $1");
        sqlx::query_as::<_, Opinion>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// All opinions for a news item, oldest first.
    pub async fn list_for_news(pool: &PgPool, news_id: DbId) -> Result<Vec<Opinion>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM opinions WHERE news_id = $1 ORDER BY created_at ASC"
        );
        sqlx::query_as::<_, Opinion>(&query)
            .bind(news_id)
            .fetch_all(pool)
            .await
    }

    /// Replace every judgment field of an opinion.
    ///
    /// Edits overwrite the full field group rather than patching, so a
    /// verdict opinion rewritten as a duplicate flag does not keep its
    /// stale verdict. Returns `None` if no row exists.
    pub async fn update_fields(
        pool: &PgPool,
        id: DbId,
        fields: &OpinionFields,
    ) -> Result<Option<Opinion>, sqlx::Error> {
        let query = format!(
            "UPDATE opinions SET
                verdict = $2,
                title = $3,
                comment = $4,
                confirmation_sources = $5,
                is_duplicate = $6,
                duplicate_reference = $7
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Opinion>(&query)
            .bind(id)
            .bind(fields.verdict.map(|v| v.as_str()))
            .bind(&fields.title)
            .bind(&fields.comment)
            .bind(&fields.confirmation_sources)
            .bind(fields.is_duplicate)
            .bind(fields.duplicate_reference)
            .fetch_optional(pool)
            .await
    }
}
