//! Repository for the `news_drafts` table.

use sqlx::{PgPool, Postgres, Transaction};
use veritas_core::types::DbId;

use crate::models::news_draft::{CreateNewsDraft, NewsDraft};

const COLUMNS: &str = "id, url, screenshot_url, reporter_email, text, comment, origin, \
                        reported_at, processing_result, created_at";

/// Provides operations for intake drafts.
pub struct NewsDraftRepo;

impl NewsDraftRepo {
    /// Insert a draft, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateNewsDraft) -> Result<NewsDraft, sqlx::Error> {
        let query = format!(
            "INSERT INTO news_drafts (url, screenshot_url, reporter_email, text, comment,
                                      origin, reported_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, NewsDraft>(&query)
            .bind(&input.url)
            .bind(&input.screenshot_url)
            .bind(&input.reporter_email)
            .bind(&input.text)
            .bind(&input.comment)
            .bind(&input.origin)
            .bind(input.reported_at)
            .fetch_one(pool)
            .await
    }

    /// Oldest unprocessed drafts, up to `limit`.
    ///
    /// Read-only, so this is the one query the worker may point at the
    /// read pool.
    pub async fn oldest_unprocessed(
        pool: &PgPool,
        limit: i64,
    ) -> Result<Vec<NewsDraft>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM news_drafts
             WHERE processing_result IS NULL
             ORDER BY reported_at ASC
             LIMIT $1"
        );
        sqlx::query_as::<_, NewsDraft>(&query)
            .bind(limit)
            .fetch_all(pool)
            .await
    }

    /// Stamp the processing result inside the materialization transaction.
    pub async fn mark_processed(
        tx: &mut Transaction<'_, Postgres>,
        id: DbId,
        result: &str,
    ) -> Result<bool, sqlx::Error> {
        let done = sqlx::query(
            "UPDATE news_drafts SET processing_result = $2
             WHERE id = $1 AND processing_result IS NULL",
        )
        .bind(id)
        .bind(result)
        .execute(&mut **tx)
        .await?;
        Ok(done.rows_affected() > 0)
    }
}
