//! Repository for the `news` table.

use sqlx::{PgPool, Postgres, Transaction};
use veritas_core::types::{DbId, Timestamp};
use veritas_core::verdict::VERDICT_QUORUM;

use crate::models::news::{News, UpdateNews};
use crate::models::news_draft::NewsDraft;

const COLUMNS: &str = "id, url, screenshot_url, reporter_email, text, comment, origin, \
                        is_sensitive, is_pinned, is_published, deleted, reported_at, created_at";

/// Provides operations for news items.
pub struct NewsRepo;

impl NewsRepo {
    /// Materialize a news item from a draft inside an open transaction.
    pub async fn create_from_draft(
        tx: &mut Transaction<'_, Postgres>,
        draft: &NewsDraft,
    ) -> Result<News, sqlx::Error> {
        let query = format!(
            "INSERT INTO news (url, screenshot_url, reporter_email, text, comment, origin,
                               reported_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, News>(&query)
            .bind(&draft.url)
            .bind(&draft.screenshot_url)
            .bind(&draft.reporter_email)
            .bind(&draft.text)
            .bind(&draft.comment)
            .bind(&draft.origin)
            .bind(draft.reported_at)
            .fetch_one(&mut **tx)
            .await
    }

    /// Whether a news item with this URL already exists.
    pub async fn url_exists(
        tx: &mut Transaction<'_, Postgres>,
        url: &str,
    ) -> Result<bool, sqlx::Error> {
        let (exists,): (bool,) =
            sqlx::query_as("SELECT EXISTS(SELECT 1 FROM news WHERE url = $1 AND NOT deleted)")
                .bind(url)
                .fetch_one(&mut **tx)
                .await?;
        Ok(exists)
    }

    /// Flag a news item as sensitive inside the intake transaction.
    pub async fn set_sensitive(
        tx: &mut Transaction<'_, Postgres>,
        id: DbId,
        is_sensitive: bool,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE news SET is_sensitive = $2 WHERE id = $1")
            .bind(id)
            .bind(is_sensitive)
            .execute(&mut **tx)
            .await?;
        Ok(())
    }

    /// Find a news item by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<News>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM news WHERE id = $1");
        sqlx::query_as::<_, News>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List non-deleted news, newest first.
    pub async fn list(pool: &PgPool, limit: i64, offset: i64) -> Result<Vec<News>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM news
             WHERE NOT deleted
             ORDER BY is_pinned DESC, reported_at DESC
             LIMIT $1 OFFSET $2"
        );
        sqlx::query_as::<_, News>(&query)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// List news currently assigned to a user, newest first.
    pub async fn list_assigned_to(pool: &PgPool, user_id: DbId) -> Result<Vec<News>, sqlx::Error> {
        let query = "SELECT n.id, n.url, n.screenshot_url, n.reporter_email, n.text, n.comment,
                    n.origin, n.is_sensitive, n.is_pinned, n.is_published, n.deleted,
                    n.reported_at, n.created_at
             FROM news n
             JOIN user_news un ON un.news_id = n.id
             WHERE un.user_id = $1 AND NOT n.deleted
             ORDER BY n.reported_at DESC";
        sqlx::query_as::<_, News>(query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// List non-deleted news attached to a domain, newest first. Backs
    /// the specialist queue.
    pub async fn list_in_domain(
        pool: &PgPool,
        domain_id: DbId,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<News>, sqlx::Error> {
        let query = "SELECT n.id, n.url, n.screenshot_url, n.reporter_email, n.text, n.comment,
                    n.origin, n.is_sensitive, n.is_pinned, n.is_published, n.deleted,
                    n.reported_at, n.created_at
             FROM news n
             JOIN news_domains nd ON nd.news_id = n.id
             WHERE nd.domain_id = $1 AND NOT n.deleted
             ORDER BY n.is_pinned DESC, n.reported_at DESC
             LIMIT $2 OFFSET $3";
        sqlx::query_as::<_, News>(query)
            .bind(domain_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// List published, non-deleted news for the public feed.
    pub async fn list_published(
        pool: &PgPool,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<News>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM news
             WHERE is_published AND NOT deleted
             ORDER BY is_pinned DESC, reported_at DESC
             LIMIT $1 OFFSET $2"
        );
        sqlx::query_as::<_, News>(&query)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Update a news item. Only non-`None` fields in `input` are applied.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateNews,
    ) -> Result<Option<News>, sqlx::Error> {
        let query = format!(
            "UPDATE news SET
                url = COALESCE($2, url),
                text = COALESCE($3, text),
                comment = COALESCE($4, comment),
                is_sensitive = COALESCE($5, is_sensitive),
                deleted = COALESCE($6, deleted)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, News>(&query)
            .bind(id)
            .bind(&input.url)
            .bind(&input.text)
            .bind(&input.comment)
            .bind(input.is_sensitive)
            .bind(input.deleted)
            .fetch_optional(pool)
            .await
    }

    /// Set the publication flag. Returns `true` if a row changed.
    pub async fn set_published(
        pool: &PgPool,
        id: DbId,
        is_published: bool,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE news SET is_published = $2 WHERE id = $1")
            .bind(id)
            .bind(is_published)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Set the pinned flag. Returns `true` if a row changed.
    pub async fn set_pinned(pool: &PgPool, id: DbId, is_pinned: bool) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE news SET is_pinned = $2 WHERE id = $1")
            .bind(id)
            .bind(is_pinned)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Store the screenshot URL produced by the upload handler.
    pub async fn set_screenshot_url(
        pool: &PgPool,
        id: DbId,
        screenshot_url: &str,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE news SET screenshot_url = $2 WHERE id = $1")
            .bind(id)
            .bind(screenshot_url)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// News items stalled in review: no expert opinion, fewer
    /// fact-checker opinions than the quorum, and fewer active
    /// assignments than the per-news target. Oldest first.
    pub async fn stale(
        pool: &PgPool,
        window_start: Timestamp,
        target_per_news: i64,
        limit: i64,
    ) -> Result<Vec<News>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM news n
             WHERE NOT n.deleted
               AND NOT EXISTS (
                   SELECT 1 FROM opinions o
                   WHERE o.news_id = n.id AND o.kind = 'expert'
               )
               AND (SELECT COUNT(*) FROM opinions o
                    WHERE o.news_id = n.id AND o.kind = 'fact_checker') < $1
               AND (SELECT COUNT(*) FROM user_news un
                    WHERE un.news_id = n.id AND un.created_at >= $2) < $3
             ORDER BY n.reported_at ASC
             LIMIT $4"
        );
        sqlx::query_as::<_, News>(&query)
            .bind(VERDICT_QUORUM as i64)
            .bind(window_start)
            .bind(target_per_news)
            .bind(limit)
            .fetch_all(pool)
            .await
    }

    /// Count assignments for a news item created since `window_start`.
    pub async fn active_assignment_count(
        pool: &PgPool,
        news_id: DbId,
        window_start: Timestamp,
    ) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM user_news WHERE news_id = $1 AND created_at >= $2",
        )
        .bind(news_id)
        .bind(window_start)
        .fetch_one(pool)
        .await?;
        Ok(count)
    }
}
