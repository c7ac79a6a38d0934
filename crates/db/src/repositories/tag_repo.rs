//! Repository for the `tags` table.

use sqlx::PgPool;
use veritas_core::keywords::normalize_name;
use veritas_core::types::DbId;

use crate::models::keyword::Keyword;

const COLUMNS: &str = "id, name, created_at";

/// Provides operations for free-form news tags.
pub struct TagRepo;

impl TagRepo {
    /// Insert a tag if absent, returning the stored row either way.
    pub async fn create_or_get(pool: &PgPool, name: &str) -> Result<Keyword, sqlx::Error> {
        let query = format!(
            "INSERT INTO tags (name) VALUES ($1)
             ON CONFLICT ON CONSTRAINT uq_tags_name
             DO UPDATE SET name = EXCLUDED.name
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Keyword>(&query)
            .bind(normalize_name(name))
            .fetch_one(pool)
            .await
    }

    /// List all tags alphabetically.
    pub async fn list(pool: &PgPool) -> Result<Vec<Keyword>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM tags ORDER BY name ASC");
        sqlx::query_as::<_, Keyword>(&query).fetch_all(pool).await
    }

    /// Replace the tag set of a news item.
    ///
    /// The per-news cap is enforced by the handler before the call.
    pub async fn set_news_tags(
        pool: &PgPool,
        news_id: DbId,
        tag_ids: &[DbId],
    ) -> Result<(), sqlx::Error> {
        let mut tx = pool.begin().await?;
        sqlx::query("DELETE FROM news_tags WHERE news_id = $1")
            .bind(news_id)
            .execute(&mut *tx)
            .await?;
        if !tag_ids.is_empty() {
            sqlx::query(
                "INSERT INTO news_tags (news_id, tag_id)
                 SELECT $1, tid FROM UNNEST($2::uuid[]) AS tid",
            )
            .bind(news_id)
            .bind(tag_ids)
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await?;
        Ok(())
    }

    /// Tags attached to a news item, alphabetically.
    pub async fn tags_for_news(pool: &PgPool, news_id: DbId) -> Result<Vec<Keyword>, sqlx::Error> {
        let query = "SELECT t.id, t.name, t.created_at
             FROM tags t
             JOIN news_tags nt ON nt.tag_id = t.id
             WHERE nt.news_id = $1
             ORDER BY t.name ASC";
        sqlx::query_as::<_, Keyword>(query)
            .bind(news_id)
            .fetch_all(pool)
            .await
    }
}
