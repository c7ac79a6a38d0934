//! Repository for the `domains` table.

use sqlx::PgPool;
use veritas_core::keywords::normalize_name;
use veritas_core::types::DbId;

use crate::models::keyword::Keyword;

const COLUMNS: &str = "id, name, created_at";

/// Provides operations for topical domains.
pub struct DomainRepo;

impl DomainRepo {
    /// Insert a domain, normalizing the name first.
    ///
    /// Bubbles the raw error for `uq_domains_name`.
    pub async fn create(pool: &PgPool, name: &str) -> Result<Keyword, sqlx::Error> {
        let query = format!("INSERT INTO domains (name) VALUES ($1) RETURNING {COLUMNS}");
        sqlx::query_as::<_, Keyword>(&query)
            .bind(normalize_name(name))
            .fetch_one(pool)
            .await
    }

    /// Find a domain by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Keyword>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM domains WHERE id = $1");
        sqlx::query_as::<_, Keyword>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all domains alphabetically.
    pub async fn list(pool: &PgPool) -> Result<Vec<Keyword>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM domains ORDER BY name ASC");
        sqlx::query_as::<_, Keyword>(&query).fetch_all(pool).await
    }

    /// Delete a domain. Specialist users referencing it fall back to
    /// `NULL` via the foreign key. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM domains WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Replace the domain set of a news item.
    pub async fn set_news_domains(
        pool: &PgPool,
        news_id: DbId,
        domain_ids: &[DbId],
    ) -> Result<(), sqlx::Error> {
        let mut tx = pool.begin().await?;
        sqlx::query("DELETE FROM news_domains WHERE news_id = $1")
            .bind(news_id)
            .execute(&mut *tx)
            .await?;
        if !domain_ids.is_empty() {
            sqlx::query(
                "INSERT INTO news_domains (news_id, domain_id)
                 SELECT $1, did FROM UNNEST($2::uuid[]) AS did",
            )
            .bind(news_id)
            .bind(domain_ids)
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await?;
        Ok(())
    }

    /// Domains attached to a news item, alphabetically.
    pub async fn domains_for_news(
        pool: &PgPool,
        news_id: DbId,
    ) -> Result<Vec<Keyword>, sqlx::Error> {
        let query = "SELECT d.id, d.name, d.created_at
             FROM domains d
             JOIN news_domains nd ON nd.domain_id = d.id
             WHERE nd.news_id = $1
             ORDER BY d.name ASC";
        sqlx::query_as::<_, Keyword>(query)
            .bind(news_id)
            .fetch_all(pool)
            .await
    }
}
