//! Repository for the `sensitive_keywords` table.

use sqlx::{PgPool, Postgres, Transaction};
use veritas_core::keywords::normalize_name;
use veritas_core::types::DbId;

use crate::models::keyword::Keyword;

const COLUMNS: &str = "id, name, created_at";

/// Provides operations for the sensitive-keyword dictionary.
pub struct SensitiveKeywordRepo;

impl SensitiveKeywordRepo {
    /// Insert a keyword, normalizing the name first.
    ///
    /// Bubbles the raw error for `uq_sensitive_keywords_name`.
    pub async fn create(pool: &PgPool, name: &str) -> Result<Keyword, sqlx::Error> {
        let query = format!(
            "INSERT INTO sensitive_keywords (name) VALUES ($1) RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Keyword>(&query)
            .bind(normalize_name(name))
            .fetch_one(pool)
            .await
    }

    /// List all keywords alphabetically.
    pub async fn list(pool: &PgPool) -> Result<Vec<Keyword>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM sensitive_keywords ORDER BY name ASC");
        sqlx::query_as::<_, Keyword>(&query).fetch_all(pool).await
    }

    /// All keyword names, for the intake text scan.
    pub async fn names(pool: &PgPool) -> Result<Vec<String>, sqlx::Error> {
        let rows: Vec<(String,)> = sqlx::query_as("SELECT name FROM sensitive_keywords")
            .fetch_all(pool)
            .await?;
        Ok(rows.into_iter().map(|(name,)| name).collect())
    }

    /// Delete a keyword. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM sensitive_keywords WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Link matched keywords to a news item inside the intake transaction.
    pub async fn attach_to_news(
        tx: &mut Transaction<'_, Postgres>,
        news_id: DbId,
        names: &[&str],
    ) -> Result<u64, sqlx::Error> {
        if names.is_empty() {
            return Ok(0);
        }
        let owned: Vec<String> = names.iter().map(|n| n.to_string()).collect();
        let result = sqlx::query(
            "INSERT INTO news_sensitive_keywords (news_id, sensitive_keyword_id)
             SELECT $1, id FROM sensitive_keywords WHERE name = ANY($2)
             ON CONFLICT DO NOTHING",
        )
        .bind(news_id)
        .bind(&owned)
        .execute(&mut **tx)
        .await?;
        Ok(result.rows_affected())
    }
}
