//! Repository for the `user_news` assignment table.

use sqlx::{PgPool, Postgres, Transaction};
use veritas_core::types::DbId;

use crate::models::user_news::UserNews;

const COLUMNS: &str = "id, news_id, user_id, assigned_by_email, created_at";

/// Provides operations for review assignments.
pub struct UserNewsRepo;

impl UserNewsRepo {
    /// Assign a news item to several users in one statement.
    ///
    /// No `ON CONFLICT` clause: a duplicate pair is a programming error
    /// upstream and should surface as `uq_user_news_news_user`.
    pub async fn assign_many(
        tx: &mut Transaction<'_, Postgres>,
        news_id: DbId,
        user_ids: &[DbId],
        assigned_by_email: Option<&str>,
    ) -> Result<Vec<UserNews>, sqlx::Error> {
        if user_ids.is_empty() {
            return Ok(Vec::new());
        }
        let query = format!(
            "INSERT INTO user_news (news_id, user_id, assigned_by_email)
             SELECT $1, uid, $3 FROM UNNEST($2::uuid[]) AS uid
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, UserNews>(&query)
            .bind(news_id)
            .bind(user_ids)
            .bind(assigned_by_email)
            .fetch_all(&mut **tx)
            .await
    }

    /// Assign a single news item to a single user.
    pub async fn assign(
        pool: &PgPool,
        news_id: DbId,
        user_id: DbId,
        assigned_by_email: Option<&str>,
    ) -> Result<UserNews, sqlx::Error> {
        let query = format!(
            "INSERT INTO user_news (news_id, user_id, assigned_by_email)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, UserNews>(&query)
            .bind(news_id)
            .bind(user_id)
            .bind(assigned_by_email)
            .fetch_one(pool)
            .await
    }

    /// Find the assignment linking a user to a news item.
    pub async fn find(
        pool: &PgPool,
        news_id: DbId,
        user_id: DbId,
    ) -> Result<Option<UserNews>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM user_news WHERE news_id = $1 AND user_id = $2");
        sqlx::query_as::<_, UserNews>(&query)
            .bind(news_id)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// Remove one assignment. Returns `true` if a row was deleted.
    pub async fn delete(pool: &PgPool, news_id: DbId, user_id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM user_news WHERE news_id = $1 AND user_id = $2")
            .bind(news_id)
            .bind(user_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Drop every assignment a user holds. Returns the number removed.
    pub async fn delete_all_for_user(pool: &PgPool, user_id: DbId) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM user_news WHERE user_id = $1")
            .bind(user_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}
