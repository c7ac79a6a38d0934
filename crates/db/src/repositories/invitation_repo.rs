//! Repository for the `invitations` table.

use chrono::NaiveDate;
use sqlx::{PgPool, Postgres, Transaction};
use veritas_core::types::DbId;

use crate::models::invitation::Invitation;

const COLUMNS: &str = "id, email, token, status, user_role, sent_at, created_at";

/// Provides operations for signup invitations.
pub struct InvitationRepo;

impl InvitationRepo {
    /// Insert an invitation inside an open transaction.
    ///
    /// Runs transactionally so the caller can roll the row back when
    /// the invitation email fails to send. Bubbles the raw error for
    /// `uq_invitations_email` classification.
    pub async fn create(
        tx: &mut Transaction<'_, Postgres>,
        email: &str,
        token: &str,
        user_role: &str,
    ) -> Result<Invitation, sqlx::Error> {
        let query = format!(
            "INSERT INTO invitations (email, token, user_role)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Invitation>(&query)
            .bind(email)
            .bind(token)
            .bind(user_role)
            .fetch_one(&mut **tx)
            .await
    }

    /// Record the date the invitation email went out.
    pub async fn mark_sent(
        tx: &mut Transaction<'_, Postgres>,
        id: DbId,
        sent_at: NaiveDate,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE invitations SET sent_at = $2 WHERE id = $1")
            .bind(id)
            .bind(sent_at)
            .execute(&mut **tx)
            .await?;
        Ok(())
    }

    /// Find a waiting invitation by its signup token.
    pub async fn find_waiting_by_token(
        pool: &PgPool,
        token: &str,
    ) -> Result<Option<Invitation>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM invitations WHERE token = $1 AND status = 'waiting'");
        sqlx::query_as::<_, Invitation>(&query)
            .bind(token)
            .fetch_optional(pool)
            .await
    }

    /// Consume an invitation after successful signup.
    pub async fn mark_used(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE invitations SET status = 'used' WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// List invitations, newest first.
    pub async fn list(pool: &PgPool) -> Result<Vec<Invitation>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM invitations ORDER BY created_at DESC");
        sqlx::query_as::<_, Invitation>(&query).fetch_all(pool).await
    }
}
