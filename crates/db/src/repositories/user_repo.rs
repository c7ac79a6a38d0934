//! Repository for the `users` table.

use sqlx::{PgPool, Postgres, Transaction};
use veritas_core::roles::PromotionEffects;
use veritas_core::types::{DbId, Timestamp};

use crate::models::user::{CreateUser, UpdateUser, User};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, email, name, password_hash, role, specialization, domain_id, \
                        is_active, is_verified, allow_subscriptions, created_at";

/// Same list qualified for queries that join against `user_news`.
const PREFIXED_COLUMNS: &str =
    "u.id, u.email, u.name, u.password_hash, u.role, u.specialization, u.domain_id, \
     u.is_active, u.is_verified, u.allow_subscriptions, u.created_at";

/// Provides CRUD and workload operations for users.
pub struct UserRepo;

impl UserRepo {
    /// Insert a new user, returning the created row.
    ///
    /// Bubbles the raw error so callers can classify a 23505 on
    /// `uq_users_email` as a duplicate-email conflict.
    pub async fn create(pool: &PgPool, input: &CreateUser) -> Result<User, sqlx::Error> {
        let query = format!(
            "INSERT INTO users (email, name, password_hash, role)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(&input.email)
            .bind(&input.name)
            .bind(&input.password_hash)
            .bind(&input.role)
            .fetch_one(pool)
            .await
    }

    /// Find a user by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a user by email (case-sensitive).
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE email = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(email)
            .fetch_optional(pool)
            .await
    }

    /// List all users ordered by most recently created first.
    pub async fn list(pool: &PgPool) -> Result<Vec<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users ORDER BY created_at DESC");
        sqlx::query_as::<_, User>(&query).fetch_all(pool).await
    }

    /// Update profile fields. Only non-`None` fields in `input` apply.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateUser,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!(
            "UPDATE users SET
                name = COALESCE($2, name),
                specialization = COALESCE($3, specialization),
                is_active = COALESCE($4, is_active),
                allow_subscriptions = COALESCE($5, allow_subscriptions)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.specialization)
            .bind(input.is_active)
            .bind(input.allow_subscriptions)
            .fetch_optional(pool)
            .await
    }

    /// Number of active, verified fact checkers eligible for assignment.
    pub async fn count_active_fact_checkers(pool: &PgPool) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM users
             WHERE role = 'fact_checker' AND is_active AND is_verified",
        )
        .fetch_one(pool)
        .await?;
        Ok(count)
    }

    /// Pick the `limit` least-loaded active fact checkers for a news item.
    ///
    /// Load is the number of assignments created since `window_start`.
    /// Checkers already assigned to the news item are excluded. Ties
    /// break on ascending user ID so repeated runs are deterministic.
    pub async fn select_least_loaded_checkers(
        executor: &mut Transaction<'_, Postgres>,
        news_id: DbId,
        window_start: Timestamp,
        limit: i64,
    ) -> Result<Vec<User>, sqlx::Error> {
        let query = format!(
            "SELECT {PREFIXED_COLUMNS}
             FROM users u
             LEFT JOIN user_news un
                ON un.user_id = u.id AND un.created_at >= $2
             WHERE u.role = 'fact_checker'
               AND u.is_active
               AND u.is_verified
               AND NOT EXISTS (
                   SELECT 1 FROM user_news existing
                   WHERE existing.news_id = $1 AND existing.user_id = u.id
               )
             GROUP BY u.id
             ORDER BY COUNT(un.id) ASC, u.id ASC
             LIMIT $3"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(news_id)
            .bind(window_start)
            .bind(limit)
            .fetch_all(&mut **executor)
            .await
    }

    /// Apply a validated promotion atomically.
    ///
    /// Updates the role, sets or clears the specialist domain, and
    /// drops existing assignments when the effects call for it.
    /// Returns `None` if the user does not exist.
    pub async fn promote(
        pool: &PgPool,
        id: DbId,
        new_role: &str,
        domain_id: Option<DbId>,
        effects: PromotionEffects,
    ) -> Result<Option<User>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "UPDATE users SET
                role = $2,
                domain_id = CASE WHEN $3 THEN NULL ELSE COALESCE($4, domain_id) END
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        let Some(user) = sqlx::query_as::<_, User>(&query)
            .bind(id)
            .bind(new_role)
            .bind(effects.clear_domain)
            .bind(domain_id)
            .fetch_optional(&mut *tx)
            .await?
        else {
            tx.rollback().await?;
            return Ok(None);
        };

        if effects.drop_assignments {
            sqlx::query("DELETE FROM user_news WHERE user_id = $1")
                .bind(id)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        Ok(Some(user))
    }
}
