//! User entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use veritas_core::types::{DbId, Timestamp};

/// Full user row from the `users` table.
///
/// Contains the password hash -- NEVER serialize this to API responses
/// directly. Use [`UserResponse`] for external-facing output.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: DbId,
    pub email: String,
    pub name: String,
    pub password_hash: String,
    /// Stored as text; parse with [`veritas_core::roles::UserRole::parse`].
    pub role: String,
    pub specialization: String,
    pub domain_id: Option<DbId>,
    pub is_active: bool,
    pub is_verified: bool,
    pub allow_subscriptions: bool,
    pub created_at: Timestamp,
}

/// Safe user representation for API responses (no password hash).
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub id: DbId,
    pub email: String,
    pub name: String,
    pub role: String,
    pub specialization: String,
    pub domain_id: Option<DbId>,
    pub is_active: bool,
    pub is_verified: bool,
    pub allow_subscriptions: bool,
    pub created_at: Timestamp,
}

impl From<User> for UserResponse {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            email: u.email,
            name: u.name,
            role: u.role,
            specialization: u.specialization,
            domain_id: u.domain_id,
            is_active: u.is_active,
            is_verified: u.is_verified,
            allow_subscriptions: u.allow_subscriptions,
            created_at: u.created_at,
        }
    }
}

/// DTO for creating a new user.
#[derive(Debug, Deserialize)]
pub struct CreateUser {
    pub email: String,
    pub name: String,
    pub password_hash: String,
    pub role: String,
}

/// DTO for updating an existing user. All fields are optional.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateUser {
    pub name: Option<String>,
    pub specialization: Option<String>,
    pub is_active: Option<bool>,
    pub allow_subscriptions: Option<bool>,
}
