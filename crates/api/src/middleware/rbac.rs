//! Role-based access control (RBAC) extractors.
//!
//! Each extractor wraps [`AuthUser`] and rejects requests whose role does
//! not meet the minimum requirement. Use these in route handlers to
//! enforce authorization at the type level.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use veritas_core::error::CoreError;
use veritas_core::roles::UserRole;

use super::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

/// Requires the `admin` role. Rejects with 403 Forbidden otherwise.
///
/// ```ignore
/// async fn admin_only(RequireAdmin(user): RequireAdmin) -> AppResult<Json<()>> {
///     // user is guaranteed to be an admin here
///     Ok(Json(()))
/// }
/// ```
pub struct RequireAdmin(pub AuthUser);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if user.role != UserRole::Admin {
            return Err(AppError::Core(CoreError::Forbidden(
                "Admin role required".into(),
            )));
        }
        Ok(RequireAdmin(user))
    }
}

/// Requires a crew role: expert, specialist, moderator, or admin.
/// Rejects with 403 Forbidden otherwise.
pub struct RequireCrew(pub AuthUser);

impl FromRequestParts<AppState> for RequireCrew {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        match user.role {
            UserRole::Expert | UserRole::Specialist | UserRole::Moderator | UserRole::Admin => {
                Ok(RequireCrew(user))
            }
            _ => Err(AppError::Core(CoreError::Forbidden(
                "Crew role required".into(),
            ))),
        }
    }
}

/// Requires any judging role, i.e. one that maps to an opinion kind.
///
/// Admits fact checkers and the crew roles; rejects base users.
pub struct RequireJudge(pub AuthUser);

impl FromRequestParts<AppState> for RequireJudge {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if user.role.opinion_kind().is_none() {
            return Err(AppError::Core(CoreError::Forbidden(
                "Judging role required".into(),
            )));
        }
        Ok(RequireJudge(user))
    }
}
