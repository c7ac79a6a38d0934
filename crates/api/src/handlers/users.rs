//! User profile and role promotion endpoints.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use veritas_core::error::CoreError;
use veritas_core::roles::{validate_promotion, UserRole};
use veritas_core::types::DbId;
use veritas_db::models::user::{UpdateUser, UserResponse};
use veritas_db::repositories::{DomainRepo, UserRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/users/me
pub async fn me(user: AuthUser, State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let record = UserRepo::find_by_id(&state.pool, user.user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "User",
            id: user.user_id,
        }))?;
    Ok(Json(DataResponse {
        data: UserResponse::from(record),
    }))
}

/// PATCH /api/v1/users/me
///
/// Update one's own profile fields.
pub async fn update_me(
    user: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<UpdateUser>,
) -> AppResult<impl IntoResponse> {
    let record = UserRepo::update(&state.pool, user.user_id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "User",
            id: user.user_id,
        }))?;
    Ok(Json(DataResponse {
        data: UserResponse::from(record),
    }))
}

/// GET /api/v1/users
///
/// List all users. Admin only.
pub async fn list_users(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let users = UserRepo::list(&state.pool).await?;
    let data: Vec<UserResponse> = users.into_iter().map(UserResponse::from).collect();
    Ok(Json(DataResponse { data }))
}

#[derive(Debug, Deserialize)]
pub struct PromotionRequest {
    pub role: String,
    /// Required when promoting to specialist, forbidden otherwise.
    pub domain_id: Option<DbId>,
}

/// PATCH /api/v1/users/{id}/role
///
/// Promote (or demote) a user between the reviewer roles. Admin only.
/// Promotion to moderator drops the user's pending assignments; moving
/// a specialist to another role clears their domain.
pub async fn promote_user(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(user_id): Path<DbId>,
    Json(input): Json<PromotionRequest>,
) -> AppResult<impl IntoResponse> {
    let target = UserRole::parse(&input.role).ok_or_else(|| {
        AppError::Core(CoreError::Validation(format!(
            "unknown role '{}'",
            input.role
        )))
    })?;

    let user = UserRepo::find_by_id(&state.pool, user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "User",
            id: user_id,
        }))?;
    let current = UserRole::parse(&user.role).ok_or_else(|| {
        AppError::InternalError(format!("stored role '{}' is not recognized", user.role))
    })?;

    let effects = validate_promotion(current, target, input.domain_id.is_some())?;

    if let Some(domain_id) = input.domain_id {
        DomainRepo::find_by_id(&state.pool, domain_id)
            .await?
            .ok_or(AppError::Core(CoreError::NotFound {
                entity: "Domain",
                id: domain_id,
            }))?;
    }

    let promoted = UserRepo::promote(
        &state.pool,
        user_id,
        target.as_str(),
        input.domain_id,
        effects,
    )
    .await?
    .ok_or(AppError::Core(CoreError::NotFound {
        entity: "User",
        id: user_id,
    }))?;

    tracing::info!(
        user_id = %user_id,
        admin_id = %admin.user_id,
        from = current.as_str(),
        to = target.as_str(),
        "User role changed"
    );

    Ok(Json(DataResponse {
        data: UserResponse::from(promoted),
    }))
}
