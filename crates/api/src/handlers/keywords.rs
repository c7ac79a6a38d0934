//! Dictionaries: sensitive keywords, domains, and tag listing.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use veritas_core::error::CoreError;
use veritas_core::types::DbId;
use veritas_db::repositories::{DomainRepo, SensitiveKeywordRepo, TagRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateNameRequest {
    pub name: String,
}

fn require_name(input: &CreateNameRequest) -> AppResult<()> {
    if input.name.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "name must not be empty".into(),
        )));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Sensitive keywords
// ---------------------------------------------------------------------------

/// GET /api/v1/sensitive-keywords (admin)
pub async fn list_sensitive_keywords(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let keywords = SensitiveKeywordRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: keywords }))
}

/// POST /api/v1/sensitive-keywords (admin)
pub async fn create_sensitive_keyword(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<CreateNameRequest>,
) -> AppResult<impl IntoResponse> {
    require_name(&input)?;
    let keyword = SensitiveKeywordRepo::create(&state.pool, &input.name).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: keyword })))
}

/// DELETE /api/v1/sensitive-keywords/{id} (admin)
pub async fn delete_sensitive_keyword(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    if !SensitiveKeywordRepo::delete(&state.pool, id).await? {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "SensitiveKeyword",
            id,
        }));
    }
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Domains
// ---------------------------------------------------------------------------

/// GET /api/v1/domains
pub async fn list_domains(
    _user: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let domains = DomainRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: domains }))
}

/// POST /api/v1/domains (admin)
pub async fn create_domain(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<CreateNameRequest>,
) -> AppResult<impl IntoResponse> {
    require_name(&input)?;
    let domain = DomainRepo::create(&state.pool, &input.name).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: domain })))
}

/// DELETE /api/v1/domains/{id} (admin)
pub async fn delete_domain(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    if !DomainRepo::delete(&state.pool, id).await? {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Domain",
            id,
        }));
    }
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Tags
// ---------------------------------------------------------------------------

/// GET /api/v1/tags
pub async fn list_tags(
    _user: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let tags = TagRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: tags }))
}
