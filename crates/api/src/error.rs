use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use veritas_core::error::CoreError;
use veritas_core::opinion::OpinionError;
use veritas_core::roles::PromotionError;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and adds HTTP-specific variants.
/// Implements [`IntoResponse`] to produce consistent JSON error responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `veritas_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// An invalid opinion submission.
    #[error(transparent)]
    Opinion(#[from] OpinionError),

    /// An invalid role promotion request.
    #[error(transparent)]
    Promotion(#[from] PromotionError),

    /// A database error from sqlx.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            // --- CoreError variants ---
            AppError::Core(core) => match core {
                CoreError::NotFound { entity, id } => (
                    StatusCode::NOT_FOUND,
                    "not_found".to_string(),
                    format!("{entity} with id {id} not found"),
                ),
                CoreError::Validation(msg) => (
                    StatusCode::BAD_REQUEST,
                    "validation_error".to_string(),
                    msg.clone(),
                ),
                CoreError::Conflict(msg) => {
                    (StatusCode::CONFLICT, "conflict".to_string(), msg.clone())
                }
                CoreError::Unauthorized(msg) => (
                    StatusCode::UNAUTHORIZED,
                    "unauthorized".to_string(),
                    msg.clone(),
                ),
                CoreError::Forbidden(msg) => {
                    (StatusCode::FORBIDDEN, "forbidden".to_string(), msg.clone())
                }
                CoreError::Internal(msg) => {
                    tracing::error!(error = %msg, "Internal core error");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "internal_error".to_string(),
                        "An internal error occurred".to_string(),
                    )
                }
            },

            // --- Domain validation errors ---
            AppError::Opinion(err) => (
                StatusCode::BAD_REQUEST,
                err.code().to_string(),
                err.to_string(),
            ),
            AppError::Promotion(err) => (
                StatusCode::BAD_REQUEST,
                err.code().to_string(),
                err.to_string(),
            ),

            // --- Database errors ---
            AppError::Database(err) => classify_sqlx_error(err),

            // --- HTTP-specific errors ---
            AppError::BadRequest(msg) => (
                StatusCode::BAD_REQUEST,
                "bad_request".to_string(),
                msg.clone(),
            ),
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error".to_string(),
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}

/// Classify a sqlx error into an HTTP status, error code, and message.
///
/// - `RowNotFound` maps to 404.
/// - Unique violations (code 23505) map onto domain error codes by
///   constraint name, so callers never check-then-act around inserts.
/// - Everything else maps to 500 with a sanitized message.
fn classify_sqlx_error(err: &sqlx::Error) -> (StatusCode, String, String) {
    match err {
        sqlx::Error::RowNotFound => (
            StatusCode::NOT_FOUND,
            "not_found".to_string(),
            "Resource not found".to_string(),
        ),
        sqlx::Error::Database(db_err) if db_err.code().as_deref() == Some("23505") => {
            match db_err.constraint() {
                Some("uq_opinions_news_judge") => (
                    StatusCode::BAD_REQUEST,
                    "user_opinion_unique_error".to_string(),
                    "You have already given an opinion on this news item".to_string(),
                ),
                Some("uq_opinions_one_expert_per_news") => (
                    StatusCode::BAD_REQUEST,
                    "expert_opinion_exists".to_string(),
                    "An expert opinion already exists for this news item".to_string(),
                ),
                Some("uq_user_news_news_user") => (
                    StatusCode::CONFLICT,
                    "already_assigned".to_string(),
                    "This news item is already assigned to that user".to_string(),
                ),
                Some("uq_users_email") => (
                    StatusCode::CONFLICT,
                    "user_already_exists".to_string(),
                    "A user with this email already exists".to_string(),
                ),
                Some("uq_invitations_email") => (
                    StatusCode::CONFLICT,
                    "invitation_already_exists".to_string(),
                    "An invitation for this email already exists".to_string(),
                ),
                Some(constraint) if constraint.starts_with("uq_") => (
                    StatusCode::CONFLICT,
                    "conflict".to_string(),
                    format!("Duplicate value violates unique constraint: {constraint}"),
                ),
                _ => {
                    tracing::error!(error = %db_err, "Database error");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "internal_error".to_string(),
                        "An internal error occurred".to_string(),
                    )
                }
            }
        }
        other => {
            tracing::error!(error = %other, "Database error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error".to_string(),
                "An internal error occurred".to_string(),
            )
        }
    }
}
