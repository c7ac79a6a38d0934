//! Public intake endpoint for reported news.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use validator::Validate;
use veritas_core::error::CoreError;
use veritas_core::news::NewsOrigin;
use veritas_core::types::Timestamp;
use veritas_db::models::news_draft::CreateNewsDraft;
use veritas_db::repositories::NewsDraftRepo;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// Payload of a report submission from the plugin, chatbot or mobile app.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateDraftRequest {
    #[validate(url(message = "url must be a valid URL"))]
    pub url: String,
    #[validate(email(message = "reporter_email must be a valid email address"))]
    pub reporter_email: String,
    #[validate(length(max = 10000, message = "text is too long"))]
    #[serde(default)]
    pub text: String,
    #[validate(length(max = 10000, message = "comment is too long"))]
    #[serde(default)]
    pub comment: String,
    pub origin: String,
    /// When the reporter saw the content; defaults to submission time.
    pub reported_at: Option<Timestamp>,
}

/// POST /api/v1/drafts
///
/// Accept a report into the intake queue. Public, no authentication:
/// the endpoint is called by the browser plugin and the chatbot on
/// behalf of anonymous reporters.
pub async fn create_draft(
    State(state): State<AppState>,
    Json(input): Json<CreateDraftRequest>,
) -> AppResult<impl IntoResponse> {
    input
        .validate()
        .map_err(|e| AppError::Core(CoreError::Validation(e.to_string())))?;
    let origin = NewsOrigin::parse(&input.origin).ok_or_else(|| {
        AppError::Core(CoreError::Validation(format!(
            "unknown origin '{}'",
            input.origin
        )))
    })?;

    let draft = NewsDraftRepo::create(
        &state.pool,
        &CreateNewsDraft {
            url: input.url,
            screenshot_url: String::new(),
            reporter_email: input.reporter_email,
            text: input.text,
            comment: input.comment,
            origin: origin.as_str().to_string(),
            reported_at: input.reported_at.unwrap_or_else(chrono::Utc::now),
        },
    )
    .await?;

    tracing::info!(draft_id = %draft.id, origin = origin.as_str(), "Draft accepted");

    Ok((StatusCode::CREATED, Json(DataResponse { data: draft })))
}
